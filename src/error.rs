use std::fmt;

use thiserror::Error;

use crate::connector::ConnectorError;

pub type Result<T> = std::result::Result<T, ObjectManagerError>;

/// The object-manager step a connector failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Resolve,
    Create,
    Get,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Resolve => "resolve",
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Mandatory-field violations detected before any connector call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("{field} must be provided when {method_field} is set to {method}")]
    MethodRequiresSettings {
        method_field: &'static str,
        method: &'static str,
        field: &'static str,
    },

    #[error(
        "if 'use_sni_hostname' is enabled then 'sni_hostname' must be provided, \
         and if 'sni_hostname' is provided then 'use_sni_hostname' must be enabled"
    )]
    SniHostnameMismatch,

    #[error("unknown DTC monitor type: {0}")]
    UnknownMonitorKind(String),

    #[error("FQDN and forward_to fields are required to create a forward zone")]
    MissingForwardTarget,

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ObjectManagerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{category} with name {name} not found")]
    NotFound { category: String, name: String },

    #[error("no {object_type} object matched the query")]
    NoMatch { object_type: String },

    #[error("{operation} {object_type} failed: {source}")]
    Connector {
        object_type: String,
        operation: Operation,
        #[source]
        source: ConnectorError,
    },

    #[error("malformed {object_type} payload: {source}")]
    Payload {
        object_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ObjectManagerError {
    pub(crate) fn connector(
        object_type: impl Into<String>,
        operation: Operation,
        source: ConnectorError,
    ) -> Self {
        let object_type = object_type.into();
        tracing::warn!(%object_type, %operation, error = %source, "connector call failed");
        Self::Connector {
            object_type,
            operation,
            source,
        }
    }

    pub(crate) fn payload(object_type: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Payload {
            object_type: object_type.into(),
            source,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } | Self::NoMatch { .. } => 404,
            Self::Connector { source, .. } => match source {
                ConnectorError::Status { status, .. } => *status,
                _ => 502,
            },
            Self::Payload { .. } => 500,
        }
    }

    /// True when the failure happened before anything reached the store.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let e = ValidationError::MissingField("availability");
        assert_eq!(e.to_string(), "Required field missing: availability");
    }

    #[test]
    fn display_method_requires_settings() {
        let e = ValidationError::MethodRequiresSettings {
            method_field: "lb_preferred_method",
            method: "TOPOLOGY",
            field: "lb_preferred_topology",
        };
        assert_eq!(
            e.to_string(),
            "lb_preferred_topology must be provided when lb_preferred_method is set to TOPOLOGY"
        );
    }

    #[test]
    fn display_not_found_names_category_and_name() {
        let e = ObjectManagerError::NotFound {
            category: "dtc:server".into(),
            name: "edge-1".into(),
        };
        assert_eq!(e.to_string(), "dtc:server with name edge-1 not found");
    }

    #[test]
    fn validation_is_transparent() {
        let e: ObjectManagerError = ValidationError::SniHostnameMismatch.into();
        assert!(e.to_string().starts_with("if 'use_sni_hostname' is enabled"));
    }

    #[test]
    fn display_connector_carries_operation_context() {
        let e = ObjectManagerError::connector(
            "dtc:pool",
            Operation::Update,
            ConnectorError::Other(anyhow::anyhow!("connection reset")),
        );
        assert_eq!(e.to_string(), "update dtc:pool failed: connection reset");
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(
            ObjectManagerError::from(ValidationError::MissingForwardTarget).http_status(),
            400
        );
        assert_eq!(
            ObjectManagerError::NoMatch {
                object_type: "zone_forward".into()
            }
            .http_status(),
            404
        );
        let upstream = ObjectManagerError::connector(
            "dtc:server",
            Operation::Create,
            ConnectorError::Status {
                status: 401,
                body: "Authorization Required".into(),
            },
        );
        assert_eq!(upstream.http_status(), 401);
        let opaque = ObjectManagerError::connector(
            "dtc:server",
            Operation::Delete,
            ConnectorError::Other(anyhow::anyhow!("boom")),
        );
        assert_eq!(opaque.http_status(), 502);
    }

    #[test]
    fn local_errors_never_reached_the_store() {
        assert!(ObjectManagerError::from(ValidationError::SniHostnameMismatch).is_local());
        assert!(ObjectManagerError::NotFound {
            category: "dtc:topology".into(),
            name: "geo".into()
        }
        .is_local());
        assert!(!ObjectManagerError::NoMatch {
            object_type: "dtc:pool".into()
        }
        .is_local());
    }
}
