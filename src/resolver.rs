//! Reference resolution
//!
//! Turns human-readable names into store references. Each lookup is a single
//! exact-match query against the connector; nothing is cached between calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::connector::{Connector, QueryParams};
use crate::error::{ObjectManagerError, Operation, Result, ValidationError};

/// Known DTC health monitor types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorKind {
    Http,
    Icmp,
    Pdp,
    Sip,
    Snmp,
    Tcp,
}

impl MonitorKind {
    pub const ALL: [MonitorKind; 6] = [
        Self::Http,
        Self::Icmp,
        Self::Pdp,
        Self::Sip,
        Self::Snmp,
        Self::Tcp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Icmp => "icmp",
            Self::Pdp => "pdp",
            Self::Sip => "sip",
            Self::Snmp => "snmp",
            Self::Tcp => "tcp",
        }
    }

    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Http => "dtc:monitor:http",
            Self::Icmp => "dtc:monitor:icmp",
            Self::Pdp => "dtc:monitor:pdp",
            Self::Sip => "dtc:monitor:sip",
            Self::Snmp => "dtc:monitor:snmp",
            Self::Tcp => "dtc:monitor:tcp",
        }
    }
}

impl FromStr for MonitorKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownMonitorKind(s.to_string()))
    }
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object categories a name can be resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectCategory {
    Server,
    Topology,
    Monitor(MonitorKind),
}

impl ObjectCategory {
    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Server => "dtc:server",
            Self::Topology => "dtc:topology",
            Self::Monitor(kind) => kind.object_type(),
        }
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_type())
    }
}

/// A monitor referenced by name. A missing kind marks the monitor as
/// optional: it resolves to no reference without a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorName {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MonitorKind>,
}

impl MonitorName {
    pub fn new(name: impl Into<String>, kind: MonitorKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    /// Parse a loosely typed `(name, type)` pair. An empty type yields an
    /// optional monitor; an unrecognised one is rejected.
    pub fn parse(name: impl Into<String>, kind: &str) -> std::result::Result<Self, ValidationError> {
        let kind = if kind.trim().is_empty() {
            None
        } else {
            Some(kind.parse()?)
        };
        Ok(Self {
            name: name.into(),
            kind,
        })
    }
}

#[derive(Deserialize)]
struct RefOnly {
    #[serde(rename = "_ref")]
    reference: String,
}

pub struct ReferenceResolver<'a> {
    connector: &'a dyn Connector,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(connector: &'a dyn Connector) -> Self {
        Self { connector }
    }

    /// Resolve `name` in `category`.
    ///
    /// When the store returns several matches the first one wins, in whatever
    /// order the store returned them.
    pub async fn resolve(&self, category: ObjectCategory, name: &str) -> Result<String> {
        self.resolve_by(category, &QueryParams::by_name(name)).await
    }

    pub async fn resolve_by(&self, category: ObjectCategory, query: &QueryParams) -> Result<String> {
        let object_type = category.object_type();
        let matches = self
            .connector
            .get_object(object_type, None, &[], query)
            .await
            .map_err(|e| ObjectManagerError::connector(object_type, Operation::Resolve, e))?;

        let searched = describe(query);
        if matches.len() > 1 {
            tracing::debug!(
                %category,
                name = %searched,
                matches = matches.len(),
                "multiple matches, taking the first"
            );
        }

        let first = matches
            .into_iter()
            .next()
            .ok_or_else(|| ObjectManagerError::NotFound {
                category: object_type.to_string(),
                name: searched.clone(),
            })?;
        let RefOnly { reference } =
            serde_json::from_value(first).map_err(|e| ObjectManagerError::payload(object_type, e))?;

        tracing::debug!(%category, name = %searched, %reference, "resolved reference");
        Ok(reference)
    }

    pub async fn resolve_server(&self, name: &str) -> Result<String> {
        self.resolve(ObjectCategory::Server, name).await
    }

    /// `None` in, `None` out.
    pub async fn resolve_topology(&self, name: Option<&str>) -> Result<Option<String>> {
        match name {
            Some(name) => self.resolve(ObjectCategory::Topology, name).await.map(Some),
            None => Ok(None),
        }
    }

    /// Optional monitors (no kind) short-circuit to `None` without a lookup.
    pub async fn resolve_monitor(&self, monitor: &MonitorName) -> Result<Option<String>> {
        match monitor.kind {
            Some(kind) => self
                .resolve(ObjectCategory::Monitor(kind), &monitor.name)
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}

fn describe(query: &QueryParams) -> String {
    match query.search_fields.get("name") {
        Some(name) if query.search_fields.len() == 1 => name.clone(),
        _ => query
            .search_fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(","),
    }
}
