//! Nested-field normalization
//!
//! Callers describe nested structures by name (monitor names, server names,
//! topology names). The normalizer swaps every embedded name for its store
//! reference and produces the wire-ready structs. Lookups run one after
//! another in field order, so the first failing lookup is the error reported,
//! and nothing partially resolved escapes on failure.
//!
//! The `*Input` types also accept loosely typed JSON maps through
//! `from_config`, which validates them into the typed shape up front.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::connector::Connector;
use crate::error::{Result, ValidationError};
use crate::objects::{
    Availability, DtcMonitor, DtcPoolConsolidatedMonitorHealth, DtcServerLink, DtcServerMonitor,
    DynamicRatioMethod, MonitorWeighing, SettingDynamicRatio,
};
use crate::resolver::{MonitorName, ReferenceResolver};

type ConfigResult<T> = std::result::Result<T, ValidationError>;

// ============================================================================
// INPUTS
// ============================================================================

/// Dynamic-ratio settings with the monitor still given by name.
///
/// Leaving the whole input out (`None` at the call site) omits the settings
/// block from the payload; a default input sends an explicit, empty block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicRatioInput {
    #[serde(default)]
    pub method: Option<DynamicRatioMethod>,
    /// A monitor without a type is optional and resolves to no reference.
    #[serde(default)]
    pub monitor: MonitorName,
    #[serde(default)]
    pub monitor_metric: String,
    #[serde(default)]
    pub monitor_weighing: Option<MonitorWeighing>,
    #[serde(default)]
    pub invert_monitor_metric: bool,
}

impl DynamicRatioInput {
    pub fn new(method: DynamicRatioMethod, monitor: MonitorName) -> Self {
        Self {
            method: Some(method),
            monitor,
            ..Default::default()
        }
    }

    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.monitor_metric = metric.into();
        self
    }

    pub fn with_weighing(mut self, weighing: MonitorWeighing) -> Self {
        self.monitor_weighing = Some(weighing);
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert_monitor_metric = true;
        self
    }

    /// Keys: `monitor` (`{"name", "type"}`), `method`, `monitor_metric`,
    /// `monitor_weighing`, `monitor_invert_monitor` (or `invert_monitor_metric`).
    /// Absent keys take their default; present keys of the wrong type are rejected.
    pub fn from_config(config: &Value) -> ConfigResult<Self> {
        let map = as_object(config, "lb_dynamic_ratio")?;
        let invert = match optional_bool(map, "monitor_invert_monitor")? {
            Some(flag) => flag,
            None => optional_bool(map, "invert_monitor_metric")?.unwrap_or_default(),
        };
        Ok(Self {
            method: optional_enum(map, "method")?,
            monitor: optional_monitor(map, "monitor")?.unwrap_or_default(),
            monitor_metric: optional_str(map, "monitor_metric")?
                .unwrap_or_default()
                .to_string(),
            monitor_weighing: optional_enum(map, "monitor_weighing")?,
            invert_monitor_metric: invert,
        })
    }
}

/// One consolidated-monitor entry of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedMonitorInput {
    pub monitor: MonitorName,
    pub availability: Availability,
    /// Grid member names
    pub members: Vec<String>,
    #[serde(default)]
    pub full_health_communication: bool,
}

impl ConsolidatedMonitorInput {
    pub fn new(monitor: MonitorName, availability: Availability, members: Vec<String>) -> Self {
        Self {
            monitor,
            availability,
            members,
            full_health_communication: false,
        }
    }

    pub fn with_full_health_communication(mut self) -> Self {
        self.full_health_communication = true;
        self
    }

    /// Mandatory keys are checked in order `monitor`, `availability`,
    /// `members`; a missing or mistyped one is reported by name.
    pub fn from_config(config: &Value) -> ConfigResult<Self> {
        let map = as_object(config, "consolidated_monitors")?;
        let monitor = mandatory_monitor(map, "monitor")?;
        let availability = optional_enum::<Availability>(map, "availability")
            .ok()
            .flatten()
            .ok_or(ValidationError::MissingField("availability"))?;
        let members = field(map, "members")
            .and_then(|v| serde_json::from_value::<Vec<String>>(v.clone()).ok())
            .ok_or(ValidationError::MissingField("members"))?;

        Ok(Self {
            monitor,
            availability,
            members,
            full_health_communication: optional_bool(map, "full_health_communication")?
                .unwrap_or_default(),
        })
    }

    /// The monitor must be typed: a consolidated entry without one is meaningless.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.monitor.kind.is_none() || self.monitor.name.is_empty() {
            return Err(ValidationError::MissingField("monitor"));
        }
        Ok(())
    }
}

/// One monitor binding of a DTC server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMonitorInput {
    pub monitor: MonitorName,
    #[serde(default)]
    pub host: String,
}

impl ServerMonitorInput {
    pub fn new(monitor: MonitorName) -> Self {
        Self {
            monitor,
            host: String::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn from_config(config: &Value) -> ConfigResult<Self> {
        let map = as_object(config, "monitors")?;
        let monitor = mandatory_monitor(map, "monitor")?;
        Ok(Self {
            monitor,
            host: optional_str(map, "host")?.unwrap_or_default().to_string(),
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.monitor.kind.is_none() || self.monitor.name.is_empty() {
            return Err(ValidationError::MissingField("monitor"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// loose-map extraction
// ---------------------------------------------------------------------------

fn as_object<'a>(config: &'a Value, what: &'static str) -> ConfigResult<&'a Map<String, Value>> {
    config.as_object().ok_or_else(|| ValidationError::InvalidField {
        field: what,
        reason: "expected an object".to_string(),
    })
}

/// `null` counts as absent.
fn field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn mistyped(key: &'static str, expected: &str) -> ValidationError {
    ValidationError::InvalidField {
        field: key,
        reason: format!("expected {expected}"),
    }
}

fn optional_str<'a>(map: &'a Map<String, Value>, key: &'static str) -> ConfigResult<Option<&'a str>> {
    field(map, key)
        .map(|v| v.as_str().ok_or_else(|| mistyped(key, "a string")))
        .transpose()
}

fn optional_bool(map: &Map<String, Value>, key: &'static str) -> ConfigResult<Option<bool>> {
    field(map, key)
        .map(|v| v.as_bool().ok_or_else(|| mistyped(key, "a boolean")))
        .transpose()
}

fn optional_enum<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &'static str,
) -> ConfigResult<Option<T>> {
    field(map, key)
        .map(|v| {
            serde_json::from_value(v.clone()).map_err(|e| ValidationError::InvalidField {
                field: key,
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Absent or malformed reports the key as missing; an unknown type is passed through.
fn mandatory_monitor(map: &Map<String, Value>, key: &'static str) -> ConfigResult<MonitorName> {
    match optional_monitor(map, key) {
        Ok(Some(monitor)) => Ok(monitor),
        Err(err @ ValidationError::UnknownMonitorKind(_)) => Err(err),
        _ => Err(ValidationError::MissingField(key)),
    }
}

/// `{"name": .., "type": ..}`; an empty or missing type makes the monitor optional.
fn optional_monitor(
    map: &Map<String, Value>,
    key: &'static str,
) -> ConfigResult<Option<MonitorName>> {
    let Some(value) = field(map, key) else {
        return Ok(None);
    };
    let monitor = value
        .as_object()
        .ok_or_else(|| mistyped(key, "an object with name and type"))?;
    let name = optional_str(monitor, "name")?.ok_or_else(|| mistyped(key, "a monitor name"))?;
    let kind = optional_str(monitor, "type")?.unwrap_or_default();
    MonitorName::parse(name, kind).map(Some)
}

// ============================================================================
// NORMALIZER
// ============================================================================

pub struct Normalizer<'a> {
    resolver: ReferenceResolver<'a>,
}

impl<'a> Normalizer<'a> {
    pub fn new(connector: &'a dyn Connector) -> Self {
        Self {
            resolver: ReferenceResolver::new(connector),
        }
    }

    /// Replace every server name with its reference. The input is left
    /// untouched; on failure nothing is returned.
    pub async fn server_links(&self, links: &[DtcServerLink]) -> Result<Vec<DtcServerLink>> {
        let mut resolved = Vec::with_capacity(links.len());
        for link in links {
            let server = self.resolver.resolve_server(&link.server).await?;
            resolved.push(DtcServerLink {
                server,
                ratio: link.ratio,
            });
        }
        Ok(resolved)
    }

    /// `None` stays `None` so an unset block is omitted rather than zeroed.
    pub async fn dynamic_ratio(
        &self,
        input: Option<&DynamicRatioInput>,
    ) -> Result<Option<SettingDynamicRatio>> {
        let Some(input) = input else {
            return Ok(None);
        };
        let monitor = self.resolver.resolve_monitor(&input.monitor).await?;
        Ok(Some(SettingDynamicRatio {
            method: input.method,
            monitor,
            monitor_metric: input.monitor_metric.clone(),
            monitor_weighing: input.monitor_weighing,
            invert_monitor_metric: input.invert_monitor_metric,
        }))
    }

    /// Order is preserved; untyped (optional) monitors resolve to nothing and are left out.
    pub async fn monitors(&self, monitors: &[MonitorName]) -> Result<Vec<DtcMonitor>> {
        let mut resolved = Vec::with_capacity(monitors.len());
        for monitor in monitors {
            match self.resolver.resolve_monitor(monitor).await? {
                Some(reference) => resolved.push(DtcMonitor { reference }),
                None => tracing::debug!(name = %monitor.name, "skipping untyped monitor"),
            }
        }
        Ok(resolved)
    }

    pub async fn topology(&self, name: Option<&str>) -> Result<Option<String>> {
        self.resolver.resolve_topology(name).await
    }

    pub async fn consolidated_monitors(
        &self,
        entries: &[ConsolidatedMonitorInput],
    ) -> Result<Vec<DtcPoolConsolidatedMonitorHealth>> {
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            entry.validate()?;
            let monitor = self.required_monitor(&entry.monitor).await?;
            resolved.push(DtcPoolConsolidatedMonitorHealth {
                members: entry.members.clone(),
                monitor,
                availability: entry.availability,
                full_health_communication: entry.full_health_communication,
            });
        }
        Ok(resolved)
    }

    pub async fn server_monitors(
        &self,
        entries: &[ServerMonitorInput],
    ) -> Result<Vec<DtcServerMonitor>> {
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            entry.validate()?;
            let monitor = self.required_monitor(&entry.monitor).await?;
            resolved.push(DtcServerMonitor {
                monitor,
                host: entry.host.clone(),
            });
        }
        Ok(resolved)
    }

    async fn required_monitor(&self, monitor: &MonitorName) -> Result<String> {
        self.resolver
            .resolve_monitor(monitor)
            .await?
            .ok_or_else(|| ValidationError::MissingField("monitor").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MonitorKind;
    use serde_json::json;

    #[test]
    fn dynamic_ratio_from_config_defaults_absent_fields() {
        let input = DynamicRatioInput::from_config(&json!({
            "monitor": { "name": "snmp", "type": "snmp" },
            "method": "MONITOR",
            "monitor_metric": ".1.1",
            "monitor_invert_monitor": false
        }))
        .unwrap();

        assert_eq!(input.method, Some(DynamicRatioMethod::Monitor));
        assert_eq!(input.monitor, MonitorName::new("snmp", MonitorKind::Snmp));
        assert_eq!(input.monitor_metric, ".1.1");
        assert_eq!(input.monitor_weighing, None);
        assert!(!input.invert_monitor_metric);
    }

    #[test]
    fn dynamic_ratio_accepts_invert_monitor_metric_key() {
        let input = DynamicRatioInput::from_config(&json!({
            "monitor": { "name": "snmp", "type": "snmp" },
            "invert_monitor_metric": true
        }))
        .unwrap();
        assert!(input.invert_monitor_metric);

        // `monitor_invert_monitor` wins when both are present
        let input = DynamicRatioInput::from_config(&json!({
            "monitor_invert_monitor": false,
            "invert_monitor_metric": true
        }))
        .unwrap();
        assert!(!input.invert_monitor_metric);

        let err = DynamicRatioInput::from_config(&json!({ "invert_monitor_metric": "yes" }))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField { field: "invert_monitor_metric", .. }
        ));
    }

    #[test]
    fn dynamic_ratio_without_monitor_is_optional() {
        let input = DynamicRatioInput::from_config(&json!({ "method": "ROUND_TRIP_DELAY" })).unwrap();
        assert_eq!(input.monitor.kind, None);
        assert_eq!(input.method, Some(DynamicRatioMethod::RoundTripDelay));
    }

    #[test]
    fn dynamic_ratio_mistyped_field_is_rejected() {
        let err = DynamicRatioInput::from_config(&json!({ "monitor_metric": 7 })).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField { field: "monitor_metric", .. }
        ));

        let err = DynamicRatioInput::from_config(&json!({ "method": "FASTEST" })).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "method", .. }));
    }

    #[test]
    fn dynamic_ratio_unknown_monitor_type_is_rejected() {
        let err = DynamicRatioInput::from_config(&json!({
            "monitor": { "name": "ldap", "type": "ldap" }
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownMonitorKind("ldap".into()));
    }

    #[test]
    fn consolidated_from_config_reports_each_missing_field() {
        let base = json!({
            "monitor": { "name": "http", "type": "http" },
            "availability": "ALL",
            "members": ["infoblox.localdomain"],
            "full_health_communication": true
        });
        let parsed = ConsolidatedMonitorInput::from_config(&base).unwrap();
        assert_eq!(parsed.availability, Availability::All);
        assert!(parsed.full_health_communication);

        for (key, expected) in [
            ("monitor", "monitor"),
            ("availability", "availability"),
            ("members", "members"),
        ] {
            let mut missing = base.clone();
            missing.as_object_mut().unwrap().remove(key);
            assert_eq!(
                ConsolidatedMonitorInput::from_config(&missing).unwrap_err(),
                ValidationError::MissingField(expected)
            );
        }
    }

    #[test]
    fn consolidated_wrong_type_counts_as_missing() {
        let err = ConsolidatedMonitorInput::from_config(&json!({
            "monitor": { "name": "http", "type": "http" },
            "availability": "ANY",
            "members": "infoblox.localdomain"
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("members"));
    }

    #[test]
    fn consolidated_unknown_monitor_type_is_reported_as_such() {
        let err = ConsolidatedMonitorInput::from_config(&json!({
            "monitor": { "name": "x", "type": "ldap" },
            "availability": "ALL",
            "members": ["infoblox.localdomain"]
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownMonitorKind("ldap".into()));

        let err = ConsolidatedMonitorInput::from_config(&json!({
            "monitor": "http",
            "availability": "ALL",
            "members": ["infoblox.localdomain"]
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("monitor"));
    }

    #[test]
    fn consolidated_validate_requires_typed_monitor() {
        let entry = ConsolidatedMonitorInput::new(
            MonitorName::parse("http", "").unwrap(),
            Availability::Any,
            vec![],
        );
        assert_eq!(entry.validate(), Err(ValidationError::MissingField("monitor")));
    }

    #[test]
    fn server_monitor_from_config() {
        let input = ServerMonitorInput::from_config(&json!({
            "monitor": { "name": "https", "type": "http" },
            "host": "192.0.2.20"
        }))
        .unwrap();
        assert_eq!(input.host, "192.0.2.20");
        assert!(input.validate().is_ok());

        assert_eq!(
            ServerMonitorInput::from_config(&json!({ "host": "x" })).unwrap_err(),
            ValidationError::MissingField("monitor")
        );
        assert_eq!(
            ServerMonitorInput::from_config(&json!({ "monitor": { "name": "x", "type": "dns" } }))
                .unwrap_err(),
            ValidationError::UnknownMonitorKind("dns".into())
        );
    }
}
