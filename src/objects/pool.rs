//! DTC pool wire object

use serde::{Deserialize, Serialize};

use super::{Availability, DtcHealth, DynamicRatioMethod, LbMethod, MonitorWeighing, WireObject};
use crate::codec::{reference_list, ExtAttrs, Referenced};
use crate::resolver::MonitorKind;

/// A pool member: server reference plus its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtcServerLink {
    /// Server name on input, server reference once normalized
    pub server: String,
    #[serde(default)]
    pub ratio: u32,
}

impl DtcServerLink {
    pub fn new(server: impl Into<String>, ratio: u32) -> Self {
        Self {
            server: server.into(),
            ratio,
        }
    }
}

/// A health monitor attached to a pool, sent as its bare reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtcMonitor {
    pub reference: String,
}

impl DtcMonitor {
    /// Monitor type encoded in the reference prefix (`dtc:monitor:<kind>/...`).
    pub fn kind(&self) -> Option<MonitorKind> {
        let object_type = self.reference.split('/').next()?;
        MonitorKind::ALL
            .into_iter()
            .find(|kind| kind.object_type() == object_type)
    }
}

impl Referenced for DtcMonitor {
    fn reference(&self) -> &str {
        &self.reference
    }

    fn from_reference(reference: String) -> Self {
        Self { reference }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDynamicRatio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<DynamicRatioMethod>,
    /// Monitor reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub monitor_metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_weighing: Option<MonitorWeighing>,
    #[serde(default)]
    pub invert_monitor_metric: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtcPoolConsolidatedMonitorHealth {
    /// Grid member names
    pub members: Vec<String>,
    /// Monitor reference
    pub monitor: String,
    pub availability: Availability,
    #[serde(default)]
    pub full_health_communication: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtcPool {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_preferred_method: Option<LbMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_dynamic_ratio_preferred: Option<SettingDynamicRatio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_preferred_topology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_alternate_method: Option<LbMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_alternate_topology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_dynamic_ratio_alternate: Option<SettingDynamicRatio>,
    /// Always sent, so an update with no servers clears the list
    #[serde(default)]
    pub servers: Vec<DtcServerLink>,
    #[serde(default, with = "reference_list")]
    pub monitors: Vec<DtcMonitor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_consolidated_monitors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub consolidated_monitors: Vec<DtcPoolConsolidatedMonitorHealth>,
    #[serde(default, skip_serializing_if = "ExtAttrs::is_empty")]
    pub extattrs: ExtAttrs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quorum: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_ttl: Option<bool>,
    #[serde(default, skip_serializing)]
    pub health: Option<DtcHealth>,
}

impl WireObject for DtcPool {
    const OBJECT_TYPE: &'static str = "dtc:pool";
    const RETURN_FIELDS: &'static [&'static str] = &[
        "name",
        "comment",
        "lb_preferred_method",
        "servers",
        "lb_dynamic_ratio_preferred",
        "monitors",
        "auto_consolidated_monitors",
        "consolidated_monitors",
        "disable",
        "extattrs",
        "health",
        "lb_alternate_method",
        "lb_alternate_topology",
        "lb_dynamic_ratio_alternate",
        "lb_preferred_topology",
        "quorum",
        "ttl",
        "use_ttl",
        "availability",
    ];

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn set_reference(&mut self, reference: String) {
        self.reference = Some(reference);
    }
}

/// Pool fields with every reference already resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolFields {
    pub name: String,
    pub comment: String,
    pub lb_preferred_method: Option<LbMethod>,
    pub lb_dynamic_ratio_preferred: Option<SettingDynamicRatio>,
    pub lb_preferred_topology: Option<String>,
    pub lb_alternate_method: Option<LbMethod>,
    pub lb_alternate_topology: Option<String>,
    pub lb_dynamic_ratio_alternate: Option<SettingDynamicRatio>,
    pub servers: Vec<DtcServerLink>,
    pub monitors: Vec<DtcMonitor>,
    pub extattrs: ExtAttrs,
    pub auto_consolidated_monitors: bool,
    pub availability: Option<Availability>,
    pub consolidated_monitors: Vec<DtcPoolConsolidatedMonitorHealth>,
    pub ttl: u32,
    pub use_ttl: bool,
    pub disable: bool,
    pub quorum: u32,
}

impl DtcPool {
    pub fn new(fields: PoolFields) -> Self {
        Self {
            reference: None,
            name: Some(fields.name),
            comment: Some(fields.comment),
            lb_preferred_method: fields.lb_preferred_method,
            lb_dynamic_ratio_preferred: fields.lb_dynamic_ratio_preferred,
            lb_preferred_topology: fields.lb_preferred_topology,
            lb_alternate_method: fields.lb_alternate_method,
            lb_alternate_topology: fields.lb_alternate_topology,
            lb_dynamic_ratio_alternate: fields.lb_dynamic_ratio_alternate,
            servers: fields.servers,
            monitors: fields.monitors,
            auto_consolidated_monitors: Some(fields.auto_consolidated_monitors),
            availability: fields.availability,
            consolidated_monitors: fields.consolidated_monitors,
            extattrs: fields.extattrs,
            disable: Some(fields.disable),
            quorum: Some(fields.quorum),
            ttl: Some(fields.ttl),
            use_ttl: Some(fields.use_ttl),
            health: None,
        }
    }
}
