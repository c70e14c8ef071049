//! Wire objects and their builders.
//!
//! Builders are pure: they take fields whose references are already resolved
//! and never touch the connector.

pub mod pool;
pub mod server;
pub mod zone_forward;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use pool::{
    DtcMonitor, DtcPool, DtcPoolConsolidatedMonitorHealth, DtcServerLink, PoolFields,
    SettingDynamicRatio,
};
pub use server::{DtcServer, DtcServerMonitor, ServerFields};
pub use zone_forward::{
    ForwardingMemberServer, NameServer, ZoneForward, ZoneForwardSpec, ZoneForwardUpdate,
};

/// A top-level store object.
pub trait WireObject: Serialize + DeserializeOwned + Send {
    const OBJECT_TYPE: &'static str;
    /// Fields requested on every read, on top of the store's defaults.
    const RETURN_FIELDS: &'static [&'static str];

    fn reference(&self) -> Option<&str>;
    fn set_reference(&mut self, reference: String);
}

/// Load-balancing methods for DTC pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LbMethod {
    AllAvailable,
    DynamicRatio,
    GlobalAvailability,
    Ratio,
    RoundRobin,
    SourceIpHash,
    Topology,
    /// `NONE`, only meaningful as an alternate method
    None,
}

impl LbMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllAvailable => "ALL_AVAILABLE",
            Self::DynamicRatio => "DYNAMIC_RATIO",
            Self::GlobalAvailability => "GLOBAL_AVAILABILITY",
            Self::Ratio => "RATIO",
            Self::RoundRobin => "ROUND_ROBIN",
            Self::SourceIpHash => "SOURCE_IP_HASH",
            Self::Topology => "TOPOLOGY",
            Self::None => "NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    All,
    Any,
    Quorum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynamicRatioMethod {
    Monitor,
    RoundTripDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorWeighing {
    Ratio,
    Priority,
}

/// Read-only health summary computed by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DtcHealth {
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub enabled_state: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lb_method_wire_names_match_as_str() {
        for method in [
            LbMethod::AllAvailable,
            LbMethod::DynamicRatio,
            LbMethod::GlobalAvailability,
            LbMethod::Ratio,
            LbMethod::RoundRobin,
            LbMethod::SourceIpHash,
            LbMethod::Topology,
            LbMethod::None,
        ] {
            assert_eq!(
                serde_json::to_value(method).unwrap(),
                serde_json::Value::String(method.as_str().to_string())
            );
        }
    }

    #[test]
    fn dynamic_ratio_method_wire_name() {
        assert_eq!(
            serde_json::to_string(&DynamicRatioMethod::RoundTripDelay).unwrap(),
            "\"ROUND_TRIP_DELAY\""
        );
    }
}
