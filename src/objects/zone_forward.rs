//! Forward zone wire object

use serde::{Deserialize, Serialize};

use super::WireObject;
use crate::codec::{nullable, ExtAttrs, NullableCollection};
use crate::error::ValidationError;

pub const DEFAULT_VIEW: &str = "default";
pub const DEFAULT_ZONE_FORMAT: &str = "FORWARD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameServer {
    pub address: String,
    #[serde(default)]
    pub name: String,
}

impl NameServer {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }
}

/// Grid member that serves the zone, optionally with its own forwarders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingMemberServer {
    pub name: String,
    #[serde(default)]
    pub forwarders_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forward_to: Vec<NameServer>,
    #[serde(default)]
    pub use_override_forwarders: bool,
}

impl ForwardingMemberServer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forwarders_only: false,
            forward_to: Vec::new(),
            use_override_forwarders: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneForward {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,
    #[serde(default, skip_serializing_if = "ExtAttrs::is_empty")]
    pub extattrs: ExtAttrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forward_to: Vec<NameServer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarders_only: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize_present"
    )]
    pub forwarding_servers: Option<NullableCollection<ForwardingMemberServer>>,
}

impl WireObject for ZoneForward {
    const OBJECT_TYPE: &'static str = "zone_forward";
    const RETURN_FIELDS: &'static [&'static str] = &[
        "fqdn",
        "view",
        "forward_to",
        "zone_format",
        "ns_group",
        "comment",
        "disable",
        "extattrs",
        "forwarders_only",
        "forwarding_servers",
    ];

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn set_reference(&mut self, reference: String) {
        self.reference = Some(reference);
    }
}

/// Caller input for creating a forward zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneForwardSpec {
    pub fqdn: String,
    pub comment: String,
    pub disable: bool,
    pub extattrs: ExtAttrs,
    pub forward_to: Option<Vec<NameServer>>,
    pub forwarders_only: bool,
    /// `None` leaves the attribute out of the payload
    pub forwarding_servers: Option<Vec<ForwardingMemberServer>>,
    /// Empty means no name-server group
    pub ns_group: String,
    /// Empty means [`DEFAULT_VIEW`]
    pub view: String,
    /// Empty means [`DEFAULT_ZONE_FORMAT`]
    pub zone_format: String,
}

impl ZoneForwardSpec {
    pub fn new(fqdn: impl Into<String>, forward_to: Vec<NameServer>) -> Self {
        Self {
            fqdn: fqdn.into(),
            forward_to: Some(forward_to),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fqdn.is_empty() && self.forward_to.is_none() {
            return Err(ValidationError::MissingForwardTarget);
        }
        Ok(())
    }
}

/// Caller input for updating a forward zone. The FQDN, view and zone format
/// are fixed at creation and not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneForwardUpdate {
    pub comment: String,
    pub disable: bool,
    pub extattrs: ExtAttrs,
    pub forward_to: Option<Vec<NameServer>>,
    pub forwarders_only: bool,
    /// Null or `None` leaves the members untouched, empty clears them
    pub forwarding_servers: Option<NullableCollection<ForwardingMemberServer>>,
    pub ns_group: String,
}

impl ZoneForward {
    pub fn new(spec: ZoneForwardSpec) -> Self {
        Self {
            reference: None,
            fqdn: Some(spec.fqdn),
            view: Some(or_default(spec.view, DEFAULT_VIEW)),
            zone_format: Some(or_default(spec.zone_format, DEFAULT_ZONE_FORMAT)),
            ns_group: non_empty(spec.ns_group),
            comment: Some(spec.comment),
            disable: Some(spec.disable),
            extattrs: spec.extattrs,
            forward_to: spec.forward_to.unwrap_or_default(),
            forwarders_only: Some(spec.forwarders_only),
            forwarding_servers: spec.forwarding_servers.map(NullableCollection::from),
        }
    }

    pub fn from_update(update: ZoneForwardUpdate) -> Self {
        Self {
            comment: Some(update.comment),
            disable: Some(update.disable),
            extattrs: update.extattrs,
            forward_to: update.forward_to.unwrap_or_default(),
            forwarders_only: Some(update.forwarders_only),
            forwarding_servers: update.forwarding_servers.filter(|s| !s.is_null()),
            ns_group: non_empty(update.ns_group),
            ..Default::default()
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
