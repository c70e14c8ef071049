//! DTC server wire object

use serde::{Deserialize, Serialize};

use super::{DtcHealth, WireObject};
use crate::codec::ExtAttrs;

/// Server-side monitor binding; `host` overrides the server host for probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtcServerMonitor {
    /// Monitor reference
    pub monitor: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtcServer {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_host_record: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,
    #[serde(default, skip_serializing_if = "ExtAttrs::is_empty")]
    pub extattrs: ExtAttrs,
    /// Always sent, so an update with no monitors clears the list
    #[serde(default)]
    pub monitors: Vec<DtcServerMonitor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni_hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_sni_hostname: Option<bool>,
    #[serde(default, skip_serializing)]
    pub health: Option<DtcHealth>,
}

impl WireObject for DtcServer {
    const OBJECT_TYPE: &'static str = "dtc:server";
    const RETURN_FIELDS: &'static [&'static str] = &[
        "name",
        "host",
        "comment",
        "extattrs",
        "auto_create_host_record",
        "disable",
        "health",
        "monitors",
        "sni_hostname",
        "use_sni_hostname",
    ];

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn set_reference(&mut self, reference: String) {
        self.reference = Some(reference);
    }
}

/// Server fields with monitor references already resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerFields {
    pub name: String,
    pub host: String,
    pub comment: String,
    pub auto_create_host_record: bool,
    pub disable: bool,
    pub extattrs: ExtAttrs,
    pub monitors: Vec<DtcServerMonitor>,
    pub sni_hostname: String,
    pub use_sni_hostname: bool,
}

impl DtcServer {
    pub fn new(fields: ServerFields) -> Self {
        Self {
            reference: None,
            name: Some(fields.name),
            host: Some(fields.host),
            comment: Some(fields.comment),
            auto_create_host_record: Some(fields.auto_create_host_record),
            disable: Some(fields.disable),
            extattrs: fields.extattrs,
            monitors: fields.monitors,
            sni_hostname: (!fields.sni_hostname.is_empty()).then_some(fields.sni_hostname),
            use_sni_hostname: Some(fields.use_sni_hostname),
            health: None,
        }
    }
}
