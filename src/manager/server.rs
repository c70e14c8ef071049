//! DTC server operations

use tracing::instrument;

use super::ObjectManager;
use crate::codec::ExtAttrs;
use crate::connector::QueryParams;
use crate::error::{Result, ValidationError};
use crate::normalize::ServerMonitorInput;
use crate::objects::{DtcServer, ServerFields, WireObject};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerSpec {
    pub name: String,
    pub host: String,
    pub comment: String,
    pub auto_create_host_record: bool,
    pub disable: bool,
    pub extattrs: ExtAttrs,
    pub monitors: Vec<ServerMonitorInput>,
    pub sni_hostname: String,
    pub use_sni_hostname: bool,
}

impl ServerSpec {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_monitor(mut self, monitor: ServerMonitorInput) -> Self {
        self.monitors.push(monitor);
        self
    }

    pub fn with_sni_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.sni_hostname = hostname.into();
        self.use_sni_hostname = true;
        self
    }

    pub fn with_extattrs(mut self, extattrs: ExtAttrs) -> Self {
        self.extattrs = extattrs;
        self
    }

    pub fn with_auto_create_host_record(mut self) -> Self {
        self.auto_create_host_record = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disable = true;
        self
    }

    /// The SNI flag and hostname must agree: both set or both unset.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.use_sni_hostname == self.sni_hostname.is_empty() {
            return Err(ValidationError::SniHostnameMismatch);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.host.trim().is_empty() {
            return Err(ValidationError::MissingField("host"));
        }
        self.monitors
            .iter()
            .try_for_each(ServerMonitorInput::validate)
    }
}

impl ObjectManager {
    async fn normalize_server(&self, spec: &ServerSpec) -> Result<ServerFields> {
        let monitors = self.normalizer().server_monitors(&spec.monitors).await?;

        Ok(ServerFields {
            name: spec.name.clone(),
            host: spec.host.clone(),
            comment: spec.comment.clone(),
            auto_create_host_record: spec.auto_create_host_record,
            disable: spec.disable,
            extattrs: spec.extattrs.clone(),
            monitors,
            sni_hostname: spec.sni_hostname.clone(),
            use_sni_hostname: spec.use_sni_hostname,
        })
    }

    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub async fn create_dtc_server(&self, spec: ServerSpec) -> Result<DtcServer> {
        spec.validate()?;
        let fields = self.normalize_server(&spec).await?;
        self.create_object(DtcServer::new(fields)).await
    }

    pub async fn get_dtc_server(&self, query: &QueryParams) -> Result<DtcServer> {
        self.get_first_object(query).await
    }

    pub async fn get_dtc_server_by_ref(&self, reference: &str) -> Result<DtcServer> {
        self.get_object_by_ref(reference).await
    }

    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub async fn update_dtc_server(&self, reference: &str, spec: ServerSpec) -> Result<DtcServer> {
        spec.validate()?;
        let fields = self.normalize_server(&spec).await?;
        let mut server = DtcServer::new(fields);
        server.reference = Some(reference.to_string());
        self.update_object(reference, &server).await
    }

    #[instrument(skip(self))]
    pub async fn delete_dtc_server(&self, reference: &str) -> Result<String> {
        self.delete_object(DtcServer::OBJECT_TYPE, reference).await
    }
}
