//! DTC pool operations

use tracing::instrument;

use super::ObjectManager;
use crate::codec::ExtAttrs;
use crate::connector::QueryParams;
use crate::error::{Result, ValidationError};
use crate::normalize::{ConsolidatedMonitorInput, DynamicRatioInput};
use crate::objects::{Availability, DtcPool, DtcServerLink, LbMethod, PoolFields, WireObject};
use crate::resolver::MonitorName;

/// Caller input for a DTC pool. Servers, monitors and topologies are given by
/// name and resolved on every create/update.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSpec {
    pub name: String,
    pub comment: String,
    pub lb_preferred_method: LbMethod,
    pub lb_dynamic_ratio_preferred: Option<DynamicRatioInput>,
    /// Server names with their ratios
    pub servers: Vec<DtcServerLink>,
    pub monitors: Vec<MonitorName>,
    pub lb_preferred_topology: Option<String>,
    pub lb_alternate_method: Option<LbMethod>,
    pub lb_alternate_topology: Option<String>,
    pub lb_dynamic_ratio_alternate: Option<DynamicRatioInput>,
    pub extattrs: ExtAttrs,
    pub auto_consolidated_monitors: bool,
    pub availability: Option<Availability>,
    pub consolidated_monitors: Vec<ConsolidatedMonitorInput>,
    pub ttl: u32,
    pub use_ttl: bool,
    pub disable: bool,
    pub quorum: u32,
}

impl PoolSpec {
    pub fn new(name: impl Into<String>, lb_preferred_method: LbMethod) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            lb_preferred_method,
            lb_dynamic_ratio_preferred: None,
            servers: Vec::new(),
            monitors: Vec::new(),
            lb_preferred_topology: None,
            lb_alternate_method: None,
            lb_alternate_topology: None,
            lb_dynamic_ratio_alternate: None,
            extattrs: ExtAttrs::new(),
            auto_consolidated_monitors: false,
            availability: None,
            consolidated_monitors: Vec::new(),
            ttl: 0,
            use_ttl: false,
            disable: false,
            quorum: 0,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_server(mut self, name: impl Into<String>, ratio: u32) -> Self {
        self.servers.push(DtcServerLink::new(name, ratio));
        self
    }

    pub fn with_monitor(mut self, monitor: MonitorName) -> Self {
        self.monitors.push(monitor);
        self
    }

    pub fn with_preferred_topology(mut self, topology: impl Into<String>) -> Self {
        self.lb_preferred_topology = Some(topology.into());
        self
    }

    pub fn with_preferred_dynamic_ratio(mut self, settings: DynamicRatioInput) -> Self {
        self.lb_dynamic_ratio_preferred = Some(settings);
        self
    }

    pub fn with_alternate_method(mut self, method: LbMethod) -> Self {
        self.lb_alternate_method = Some(method);
        self
    }

    pub fn with_alternate_topology(mut self, topology: impl Into<String>) -> Self {
        self.lb_alternate_topology = Some(topology.into());
        self
    }

    pub fn with_alternate_dynamic_ratio(mut self, settings: DynamicRatioInput) -> Self {
        self.lb_dynamic_ratio_alternate = Some(settings);
        self
    }

    pub fn with_extattrs(mut self, extattrs: ExtAttrs) -> Self {
        self.extattrs = extattrs;
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self.use_ttl = true;
        self
    }

    pub fn with_availability(mut self, availability: Availability, quorum: u32) -> Self {
        self.availability = Some(availability);
        self.quorum = quorum;
        self
    }

    pub fn with_consolidated_monitor(mut self, entry: ConsolidatedMonitorInput) -> Self {
        self.consolidated_monitors.push(entry);
        self
    }

    pub fn with_auto_consolidated_monitors(mut self) -> Self {
        self.auto_consolidated_monitors = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disable = true;
        self
    }

    /// Checks field combinations that need no store access.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        check_method(
            "lb_preferred_method",
            Some(self.lb_preferred_method),
            self.lb_dynamic_ratio_preferred.is_some(),
            "lb_dynamic_ratio_preferred",
            self.lb_preferred_topology.is_some(),
            "lb_preferred_topology",
        )?;
        check_method(
            "lb_alternate_method",
            self.lb_alternate_method,
            self.lb_dynamic_ratio_alternate.is_some(),
            "lb_dynamic_ratio_alternate",
            self.lb_alternate_topology.is_some(),
            "lb_alternate_topology",
        )?;
        self.consolidated_monitors
            .iter()
            .try_for_each(ConsolidatedMonitorInput::validate)
    }
}

fn check_method(
    method_field: &'static str,
    method: Option<LbMethod>,
    has_dynamic_ratio: bool,
    dynamic_ratio_field: &'static str,
    has_topology: bool,
    topology_field: &'static str,
) -> std::result::Result<(), ValidationError> {
    let (method, field) = match method {
        Some(LbMethod::DynamicRatio) if !has_dynamic_ratio => {
            (LbMethod::DynamicRatio, dynamic_ratio_field)
        }
        Some(LbMethod::Topology) if !has_topology => (LbMethod::Topology, topology_field),
        _ => return Ok(()),
    };
    Err(ValidationError::MethodRequiresSettings {
        method_field,
        method: method.as_str(),
        field,
    })
}

impl ObjectManager {
    /// Resolve every embedded name, in field order, into pool fields.
    async fn normalize_pool(&self, spec: &PoolSpec) -> Result<PoolFields> {
        let normalizer = self.normalizer();

        let servers = normalizer.server_links(&spec.servers).await?;
        let lb_dynamic_ratio_preferred = normalizer
            .dynamic_ratio(spec.lb_dynamic_ratio_preferred.as_ref())
            .await?;
        let monitors = normalizer.monitors(&spec.monitors).await?;
        let lb_preferred_topology = normalizer
            .topology(spec.lb_preferred_topology.as_deref())
            .await?;
        let lb_alternate_topology = normalizer
            .topology(spec.lb_alternate_topology.as_deref())
            .await?;
        let lb_dynamic_ratio_alternate = normalizer
            .dynamic_ratio(spec.lb_dynamic_ratio_alternate.as_ref())
            .await?;
        let consolidated_monitors = normalizer
            .consolidated_monitors(&spec.consolidated_monitors)
            .await?;

        Ok(PoolFields {
            name: spec.name.clone(),
            comment: spec.comment.clone(),
            lb_preferred_method: Some(spec.lb_preferred_method),
            lb_dynamic_ratio_preferred,
            lb_preferred_topology,
            lb_alternate_method: spec.lb_alternate_method,
            lb_alternate_topology,
            lb_dynamic_ratio_alternate,
            servers,
            monitors,
            extattrs: spec.extattrs.clone(),
            auto_consolidated_monitors: spec.auto_consolidated_monitors,
            availability: spec.availability,
            consolidated_monitors,
            ttl: spec.ttl,
            use_ttl: spec.use_ttl,
            disable: spec.disable,
            quorum: spec.quorum,
        })
    }

    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub async fn create_dtc_pool(&self, spec: PoolSpec) -> Result<DtcPool> {
        spec.validate()?;
        let fields = self.normalize_pool(&spec).await?;
        self.create_object(DtcPool::new(fields)).await
    }

    /// First pool matching `query`.
    pub async fn get_dtc_pool(&self, query: &QueryParams) -> Result<DtcPool> {
        self.get_first_object(query).await
    }

    pub async fn get_dtc_pool_by_ref(&self, reference: &str) -> Result<DtcPool> {
        self.get_object_by_ref(reference).await
    }

    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub async fn update_dtc_pool(&self, reference: &str, spec: PoolSpec) -> Result<DtcPool> {
        spec.validate()?;
        let fields = self.normalize_pool(&spec).await?;
        let mut pool = DtcPool::new(fields);
        pool.reference = Some(reference.to_string());
        self.update_object(reference, &pool).await
    }

    #[instrument(skip(self))]
    pub async fn delete_dtc_pool(&self, reference: &str) -> Result<String> {
        self.delete_object(DtcPool::OBJECT_TYPE, reference).await
    }
}
