//! Forward zone operations

use tracing::instrument;

use super::ObjectManager;
use crate::connector::QueryParams;
use crate::error::Result;
use crate::objects::{WireObject, ZoneForward, ZoneForwardSpec, ZoneForwardUpdate};

impl ObjectManager {
    #[instrument(skip(self, spec), fields(fqdn = %spec.fqdn))]
    pub async fn create_zone_forward(&self, spec: ZoneForwardSpec) -> Result<ZoneForward> {
        spec.validate()?;
        self.create_object(ZoneForward::new(spec)).await
    }

    pub async fn get_zone_forward_by_ref(&self, reference: &str) -> Result<ZoneForward> {
        self.get_object_by_ref(reference).await
    }

    /// Every zone matching `filters`; an empty result is not an error.
    pub async fn get_zone_forward_filters(&self, filters: &QueryParams) -> Result<Vec<ZoneForward>> {
        self.get_objects(filters).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_zone_forward(
        &self,
        reference: &str,
        update: ZoneForwardUpdate,
    ) -> Result<ZoneForward> {
        let mut zone = ZoneForward::from_update(update);
        zone.reference = Some(reference.to_string());
        self.update_object(reference, &zone).await
    }

    #[instrument(skip(self))]
    pub async fn delete_zone_forward(&self, reference: &str) -> Result<String> {
        self.delete_object(ZoneForward::OBJECT_TYPE, reference).await
    }
}
