//! Create, get, update and delete for DTC pools, DTC servers and forward
//! zones.
//!
//! Every write follows the same pipeline: validate the caller's input, resolve
//! names into references, build the wire object, then make a single connector
//! call. Validation and resolution failures return before anything is written.

mod pool;
mod server;
mod zone_forward;

use std::sync::Arc;

use crate::connector::{Connector, QueryParams};
use crate::error::{ObjectManagerError, Operation, Result};
use crate::normalize::Normalizer;
use crate::objects::WireObject;

pub use crate::objects::{ZoneForwardSpec, ZoneForwardUpdate};
pub use pool::PoolSpec;
pub use server::ServerSpec;

#[derive(Clone)]
pub struct ObjectManager {
    connector: Arc<dyn Connector>,
}

impl ObjectManager {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &dyn Connector {
        self.connector.as_ref()
    }

    fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::new(self.connector.as_ref())
    }

    async fn create_object<T: WireObject>(&self, mut object: T) -> Result<T> {
        let payload = encode(&object)?;
        let reference = self
            .connector
            .create_object(T::OBJECT_TYPE, payload)
            .await
            .map_err(|e| ObjectManagerError::connector(T::OBJECT_TYPE, Operation::Create, e))?;

        tracing::info!(object_type = T::OBJECT_TYPE, %reference, "object created");
        object.set_reference(reference);
        Ok(object)
    }

    /// Submit against `reference`, then read the object back under the
    /// reference the store returned so computed fields are current.
    async fn update_object<T: WireObject>(&self, reference: &str, object: &T) -> Result<T> {
        let payload = encode(object)?;
        let new_reference = self
            .connector
            .update_object(reference, payload)
            .await
            .map_err(|e| ObjectManagerError::connector(T::OBJECT_TYPE, Operation::Update, e))?;

        tracing::info!(
            object_type = T::OBJECT_TYPE,
            old_reference = %reference,
            %new_reference,
            "object updated"
        );
        self.get_object_by_ref(&new_reference).await
    }

    async fn get_objects<T: WireObject>(&self, query: &QueryParams) -> Result<Vec<T>> {
        self.query_raw::<T>(query)
            .await?
            .into_iter()
            .map(decode::<T>)
            .collect()
    }

    /// Only the first match is decoded; later records are never inspected.
    async fn get_first_object<T: WireObject>(&self, query: &QueryParams) -> Result<T> {
        let first = self
            .query_raw::<T>(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ObjectManagerError::NoMatch {
                object_type: T::OBJECT_TYPE.to_string(),
            })?;
        decode(first)
    }

    async fn query_raw<T: WireObject>(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<serde_json::Value>> {
        self.connector
            .get_object(T::OBJECT_TYPE, None, T::RETURN_FIELDS, query)
            .await
            .map_err(|e| ObjectManagerError::connector(T::OBJECT_TYPE, Operation::Get, e))
    }

    async fn get_object_by_ref<T: WireObject>(&self, reference: &str) -> Result<T> {
        let raw = self
            .connector
            .get_object(
                T::OBJECT_TYPE,
                Some(reference),
                T::RETURN_FIELDS,
                &QueryParams::default(),
            )
            .await
            .map_err(|e| ObjectManagerError::connector(T::OBJECT_TYPE, Operation::Get, e))?;

        let first = raw
            .into_iter()
            .next()
            .ok_or_else(|| ObjectManagerError::NoMatch {
                object_type: T::OBJECT_TYPE.to_string(),
            })?;
        let mut object = decode::<T>(first)?;
        if object.reference().is_none() {
            object.set_reference(reference.to_string());
        }
        Ok(object)
    }

    async fn delete_object(&self, object_type: &str, reference: &str) -> Result<String> {
        let deleted = self
            .connector
            .delete_object(reference)
            .await
            .map_err(|e| ObjectManagerError::connector(object_type, Operation::Delete, e))?;

        tracing::info!(object_type, reference = %deleted, "object deleted");
        Ok(deleted)
    }
}

fn encode<T: WireObject>(object: &T) -> Result<serde_json::Value> {
    serde_json::to_value(object).map_err(|e| ObjectManagerError::payload(T::OBJECT_TYPE, e))
}

fn decode<T: WireObject>(raw: serde_json::Value) -> Result<T> {
    serde_json::from_value(raw).map_err(|e| ObjectManagerError::payload(T::OBJECT_TYPE, e))
}
