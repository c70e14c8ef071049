//! Connector: the boundary between the object manager and the configuration store.
//!
//! The manager never talks HTTP itself. It hands fully built wire payloads to a
//! `Connector` and receives raw JSON back; `http::WapiConnector` is the
//! production implementation, tests use recording fakes.

pub mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConnectorError>;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("WAPI returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Exact-match search filter passed through to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Ask the store to include inherited field values in the result
    pub include_inherited: bool,
    /// field name -> expected value
    pub search_fields: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new<K, V>(include_inherited: bool, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            include_inherited,
            search_fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// `{"name": <name>}`, the filter every name lookup uses.
    pub fn by_name(name: &str) -> Self {
        Self::new(false, [("name", name)])
    }

    pub fn is_empty(&self) -> bool {
        self.search_fields.is_empty()
    }
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Filtered lookup when `reference` is `None`, by-reference read otherwise.
    /// A by-reference read yields a single-element vector.
    async fn get_object(
        &self,
        object_type: &str,
        reference: Option<&str>,
        return_fields: &[&str],
        query: &QueryParams,
    ) -> Result<Vec<Value>>;

    /// Returns the reference assigned to the new object.
    async fn create_object(&self, object_type: &str, payload: Value) -> Result<String>;

    /// Returns the object's reference after the update, which may differ from the input.
    async fn update_object(&self, reference: &str, payload: Value) -> Result<String>;

    async fn delete_object(&self, reference: &str) -> Result<String>;
}
