//! WAPI HTTP connector
//!
//! reqwest-backed `Connector` speaking the WAPI REST dialect: object types and
//! references are path segments under the versioned base URL, filters are
//! query parameters, references come back as JSON strings.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use super::{Connector, ConnectorError, QueryParams, Result};
use crate::config::WapiConfig;

const ERROR_BODY_LIMIT: usize = 200;

pub struct WapiConnector {
    http: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl WapiConnector {
    /// Create a connector, reading the password from `config.password_env`.
    pub fn new(config: &WapiConfig) -> anyhow::Result<Self> {
        let password = config.password()?;
        Self::with_password(config, password)
    }

    pub fn with_password(config: &WapiConfig, password: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url()?,
            username: config.username.clone(),
            password: password.into(),
        })
    }

    /// Resolve an object type or reference against the base URL.
    ///
    /// References look like `dtc:pool/ZG5z...:name`; the leading `./` keeps
    /// the `dtc:` prefix from being parsed as a URL scheme.
    fn object_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(&format!("./{path}"))
            .with_context(|| format!("Invalid WAPI object path {path}"))
            .map_err(ConnectorError::from)
    }

    fn search_url(
        &self,
        object_type: &str,
        reference: Option<&str>,
        return_fields: &[&str],
        query: &QueryParams,
    ) -> Result<Url> {
        let mut url = self.object_url(reference.unwrap_or(object_type))?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        if !return_fields.is_empty() {
            pairs.push(("_return_fields+".to_string(), return_fields.join(",")));
        }
        if query.include_inherited {
            pairs.push(("_inheritance".to_string(), "True".to_string()));
        }
        if reference.is_none() {
            pairs.extend(
                query
                    .search_fields
                    .iter()
                    .map(|(field, value)| (field.clone(), value.clone())),
            );
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value> {
        tracing::debug!(%method, %url, "WAPI request");

        let mut request = self
            .http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_for_reference(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<String> {
        let value = self.send(method, url, body).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl Connector for WapiConnector {
    async fn get_object(
        &self,
        object_type: &str,
        reference: Option<&str>,
        return_fields: &[&str],
        query: &QueryParams,
    ) -> Result<Vec<Value>> {
        let url = self.search_url(object_type, reference, return_fields, query)?;
        match self.send(Method::GET, url, None).await? {
            Value::Array(objects) => Ok(objects),
            Value::Null => Ok(Vec::new()),
            object => Ok(vec![object]),
        }
    }

    async fn create_object(&self, object_type: &str, payload: Value) -> Result<String> {
        let url = self.object_url(object_type)?;
        self.send_for_reference(Method::POST, url, Some(&payload))
            .await
    }

    async fn update_object(&self, reference: &str, payload: Value) -> Result<String> {
        let url = self.object_url(reference)?;
        self.send_for_reference(Method::PUT, url, Some(&payload))
            .await
    }

    async fn delete_object(&self, reference: &str) -> Result<String> {
        let url = self.object_url(reference)?;
        self.send_for_reference(Method::DELETE, url, None).await
    }
}
