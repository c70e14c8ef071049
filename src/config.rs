//! WAPI connection configuration
//!
//! Loaded from a YAML file or from `WAPI_*` environment variables. The
//! password itself is never stored in the file; the config names the
//! environment variable that holds it.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use url::Url;

const DEFAULT_PORT: u16 = 443;
const DEFAULT_VERSION: &str = "2.12";
const DEFAULT_PASSWORD_ENV: &str = "WAPI_PASSWORD";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WapiConfig {
    /// Grid master host name or address
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// WAPI version without the leading `v` (e.g. "2.12")
    #[serde(default = "default_version")]
    pub version: String,
    pub username: String,
    /// Environment variable that holds the password
    #[serde(default = "default_password_env")]
    pub password_env: String,
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_password_env() -> String {
    DEFAULT_PASSWORD_ENV.to_string()
}

fn default_ssl_verify() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl WapiConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read WAPI config {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("Failed to parse WAPI config {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from `WAPI_HOST`, `WAPI_USERNAME` and the optional `WAPI_PORT`,
    /// `WAPI_VERSION`, `WAPI_SSL_VERIFY`, `WAPI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("WAPI_HOST").context("WAPI_HOST environment variable not set")?;
        let username =
            lookup("WAPI_USERNAME").context("WAPI_USERNAME environment variable not set")?;

        let port = match lookup("WAPI_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("WAPI_PORT is not a port number: {raw}"))?,
            None => DEFAULT_PORT,
        };
        let ssl_verify = match lookup("WAPI_SSL_VERIFY") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("WAPI_SSL_VERIFY is not a boolean: {raw}"))?,
            None => true,
        };
        let timeout_secs = match lookup("WAPI_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("WAPI_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            host,
            port,
            version: lookup("WAPI_VERSION").unwrap_or_else(default_version),
            username,
            password_env: DEFAULT_PASSWORD_ENV.to_string(),
            ssl_verify,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("WAPI host must not be empty"));
        }
        if self.username.trim().is_empty() {
            return Err(anyhow!("WAPI username must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("WAPI timeout must be at least one second"));
        }
        Ok(())
    }

    pub fn password(&self) -> Result<String> {
        std::env::var(&self.password_env)
            .with_context(|| format!("{} environment variable not set", self.password_env))
    }

    /// `https://<host>:<port>/wapi/v<version>/`
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!(
            "https://{}:{}/wapi/v{}/",
            self.host,
            self.port,
            self.version.trim_start_matches('v')
        );
        Url::parse(&raw).with_context(|| format!("Invalid WAPI base URL {raw}"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("unrecognised flag value {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn yaml_defaults_are_applied() {
        let config = WapiConfig::from_yaml_str("host: gm.example.net\nusername: admin\n").unwrap();
        assert_eq!(config.port, 443);
        assert_eq!(config.version, "2.12");
        assert_eq!(config.password_env, "WAPI_PASSWORD");
        assert!(config.ssl_verify);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "host: 10.0.0.5\nport: 8443\nversion: v2.10\nusername: svc-dtc\nssl_verify: false"
        )
        .unwrap();

        let config = WapiConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 8443);
        assert!(!config.ssl_verify);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://10.0.0.5:8443/wapi/v2.10/"
        );
    }

    #[test]
    fn from_file_missing_path_has_context() {
        let err = WapiConfig::from_file("/nonexistent/wapi.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read WAPI config"));
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(WapiConfig::from_yaml_str("host: ''\nusername: admin\n").is_err());
    }

    #[test]
    fn from_lookup_reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WAPI_HOST", "gm.lab"),
            ("WAPI_USERNAME", "admin"),
            ("WAPI_PORT", "9443"),
            ("WAPI_SSL_VERIFY", "no"),
        ]
        .into_iter()
        .collect();

        let config = WapiConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.host, "gm.lab");
        assert_eq!(config.port, 9443);
        assert!(!config.ssl_verify);
        assert_eq!(config.version, "2.12");
    }

    #[test]
    fn from_lookup_requires_host() {
        let err = WapiConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("WAPI_HOST"));
    }

    #[test]
    fn password_comes_from_named_env_var() {
        let mut config =
            WapiConfig::from_yaml_str("host: gm.example.net\nusername: admin\n").unwrap();
        config.password_env = "DTC_OBJECT_MANAGER_TEST_PASSWORD".to_string();
        std::env::set_var("DTC_OBJECT_MANAGER_TEST_PASSWORD", "infoblox");
        assert_eq!(config.password().unwrap(), "infoblox");
    }
}
