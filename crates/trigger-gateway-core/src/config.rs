//! Configuration for the trigger gateway
//!
//! Loaded once at adapter construction and never mutated afterward.
//!
//! Sources, applied in order (later sources override earlier ones):
//!  1. Built-in defaults ([`GatewayConfig::default`])
//!  2. An optional YAML file
//!  3. Environment variables prefixed `TRIGGER_GATEWAY__`, with `__`
//!     separating nested keys, e.g. `TRIGGER_GATEWAY__LOGGING__LEVEL=debug`
//!
//! Default response headers and default cookie attributes are merged with
//! whatever is configured rather than replaced by it.

use crate::{
    cookie::CookieAttributes, error::ConfigError, notation::decode_notation,
    webhook::WebhookMatcher,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TRIGGER_GATEWAY";

/// Default auth token cookie name
pub const DEFAULT_TOKEN_COOKIE: &str = "seneca-auth";

/// Default message for events that carry none
pub const DEFAULT_EVENT_MESSAGE: &str = "sys,gateway,handle:event";

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Headers every HTTP response starts with
    #[serde(deserialize_with = "deserialize_headers")]
    pub headers: BTreeMap<String, String>,

    /// Auth cookie settings; `None` disables auth directives
    pub auth: Option<AuthConfig>,

    /// Webhook routes, tried in order
    pub webhooks: Vec<WebhookRouteConfig>,

    /// Event trigger settings
    pub event: EventConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            headers: default_headers(),
            auth: Some(AuthConfig::default()),
            webhooks: Vec::new(),
            event: EventConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from an optional YAML file plus environment
    /// overrides, then validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be read or
    /// deserialized, or any validation error from [`GatewayConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %path.display(), "Loading gateway configuration from file");
        }

        let gateway_config: GatewayConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        gateway_config.validate()?;
        Ok(gateway_config)
    }

    /// Parse and validate configuration embedded as YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let gateway_config: GatewayConfig = serde_yaml::from_str(yaml)?;
        gateway_config.validate()?;
        Ok(gateway_config)
    }

    /// Check the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyCookieName`] when auth is enabled with an empty
    ///   token cookie name
    /// - webhook compilation errors (see [`WebhookMatcher::from_routes`])
    /// - [`ConfigError::InvalidEventMessage`] when the default event message
    ///   does not decode
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref auth) = self.auth {
            auth.validate()?;
        }

        WebhookMatcher::from_routes(&self.webhooks)?;
        decode_notation(&self.event.msg)?;

        Ok(())
    }
}

/// Auth cookie configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: TokenConfig,

    /// Cookie attributes, merged over [`CookieAttributes::auth_defaults`]
    #[serde(default = "CookieAttributes::auth_defaults", deserialize_with = "deserialize_cookie")]
    pub cookie: CookieAttributes,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.name.is_empty() {
            return Err(ConfigError::EmptyCookieName);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig::default(),
            cookie: CookieAttributes::auth_defaults(),
        }
    }
}

/// Auth token cookie naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Cookie name
    pub name: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_COOKIE.to_string(),
        }
    }
}

/// A webhook route as configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookRouteConfig {
    /// Regular expression matched against the request path
    #[serde(alias = "re")]
    pub pattern: String,

    /// Field names bound to capture groups 1..N
    #[serde(default)]
    pub params: Vec<String>,

    /// Fields merged into the message after binding
    #[serde(default)]
    pub fixed: Map<String, Value>,
}

/// Event trigger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Compact-notation message used when an event carries none
    pub msg: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            msg: DEFAULT_EVENT_MESSAGE.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

fn default_headers() -> BTreeMap<String, String> {
    [
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Headers", "*"),
        ("Access-Control-Allow-Credentials", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn deserialize_headers<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut headers = default_headers();
    headers.extend(configured);
    Ok(headers)
}

fn deserialize_cookie<'de, D>(deserializer: D) -> Result<CookieAttributes, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = CookieAttributes::deserialize(deserializer)?;
    Ok(CookieAttributes::auth_defaults().merged_with(&configured))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
