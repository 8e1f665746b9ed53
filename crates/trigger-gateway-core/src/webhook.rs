//! # Webhook Route Matching
//!
//! Recognizes classes of inbound paths by regular expression and annotates
//! the outgoing message so that distinct webhook payload shapes can be routed
//! to distinct handlers without the handler parsing the path itself.
//!
//! A route is configured as a pattern, an ordered list of param names, and a
//! set of fixed fields:
//!
//! ```rust
//! use trigger_gateway_core::{CanonicalMessage, WebhookMatcher, WebhookRouteConfig};
//! use serde_json::json;
//!
//! let route = WebhookRouteConfig {
//!     pattern: r"api/public/hook/([^/]+)/([^/?]+)".to_string(),
//!     params: vec!["name".to_string(), "code".to_string()],
//!     fixed: serde_json::from_value(json!({"handle": "hook"})).unwrap(),
//! };
//! let matcher = WebhookMatcher::from_routes(&[route]).unwrap();
//!
//! let mut message = CanonicalMessage::new();
//! let matched = matcher.apply("/api/public/hook/foo/bar", &mut message, &json!({"x": 2}));
//!
//! assert_eq!(matched, Some(0));
//! assert_eq!(message.get("name"), Some(&json!("foo")));
//! assert_eq!(message.get("handle"), Some(&json!("hook")));
//! assert_eq!(message.get("body"), Some(&json!({"x": 2})));
//! ```

use crate::{config::WebhookRouteConfig, error::ConfigError, message::CanonicalMessage};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// A compiled webhook route.
///
/// Immutable once compiled. Param names bind, in order, to capture groups
/// 1..N of the pattern; compilation rejects more names than groups.
#[derive(Debug, Clone)]
pub struct WebhookSpec {
    pattern: Regex,
    param_names: Vec<String>,
    fixed_fields: Map<String, Value>,
}

impl WebhookSpec {
    /// Compile a configured route.
    ///
    /// `index` is the route's position in the configured list and is only
    /// used to identify the route in errors.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPattern`] when the pattern is not a valid regex
    /// - [`ConfigError::TooManyParams`] when there are more param names than
    ///   capture groups
    /// - [`ConfigError::EmptyParamName`] when a param name is empty
    pub fn compile(index: usize, route: &WebhookRouteConfig) -> Result<Self, ConfigError> {
        let pattern = Regex::new(&route.pattern).map_err(|source| ConfigError::InvalidPattern {
            index,
            pattern: route.pattern.clone(),
            source,
        })?;

        let groups = pattern.captures_len() - 1;
        if route.params.len() > groups {
            return Err(ConfigError::TooManyParams {
                index,
                params: route.params.len(),
                groups,
            });
        }

        if route.params.iter().any(|name| name.is_empty()) {
            return Err(ConfigError::EmptyParamName { index });
        }

        Ok(Self {
            pattern,
            param_names: route.params.clone(),
            fixed_fields: route.fixed.clone(),
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn fixed_fields(&self) -> &Map<String, Value> {
        &self.fixed_fields
    }

    /// Bind this route's captures for `path` onto `message`.
    ///
    /// Returns `false`, leaving the message untouched, when the pattern does
    /// not match.
    fn bind(&self, path: &str, message: &mut CanonicalMessage) -> bool {
        let Some(captures) = self.pattern.captures(path) else {
            return false;
        };

        for (i, name) in self.param_names.iter().enumerate() {
            match captures.get(i + 1) {
                Some(group) => {
                    message.insert(name.clone(), Value::String(group.as_str().to_string()));
                }
                // Optional group that did not participate: the field is unset.
                None => {
                    message.remove(name);
                }
            }
        }

        message.extend(&self.fixed_fields);
        true
    }
}

/// Ordered list of webhook routes; the first matching route wins.
#[derive(Debug, Clone, Default)]
pub struct WebhookMatcher {
    specs: Vec<WebhookSpec>,
}

impl WebhookMatcher {
    pub fn new(specs: Vec<WebhookSpec>) -> Self {
        Self { specs }
    }

    /// Compile every configured route, failing on the first invalid one.
    pub fn from_routes(routes: &[WebhookRouteConfig]) -> Result<Self, ConfigError> {
        let specs = routes
            .iter()
            .enumerate()
            .map(|(index, route)| WebhookSpec::compile(index, route))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(specs))
    }

    pub fn specs(&self) -> &[WebhookSpec] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Match `path` against the routes in configured order.
    ///
    /// On the first match, capture groups are bound to the route's param
    /// names, the fixed fields are merged over them, and `body` is stored at
    /// `message.body`. Later routes are not tried.
    ///
    /// Returns the index of the matching route, or `None` when nothing
    /// matched (the message is then left unmodified).
    #[instrument(skip(self, message, body), fields(routes = self.specs.len()))]
    pub fn apply(&self, path: &str, message: &mut CanonicalMessage, body: &Value) -> Option<usize> {
        for (index, spec) in self.specs.iter().enumerate() {
            if spec.bind(path, message) {
                message.insert("body".to_string(), body.clone());
                debug!(webhook_index = index, "Webhook route matched");
                return Some(index);
            }
        }

        debug!("No webhook route matched");
        None
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
