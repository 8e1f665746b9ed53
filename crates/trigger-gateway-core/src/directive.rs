//! # Response Directives
//!
//! A handler steers HTTP-specific behavior by returning a `gateway$`
//! directive alongside its result, without needing any HTTP knowledge of
//! its own.
//!
//! # Precedence
//!
//! Directives are applied to the response in this order:
//!
//! | Step | Directive          | Effect                                                   |
//! |------|--------------------|----------------------------------------------------------|
//! | 1    | `auth` *or* `redirect` | set/remove the auth cookie, or `302` + `location`   |
//! | 2    | `status` / error   | error: `status` or `500`; otherwise `status` when set    |
//! | 3    | `headers`          | merged over everything set so far                        |
//!
//! `auth` is only honored when auth is configured; when it is honored,
//! `redirect` is ignored even if the auth directive turns out to do nothing.
//! Because status resolution runs after step 1, a failed dispatch replaces
//! a redirect's `302`.

use crate::{
    config::AuthConfig,
    cookie::{expired_cookie, serialize_cookie, CookieAttributes},
    response::HttpResponse,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Header carrying the auth cookie
pub const SET_COOKIE_HEADER: &str = "set-cookie";

/// Header carrying the redirect target
pub const LOCATION_HEADER: &str = "location";

/// Status used for redirects
pub const REDIRECT_STATUS: u16 = 302;

/// Status used for failed dispatches without an explicit status
pub const ERROR_STATUS: u16 = 500;

/// Out-of-band instructions for shaping the HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthDirective>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectDirective>,

    /// HTTP status; `0` counts as unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Set or remove the auth token cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDirective {
    /// Cookie value to set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Attributes overriding the configured cookie defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<CookieAttributes>,

    /// Expire the auth cookie; ignored when `token` is set
    #[serde(default)]
    pub remove: bool,
}

/// Redirect the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// The single cookie-or-redirect action a directive resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveAction<'a> {
    SetAuthCookie {
        token: &'a str,
        cookie: Option<&'a CookieAttributes>,
    },
    RemoveAuthCookie,
    Redirect {
        location: &'a str,
    },
}

impl ResponseDirective {
    /// Resolve the `auth`/`redirect` branch.
    ///
    /// When `auth` is present and auth is configured, only the auth branch is
    /// considered: a token wins over `remove`, and neither yields `None`
    /// without falling through to `redirect`.
    pub fn action(&self, auth_configured: bool) -> Option<DirectiveAction<'_>> {
        match self.auth {
            Some(ref auth) if auth_configured => {
                match auth.token.as_deref().filter(|t| !t.is_empty()) {
                    Some(token) => Some(DirectiveAction::SetAuthCookie {
                        token,
                        cookie: auth.cookie.as_ref(),
                    }),
                    None if auth.remove => Some(DirectiveAction::RemoveAuthCookie),
                    None => None,
                }
            }
            _ => self
                .redirect
                .as_ref()
                .and_then(|r| r.location.as_deref())
                .filter(|location| !location.is_empty())
                .map(|location| DirectiveAction::Redirect { location }),
        }
    }

    /// The directive's status, treating `0` as unset
    pub fn explicit_status(&self) -> Option<u16> {
        self.status.filter(|s| *s != 0)
    }
}

/// Apply a response directive to the response being built.
///
/// `failed` reports whether the dispatch result signalled an error; status
/// resolution for failures happens even without a directive.
pub fn apply_directive(
    directive: Option<&ResponseDirective>,
    failed: bool,
    auth: Option<&AuthConfig>,
    response: &mut HttpResponse,
) {
    let explicit_status = directive.and_then(ResponseDirective::explicit_status);

    if let Some(directive) = directive {
        match directive.action(auth.is_some()) {
            Some(DirectiveAction::SetAuthCookie { token, cookie }) => {
                if let Some(auth) = auth {
                    let attributes = match cookie {
                        Some(overrides) => auth.cookie.merged_with(overrides),
                        None => auth.cookie.clone(),
                    };
                    response.set_header(
                        SET_COOKIE_HEADER,
                        serialize_cookie(&auth.token.name, token, &attributes),
                    );
                    debug!(cookie = %auth.token.name, "Auth cookie set");
                }
            }
            Some(DirectiveAction::RemoveAuthCookie) => {
                if let Some(auth) = auth {
                    response.set_header(SET_COOKIE_HEADER, expired_cookie(&auth.token.name));
                    debug!(cookie = %auth.token.name, "Auth cookie removed");
                }
            }
            Some(DirectiveAction::Redirect { location }) => {
                response.status_code = REDIRECT_STATUS;
                response.set_header(LOCATION_HEADER, location);
                debug!(location = %location, "Redirecting");
            }
            None => {}
        }
    }

    if failed {
        response.status_code = explicit_status.unwrap_or(ERROR_STATUS);
    } else if let Some(status) = explicit_status {
        response.status_code = status;
    }

    if let Some(headers) = directive.and_then(|d| d.headers.as_ref()) {
        for (name, value) in headers {
            response.set_header(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
#[path = "directive_tests.rs"]
mod tests;
