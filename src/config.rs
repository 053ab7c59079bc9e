//! Application Configuration
//!
//! Environment settings injected at startup instead of compiled into the
//! controller. `index.html` may define `window.__APP_CONFIG__`; any key it
//! leaves out falls back to the build-time default.

use log::LevelFilter;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::ConfigError;

/// Name of the JS global holding the injected configuration
const CONFIG_GLOBAL: &str = "__APP_CONFIG__";

/// Scopes requested from the identity provider (already form-encoded)
const LOGIN_SCOPE: &str = "openid+email+profile";

/// Characters left intact by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Validated runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Origin of the items API, without trailing slash
    pub api_base: String,
    /// Hosted login domain of the identity provider, without trailing slash
    pub oauth_domain: String,
    pub client_id: String,
    /// Where the identity provider sends the browser back to
    pub redirect_uri: String,
    /// Keep the token in localStorage until its `exp` claim passes
    pub persist_session: bool,
    /// Attach the bearer token to the list request and skip it when logged out
    pub list_requires_auth: bool,
    /// Ask before an edit overwrites unsaved draft changes
    pub confirm_draft_discard: bool,
    pub log_level: LevelFilter,
}

/// Configuration as supplied by the page; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub api_base: Option<String>,
    pub oauth_domain: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub persist_session: Option<bool>,
    pub list_requires_auth: Option<bool>,
    pub confirm_draft_discard: Option<bool>,
    pub log_level: Option<String>,
}

impl RawConfig {
    /// Build-time defaults (`ITEMS_API_BASE`, `OAUTH_DOMAIN`, ...)
    pub fn compiled_defaults() -> Self {
        Self {
            api_base: Some(option_env!("ITEMS_API_BASE").unwrap_or("http://localhost:8080").to_string()),
            oauth_domain: Some(option_env!("OAUTH_DOMAIN").unwrap_or("http://localhost:9000").to_string()),
            client_id: option_env!("OAUTH_CLIENT_ID").map(str::to_string),
            redirect_uri: Some(option_env!("OAUTH_REDIRECT_URI").unwrap_or("http://localhost:3000").to_string()),
            persist_session: Some(false),
            list_requires_auth: Some(false),
            confirm_draft_discard: Some(true),
            log_level: Some("info".to_string()),
        }
    }

    /// Overlay `other` on top of `self`; keys set in `other` win
    pub fn merge(self, other: RawConfig) -> Self {
        Self {
            api_base: other.api_base.or(self.api_base),
            oauth_domain: other.oauth_domain.or(self.oauth_domain),
            client_id: other.client_id.or(self.client_id),
            redirect_uri: other.redirect_uri.or(self.redirect_uri),
            persist_session: other.persist_session.or(self.persist_session),
            list_requires_auth: other.list_requires_auth.or(self.list_requires_auth),
            confirm_draft_discard: other.confirm_draft_discard.or(self.confirm_draft_discard),
            log_level: other.log_level.or(self.log_level),
        }
    }

    pub fn validate(self) -> Result<AppConfig, ConfigError> {
        let api_base = required_url("apiBase", self.api_base)?;
        let oauth_domain = required_url("oauthDomain", self.oauth_domain)?;
        let redirect_uri = required_url("redirectUri", self.redirect_uri)?;
        let client_id = required("clientId", self.client_id)?;

        let log_level = match self.log_level {
            Some(level) => level
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?,
            None => LevelFilter::Info,
        };

        Ok(AppConfig {
            api_base: api_base.trim_end_matches('/').to_string(),
            oauth_domain: oauth_domain.trim_end_matches('/').to_string(),
            client_id,
            redirect_uri,
            persist_session: self.persist_session.unwrap_or(false),
            list_requires_auth: self.list_requires_auth.unwrap_or(false),
            confirm_draft_discard: self.confirm_draft_discard.unwrap_or(true),
            log_level,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(field)),
    }
}

fn required_url(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    let value = required(field, value)?;
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl { field, value })
    }
}

impl AppConfig {
    /// Load from `window.__APP_CONFIG__` layered over the compiled defaults
    pub fn load() -> Result<Self, ConfigError> {
        let injected = match web_sys::window() {
            Some(window) => {
                let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
                    .map_err(|e| ConfigError::Unreadable(format!("{:?}", e)))?;
                if value.is_undefined() || value.is_null() {
                    RawConfig::default()
                } else {
                    serde_wasm_bindgen::from_value(value)
                        .map_err(|e| ConfigError::Unreadable(e.to_string()))?
                }
            }
            None => RawConfig::default(),
        };
        RawConfig::compiled_defaults().merge(injected).validate()
    }

    /// Parse a JSON document layered over the compiled defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let injected: RawConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Unreadable(e.to_string()))?;
        RawConfig::compiled_defaults().merge(injected).validate()
    }

    /// Hosted login page of the identity provider (implicit flow)
    pub fn login_url(&self) -> String {
        format!(
            "{}/login?client_id={}&response_type=token&scope={}&redirect_uri={}",
            self.oauth_domain,
            utf8_percent_encode(&self.client_id, URI_COMPONENT),
            LOGIN_SCOPE,
            utf8_percent_encode(&self.redirect_uri, URI_COMPONENT),
        )
    }

    /// Collection endpoint
    pub fn items_url(&self) -> String {
        format!("{}/items", self.api_base)
    }

    /// Resource endpoint of one item
    pub fn item_url(&self, id: &str) -> String {
        format!("{}{}", self.api_base, item_path(id))
    }
}

/// `/items/{id}` with the id encoded as a single path segment
pub fn item_path(id: &str) -> String {
    format!("/items/{}", utf8_percent_encode(id, URI_COMPONENT))
}
