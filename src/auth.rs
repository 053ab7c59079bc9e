//! Authentication
//!
//! Session credential handling for the implicit-flow login: the identity
//! provider redirects back with `#id_token=...` in the location fragment.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use url::form_urlencoded;

/// Fragment parameter carrying the bearer credential
pub const TOKEN_PARAM: &str = "id_token";

/// Look up `name` in a URL-encoded fragment (`#a=1&b=2`, leading `#` optional)
pub fn fragment_param(fragment: &str, name: &str) -> Option<String> {
    let query = fragment.strip_prefix('#').unwrap_or(fragment);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Identity token from the fragment; empty values count as absent
pub fn token_from_fragment(fragment: &str) -> Option<String> {
    fragment_param(fragment, TOKEN_PARAM).filter(|token| !token.is_empty())
}

/// Bearer credential held for the lifetime of the page
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    expires_at: Option<i64>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let expires_at = jwt_expiry(&token);
        Self { token, expires_at }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// `exp` claim in seconds since the epoch, if the token is a readable JWT
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// True once `exp` has passed. Tokens without a readable `exp` never
    /// report expiry; the API remains the authority for those.
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_secs)
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying its signature
pub fn jwt_expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<Claims>(&bytes).ok()?.exp
}

/// Authentication axis of the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Storage for a credential that should outlive a page load
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Keeps nothing; sessions end with the page
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPersistence;

impl TokenStore for NoPersistence {
    fn load(&self) -> Option<String> {
        None
    }

    fn save(&self, _token: &str) {}

    fn clear(&self) {}
}

/// Restore a stored session if it is still within its `exp` claim.
/// Expired, unreadable or claim-less tokens are removed from the store.
pub fn restore_session(store: &dyn TokenStore, now_secs: i64) -> Option<Session> {
    let session = Session::new(store.load()?);
    if session.expires_at().is_none() || session.is_expired(now_secs) {
        log::info!("discarding stored session (expired or without exp claim)");
        store.clear();
        return None;
    }
    Some(session)
}

/// Save a session only when it carries an unexpired `exp` claim
pub fn persist_session(store: &dyn TokenStore, session: &Session, now_secs: i64) -> bool {
    match session.expires_at() {
        Some(_) if !session.is_expired(now_secs) => {
            store.save(session.token());
            true
        }
        _ => {
            store.clear();
            false
        }
    }
}
