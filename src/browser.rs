//! Browser Bindings
//!
//! Thin wrappers over `window.location`, `window.history` and
//! `window.localStorage`. Failures are logged, not raised.

use crate::auth::TokenStore;

/// The page address as far as the login handoff is concerned
pub trait AddressBar {
    /// Current fragment, including the leading `#` (empty when none)
    fn fragment(&self) -> String;

    /// Remove the fragment from the visible address without adding a
    /// history entry
    fn strip_fragment(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserAddressBar;

impl AddressBar for BrowserAddressBar {
    fn fragment(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().hash().ok())
            .unwrap_or_default()
    }

    fn strip_fragment(&self) {
        let Some(window) = web_sys::window() else { return };
        let location = window.location();
        let path = format!(
            "{}{}",
            location.pathname().unwrap_or_else(|_| "/".to_string()),
            location.search().unwrap_or_default()
        );
        let replaced = window
            .history()
            .and_then(|history| history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path)));
        if let Err(e) = replaced {
            log::warn!("replaceState failed ({:?}), clearing hash instead", e);
            location.set_hash("").ok();
        }
    }
}

/// Seconds since the epoch from the browser clock
pub fn now_secs() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

/// Session token in `localStorage` under a single scoped key
#[derive(Debug, Clone)]
pub struct BrowserTokenStore {
    key: String,
}

impl BrowserTokenStore {
    /// Scope the key by client id so two deployments on one origin don't
    /// share credentials
    pub fn new(client_id: &str) -> Self {
        Self { key: format!("entry-submission.session.{}", client_id) }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(&self.key).ok().flatten()
    }

    fn save(&self, token: &str) {
        match Self::storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(&self.key, token) {
                    log::warn!("could not persist session: {:?}", e);
                }
            }
            None => log::warn!("localStorage unavailable, session will not persist"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            storage.remove_item(&self.key).ok();
        }
    }
}
