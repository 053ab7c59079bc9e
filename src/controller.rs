//! Session & List Controller
//!
//! Runs the async operations behind the UI. State lives in a reactive
//! signal so components re-render as requests settle; every transition is
//! delegated to `SessionState`.

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::ItemsApi;
use crate::auth::{self, Session, TokenStore};
use crate::browser::AddressBar;
use crate::config::AppConfig;
use crate::models::Item;
use crate::session::{EditRequest, SessionState};

pub struct Controller<A> {
    api: Arc<A>,
    config: Arc<AppConfig>,
    tokens: Arc<dyn TokenStore>,
    clock: fn() -> i64,
    state: RwSignal<SessionState>,
}

impl<A> Clone for Controller<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            config: Arc::clone(&self.config),
            tokens: Arc::clone(&self.tokens),
            clock: self.clock,
            state: self.state,
        }
    }
}

impl<A: ItemsApi + 'static> Controller<A> {
    pub fn new(api: A, config: AppConfig, tokens: Arc<dyn TokenStore>, clock: fn() -> i64) -> Self {
        Self {
            api: Arc::new(api),
            config: Arc::new(config),
            tokens,
            clock,
            state: RwSignal::new(SessionState::new()),
        }
    }

    /// Reactive view of the state for components
    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Snapshot without subscribing
    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    fn session(&self) -> Option<Session> {
        self.state.with_untracked(|s| s.session().cloned())
    }

    /// Page-load entry point: adopt a returned token, then load the list
    pub async fn initialize(&self, address_bar: &dyn AddressBar) {
        let now = (self.clock)();
        if let Some(token) = auth::token_from_fragment(&address_bar.fragment()) {
            address_bar.strip_fragment();
            let session = Session::new(token);
            if self.config.persist_session && !auth::persist_session(self.tokens.as_ref(), &session, now) {
                log::info!("token has no usable exp claim; session will not persist");
            }
            log::info!("signed in from login redirect");
            self.state.update(|s| s.adopt_session(session));
        } else if self.config.persist_session {
            if let Some(session) = auth::restore_session(self.tokens.as_ref(), now) {
                log::info!("restored stored session");
                self.state.update(|s| s.adopt_session(session));
            }
        }

        if self.config.list_requires_auth && !self.state.with_untracked(|s| s.is_authenticated()) {
            log::debug!("not signed in; skipping list fetch");
            return;
        }
        self.refresh_list().await;
    }

    /// Re-read the collection; the list is replaced only on success
    pub async fn refresh_list(&self) {
        let Some(ticket) = self.state.try_update(|s| s.begin_refresh()) else { return };
        log::debug!("refreshing item list");

        let session = if self.config.list_requires_auth { self.session() } else { None };
        let result = self.api.list_items(session.as_ref()).await;
        if let Err(e) = &result {
            log::warn!("{}", e);
        }
        let applied = self.state.try_update(|s| s.finish_refresh(ticket, result)).unwrap_or(false);
        if !applied {
            log::debug!("discarded stale list response");
        }
    }

    /// Create or update from the draft; on success reset the form and reload
    pub async fn submit(&self) {
        let ticket = match self.state.try_update(|s| s.begin_submit()) {
            Some(Ok(ticket)) => ticket,
            Some(Err(e)) => {
                log::debug!("draft rejected: {}", e);
                return;
            }
            None => return,
        };
        log::debug!("submitting item (update: {})", ticket.payload.id.is_some());

        let session = self.session();
        let result = self.api.upsert_item(&ticket.payload, session.as_ref()).await;
        if let Err(e) = &result {
            log::warn!("{}", e);
        }
        let saved = self.state.try_update(|s| s.finish_submit(&ticket, result)).unwrap_or(false);
        if saved {
            log::info!("item saved");
            self.refresh_list().await;
        }
    }

    /// Load an item into the form unconditionally
    pub fn start_edit(&self, item: &Item) {
        self.state.update(|s| s.start_edit(item));
    }

    /// Load an item into the form, asking first if unsaved changes would be lost
    pub fn request_edit(&self, item: &Item) -> EditRequest {
        let confirm = self.config.confirm_draft_discard;
        self.state
            .try_update(|s| s.request_edit(item, confirm))
            .unwrap_or(EditRequest::Started)
    }

    pub fn confirm_pending_edit(&self) {
        self.state.update(|s| {
            s.confirm_pending_edit();
        });
    }

    pub fn dismiss_pending_edit(&self) {
        self.state.update(|s| s.dismiss_pending_edit());
    }

    pub fn cancel_edit(&self) {
        self.state.update(|s| s.cancel_edit());
    }

    pub fn set_draft_name(&self, name: String) {
        self.state.update(|s| s.set_draft_name(name));
    }

    pub fn set_draft_email(&self, email: String) {
        self.state.update(|s| s.set_draft_email(email));
    }

    /// Delete by id; on success reload the list
    pub async fn delete_item(&self, id: &str) {
        self.state.update(|s| s.begin_delete());
        log::debug!("deleting item {}", id);

        let session = self.session();
        let result = self.api.delete_item(id, session.as_ref()).await;
        if let Err(e) = &result {
            log::warn!("{}", e);
        }
        let deleted = self.state.try_update(|s| s.finish_delete(result)).unwrap_or(false);
        if deleted {
            log::info!("item {} deleted", id);
            self.refresh_list().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::executor::block_on;

    use crate::api::{self, ApiResult};
    use crate::auth::tests::{jwt_with_exp, MemoryStore};
    use crate::auth::NoPersistence;
    use crate::config::RawConfig;
    use crate::error::FetchError;
    use crate::models::ItemPayload;
    use crate::session::EditMode;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List { token: Option<String> },
        Upsert { payload: ItemPayload, token: Option<String> },
        Delete { id: String, token: Option<String> },
    }

    /// Scripted API: each call pops the next queued status (default 200)
    #[derive(Default)]
    struct MockApi {
        calls: Mutex<Vec<Call>>,
        statuses: Mutex<VecDeque<u16>>,
        items: Mutex<Vec<Item>>,
    }

    impl MockApi {
        fn with_statuses(statuses: &[u16]) -> Self {
            let api = Self::default();
            api.statuses.lock().unwrap().extend(statuses.iter().copied());
            api
        }

        fn serving(self, items: Vec<Item>) -> Self {
            *self.items.lock().unwrap() = items;
            self
        }

        fn next(&self, operation: String) -> ApiResult<()> {
            match self.statuses.lock().unwrap().pop_front().unwrap_or(200) {
                status if (200..300).contains(&status) => Ok(()),
                status => Err(FetchError::status(operation, status)),
            }
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    fn token_of(session: Option<&Session>) -> Option<String> {
        session.map(|s| s.token().to_string())
    }

    #[async_trait(?Send)]
    impl ItemsApi for MockApi {
        async fn list_items(&self, session: Option<&Session>) -> ApiResult<Vec<Item>> {
            self.record(Call::List { token: token_of(session) });
            self.next(api::list_operation())?;
            Ok(self.items.lock().unwrap().clone())
        }

        async fn upsert_item(&self, payload: &ItemPayload, session: Option<&Session>) -> ApiResult<()> {
            self.record(Call::Upsert { payload: payload.clone(), token: token_of(session) });
            self.next(api::upsert_operation())
        }

        async fn delete_item(&self, id: &str, session: Option<&Session>) -> ApiResult<()> {
            self.record(Call::Delete { id: id.to_string(), token: token_of(session) });
            self.next(api::delete_operation(id))
        }
    }

    struct FakeAddressBar {
        fragment: Mutex<String>,
        stripped: Cell<bool>,
    }

    impl FakeAddressBar {
        fn new(fragment: &str) -> Self {
            Self { fragment: Mutex::new(fragment.to_string()), stripped: Cell::new(false) }
        }
    }

    impl AddressBar for FakeAddressBar {
        fn fragment(&self) -> String {
            self.fragment.lock().unwrap().clone()
        }

        fn strip_fragment(&self) {
            self.fragment.lock().unwrap().clear();
            self.stripped.set(true);
        }
    }

    fn config() -> RawConfig {
        RawConfig {
            api_base: Some("https://api.example.test".to_string()),
            oauth_domain: Some("https://login.example.test".to_string()),
            client_id: Some("client-123".to_string()),
            redirect_uri: Some("http://localhost:3000".to_string()),
            ..RawConfig::default()
        }
    }

    fn fixed_clock() -> i64 {
        1_000
    }

    fn controller(api: MockApi) -> Controller<MockApi> {
        Controller::new(api, config().validate().unwrap(), Arc::new(NoPersistence), fixed_clock)
    }

    fn calls(c: &Controller<MockApi>) -> Vec<Call> {
        c.api.calls.lock().unwrap().clone()
    }

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: Some(id.to_string()),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_initialize_adopts_fragment_token() {
        let c = controller(MockApi::default().serving(vec![item("1", "Ada")]));
        let bar = FakeAddressBar::new("#id_token=abc123&other=x");

        block_on(c.initialize(&bar));

        let state = c.snapshot();
        assert_eq!(state.session().map(|s| s.token().to_string()), Some("abc123".to_string()));
        assert!(bar.stripped.get());
        assert_eq!(bar.fragment(), "");
        assert_eq!(calls(&c), vec![Call::List { token: None }]);
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_initialize_without_token_still_fetches() {
        let c = controller(MockApi::default());
        let bar = FakeAddressBar::new("");

        block_on(c.initialize(&bar));

        assert!(c.snapshot().shows_login_prompt());
        assert!(!bar.stripped.get());
        assert_eq!(calls(&c), vec![Call::List { token: None }]);
    }

    #[test]
    fn test_list_requiring_auth_is_skipped_when_signed_out() {
        let mut raw = config();
        raw.list_requires_auth = Some(true);
        let c = Controller::new(MockApi::default(), raw.validate().unwrap(), Arc::new(NoPersistence), fixed_clock);

        block_on(c.initialize(&FakeAddressBar::new("")));
        assert!(calls(&c).is_empty());

        block_on(c.initialize(&FakeAddressBar::new("#id_token=tok")));
        assert_eq!(calls(&c), vec![Call::List { token: Some("tok".to_string()) }]);
    }

    #[test]
    fn test_initialize_persists_and_restores_session() {
        let mut raw = config();
        raw.persist_session = Some(true);
        let store = Arc::new(MemoryStore::default());
        let token = jwt_with_exp(5_000);

        let first = Controller::new(MockApi::default(), raw.clone().validate().unwrap(), store.clone(), fixed_clock);
        block_on(first.initialize(&FakeAddressBar::new(&format!("#id_token={}", token))));
        assert_eq!(store.load(), Some(token.clone()));

        let reloaded = Controller::new(MockApi::default(), raw.validate().unwrap(), store.clone(), fixed_clock);
        block_on(reloaded.initialize(&FakeAddressBar::new("")));
        assert_eq!(reloaded.snapshot().session().map(|s| s.token().to_string()), Some(token));
    }

    #[test]
    fn test_refresh_500_keeps_prior_list() {
        let c = controller(MockApi::with_statuses(&[200, 500]).serving(vec![item("1", "Ada")]));
        block_on(c.refresh_list());
        block_on(c.refresh_list());

        let state = c.snapshot();
        assert_eq!(state.items, vec![item("1", "Ada")]);
        assert_eq!(state.error.as_deref(), Some("GET /items failed: 500"));
    }

    #[test]
    fn test_successful_refresh_clears_error() {
        let c = controller(MockApi::with_statuses(&[500, 200]));
        block_on(c.refresh_list());
        assert!(c.snapshot().error.is_some());
        block_on(c.refresh_list());
        assert_eq!(c.snapshot().error, None);
    }

    #[test]
    fn test_create_sends_no_id_and_bearer_header() {
        let c = controller(MockApi::default());
        block_on(c.initialize(&FakeAddressBar::new("#id_token=tok")));
        c.set_draft_name("Ada".to_string());
        c.set_draft_email("ada@example.com".to_string());

        block_on(c.submit());

        let calls = calls(&c);
        assert_eq!(
            calls[1],
            Call::Upsert {
                payload: ItemPayload { id: None, name: "Ada".to_string(), email: "ada@example.com".to_string() },
                token: Some("tok".to_string()),
            }
        );
        assert_eq!(calls[2], Call::List { token: None });
        assert_eq!(c.snapshot().edit_mode(), EditMode::Creating);
    }

    #[test]
    fn test_update_sends_target_id_and_resets() {
        let c = controller(MockApi::default());
        c.start_edit(&item("X", "Ada"));
        c.set_draft_email("ada@new.example.com".to_string());

        block_on(c.submit());

        match &calls(&c)[0] {
            Call::Upsert { payload, token } => {
                assert_eq!(payload.id.as_deref(), Some("X"));
                assert_eq!(payload.email, "ada@new.example.com");
                assert_eq!(token, &None);
            }
            other => panic!("unexpected call {:?}", other),
        }
        let state = c.snapshot();
        assert_eq!(state.edit_target, None);
        assert!(state.draft.is_empty());
    }

    #[test]
    fn test_failed_submit_keeps_draft_and_skips_refresh() {
        let c = controller(MockApi::with_statuses(&[400]));
        c.start_edit(&item("X", "Ada"));

        block_on(c.submit());

        let state = c.snapshot();
        assert_eq!(state.edit_target.as_deref(), Some("X"));
        assert_eq!(state.draft.name, "Ada");
        assert_eq!(state.error.as_deref(), Some("PUT /items failed: 400"));
        assert_eq!(calls(&c).len(), 1);
    }

    #[test]
    fn test_invalid_draft_issues_no_request() {
        let c = controller(MockApi::default());
        c.set_draft_name("Ada".to_string());
        block_on(c.submit());
        assert!(calls(&c).is_empty());
        assert!(c.snapshot().error.is_some());
    }

    #[test]
    fn test_start_then_cancel_makes_no_calls() {
        let c = controller(MockApi::default());
        c.start_edit(&item("9", "Ada"));
        c.cancel_edit();

        let state = c.snapshot();
        assert_eq!(state.edit_target, None);
        assert_eq!(state.draft.name, "");
        assert_eq!(state.draft.email, "");
        assert!(calls(&c).is_empty());
    }

    #[test]
    fn test_delete_204_triggers_refresh() {
        let c = controller(MockApi::with_statuses(&[200, 204]));
        block_on(c.initialize(&FakeAddressBar::new("#id_token=tok")));
        c.api.calls.lock().unwrap().clear();

        block_on(c.delete_item("42"));

        assert_eq!(
            calls(&c),
            vec![
                Call::Delete { id: "42".to_string(), token: Some("tok".to_string()) },
                Call::List { token: None },
            ]
        );
    }

    #[test]
    fn test_failed_delete_reports_status() {
        let c = controller(MockApi::with_statuses(&[200, 404]).serving(vec![item("42", "Ada")]));
        block_on(c.refresh_list());
        block_on(c.delete_item("42"));

        let state = c.snapshot();
        assert_eq!(state.error.as_deref(), Some("DELETE /items/42 failed: 404"));
        assert_eq!(state.items.len(), 1);
        assert_eq!(calls(&c).len(), 2);
    }

    #[test]
    fn test_signed_in_load_leaves_login_prompt() {
        let c = controller(MockApi::default());
        assert!(c.snapshot().shows_login_prompt());
        block_on(c.initialize(&FakeAddressBar::new("#id_token=tok")));
        assert!(!c.snapshot().shows_login_prompt());
    }

    #[test]
    fn test_failed_delete_after_overlapping_refresh_is_reported() {
        let c = controller(MockApi::default());
        c.state.update(|s| s.begin_delete());
        block_on(c.refresh_list());
        let reported = c.state.try_update(|s| s.finish_delete(Err(FetchError::status(api::delete_operation("7"), 500))));

        assert_eq!(reported, Some(false));
        assert_eq!(c.snapshot().error.as_deref(), Some("DELETE /items/7 failed: 500"));
    }

    #[test]
    fn test_request_edit_follows_config() {
        let c = controller(MockApi::default());
        c.set_draft_name("Unsaved".to_string());
        assert_eq!(c.request_edit(&item("1", "Ada")), EditRequest::NeedsConfirmation);
        c.confirm_pending_edit();
        assert_eq!(c.snapshot().edit_target.as_deref(), Some("1"));
    }
}
