//! Entry Submission App
//!
//! Root component: builds the controller, runs the page-load handoff and
//! switches between the login prompt and the item manager.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpItemsApi;
use crate::auth::{NoPersistence, TokenStore};
use crate::browser::{self, BrowserAddressBar, BrowserTokenStore};
use crate::components::{DiscardDraftPrompt, ErrorBanner, ItemForm, ItemList, LoginPrompt};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::controller::Controller;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let tokens: Arc<dyn TokenStore> = if config.persist_session {
        Arc::new(BrowserTokenStore::new(&config.client_id))
    } else {
        Arc::new(NoPersistence)
    };
    let controller = Controller::new(HttpItemsApi::new(&config), config, tokens, browser::now_secs);
    AppContext::provide(controller.clone());
    let state = controller.state();

    // Adopt the login redirect and load items once on mount
    Effect::new(move |_| {
        let controller = controller.clone();
        spawn_local(async move {
            controller.initialize(&BrowserAddressBar).await;
        });
    });

    view! {
        <Show
            when=move || !state.with(|s| s.shows_login_prompt())
            fallback=|| view! { <LoginPrompt /> }
        >
            <main class="app">
                <h1>"Form Submissions"</h1>
                <ErrorBanner />
                <DiscardDraftPrompt />
                <ItemForm />
                <h2>"Items"</h2>
                <ItemList />
            </main>
        </Show>
    }
}

/// Shown instead of the app when the injected configuration is unusable
#[component]
pub fn ConfigErrorView(message: String) -> impl IntoView {
    view! {
        <div class="config-error" role="alert">
            <h1>"Configuration error"</h1>
            <p>{message}</p>
        </div>
    }
}
