//! Application Context
//!
//! Shared controller provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::HttpItemsApi;
use crate::controller::Controller;

/// Controller wired to the real items API
pub type AppController = Controller<HttpItemsApi>;

/// App-wide handles provided via context
#[derive(Clone)]
pub struct AppContext {
    pub controller: AppController,
}

impl AppContext {
    pub fn provide(controller: AppController) {
        provide_context(Self { controller });
    }
}

/// Controller from context; panics outside `<App/>`
pub fn use_controller() -> AppController {
    expect_context::<AppContext>().controller
}
