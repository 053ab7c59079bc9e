//! Login Prompt Component
//!
//! The only surface shown before a session exists.

use leptos::prelude::*;

use crate::context::use_controller;

#[component]
pub fn LoginPrompt() -> impl IntoView {
    let login_url = use_controller().config().login_url();

    view! {
        <div class="login-prompt">
            <h1>"Please log in"</h1>
            <a href=login_url>
                <button type="button">"Log in"</button>
            </a>
        </div>
    }
}
