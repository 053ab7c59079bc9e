//! Banner Components
//!
//! Error banner and the discard-draft confirmation strip.

use leptos::prelude::*;

use crate::context::use_controller;

/// Most recent failure, until the next operation clears it
#[component]
pub fn ErrorBanner() -> impl IntoView {
    let state = use_controller().state();

    move || {
        state.with(|s| s.error.clone()).map(|message| {
            view! { <div class="error-banner" role="alert">"Error: " {message}</div> }
        })
    }
}

/// Asks before an edit overwrites unsaved draft changes
#[component]
pub fn DiscardDraftPrompt() -> impl IntoView {
    let controller = use_controller();
    let state = controller.state();

    move || {
        let name = state.with(|s| s.pending_edit.as_ref().map(|item| item.name.clone()))?;
        let confirm = controller.clone();
        let dismiss = controller.clone();
        Some(view! {
            <div class="discard-prompt">
                <span>"Discard unsaved changes and edit " {name} "?"</span>
                <button type="button" class="confirm-btn" on:click=move |_| confirm.confirm_pending_edit()>
                    "Discard"
                </button>
                <button type="button" class="cancel-btn" on:click=move |_| dismiss.dismiss_pending_edit()>
                    "Keep editing"
                </button>
            </div>
        })
    }
}
