//! Item Form Component
//!
//! Create form that doubles as the edit form while an item is targeted.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_controller;

#[component]
pub fn ItemForm() -> impl IntoView {
    let controller = use_controller();
    let state = controller.state();
    let is_editing = move || state.with(|s| s.is_editing());

    let on_submit = {
        let controller = controller.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let controller = controller.clone();
            spawn_local(async move {
                controller.submit().await;
            });
        }
    };

    let on_refresh = {
        let controller = controller.clone();
        move |_: leptos::ev::MouseEvent| {
            let controller = controller.clone();
            spawn_local(async move {
                controller.refresh_list().await;
            });
        }
    };

    let name_input = controller.clone();
    let email_input = controller.clone();

    let cancel_button = move || {
        is_editing().then(|| {
            let controller = controller.clone();
            view! {
                <button type="button" class="cancel-btn" on:click=move |_| controller.cancel_edit()>
                    "Cancel"
                </button>
            }
        })
    };

    view! {
        <form class="item-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Name"
                required=true
                prop:value=move || state.with(|s| s.draft.name.clone())
                on:input=move |ev| name_input.set_draft_name(event_target_value(&ev))
            />
            <input
                type="email"
                placeholder="Email"
                required=true
                prop:value=move || state.with(|s| s.draft.email.clone())
                on:input=move |ev| email_input.set_draft_email(event_target_value(&ev))
            />
            <div class="item-form-actions">
                <button type="submit">
                    {move || if is_editing() { "Update" } else { "Create" }}
                </button>
                {cancel_button}
                <button type="button" on:click=on_refresh>"Refresh"</button>
            </div>
        </form>
    }
}
