//! Delete Item Button
//!
//! Two-step delete for one list row: arming names the item, confirming
//! sends the DELETE and the controller reloads the list.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_controller;

#[component]
pub fn DeleteItemButton(
    /// Id sent in `DELETE /items/{id}`
    id: String,
    /// Name shown in the confirmation prompt
    name: String,
) -> impl IntoView {
    let controller = use_controller();
    let armed = RwSignal::new(false);
    let prompt = if name.is_empty() { format!("Delete item {}?", id) } else { format!("Delete {}?", name) };
    let arm_label = prompt.trim_end_matches('?').to_string();

    let on_confirm = move |_: leptos::ev::MouseEvent| {
        armed.set(false);
        let controller = controller.clone();
        let id = id.clone();
        spawn_local(async move {
            controller.delete_item(&id).await;
        });
    };

    view! {
        <Show
            when=move || armed.get()
            fallback=move || {
                let arm_label = arm_label.clone();
                view! {
                    <button
                        type="button"
                        class="delete-btn"
                        aria-label=arm_label
                        on:click=move |_| armed.set(true)
                    >
                        "Delete"
                    </button>
                }
            }
        >
            <span class="delete-confirm" role="group" aria-label=prompt.clone()>
                <span class="delete-confirm-text">{prompt.clone()}</span>
                <button type="button" class="confirm-btn" on:click=on_confirm.clone()>
                    "Yes, delete"
                </button>
                <button type="button" class="cancel-btn" on:click=move |_| armed.set(false)>
                    "Keep"
                </button>
            </span>
        </Show>
    }
}
