//! Item List Component
//!
//! Renders the fetched items with their per-row actions.

use leptos::prelude::*;

use crate::components::DeleteItemButton;
use crate::context::use_controller;
use crate::models::{format_timestamp, Item, MISSING_VALUE};
use crate::session::EditRequest;

#[component]
pub fn ItemList() -> impl IntoView {
    let state = use_controller().state();

    view! {
        <Show when=move || state.with(|s| s.items.is_empty())>
            <div class="empty-list">"No items yet."</div>
        </Show>
        <ul class="item-list">
            <For
                each=move || state.with(|s| s.items.clone())
                key=|item| {
                    // Every displayed field, so an edited item re-renders
                    (
                        item.id.clone(),
                        item.name.clone(),
                        item.email.clone(),
                        item.created_at.clone(),
                        item.updated_at.clone(),
                    )
                }
                children=move |item| view! { <ItemRow item=item /> }
            />
        </ul>
    }
}

/// One item with Open / Edit / Delete controls
#[component]
pub fn ItemRow(item: Item) -> impl IntoView {
    let controller = use_controller();
    let created = format_timestamp(item.created_at.as_ref());
    let updated = format_timestamp(item.updated_at.as_ref());
    let id_label = item.id.clone().unwrap_or_else(|| MISSING_VALUE.to_string());

    // Items without an id cannot be addressed, so they get no controls
    let actions = item.id.clone().map(|id| {
        let open_url = controller.config().item_url(&id);

        let on_edit = {
            let controller = controller.clone();
            let item = item.clone();
            move |_: leptos::ev::MouseEvent| {
                if controller.request_edit(&item) == EditRequest::NeedsConfirmation {
                    log::debug!("edit of {} waiting for draft discard confirmation", id_of(&item));
                }
            }
        };

        view! {
            <div class="item-actions">
                <a href=open_url target="_blank" rel="noreferrer">"Open"</a>
                <button type="button" on:click=on_edit>"Edit"</button>
                <DeleteItemButton id=id name=item.name.clone() />
            </div>
        }
    });

    view! {
        <li class="item-row">
            <div class="item-main">
                <div class="item-title">
                    {item.name.clone()} " " <span class="item-email">"(" {item.email.clone()} ")"</span>
                </div>
                <div class="item-meta">
                    "id: " {id_label} " · created: " {created} " · updated: " {updated}
                </div>
            </div>
            {actions}
        </li>
    }
}

fn id_of(item: &Item) -> &str {
    item.id.as_deref().unwrap_or_default()
}
