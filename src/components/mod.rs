//! UI Components
//!
//! Leptos components over the shared controller.

mod banners;
mod delete_item_button;
mod item_form;
mod item_list;
mod login_prompt;

pub use banners::{DiscardDraftPrompt, ErrorBanner};
pub use delete_item_button::DeleteItemButton;
pub use item_form::ItemForm;
pub use item_list::ItemList;
pub use login_prompt::LoginPrompt;
