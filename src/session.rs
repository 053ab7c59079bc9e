//! Session State
//!
//! Synchronous core of the controller: authentication, the item list, the
//! edit buffer and the error banner, plus the bookkeeping that keeps a late
//! list response from clobbering a newer one.
//!
//! Every async operation follows the same shape: `begin_*` clears the banner
//! and snapshots what the request needs, the request runs, `finish_*`
//! applies the result. List data and refresh errors are gated by the list
//! generation; a failed write is always reported.

use crate::auth::{AuthState, Session};
use crate::error::{DraftError, FetchError};
use crate::models::{Draft, Item, ItemPayload};

/// Edit-mode axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Creating,
    Editing(String),
}

/// Outcome of asking to edit an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRequest {
    Started,
    /// Unsaved draft changes would be lost; parked until confirmed
    NeedsConfirmation,
}

/// List generation taken by one refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Everything needed to send and later settle one submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub payload: ItemPayload,
    draft: Draft,
    edit_target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub auth: AuthState,
    pub items: Vec<Item>,
    pub draft: Draft,
    /// Id of the item loaded into the form
    pub edit_target: Option<String>,
    /// Values the draft started from (empty when creating)
    pub baseline: Draft,
    /// Item waiting for the user to confirm discarding the draft
    pub pending_edit: Option<Item>,
    pub error: Option<String>,
    /// Whether the list has been fetched successfully at least once
    pub loaded: bool,
    last_list: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Authentication
    // ========================

    /// Unauthenticated -> Authenticated; there is no way back
    pub fn adopt_session(&mut self, session: Session) {
        self.auth = AuthState::Authenticated(session);
    }

    pub fn session(&self) -> Option<&Session> {
        self.auth.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Signed out: the page offers nothing but the login link
    pub fn shows_login_prompt(&self) -> bool {
        !self.is_authenticated()
    }

    // ========================
    // Operations and error banner
    // ========================

    /// Start an operation attempt: the banner is cleared
    pub fn begin_operation(&mut self) {
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    // ========================
    // List
    // ========================

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.begin_operation();
        self.last_list += 1;
        RefreshTicket(self.last_list)
    }

    /// Apply a list response, data or error. Returns false when a newer
    /// refresh superseded it.
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, result: Result<Vec<Item>, FetchError>) -> bool {
        if ticket.0 != self.last_list {
            return false;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                true
            }
            Err(e) => {
                self.fail(e.to_string());
                true
            }
        }
    }

    // ========================
    // Edit buffer
    // ========================

    pub fn edit_mode(&self) -> EditMode {
        match &self.edit_target {
            Some(id) => EditMode::Editing(id.clone()),
            None => EditMode::Creating,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    /// Draft holds changes not yet submitted
    pub fn is_draft_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn set_draft_name(&mut self, name: String) {
        self.draft.name = name;
    }

    pub fn set_draft_email(&mut self, email: String) {
        self.draft.email = email;
    }

    /// Load `item` into the form, overwriting whatever the draft held
    pub fn start_edit(&mut self, item: &Item) {
        self.draft = Draft::from_item(item);
        self.baseline = self.draft.clone();
        self.edit_target = item.id.clone();
        self.pending_edit = None;
    }

    /// Like `start_edit`, but parks the item when it would discard changes
    pub fn request_edit(&mut self, item: &Item, confirm_discard: bool) -> EditRequest {
        let would_lose_changes = self.is_draft_dirty()
            && !self.draft.is_empty()
            && self.draft != Draft::from_item(item);
        if confirm_discard && would_lose_changes {
            self.pending_edit = Some(item.clone());
            return EditRequest::NeedsConfirmation;
        }
        self.start_edit(item);
        EditRequest::Started
    }

    pub fn confirm_pending_edit(&mut self) -> bool {
        match self.pending_edit.take() {
            Some(item) => {
                self.start_edit(&item);
                true
            }
            None => false,
        }
    }

    pub fn dismiss_pending_edit(&mut self) {
        self.pending_edit = None;
    }

    /// Editing/Creating -> Creating with an empty form
    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.draft = Draft::default();
        self.baseline = Draft::default();
        self.pending_edit = None;
    }

    // ========================
    // Submit
    // ========================

    /// Validate the draft and snapshot the request to send
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, DraftError> {
        self.begin_operation();
        if let Err(e) = self.draft.validate() {
            self.fail(e.to_string());
            return Err(e);
        }
        Ok(SubmitTicket {
            payload: ItemPayload::new(&self.draft, self.edit_target.as_deref()),
            draft: self.draft.clone(),
            edit_target: self.edit_target.clone(),
        })
    }

    /// Settle a submit. On success the form resets, unless the user has
    /// changed the draft or target since it was sent. Returns true on success.
    pub fn finish_submit(&mut self, ticket: &SubmitTicket, result: Result<(), FetchError>) -> bool {
        match result {
            Ok(()) => {
                if self.draft == ticket.draft && self.edit_target == ticket.edit_target {
                    self.cancel_edit();
                }
                true
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    // ========================
    // Delete
    // ========================

    pub fn begin_delete(&mut self) {
        self.begin_operation();
    }

    pub fn finish_delete(&mut self, result: Result<(), FetchError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }
}
