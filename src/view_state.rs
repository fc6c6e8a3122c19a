//! The browsing page's state, kept entirely in the location's query string so
//! reloading, bookmarking and back/forward all land on the same view.

use crate::data::pagination::{PageRequest, parse_whole_number};
use std::collections::HashMap;

/// How a state change should be recorded in the browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// New history entry, revisitable with back/forward.
    Push,
    /// Overwrites the current entry.
    Replace,
}

impl Transition {
    /// Value for `hx-push-url`, present only for [`Transition::Push`].
    pub const fn push_url(self) -> Option<&'static str> {
        match self {
            Self::Push => Some("true"),
            Self::Replace => None,
        }
    }

    /// Value for `hx-replace-url`, present only for [`Transition::Replace`].
    pub const fn replace_url(self) -> Option<&'static str> {
        match self {
            Self::Push => None,
            Self::Replace => Some("true"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    search: String,
    page: Option<String>,
}

impl ViewState {
    pub fn from_location(params: &HashMap<String, String>) -> Self {
        Self {
            search: params.get("search").cloned().unwrap_or_default(),
            page: params.get("page").cloned(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// The stored page value, exactly as it appears in the location.
    pub fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// `1` without a stored page, otherwise the stored number unclamped, so `0`
    /// and negatives come back as-is. Garbage and an empty `page=` read as `1`,
    /// the page the service falls back to for them.
    pub fn current_page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(parse_whole_number)
            .unwrap_or(1)
    }

    /// Each keystroke overwrites the search; the page is left alone.
    pub fn set_search(&mut self, value: impl Into<String>) -> Transition {
        self.search = value.into();
        Transition::Replace
    }

    pub fn next_page(&mut self) -> Transition {
        self.page = Some(self.current_page().saturating_add(1).to_string());
        Transition::Push
    }

    pub fn previous_page(&mut self) -> Transition {
        self.page = Some(self.current_page().saturating_sub(1).to_string());
        Transition::Push
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page() != 1
    }

    /// What gets fetched for this state.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.raw_page(), Some(self.search()))
    }

    /// The query parameters describing this state, in location order.
    pub fn location(&self) -> Vec<(&'static str, String)> {
        let mut location = vec![("search", self.search.clone())];
        if let Some(page) = &self.page {
            location.push(("page", page.clone()));
        }
        location
    }
}
