//! UI state snapshot and reducer.
//!
//! All mutation goes through [`reduce`], so every transition (edit, submit,
//! completion, reset, view toggle) can be exercised without a terminal.

use crate::model::types::SearchResult;
use crate::render::ViewMode;
use crate::search::client::FAILURE_MESSAGE;
use crate::search::query::{Field, SearchCriteria};

/// Identifier handed out per submission. Only the latest one may settle state.
pub type RequestId = u64;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub criteria: SearchCriteria,
    pub result: Option<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
    pub view_mode: ViewMode,
    pub focus: Field,
    /// Id of the most recent submission; 0 before the first one.
    pub latest_request: RequestId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Edit(Field, String),
    FocusNext,
    FocusPrev,
    SubmitStarted { request_id: RequestId },
    SubmitSucceeded { request_id: RequestId, result: SearchResult },
    SubmitFailed { request_id: RequestId },
    Reset,
    SetView(ViewMode),
    ToggleView,
}

pub fn reduce(state: UiState, event: UiEvent) -> UiState {
    let mut next = state;
    match event {
        UiEvent::Edit(field, value) => next.criteria.set(field, value),
        UiEvent::FocusNext => next.focus = next.focus.next(),
        UiEvent::FocusPrev => next.focus = next.focus.prev(),
        UiEvent::SubmitStarted { request_id } => {
            next.loading = true;
            next.error = None;
            next.latest_request = request_id;
        }
        UiEvent::SubmitSucceeded { request_id, result } => {
            if request_id != next.latest_request {
                tracing::debug!(request_id, latest = next.latest_request, "stale_response_dropped");
                return next;
            }
            next.result = Some(result);
            next.error = None;
            next.loading = false;
        }
        UiEvent::SubmitFailed { request_id } => {
            if request_id != next.latest_request {
                tracing::debug!(request_id, latest = next.latest_request, "stale_failure_dropped");
                return next;
            }
            next.error = Some(FAILURE_MESSAGE.to_string());
            next.loading = false;
        }
        UiEvent::Reset => {
            if next.can_reset() {
                next.criteria.clear();
                next.result = None;
            }
        }
        UiEvent::SetView(mode) => next.view_mode = mode,
        UiEvent::ToggleView => next.view_mode = next.view_mode.toggle(),
    }
    next
}

impl UiState {
    /// Reset is offered only once a result exists.
    pub fn can_reset(&self) -> bool {
        self.result.is_some()
    }

    pub fn show_loading(&self) -> bool {
        self.loading
    }

    pub fn show_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn show_results(&self) -> bool {
        self.result.is_some() && !self.loading
    }

    /// Apply `event` in place.
    pub fn apply(&mut self, event: UiEvent) {
        *self = reduce(std::mem::take(self), event);
    }
}
