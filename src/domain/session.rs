//! Display state owned by the session controller.
//!
//! Every remote call is started with [`SessionDisplayState::begin`], which
//! hands out a [`CallTicket`]. Completions carry the ticket back; a ticket
//! that was cancelled or superseded no longer changes anything.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::entities::{BudgetResult, City, HistoryEntry};
use crate::util::generate_id;

const MAX_NOTICES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCall {
    LoadCities,
    SubmitBudget,
    /// History refresh chained after a successful submit.
    RefreshHistory,
    ViewHistory,
}

impl SessionCall {
    pub fn failure_notice(&self) -> &'static str {
        match self {
            SessionCall::LoadCities => {
                "Error fetching cities. Please try refreshing the page or check your internet connection."
            }
            SessionCall::SubmitBudget => {
                "Error calculating budget. The backend might be waking up, please try again in a few seconds."
            }
            SessionCall::RefreshHistory | SessionCall::ViewHistory => {
                "Error fetching budget history. The backend might be waking up, please try again in a few seconds."
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading(SessionCall),
    Displaying,
}

impl SessionPhase {
    /// The startup city fetch runs once and is not offered for cancelling.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, SessionPhase::Loading(call) if *call != SessionCall::LoadCities)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("an email address is required to look up budget history")]
    MissingEmail,
}

/// Blocking message shown until the user dismisses it.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: String,
    pub text: String,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_id("notice"),
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CallTicket {
    generation: u64,
    cancel: CancellationToken,
}

impl CallTicket {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionDisplayState {
    phase: SessionPhase,
    result: Option<BudgetResult>,
    history: Vec<HistoryEntry>,
    cities: Vec<City>,
    notices: Vec<Notice>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl SessionDisplayState {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The loading flag: true while any call is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Loading(_))
    }

    pub fn result(&self) -> Option<&BudgetResult> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Enters `Loading`, or returns `None` when a call is already running.
    pub fn begin(&mut self, call: SessionCall) -> Option<CallTicket> {
        if self.is_loading() {
            return None;
        }
        self.generation += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.phase = SessionPhase::Loading(call);
        Some(CallTicket {
            generation: self.generation,
            cancel,
        })
    }

    pub fn is_current(&self, ticket: &CallTicket) -> bool {
        self.generation == ticket.generation && self.is_loading()
    }

    pub fn complete_cities(&mut self, ticket: &CallTicket, cities: Vec<City>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.cities = cities;
        self.settle(SessionPhase::Idle);
        true
    }

    /// Stores the result and moves on to the chained history refresh.
    pub fn complete_submit(&mut self, ticket: &CallTicket, result: BudgetResult) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.result = Some(result);
        self.phase = SessionPhase::Loading(SessionCall::RefreshHistory);
        true
    }

    pub fn complete_history(&mut self, ticket: &CallTicket, entries: Vec<HistoryEntry>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.history = entries;
        self.settle(SessionPhase::Displaying);
        true
    }

    /// Ends a workflow that has nothing more to fetch.
    pub fn complete_without_history(&mut self, ticket: &CallTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.settle(SessionPhase::Displaying);
        true
    }

    /// Records a failed call. Result, history and cities are left as they were.
    pub fn fail(&mut self, ticket: &CallTicket, call: SessionCall) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.push_notice(call.failure_notice());
        self.settle(SessionPhase::Idle);
        true
    }

    /// Aborts the outstanding call, if any, and returns to `Idle`. The city
    /// fetch always runs to completion.
    pub fn cancel(&mut self) -> bool {
        if !self.phase.is_cancellable() {
            return false;
        }
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
        self.phase = SessionPhase::Idle;
        true
    }

    pub fn push_notice(&mut self, text: impl Into<String>) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(Notice::new(text));
    }

    pub fn dismiss_notice(&mut self, id: &str) {
        self.notices.retain(|notice| notice.id != id);
    }

    fn settle(&mut self, phase: SessionPhase) {
        self.in_flight = None;
        self.phase = phase;
    }
}
