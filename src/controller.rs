//! Orchestrates user actions against the budgeting service.
//!
//! The controller is the only writer of [`SessionDisplayState`]. Each
//! action claims the loading flag through a [`CallTicket`], runs its remote
//! calls and writes the outcome back only if the ticket is still current.

use std::sync::Arc;

use dioxus::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{
    CallTicket, FormState, PreconditionError, SessionCall, SessionDisplayState,
};
use crate::infra::budget_api::{BudgetService, RemoteCallError};

/// Access to the display state the controller writes into.
///
/// Reads and writes are short and never held across an await.
pub trait DisplayStore: Clone {
    fn view<R>(&self, f: impl FnOnce(&SessionDisplayState) -> R) -> R;
    fn update<R>(&self, f: impl FnOnce(&mut SessionDisplayState) -> R) -> R;
}

impl DisplayStore for Signal<SessionDisplayState> {
    fn view<R>(&self, f: impl FnOnce(&SessionDisplayState) -> R) -> R {
        self.with(f)
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionDisplayState) -> R) -> R {
        let mut signal = *self;
        signal.with_mut(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// Another call holds the loading flag; nothing was sent.
    Busy,
    Rejected(PreconditionError),
    Failed(SessionCall),
    Cancelled,
    /// The call finished after being cancelled or superseded and was dropped.
    Stale,
}

pub struct SessionController<S, D> {
    service: Arc<S>,
    display: D,
}

impl<S, D: Clone> Clone for SessionController<S, D> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            display: self.display.clone(),
        }
    }
}

impl<S, D> SessionController<S, D>
where
    S: BudgetService,
    D: DisplayStore,
{
    pub fn new(service: S, display: D) -> Self {
        Self {
            service: Arc::new(service),
            display,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.display.view(SessionDisplayState::is_loading)
    }

    /// Fetches the selectable cities. On failure the list stays as it was
    /// and the form remains usable.
    pub async fn load_cities(&self) -> ActionOutcome {
        let Some(ticket) = self.display.update(|st| st.begin(SessionCall::LoadCities)) else {
            return ActionOutcome::Busy;
        };

        match self.service.list_cities(ticket.cancel_token()).await {
            Ok(cities) => self.settle(self.display.update(|st| st.complete_cities(&ticket, cities))),
            Err(err) => self.fail(&ticket, SessionCall::LoadCities, err),
        }
    }

    /// Submits the current form, then refreshes history for the submitted
    /// email. A submit without an email skips the refresh.
    pub async fn submit(&self, form: &FormState) -> ActionOutcome {
        let Some(ticket) = self.display.update(|st| st.begin(SessionCall::SubmitBudget)) else {
            debug!("Submit ignored while another call is running");
            return ActionOutcome::Busy;
        };
        let request = form.build_request();
        info!(
            location = %request.location,
            expenses = request.expenses,
            "Submitting budget"
        );

        let result = match self.service.submit_budget(&request, ticket.cancel_token()).await {
            Ok(result) => result,
            Err(err) => return self.fail(&ticket, SessionCall::SubmitBudget, err),
        };
        if !self.display.update(|st| st.complete_submit(&ticket, result)) {
            return ActionOutcome::Stale;
        }

        if request.email.is_empty() {
            return self.settle(self.display.update(|st| st.complete_without_history(&ticket)));
        }

        match self
            .service
            .fetch_history(&request.email, ticket.cancel_token())
            .await
        {
            Ok(entries) => self.settle(self.display.update(|st| st.complete_history(&ticket, entries))),
            Err(err) => self.fail(&ticket, SessionCall::RefreshHistory, err),
        }
    }

    /// Replaces the history list for `email`. An empty email is rejected
    /// before any call is made.
    pub async fn view_history(&self, email: &str) -> ActionOutcome {
        let email = email.trim();
        if email.is_empty() {
            return ActionOutcome::Rejected(PreconditionError::MissingEmail);
        }
        let Some(ticket) = self.display.update(|st| st.begin(SessionCall::ViewHistory)) else {
            return ActionOutcome::Busy;
        };

        match self.service.fetch_history(email, ticket.cancel_token()).await {
            Ok(entries) => self.settle(self.display.update(|st| st.complete_history(&ticket, entries))),
            Err(err) => self.fail(&ticket, SessionCall::ViewHistory, err),
        }
    }

    /// Aborts whatever call is outstanding. Returns false when idle.
    pub fn cancel(&self) -> bool {
        let cancelled = self.display.update(SessionDisplayState::cancel);
        if cancelled {
            info!("Cancelled outstanding call");
        }
        cancelled
    }

    pub fn dismiss_notice(&self, id: &str) {
        self.display.update(|st| st.dismiss_notice(id));
    }

    fn settle(&self, applied: bool) -> ActionOutcome {
        if applied {
            ActionOutcome::Completed
        } else {
            ActionOutcome::Stale
        }
    }

    fn fail(&self, ticket: &CallTicket, call: SessionCall, err: RemoteCallError) -> ActionOutcome {
        if err.is_cancelled() {
            return ActionOutcome::Cancelled;
        }
        warn!(call = ?call, operation = err.operation(), error = %err, "Remote call failed");
        if self.display.update(|st| st.fail(ticket, call)) {
            ActionOutcome::Failed(call)
        } else {
            ActionOutcome::Stale
        }
    }
}
