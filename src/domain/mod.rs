//! Budget planner domain: form input, service records and session state.

pub mod chart;
pub mod entities;
pub mod form_state;
pub mod session;

pub use chart::{budget_breakdown, pie_segments};
pub use entities::{BudgetRequest, BudgetResult, City, ExpenseCategories, HistoryEntry};
pub use form_state::{FormField, FormState};
pub use session::{CallTicket, PreconditionError, SessionCall, SessionDisplayState, SessionPhase};
