pub mod budget_api;
pub mod retry;
