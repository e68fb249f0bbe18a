//! In-progress user input for the planner form.
//!
//! Fields hold raw text exactly as typed; numbers are only parsed when read.

use super::entities::{BudgetRequest, ExpenseCategories};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Email,
    Income,
    Location,
    SavingsGoal,
    Physiological,
    Safety,
    Social,
    Esteem,
    SelfActualization,
}

impl FormField {
    pub const EXPENSES: [FormField; 5] = [
        FormField::Physiological,
        FormField::Safety,
        FormField::Social,
        FormField::Esteem,
        FormField::SelfActualization,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Email => "Your Email",
            FormField::Income => "Monthly Income (₹)",
            FormField::Location => "Select Your City",
            FormField::SavingsGoal => "Savings Goal (₹)",
            FormField::Physiological => "Physiological Expenses (₹)",
            FormField::Safety => "Safety Expenses (₹)",
            FormField::Social => "Social Expenses (₹)",
            FormField::Esteem => "Esteem Expenses (₹)",
            FormField::SelfActualization => "Self-Actualization Expenses (₹)",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FormField::Physiological => Some("e.g., food, rent, utilities"),
            FormField::Safety => Some("e.g., insurance, emergency savings"),
            FormField::Social => Some("e.g., outings, gifts"),
            FormField::Esteem => Some("e.g., education, personal achievements"),
            FormField::SelfActualization => Some("e.g., hobbies, personal growth"),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub email: String,
    pub income: String,
    pub location: String,
    pub savings_goal: String,
    pub physiological: String,
    pub safety: String,
    pub social: String,
    pub esteem: String,
    pub self_actualization: String,
}

impl FormState {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::Income => &self.income,
            FormField::Location => &self.location,
            FormField::SavingsGoal => &self.savings_goal,
            FormField::Physiological => &self.physiological,
            FormField::Safety => &self.safety,
            FormField::Social => &self.social,
            FormField::Esteem => &self.esteem,
            FormField::SelfActualization => &self.self_actualization,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Email => &mut self.email,
            FormField::Income => &mut self.income,
            FormField::Location => &mut self.location,
            FormField::SavingsGoal => &mut self.savings_goal,
            FormField::Physiological => &mut self.physiological,
            FormField::Safety => &mut self.safety,
            FormField::Social => &mut self.social,
            FormField::Esteem => &mut self.esteem,
            FormField::SelfActualization => &mut self.self_actualization,
        }
    }

    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }

    pub fn expense_categories(&self) -> ExpenseCategories {
        ExpenseCategories {
            physiological: parse_amount(&self.physiological),
            safety: parse_amount(&self.safety),
            social: parse_amount(&self.social),
            esteem: parse_amount(&self.esteem),
            self_actualization: parse_amount(&self.self_actualization),
        }
    }

    /// Sum of the five categories rounded to cents. Never cached.
    pub fn total_expenses(&self) -> f64 {
        round_cents(self.expense_categories().total())
    }

    pub fn build_request(&self) -> BudgetRequest {
        BudgetRequest {
            email: self.email.trim().to_string(),
            income: parse_amount(&self.income),
            expenses: self.total_expenses(),
            savings_goal: parse_amount(&self.savings_goal),
            location: self.location.clone(),
            expense_categories: self.expense_categories(),
        }
    }
}

/// Empty or non-numeric text reads as zero.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> FormState {
        let mut form = FormState::default();
        form.set(FormField::Email, "priya@example.in");
        form.set(FormField::Income, "50000");
        form.set(FormField::Location, "pune");
        form.set(FormField::SavingsGoal, "12000");
        form.set(FormField::Physiological, "20000");
        form.set(FormField::Safety, "5000");
        form.set(FormField::Social, "3000");
        form.set(FormField::Esteem, "2000");
        form.set(FormField::SelfActualization, "1000");
        form
    }

    #[test]
    fn total_expenses_sums_categories() {
        assert_eq!(sample_form().total_expenses(), 31000.00);
    }

    #[test]
    fn empty_and_garbage_fields_count_as_zero() {
        let mut form = FormState::default();
        assert_eq!(form.total_expenses(), 0.0);

        form.set(FormField::Safety, "abc");
        form.set(FormField::Social, "  ");
        form.set(FormField::Esteem, "250.5");
        assert_eq!(form.total_expenses(), 250.5);
    }

    #[test]
    fn total_is_rounded_to_cents() {
        let mut form = FormState::default();
        form.set(FormField::Physiological, "12.345");
        form.set(FormField::Safety, "0.001");
        assert_eq!(form.total_expenses(), 12.35);
    }

    #[test]
    fn total_tracks_every_edit() {
        let mut form = sample_form();
        form.set(FormField::Social, "");
        assert_eq!(form.total_expenses(), 28000.0);
        form.set(FormField::Social, "4500");
        assert_eq!(form.total_expenses(), 32500.0);
    }

    #[test]
    fn build_request_snapshots_current_values() {
        let mut form = sample_form();
        let request = form.build_request();
        form.set(FormField::Income, "1");

        assert_eq!(request.email, "priya@example.in");
        assert_eq!(request.income, 50000.0);
        assert_eq!(request.expenses, 31000.0);
        assert_eq!(request.savings_goal, 12000.0);
        assert_eq!(request.location, "pune");
        assert_eq!(request.expense_categories.physiological, 20000.0);
    }

    #[test]
    fn whitespace_email_is_not_an_email() {
        let mut form = FormState::default();
        form.set(FormField::Email, "   ");
        assert!(!form.has_email());
        form.set(FormField::Email, "x@y.z");
        assert!(form.has_email());
    }

    #[test]
    fn non_finite_amounts_read_as_zero() {
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount(" 42 "), 42.0);
    }
}
