use serde::Serialize;

/// Monthly spending split across the five need levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ExpenseCategories {
    pub physiological: f64,
    pub safety: f64,
    pub social: f64,
    pub esteem: f64,
    pub self_actualization: f64,
}

impl ExpenseCategories {
    /// Sum of all categories, computed on every call.
    pub fn total(&self) -> f64 {
        self.physiological + self.safety + self.social + self.esteem + self.self_actualization
    }
}

/// Snapshot of the form sent to the budgeting service.
///
/// Built once per submit and never mutated afterwards; the serialized shape
/// is the wire body of the budget endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetRequest {
    pub email: String,
    pub income: f64,
    pub expenses: f64,
    pub savings_goal: f64,
    pub location: String,
    pub expense_categories: ExpenseCategories,
}

/// Savings plan returned by the service. Forwarded to the UI as-is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BudgetResult {
    pub savings: f64,
    pub adjusted_savings: f64,
    pub recommended_savings: f64,
    pub inflation: f64,
    pub cost_of_living_index: f64,
    pub message: String,
    pub recommendations: Vec<String>,
    pub expense_categories: ExpenseCategories,
}

/// One previously submitted budget, as stored by the service.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub recommended_savings: f64,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct City {
    pub name: String,
    pub state: String,
}

impl City {
    /// Location key submitted with a budget; the service matches on the
    /// lower-cased city name.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_key_is_lowercased_name() {
        let city = City {
            name: "New Delhi".to_string(),
            state: "Delhi".to_string(),
        };
        assert_eq!(city.key(), "new delhi");
        assert_eq!(city.label(), "New Delhi (Delhi)");
    }

    #[test]
    fn request_serializes_to_wire_shape() {
        let request = BudgetRequest {
            email: "a@b.in".to_string(),
            income: 50000.0,
            expenses: 31000.0,
            savings_goal: 10000.0,
            location: "mumbai".to_string(),
            expense_categories: ExpenseCategories {
                physiological: 20000.0,
                safety: 5000.0,
                social: 3000.0,
                esteem: 2000.0,
                self_actualization: 1000.0,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["email"], "a@b.in");
        assert_eq!(value["savings_goal"], 10000.0);
        assert_eq!(value["location"], "mumbai");
        assert_eq!(value["expense_categories"]["self_actualization"], 1000.0);
        assert_eq!(value["expenses"], 31000.0);
    }
}
