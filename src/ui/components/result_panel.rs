use dioxus::prelude::*;

use crate::domain::BudgetResult;
use crate::ui::components::{kpi_card::KpiCard, pie_chart::BudgetPieChart};
use crate::util::format::format_currency;

#[component]
pub fn ResultPanel(result: BudgetResult) -> Element {
    let recommendations = result.recommendations.clone();

    rsx! {
        section {
            class: "panel",
            h2 { "Your Savings Plan" }
            div {
                class: "kpi-grid",
                KpiCard { title: "Your Savings".to_string(), value: format_currency(result.savings) }
                KpiCard {
                    title: "Adjusted Savings".to_string(),
                    value: format_currency(result.adjusted_savings),
                    description: Some("After cost of living".to_string()),
                }
                KpiCard { title: "Recommended Savings".to_string(), value: format_currency(result.recommended_savings) }
                KpiCard {
                    title: "Inflation Rate in Your Area".to_string(),
                    value: format!("{:.2}%", result.inflation),
                    description: Some("Annual inflation for your location, affecting your savings goal.".to_string()),
                }
                KpiCard {
                    title: "Cost of Living Index".to_string(),
                    value: format!("{:.1}", result.cost_of_living_index),
                    description: Some("A higher index means a more expensive location (baseline = 50).".to_string()),
                }
            }
            if !result.message.is_empty() {
                p { "{result.message}" }
            }
            if !recommendations.is_empty() {
                h3 { "Personalized Tips" }
                ul {
                    class: "tips",
                    for (idx, tip) in recommendations.into_iter().enumerate() {
                        li { key: "{idx}", "{tip}" }
                    }
                }
            }
            h3 { "Budget Breakdown" }
            BudgetPieChart { result: result.clone() }
        }
    }
}
