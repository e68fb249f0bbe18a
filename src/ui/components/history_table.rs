use dioxus::prelude::*;

use crate::app::use_controller;
use crate::domain::{FormState, SessionDisplayState};
use crate::util::format::{format_currency, format_timestamp};

/// History trigger and table. The trigger is only offered once an email
/// has been entered.
#[component]
pub fn HistoryPanel() -> Element {
    let display = use_context::<Signal<SessionDisplayState>>();
    let form = use_context::<Signal<FormState>>();
    let controller = use_controller();

    let loading = display.with(|st| st.is_loading());
    let history = display.with(|st| st.history().to_vec());
    let has_email = form.with(|f| f.has_email());

    let on_view = move |_: MouseEvent| {
        let Some(controller) = controller.clone() else {
            return;
        };
        let email = form.with(|f| f.email.clone());
        spawn(async move {
            controller.view_history(&email).await;
        });
    };

    rsx! {
        section {
            class: "panel",
            h2 { "Your Budget History" }
            if has_email {
                button {
                    class: "btn-secondary",
                    disabled: loading,
                    onclick: on_view,
                    if loading { "Loading..." } else { "View Budget History" }
                }
            } else {
                p { class: "muted", "Please enter your email to view history." }
            }
            if !history.is_empty() {
                table {
                    class: "history",
                    thead {
                        tr {
                            th { "Date" }
                            th { "Income (₹)" }
                            th { "Expenses (₹)" }
                            th { "Savings (₹)" }
                            th { "Recommended Savings (₹)" }
                            th { "Message" }
                        }
                    }
                    tbody {
                        for (idx, entry) in history.into_iter().enumerate() {
                            tr {
                                key: "{idx}-{entry.id}",
                                td { "{format_timestamp(&entry.timestamp)}" }
                                td { "{format_currency(entry.income)}" }
                                td { "{format_currency(entry.expenses)}" }
                                td { "{format_currency(entry.savings)}" }
                                td { "{format_currency(entry.recommended_savings)}" }
                                td { "{entry.message}" }
                            }
                        }
                    }
                }
            } else if has_email {
                p { class: "muted", "No budget history found for this email." }
            }
        }
    }
}
