//! Budget form, savings plan and history on one page.

use dioxus::prelude::*;

use crate::app::use_controller;
use crate::domain::{FormField, FormState, SessionCall, SessionDisplayState, SessionPhase};
use crate::ui::components::{history_table::HistoryPanel, result_panel::ResultPanel};
use crate::util::format::format_currency;

#[component]
pub fn PlannerPage() -> Element {
    let display = use_context::<Signal<SessionDisplayState>>();
    let form = use_context::<Signal<FormState>>();
    let controller = use_controller();

    let phase = display.with(|st| st.phase());
    let loading = display.with(|st| st.is_loading());
    let cities = display.with(|st| st.cities().to_vec());
    let result = display.with(|st| st.result().cloned());
    let current = form();
    let total_display = format_currency(current.total_expenses());

    let on_submit = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            let Some(controller) = controller.clone() else {
                return;
            };
            let snapshot = form();
            spawn(async move {
                controller.submit(&snapshot).await;
            });
        }
    };

    let on_cancel = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            if let Some(controller) = controller.as_ref() {
                controller.cancel();
            }
        }
    };

    let submit_label = match phase {
        SessionPhase::Loading(SessionCall::LoadCities) => "Loading cities...",
        SessionPhase::Loading(_) => "Loading...",
        _ => "Plan My Budget",
    };

    rsx! {
        div {
            section {
                class: "panel",
                h2 { "Plan Your Budget" }
                div {
                    class: "form-grid",
                    TextField { field: FormField::Email, input_type: "email" }
                    select {
                        class: "field",
                        value: "{current.location}",
                        onchange: move |evt| set_field(form, FormField::Location, evt.value()),
                        option { value: "", "{FormField::Location.label()}" }
                        for city in cities {
                            option { key: "{city.key()}", value: "{city.key()}", "{city.label()}" }
                        }
                    }
                    TextField { field: FormField::Income, input_type: "number" }
                    h3 { "Break Down Your Expenses" }
                    for field in FormField::EXPENSES {
                        TextField { key: "{field.label()}", field, input_type: "number" }
                    }
                    p { class: "total", "Total Expenses: {total_display}" }
                    TextField { field: FormField::SavingsGoal, input_type: "number" }
                }
                div {
                    class: "actions",
                    button {
                        class: "btn-primary",
                        disabled: loading,
                        onclick: on_submit,
                        "{submit_label}"
                    }
                    if phase.is_cancellable() {
                        button {
                            class: "btn-secondary",
                            onclick: on_cancel,
                            "Cancel"
                        }
                    }
                }
            }
            if let Some(result) = result {
                ResultPanel { result }
            }
            HistoryPanel {}
        }
    }
}

#[component]
fn TextField(field: FormField, input_type: &'static str) -> Element {
    let form = use_context::<Signal<FormState>>();
    let value = form.with(|f| f.get(field).to_string());

    rsx! {
        div {
            class: "with-hint",
            input {
                class: "field",
                r#type: input_type,
                value: "{value}",
                placeholder: field.label(),
                oninput: move |evt| set_field(form, field, evt.value()),
            }
            if let Some(hint) = field.hint() {
                span { class: "hint", "{hint}" }
            }
        }
    }
}

fn set_field(mut form: Signal<FormState>, field: FormField, value: String) {
    form.with_mut(|f| f.set(field, value));
}
