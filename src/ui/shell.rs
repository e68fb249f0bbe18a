use dioxus::prelude::*;

use crate::domain::SessionDisplayState;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let display = use_context::<Signal<SessionDisplayState>>();
    let loading = display.with(|st| st.is_loading());

    rsx! {
        div {
            header {
                class: "shell-header",
                h1 { "{APP_NAME}" }
                if loading {
                    span { class: "muted", "Talking to the budgeting service..." }
                }
            }
            main { class: "shell-main", {children} }
            footer { class: "shell-footer", "{version_label()}" }
        }
    }
}
