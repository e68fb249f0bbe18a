use dioxus::prelude::*;

use crate::{app::use_controller, domain::SessionDisplayState};

/// Blocking dialog for the oldest queued notice. Further notices wait
/// behind it.
#[component]
pub fn NoticeOverlay() -> Element {
    let display = use_context::<Signal<SessionDisplayState>>();
    let controller = use_controller();
    let notices = display.with(|st| st.notices().to_vec());

    let Some(current) = notices.first().cloned() else {
        return rsx! { Fragment {} };
    };
    let waiting = notices.len() - 1;

    rsx! {
        div {
            class: "notice-backdrop",
            div {
                class: "notice-card",
                role: "alertdialog",
                p { "{current.text}" }
                if waiting > 0 {
                    p { class: "notice-more", "{waiting} more message(s) waiting" }
                }
                button {
                    class: "btn-primary",
                    onclick: move |_| {
                        if let Some(controller) = controller.as_ref() {
                            controller.dismiss_notice(&current.id);
                        }
                    },
                    "OK"
                }
            }
        }
    }
}
