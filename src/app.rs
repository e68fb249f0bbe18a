use dioxus::{prelude::*, signals::Signal};
use tracing::error;

use crate::{
    controller::SessionController,
    domain::{FormState, SessionDisplayState},
    infra::budget_api::BudgetServiceClient,
    ui::{components::notice::NoticeOverlay, pages::PlannerPage, shell::Shell},
    util::{assets, config::load_config},
};

pub type Controller = SessionController<BudgetServiceClient, Signal<SessionDisplayState>>;

#[component]
pub fn App() -> Element {
    let display = use_signal(SessionDisplayState::default);
    use_context_provider(|| display);

    let form = use_signal(FormState::default);
    use_context_provider(|| form);

    let controller = use_hook(move || build_controller(display));
    use_context_provider({
        let controller = controller.clone();
        move || controller
    });

    // City options are fetched once per session.
    let _cities = use_future({
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            async move {
                if let Some(controller) = controller {
                    controller.load_cities().await;
                }
            }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Shell {
            if controller.is_some() {
                PlannerPage {}
            } else {
                p { class: "init-error", "Failed to initialise the budget service client. Check the configured API URL." }
            }
        }
        NoticeOverlay {}
    }
}

fn build_controller(display: Signal<SessionDisplayState>) -> Option<Controller> {
    let config = load_config();
    match BudgetServiceClient::from_config(&config) {
        Ok(client) => Some(SessionController::new(client, display)),
        Err(err) => {
            error!(url = %config.api_base_url, error = %err, "Failed to initialise budget service client");
            None
        }
    }
}

/// The session controller, if the service client could be built.
pub fn use_controller() -> Option<Controller> {
    use_context::<Option<Controller>>()
}
