use dioxus::prelude::*;

use crate::domain::{budget_breakdown, pie_segments, BudgetResult};
use crate::util::format::format_currency;

const RADIUS: f64 = 110.0;

#[component]
pub fn BudgetPieChart(result: BudgetResult) -> Element {
    let slices = budget_breakdown(&result);
    let segments = pie_segments(&slices, RADIUS);
    let size = RADIUS * 2.0;

    if segments.is_empty() {
        return rsx! {
            p { class: "muted", "Nothing to chart yet." }
        };
    }

    rsx! {
        div {
            class: "chart",
            svg {
                width: "{size}",
                height: "{size}",
                view_box: "0 0 {size} {size}",
                for segment in segments {
                    path {
                        key: "{segment.label}",
                        d: "{segment.path}",
                        fill: segment.fill,
                        stroke: segment.stroke,
                        stroke_width: "1",
                    }
                }
            }
            ul {
                class: "legend",
                for slice in slices {
                    li {
                        key: "{slice.label}",
                        span { class: "swatch", style: "background: {slice.fill}; border: 1px solid {slice.stroke};" }
                        span { "{slice.label}: {format_currency(slice.value)}" }
                    }
                }
            }
        }
    }
}
