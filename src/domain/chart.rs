//! Pie-chart breakdown of a budget result.

use std::f64::consts::PI;

use super::entities::BudgetResult;

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSlice {
    pub label: &'static str,
    pub value: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
}

const PALETTE: [(&str, &str); 7] = [
    ("rgba(255, 99, 132, 0.6)", "rgba(255, 99, 132, 1)"),
    ("rgba(54, 162, 235, 0.6)", "rgba(54, 162, 235, 1)"),
    ("rgba(255, 206, 86, 0.6)", "rgba(255, 206, 86, 1)"),
    ("rgba(75, 192, 192, 0.6)", "rgba(75, 192, 192, 1)"),
    ("rgba(153, 102, 255, 0.6)", "rgba(153, 102, 255, 1)"),
    ("rgba(255, 159, 64, 0.6)", "rgba(255, 159, 64, 1)"),
    ("rgba(199, 199, 199, 0.6)", "rgba(199, 199, 199, 1)"),
];

/// Seven slices in display order: the five expense categories, then actual
/// and recommended savings.
pub fn budget_breakdown(result: &BudgetResult) -> Vec<ChartSlice> {
    let categories = &result.expense_categories;
    let values = [
        ("Physiological", categories.physiological),
        ("Safety", categories.safety),
        ("Social", categories.social),
        ("Esteem", categories.esteem),
        ("Self-Actualization", categories.self_actualization),
        ("Savings", result.savings),
        ("Recommended Savings", result.recommended_savings),
    ];

    values
        .into_iter()
        .zip(PALETTE)
        .map(|((label, value), (fill, stroke))| ChartSlice {
            label,
            value,
            fill,
            stroke,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct PieSegment {
    pub label: &'static str,
    /// SVG path data in a `2r x 2r` view box centred on `(r, r)`.
    pub path: String,
    pub fill: &'static str,
    pub stroke: &'static str,
    /// Fraction of the whole, 0..=1.
    pub share: f64,
}

/// Lays slices out clockwise from twelve o'clock. Non-positive values take
/// no space; if nothing is positive there is nothing to draw.
pub fn pie_segments(slices: &[ChartSlice], radius: f64) -> Vec<PieSegment> {
    let total: f64 = slices.iter().map(|slice| slice.value.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let (cx, cy) = (radius, radius);
    let mut angle = -PI / 2.0;
    let mut segments = Vec::new();

    for slice in slices {
        let value = slice.value.max(0.0);
        if value == 0.0 {
            continue;
        }
        let share = value / total;
        let sweep = share * 2.0 * PI;
        let path = if share >= 0.999_999 {
            // A single arc cannot close on itself; draw two halves.
            format!(
                "M {:.3} {:.3} A {r:.3} {r:.3} 0 1 1 {:.3} {:.3} A {r:.3} {r:.3} 0 1 1 {:.3} {:.3} Z",
                cx,
                cy - radius,
                cx,
                cy + radius,
                cx,
                cy - radius,
                r = radius
            )
        } else {
            let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };
            format!(
                "M {cx:.3} {cy:.3} L {x1:.3} {y1:.3} A {r:.3} {r:.3} 0 {large_arc} 1 {x2:.3} {y2:.3} Z",
                r = radius
            )
        };
        angle += sweep;
        segments.push(PieSegment {
            label: slice.label,
            path,
            fill: slice.fill,
            stroke: slice.stroke,
            share,
        });
    }

    segments
}
