//! Display formatting. Values are formatted only at render time; all
//! arithmetic happens on raw numbers.

use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime,
};

const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const NAIVE_FORMATS: [&[BorrowedFormatItem<'static>]; 2] = [
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
];

/// `₹` amount with thousands separators and two decimals.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}₹{grouped}.{cents}")
}

/// Renders a service timestamp as `YYYY-MM-DD HH:MM`. Accepts RFC 3339 and
/// offset-less ISO timestamps; anything else is returned untouched.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        if let Ok(text) = parsed.format(DISPLAY_FORMAT) {
            return text;
        }
    }

    for description in NAIVE_FORMATS {
        if let Ok(parsed) = PrimitiveDateTime::parse(raw, description) {
            if let Ok(text) = parsed.format(DISPLAY_FORMAT) {
                return text;
            }
        }
    }

    raw.to_string()
}
