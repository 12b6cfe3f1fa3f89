//! Text formatting used by the render sinks.
//!
//! Locale handling is deliberately shallow: locales only pick an absolute date layout.

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

/// Formats `value` with two decimals followed by the currency code.
pub fn format_amount(value: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", value.round_dp(2))
}

/// Formats `date` relative to `now`.
///
/// Buckets: `today` (0 days), `yesterday` (1 day), `{n} days ago` (2 to 7 days), otherwise an
/// absolute date laid out for `locale`. Day counts are absolute and rounded to the nearest day.
pub fn format_relative_date(date: DateTime<Utc>, now: DateTime<Utc>, locale: &str) -> String {
    match days_between(date, now) {
        0 => "today".to_owned(),
        1 => "yesterday".to_owned(),
        days @ 2..=7 => format!("{days} days ago"),
        _ => format_absolute_date(date, locale),
    }
}

pub fn format_absolute_date(date: DateTime<Utc>, locale: &str) -> String {
    let layout = match locale {
        "en-US" => "%-m/%-d/%Y",
        "pl-PL" | "de-DE" => "%d.%m.%Y",
        "en-GB" | "pt-PT" | "fr-FR" => "%d/%m/%Y",
        _ => "%Y-%m-%d",
    };
    date.format(layout).to_string()
}

/// Formats a countdown as `mm:ss`.
pub fn format_countdown(remaining_secs: u32) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
    let millis = (b - a).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY / 2) / MILLIS_PER_DAY
}
