#![deny(rust_2018_idioms)]

pub mod model;
pub use model::{ClientRecord, ClientStatus, Field, SaleRecord, SalesSummary};

pub mod config;
pub use config::Config;

pub mod sales;
pub use sales::function::read_sales;

pub mod clients;
pub use clients::function::read_clients;

pub mod index;
pub use index::IdentityIndex;

pub mod aggregate;
pub use aggregate::{group_sales, SalesGroup};

pub mod matcher;
pub use matcher::{Capability, Matcher};

pub mod merge;
pub use merge::function::merge;

/// The text the ledger export puts into empty amount cells.
pub const BLANK_MARKER: &str = "(em branco)";

static INPUT_DATE: &[time::format_description::FormatItem<'static>] =
    time::macros::format_description!("[day padding:none]/[month padding:none]/[year]");
static OUTPUT_DATE: &[time::format_description::FormatItem<'static>] =
    time::macros::format_description!("[day]/[month]/[year]");

/// Parse a ledger amount like `1.127,50` into `1127.5`, using `.` for thousands and `,` for decimals.
///
/// See [`parse_amount_with()`] for details.
pub fn parse_amount(raw: &str) -> f64 {
    parse_amount_with(raw, '.', ',')
}

/// Parse a locale-formatted amount, dropping quotes and `thousands_separator` and reading
/// `decimal_separator` as decimal point.
///
/// Blank input, [`BLANK_MARKER`] and anything that doesn't end up as a finite, non-negative
/// number yield `0.0`.
pub fn parse_amount_with(raw: &str, thousands_separator: char, decimal_separator: char) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() || raw == BLANK_MARKER {
        return 0.0;
    }
    let number: String = raw
        .chars()
        .filter(|c| *c != '"' && *c != thousands_separator)
        .map(|c| if c == decimal_separator { '.' } else { c })
        .collect();
    number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .unwrap_or(0.0)
}

/// Parse a `day/month/year` date, returning `None` if `raw` is empty or malformed.
pub fn parse_date(raw: &str) -> Option<time::Date> {
    time::Date::parse(raw.trim(), INPUT_DATE).ok()
}

/// Format `date` as `DD/MM/YYYY`, the way dates are written to the output document.
pub fn format_date(date: time::Date) -> String {
    date.format(OUTPUT_DATE)
        .expect("a calendar date always has day, month and year")
}

/// The key under which names are compared: trimmed and uppercased.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_uppercase()
}
