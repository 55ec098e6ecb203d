//! Field parsers: loosely-formatted listing text → typed numeric values.
//!
//! Each parser accepts exactly one grammar and fails with a
//! field-specific error otherwise. Failures here are always terminal
//! for the enclosing card.

use std::sync::LazyLock;

use regex::Regex;

use super::ExtractError;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^£([\d,]+)$").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}").unwrap());
static MILEAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([\d,]+) miles?$").unwrap());
static ENGINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d)\.(\d)L$").unwrap());

/// Parse a displayed price like `£12,995` into its numeric value as
/// printed (no pence conversion). The pound sign must be the properly
/// decoded UTF-8 character; garbled encodings are rejected.
pub fn parse_currency(text: &str) -> Result<u32, ExtractError> {
    let caps = PRICE_RE
        .captures(text)
        .ok_or_else(|| ExtractError::MalformedPrice(text.to_string()))?;
    strip_grouping(&caps[1]).ok_or_else(|| ExtractError::MalformedPrice(text.to_string()))
}

/// Parse a registration year from text like `2017 (17 reg)`: the first
/// four digits win, trailing text is ignored.
pub fn parse_year(text: &str) -> Result<u32, ExtractError> {
    let raw = YEAR_RE
        .find(text)
        .ok_or_else(|| ExtractError::MalformedYear(text.to_string()))?;
    raw.as_str()
        .parse()
        .map_err(|_| ExtractError::MalformedYear(text.to_string()))
}

/// Parse `44,210 miles` or `1 mile`. The single space before the unit
/// is required; any other trailing text fails.
pub fn parse_mileage(text: &str) -> Result<u32, ExtractError> {
    let caps = MILEAGE_RE
        .captures(text)
        .ok_or_else(|| ExtractError::MalformedMileage(text.to_string()))?;
    strip_grouping(&caps[1]).ok_or_else(|| ExtractError::MalformedMileage(text.to_string()))
}

/// Parse litre notation like `1.6L` into the scaled integer the
/// original output format used: litres*1000 + tenths*100 (so "1.6L"
/// → 1600). Not a true cc conversion; kept for output compatibility.
pub fn parse_engine_size(text: &str) -> Result<u32, ExtractError> {
    let caps = ENGINE_RE
        .captures(text)
        .ok_or_else(|| ExtractError::MalformedEngineSize(text.to_string()))?;
    let litres: u32 = caps[1]
        .parse()
        .map_err(|_| ExtractError::MalformedEngineSize(text.to_string()))?;
    let tenths: u32 = caps[2]
        .parse()
        .map_err(|_| ExtractError::MalformedEngineSize(text.to_string()))?;
    Ok(litres * 1000 + tenths * 100)
}

/// Drop thousands commas and parse the remaining digits. `None` when
/// nothing but separators was captured (e.g. `£,`).
fn strip_grouping(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse().ok()
}
