// 🇧🇷 Display Formatting - pt-BR currency and dates
//
// Tax-id masks live on TaxId itself (TaxId::formatted).

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Shown wherever a date is absent or invalid
pub const NO_DATE: &str = "-";

/// Brazilian real, two decimals: `R$ 1.234,56`, `-R$ 1.234,56`
///
/// # Example:
/// ```
/// use client_ledger::format::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456, 2)), "R$ 1.234,56");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut abs = rounded.abs();
    abs.rescale(2);
    let text = abs.to_string();
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{}", sign, group_thousands(units), cents)
}

/// Like `format_currency`, with `-` when there is no value
pub fn format_optional_currency(value: Option<Decimal>) -> String {
    value.map_or_else(|| NO_DATE.to_string(), format_currency)
}

/// `1234567` → `1.234.567`
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `dd/mm/yyyy`, or `-` for an absent date
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => NO_DATE.to_string(),
    }
}
