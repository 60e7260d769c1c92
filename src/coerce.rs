// 🧪 Record Coercion - loosely-typed text → strict field values
//
// Every function here is total: bad input becomes a zero / absent / invalid
// value plus a FieldWarning, never an error. A malformed row is still emitted.

use crate::parser::FieldMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// WARNINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// Column absent or empty
    Missing,
    /// Numeric column holding non-numeric text (value became 0)
    NotNumeric,
    /// Date column that couldn't be parsed (value became None)
    InvalidDate,
    /// Enum column outside the known set (kept verbatim)
    UnrecognizedVariant,
    /// Tax id whose digits are neither 11 nor 14 long
    InvalidTaxId,
    /// Amount expected to be non-negative
    NegativeAmount,
    /// Account whose available credit is above its credit limit
    AvailableCreditExceedsLimit,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::Missing => "missing",
            WarningKind::NotNumeric => "not numeric",
            WarningKind::InvalidDate => "invalid date",
            WarningKind::UnrecognizedVariant => "unrecognized value",
            WarningKind::InvalidTaxId => "invalid tax id",
            WarningKind::NegativeAmount => "negative amount",
            WarningKind::AvailableCreditExceedsLimit => "available credit exceeds limit",
        }
    }
}

/// A per-field note produced while coercing one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWarning {
    pub field: String,
    pub kind: WarningKind,
    pub raw: Option<String>,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "{}: {} ({:?})", self.field, self.kind.as_str(), raw),
            None => write!(f, "{}: {}", self.field, self.kind.as_str()),
        }
    }
}

/// Coerced - a value that was always produced, plus what went wrong on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub warnings: Vec<FieldWarning>,
}

impl<T> Coerced<T> {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

// ============================================================================
// TOTAL CONVERSIONS
// ============================================================================

/// Parse a decimal the way a permissive numeric cast would
///
/// Accepts plain (`1234.5`, `-3`), scientific (`1e3`) and float-like (`.5`)
/// text. Returns `None` for empty, garbage, infinite or out-of-range input,
/// including digit separators like `1_000`.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let text = raw.trim();
    if text.is_empty() || !text.chars().all(is_numeric_char) {
        return None;
    }

    if let Ok(value) = Decimal::from_str(text) {
        return Some(value);
    }
    if let Ok(value) = Decimal::from_scientific(text) {
        return Some(value);
    }

    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .and_then(Decimal::from_f64)
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
}

/// Parse an integer, truncating any fractional part toward zero
pub fn parse_integer(raw: &str) -> Option<i64> {
    parse_decimal(raw).and_then(|value| value.trunc().to_i64())
}

/// Parse a calendar date
///
/// Formats tried, in order: `YYYY-MM-DD`, RFC 3339, `YYYY-MM-DDTHH:MM:SS`,
/// `MM/DD/YYYY`, `YYYY/MM/DD`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(text, "%m/%d/%Y").ok())
        .or_else(|| NaiveDate::parse_from_str(text, "%Y/%m/%d").ok())
}

/// Empty-after-trim text is "absent", not an empty value
pub fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Keep only ASCII digits
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

// ============================================================================
// ENUM COLUMNS
// ============================================================================

/// Variant - an enum column that accepts any text
///
/// Known labels map to typed variants; anything else is kept as-is.
pub trait Variant: Sized {
    fn from_label(raw: &str) -> Self;

    fn is_recognized(&self) -> bool;
}

// ============================================================================
// FIELD READER
// ============================================================================

/// FieldReader - reads typed values out of one FieldMap, collecting warnings
///
/// # Example:
/// ```
/// use client_ledger::coerce::FieldReader;
/// use client_ledger::parser::FieldMap;
///
/// let row = FieldMap::new(2).with_field("saldo", Some("abc"));
/// let mut reader = FieldReader::new(&row);
/// let balance = reader.decimal("saldo");
/// let coerced = reader.finish(balance);
///
/// assert!(coerced.value.is_zero());
/// assert_eq!(coerced.warnings.len(), 1);
/// ```
pub struct FieldReader<'a> {
    fields: &'a FieldMap,
    warnings: Vec<FieldWarning>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a FieldMap) -> Self {
        FieldReader {
            fields,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, field: &str, kind: WarningKind, raw: Option<&str>) {
        self.warnings.push(FieldWarning {
            field: field.to_string(),
            kind,
            raw: raw.map(str::to_string),
        });
    }

    /// Trimmed raw text, or None (with a Missing warning) when absent/empty
    fn present(&mut self, field: &str) -> Option<&'a str> {
        let fields = self.fields;
        match fields.get(field).map(str::trim) {
            Some(text) if !text.is_empty() => Some(text),
            _ => {
                self.warn(field, WarningKind::Missing, None);
                None
            }
        }
    }

    /// Required text. Absent → empty string.
    pub fn text(&mut self, field: &str) -> String {
        self.present(field).unwrap_or_default().to_string()
    }

    /// Optional text. Absent or blank → None, no warning.
    pub fn optional_text(&mut self, field: &str) -> Option<String> {
        non_empty(self.fields.get(field))
    }

    /// Decimal. Absent or non-numeric → 0.
    pub fn decimal(&mut self, field: &str) -> Decimal {
        let Some(text) = self.present(field) else {
            return Decimal::ZERO;
        };

        match parse_decimal(text) {
            Some(value) => value,
            None => {
                self.warn(field, WarningKind::NotNumeric, Some(text));
                Decimal::ZERO
            }
        }
    }

    /// Decimal that should not be negative. A negative value is kept, but noted.
    pub fn non_negative_decimal(&mut self, field: &str) -> Decimal {
        let value = self.decimal(field);
        if value.is_sign_negative() && !value.is_zero() {
            let raw = value.to_string();
            self.warn(field, WarningKind::NegativeAmount, Some(&raw));
        }
        value
    }

    /// Integer, truncated. Absent or non-numeric → 0.
    pub fn integer(&mut self, field: &str) -> i64 {
        let Some(text) = self.present(field) else {
            return 0;
        };

        match parse_integer(text) {
            Some(value) => value,
            None => {
                self.warn(field, WarningKind::NotNumeric, Some(text));
                0
            }
        }
    }

    /// Calendar date. Absent or unparseable → None.
    pub fn date(&mut self, field: &str) -> Option<NaiveDate> {
        let text = self.present(field)?;

        let date = parse_date(text);
        if date.is_none() {
            self.warn(field, WarningKind::InvalidDate, Some(text));
        }
        date
    }

    /// Enum column. Unknown labels pass through untouched.
    pub fn variant<V: Variant>(&mut self, field: &str) -> V {
        let raw = self.text(field);
        let value = V::from_label(&raw);
        if !raw.is_empty() && !value.is_recognized() {
            self.warn(field, WarningKind::UnrecognizedVariant, Some(&raw));
        }
        value
    }

    pub fn finish<T>(self, value: T) -> Coerced<T> {
        Coerced {
            value,
            warnings: self.warnings,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
