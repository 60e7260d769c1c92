// 🪪 TaxId - CPF (individual) / CNPJ (organization) identifier
//
// The raw text is kept as published ("123.456.789-01"); equality, hashing
// and lookups use the digits only, so formatted and bare values join.

use crate::coerce::digits_only;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Digit count of an individual's tax id (CPF)
pub const INDIVIDUAL_DIGITS: usize = 11;

/// Digit count of an organization's tax id (CNPJ)
pub const ORGANIZATION_DIGITS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxIdKind {
    Individual,
    Organization,
    Unknown,
}

impl TaxIdKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaxIdKind::Individual => "CPF",
            TaxIdKind::Organization => "CNPJ",
            TaxIdKind::Unknown => "?",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    pub fn new(raw: impl Into<String>) -> Self {
        TaxId(raw.into().trim().to_string())
    }

    /// Text as it appeared in the source
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digits(&self) -> String {
        digits_only(&self.0)
    }

    pub fn kind(&self) -> TaxIdKind {
        match self.digits().len() {
            INDIVIDUAL_DIGITS => TaxIdKind::Individual,
            ORGANIZATION_DIGITS => TaxIdKind::Organization,
            _ => TaxIdKind::Unknown,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kind() != TaxIdKind::Unknown
    }

    /// Display mask: `000.000.000-00` (CPF) or `00.000.000/0000-00` (CNPJ)
    ///
    /// Anything else is shown as its bare digits.
    pub fn formatted(&self) -> String {
        let d = self.digits();
        match self.kind() {
            TaxIdKind::Individual => {
                format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
            }
            TaxIdKind::Organization => format!(
                "{}.{}.{}/{}-{}",
                &d[0..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..14]
            ),
            TaxIdKind::Unknown => d,
        }
    }

    /// Substring match on digits. `needle` must already be digits-only.
    pub fn contains_digits(&self, needle: &str) -> bool {
        self.digits().contains(needle)
    }
}

impl PartialEq for TaxId {
    fn eq(&self, other: &Self) -> bool {
        self.digits() == other.digits()
    }
}

impl Eq for TaxId {}

impl Hash for TaxId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digits().hash(state);
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl From<&str> for TaxId {
    fn from(raw: &str) -> Self {
        TaxId::new(raw)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_individual_tax_id() {
        let tax_id = TaxId::new("123.456.789-01");

        assert_eq!(tax_id.digits(), "12345678901");
        assert_eq!(tax_id.kind(), TaxIdKind::Individual);
        assert_eq!(tax_id.formatted(), "123.456.789-01");
        assert_eq!(tax_id.kind().label(), "CPF");
    }

    #[test]
    fn test_organization_tax_id() {
        let tax_id = TaxId::new("12345678000190");

        assert_eq!(tax_id.kind(), TaxIdKind::Organization);
        assert_eq!(tax_id.formatted(), "12.345.678/0001-90");
        assert_eq!(tax_id.to_string(), "12.345.678/0001-90");
    }

    #[test]
    fn test_unknown_length_is_invalid() {
        let tax_id = TaxId::new("123-45");

        assert!(!tax_id.is_valid());
        assert_eq!(tax_id.formatted(), "12345");
        assert_eq!(tax_id.as_str(), "123-45");
    }

    #[test]
    fn test_equality_ignores_formatting() {
        assert_eq!(TaxId::new("123.456.789-01"), TaxId::new("12345678901"));
        assert_ne!(TaxId::new("123.456.789-01"), TaxId::new("123.456.789-02"));
    }

    #[test]
    fn test_contains_digits() {
        let tax_id = TaxId::new("123.456.789-01");

        assert!(tax_id.contains_digits("45678"));
        assert!(tax_id.contains_digits("12345678901"));
        assert!(!tax_id.contains_digits("999"));
    }

    #[test]
    fn test_raw_text_is_trimmed() {
        assert_eq!(TaxId::new("  12345678901 ").as_str(), "12345678901");
    }
}
