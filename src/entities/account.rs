// 💳 Account Entity - one row of the "contas" sheet
//
// "The owning client is a VALUE (a tax id), not a pointer"
//
// - Account references its client by tax id (foreign key, not enforced)
// - Orphan accounts are legal; they simply show no client
// - Balance may be negative (overdrawn); credit figures should not be

use super::FromFields;
use crate::coerce::{Coerced, FieldReader, Variant, WarningKind};
use crate::dataset::RecordKind;
use crate::entities::tax_id::TaxId;
use crate::parser::FieldMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// SOURCE COLUMNS
// ============================================================================

pub const ID: &str = "id";
pub const CLIENT_TAX_ID: &str = "cpfCnpjCliente";
pub const TYPE: &str = "tipo";
pub const BALANCE: &str = "saldo";
pub const CREDIT_LIMIT: &str = "limiteCredito";
pub const AVAILABLE_CREDIT: &str = "creditoDisponivel";

// ============================================================================
// ACCOUNT KIND
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountKind {
    /// Checking account ("corrente")
    Checking,

    /// Savings account ("poupanca")
    Savings,

    /// Other / Unknown, kept verbatim
    Other(String),
}

impl AccountKind {
    /// Source label
    pub fn as_str(&self) -> &str {
        match self {
            AccountKind::Checking => "corrente",
            AccountKind::Savings => "poupanca",
            AccountKind::Other(raw) => raw,
        }
    }

    /// Heading label for account cards
    pub fn title(&self) -> &str {
        match self {
            AccountKind::Checking => "Conta Corrente",
            AccountKind::Savings => "Conta Poupança",
            AccountKind::Other(raw) => raw,
        }
    }
}

impl Variant for AccountKind {
    fn from_label(raw: &str) -> Self {
        let label = raw.trim();
        match label.to_lowercase().as_str() {
            "corrente" | "conta corrente" | "checking" => AccountKind::Checking,
            "poupanca" | "poupança" | "conta poupança" | "savings" => AccountKind::Savings,
            _ => AccountKind::Other(label.to_string()),
        }
    }

    fn is_recognized(&self) -> bool {
        !matches!(self, AccountKind::Other(_))
    }
}

impl From<String> for AccountKind {
    fn from(raw: String) -> Self {
        AccountKind::from_label(&raw)
    }
}

impl From<AccountKind> for String {
    fn from(kind: AccountKind) -> Self {
        kind.as_str().to_string()
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,

    /// Owning client's tax id (foreign key to Client.tax_id)
    pub client_tax_id: TaxId,

    pub kind: AccountKind,

    /// Current balance (negative = overdrawn)
    pub balance: Decimal,

    pub credit_limit: Decimal,

    /// Expected to be <= credit_limit; not enforced
    pub available_credit: Decimal,
}

impl Account {
    /// Check if account is overdrawn (negative balance)
    pub fn is_overdrawn(&self) -> bool {
        self.balance < Decimal::ZERO
    }

    /// Credit already drawn from the limit; `None` when it doesn't fit a Decimal
    pub fn credit_used(&self) -> Option<Decimal> {
        self.credit_limit.checked_sub(self.available_credit)
    }

    pub fn belongs_to(&self, tax_id: &TaxId) -> bool {
        !tax_id.digits().is_empty() && &self.client_tax_id == tax_id
    }
}

impl FromFields for Account {
    const KIND: RecordKind = RecordKind::Account;

    fn from_fields(fields: &FieldMap) -> Coerced<Self> {
        let mut reader = FieldReader::new(fields);

        let account = Account {
            id: reader.text(ID),
            client_tax_id: TaxId::new(reader.text(CLIENT_TAX_ID)),
            kind: reader.variant(TYPE),
            balance: reader.decimal(BALANCE),
            credit_limit: reader.non_negative_decimal(CREDIT_LIMIT),
            available_credit: reader.non_negative_decimal(AVAILABLE_CREDIT),
        };

        if account.available_credit > account.credit_limit {
            let raw = account.available_credit.to_string();
            reader.warn(
                AVAILABLE_CREDIT,
                WarningKind::AvailableCreditExceedsLimit,
                Some(&raw),
            );
        }

        reader.finish(account)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn account_row(kind: &str, balance: &str, limit: &str, available: &str) -> FieldMap {
        FieldMap::new(2)
            .with_field(ID, Some("a1"))
            .with_field(CLIENT_TAX_ID, Some("123.456.789-01"))
            .with_field(TYPE, Some(kind))
            .with_field(BALANCE, Some(balance))
            .with_field(CREDIT_LIMIT, Some(limit))
            .with_field(AVAILABLE_CREDIT, Some(available))
    }

    #[test]
    fn test_account_from_clean_row() {
        let coerced = Account::from_fields(&account_row("corrente", "1500.25", "5000", "3200"));
        let account = &coerced.value;

        assert!(coerced.is_clean(), "unexpected warnings: {:?}", coerced.warnings);
        assert_eq!(account.id, "a1");
        assert_eq!(account.kind, AccountKind::Checking);
        assert_eq!(account.balance, Decimal::new(150025, 2));
        assert_eq!(account.credit_used(), Some(Decimal::new(1800, 0)));
        assert!(!account.is_overdrawn());
    }

    #[test]
    fn test_credit_used_at_decimal_limits() {
        let account = Account::from_fields(&account_row(
            "corrente",
            "0",
            "79228162514264337593543950335",
            "-79228162514264337593543950335",
        ))
        .into_value();

        assert_eq!(account.credit_limit, Decimal::MAX);
        assert_eq!(account.available_credit, Decimal::MIN);
        assert_eq!(account.credit_used(), None);
    }

    #[test]
    fn test_account_overdrawn() {
        let account = Account::from_fields(&account_row("poupanca", "-50", "0", "0")).into_value();

        assert_eq!(account.kind, AccountKind::Savings);
        assert!(account.is_overdrawn());
    }

    #[test]
    fn test_available_credit_above_limit_is_accepted() {
        let coerced = Account::from_fields(&account_row("corrente", "0", "1000", "1500"));

        assert_eq!(coerced.value.available_credit, Decimal::new(1500, 0));
        assert_eq!(coerced.warnings.len(), 1);
        assert_eq!(coerced.warnings[0].kind, WarningKind::AvailableCreditExceedsLimit);
    }

    #[test]
    fn test_unknown_kind_passes_through() {
        let coerced = Account::from_fields(&account_row("investimento", "10", "0", "0"));

        assert_eq!(coerced.value.kind, AccountKind::Other("investimento".to_string()));
        assert_eq!(coerced.value.kind.title(), "investimento");
        assert_eq!(coerced.warnings[0].kind, WarningKind::UnrecognizedVariant);
    }

    #[test]
    fn test_garbage_amounts_become_zero() {
        let account = Account::from_fields(&account_row("corrente", "n/a", "", "x")).into_value();

        assert!(account.balance.is_zero());
        assert!(account.credit_limit.is_zero());
        assert!(account.available_credit.is_zero());
    }

    #[test]
    fn test_kind_titles() {
        assert_eq!(AccountKind::Checking.title(), "Conta Corrente");
        assert_eq!(AccountKind::from_label("Poupança"), AccountKind::Savings);
        assert_eq!(AccountKind::Savings.title(), "Conta Poupança");
    }

    #[test]
    fn test_belongs_to_matches_digits() {
        let account = Account::from_fields(&account_row("corrente", "1", "0", "0")).into_value();

        assert!(account.belongs_to(&TaxId::new("12345678901")));
        assert!(!account.belongs_to(&TaxId::new("98765432100")));
        assert!(!account.belongs_to(&TaxId::new("")));
    }
}
