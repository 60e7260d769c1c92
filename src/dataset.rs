// 🗂️ Dataset - the three typed collections and the lookups between them
//
// Joins are pure functions over slices. Nothing here caches a relationship:
// a reload swaps whole collections, and any stored back-reference would dangle.

use crate::coerce::Coerced;
use crate::entities::{Account, Branch, Client, FromFields, TaxId};
use crate::parser::FieldMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RECORD KIND
// ============================================================================

/// RecordKind - which of the three published sheets a collection comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Client,
    Account,
    Branch,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Client, RecordKind::Account, RecordKind::Branch];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Client => "clients",
            RecordKind::Account => "accounts",
            RecordKind::Branch => "branches",
        }
    }

    /// Sheet name in the published spreadsheet
    pub fn sheet(&self) -> &'static str {
        match self {
            RecordKind::Client => "clientes",
            RecordKind::Account => "contas",
            RecordKind::Branch => "agencias",
        }
    }

    /// File name used when the sheets are read from a local directory
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.sheet())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coerce every parsed row of one sheet. Rows are never dropped.
pub fn coerce_rows<T: FromFields>(rows: &[FieldMap]) -> Vec<Coerced<T>> {
    rows.iter().map(T::from_fields).collect()
}

// ============================================================================
// LOOKUPS
// ============================================================================

/// All accounts owned by a tax id, in source order
///
/// Comparison is on digits, so `123.456.789-01` and `12345678901` join.
/// A blank tax id owns nothing.
pub fn accounts_for_client<'a>(accounts: &'a [Account], tax_id: &TaxId) -> Vec<&'a Account> {
    accounts.iter().filter(|a| a.belongs_to(tax_id)).collect()
}

/// The branch with a numeric code (first match wins)
pub fn branch_for_code(branches: &[Branch], code: i64) -> Option<&Branch> {
    branches.iter().find(|b| b.code == code)
}

// ============================================================================
// DATASET
// ============================================================================

/// Dataset - one session's worth of loaded collections
///
/// Any collection may be empty (its source failed); callers must not assume
/// referential completeness between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub clients: Vec<Client>,
    pub accounts: Vec<Account>,
    pub branches: Vec<Branch>,
}

impl Dataset {
    pub fn new(clients: Vec<Client>, accounts: Vec<Account>, branches: Vec<Branch>) -> Self {
        Dataset {
            clients,
            accounts,
            branches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.accounts.is_empty() && self.branches.is_empty()
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Client => self.clients.len(),
            RecordKind::Account => self.accounts.len(),
            RecordKind::Branch => self.branches.len(),
        }
    }

    pub fn client_by_id(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn accounts_for_client(&self, tax_id: &TaxId) -> Vec<&Account> {
        accounts_for_client(&self.accounts, tax_id)
    }

    pub fn branch_for_code(&self, code: i64) -> Option<&Branch> {
        branch_for_code(&self.branches, code)
    }

    /// Everything the detail view shows for one client
    pub fn detail(&self, client_id: &str) -> Option<ClientDetail<'_>> {
        self.client_by_id(client_id)
            .map(|client| self.detail_for(client))
    }

    pub fn detail_for<'a>(&'a self, client: &'a Client) -> ClientDetail<'a> {
        ClientDetail {
            client,
            accounts: self.accounts_for_client(&client.tax_id),
            branch: self.branch_for_code(client.branch_code),
        }
    }
}

/// ClientDetail - a client with its accounts and branch, resolved on demand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDetail<'a> {
    pub client: &'a Client,
    pub accounts: Vec<&'a Account>,
    pub branch: Option<&'a Branch>,
}

impl ClientDetail<'_> {
    /// Sum of balances across the client's accounts, `None` on overflow
    pub fn total_balance(&self) -> Option<Decimal> {
        checked_total(self.accounts.iter().map(|a| a.balance))
    }

    pub fn total_available_credit(&self) -> Option<Decimal> {
        checked_total(self.accounts.iter().map(|a| a.available_credit))
    }
}

fn checked_total(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
}

// ============================================================================
// TESTS
// ============================================================================
