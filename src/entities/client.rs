// 👤 Client Entity - one row of the "clientes" sheet
//
// Joined to accounts by tax id and to a branch by branch code. Both joins are
// lookups in `dataset`, never stored references: collections are replaced
// wholesale on every reload.

use super::FromFields;
use crate::coerce::{Coerced, FieldReader, Variant, WarningKind};
use crate::dataset::RecordKind;
use crate::entities::tax_id::TaxId;
use crate::parser::FieldMap;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// SOURCE COLUMNS
// ============================================================================

pub const ID: &str = "id";
pub const TAX_ID: &str = "cpfCnpj";
pub const NATIONAL_ID: &str = "rg";
pub const BIRTH_DATE: &str = "dataNascimento";
pub const NAME: &str = "nome";
pub const SOCIAL_NAME: &str = "nomeSocial";
pub const EMAIL: &str = "email";
pub const ADDRESS: &str = "endereco";
pub const ANNUAL_INCOME: &str = "rendaAnual";
pub const NET_WORTH: &str = "patrimonio";
pub const MARITAL_STATUS: &str = "estadoCivil";
pub const BRANCH_CODE: &str = "codigoAgencia";

// ============================================================================
// MARITAL STATUS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaritalStatus {
    Single,
    Married,
    Widowed,
    Divorced,

    /// Any other published value, kept verbatim
    Other(String),
}

impl MaritalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MaritalStatus::Single => "Solteiro",
            MaritalStatus::Married => "Casado",
            MaritalStatus::Widowed => "Viúvo",
            MaritalStatus::Divorced => "Divorciado",
            MaritalStatus::Other(raw) => raw,
        }
    }
}

impl Variant for MaritalStatus {
    fn from_label(raw: &str) -> Self {
        let label = raw.trim();
        match label.to_lowercase().as_str() {
            "solteiro" | "solteira" | "single" => MaritalStatus::Single,
            "casado" | "casada" | "married" => MaritalStatus::Married,
            "viúvo" | "viúva" | "viuvo" | "viuva" | "widowed" => MaritalStatus::Widowed,
            "divorciado" | "divorciada" | "divorced" => MaritalStatus::Divorced,
            _ => MaritalStatus::Other(label.to_string()),
        }
    }

    fn is_recognized(&self) -> bool {
        !matches!(self, MaritalStatus::Other(_))
    }
}

impl From<String> for MaritalStatus {
    fn from(raw: String) -> Self {
        MaritalStatus::from_label(&raw)
    }
}

impl From<MaritalStatus> for String {
    fn from(status: MaritalStatus) -> Self {
        status.as_str().to_string()
    }
}

// ============================================================================
// CLIENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,

    /// Join key to accounts
    pub tax_id: TaxId,

    pub national_id: Option<String>,

    /// None when the source date was absent or unparseable
    pub birth_date: Option<NaiveDate>,

    /// Legal name (searched)
    pub name: String,

    /// Preferred name, shown instead of the legal name when present
    pub social_name: Option<String>,

    pub email: String,
    pub address: String,
    pub annual_income: Decimal,
    pub net_worth: Decimal,
    pub marital_status: MaritalStatus,

    /// Join key to branches
    pub branch_code: i64,
}

impl Client {
    pub const HEADERS: [&'static str; 12] = [
        ID,
        TAX_ID,
        NATIONAL_ID,
        BIRTH_DATE,
        NAME,
        SOCIAL_NAME,
        EMAIL,
        ADDRESS,
        ANNUAL_INCOME,
        NET_WORTH,
        MARITAL_STATUS,
        BRANCH_CODE,
    ];

    /// Name used in lists and headings
    pub fn display_name(&self) -> &str {
        self.social_name.as_deref().unwrap_or(&self.name)
    }

    /// Row in `HEADERS` order, as plain text
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.tax_id.as_str().to_string(),
            self.national_id.clone().unwrap_or_default(),
            self.birth_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            self.name.clone(),
            self.social_name.clone().unwrap_or_default(),
            self.email.clone(),
            self.address.clone(),
            self.annual_income.to_string(),
            self.net_worth.to_string(),
            self.marital_status.as_str().to_string(),
            self.branch_code.to_string(),
        ]
    }
}

impl FromFields for Client {
    const KIND: RecordKind = RecordKind::Client;

    fn from_fields(fields: &FieldMap) -> Coerced<Self> {
        let mut reader = FieldReader::new(fields);

        let tax_id = TaxId::new(reader.text(TAX_ID));
        if !tax_id.as_str().is_empty() && !tax_id.is_valid() {
            reader.warn(TAX_ID, WarningKind::InvalidTaxId, Some(tax_id.as_str()));
        }

        let client = Client {
            id: reader.text(ID),
            tax_id,
            national_id: reader.optional_text(NATIONAL_ID),
            birth_date: reader.date(BIRTH_DATE),
            name: reader.text(NAME),
            social_name: reader.optional_text(SOCIAL_NAME),
            email: reader.text(EMAIL),
            address: reader.text(ADDRESS),
            annual_income: reader.non_negative_decimal(ANNUAL_INCOME),
            net_worth: reader.decimal(NET_WORTH),
            marital_status: reader.variant(MARITAL_STATUS),
            branch_code: reader.integer(BRANCH_CODE),
        };

        reader.finish(client)
    }
}

// ============================================================================
// TESTS
// ============================================================================
