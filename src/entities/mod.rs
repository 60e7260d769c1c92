// Entity Models - the three record kinds published as sheets
//
// Each entity has:
// - Source column constants (the sheet's header names)
// - A total `FromFields` coercion: a row is always turned into a record
// - No stored links to other entities (joins live in `dataset`)

pub mod account;
pub mod branch;
pub mod client;
pub mod tax_id;

pub use account::{Account, AccountKind};
pub use branch::Branch;
pub use client::{Client, MaritalStatus};
pub use tax_id::{TaxId, TaxIdKind};

use crate::coerce::Coerced;
use crate::dataset::RecordKind;
use crate::parser::FieldMap;

/// FromFields - coerce one parsed row into a typed record
///
/// Never fails: malformed cells become zero / absent / invalid values and a
/// warning on the returned `Coerced`.
pub trait FromFields: Sized {
    const KIND: RecordKind;

    fn from_fields(fields: &FieldMap) -> Coerced<Self>;
}
