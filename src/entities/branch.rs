// 🏦 Branch Entity - one row of the "agencias" sheet

use super::FromFields;
use crate::coerce::{Coerced, FieldReader};
use crate::dataset::RecordKind;
use crate::parser::FieldMap;
use serde::{Deserialize, Serialize};

pub const ID: &str = "id";
pub const CODE: &str = "codigo";
pub const NAME: &str = "nome";
pub const ADDRESS: &str = "endereco";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,

    /// Join key from Client.branch_code
    pub code: i64,

    pub name: String,
    pub address: String,
}

impl FromFields for Branch {
    const KIND: RecordKind = RecordKind::Branch;

    fn from_fields(fields: &FieldMap) -> Coerced<Self> {
        let mut reader = FieldReader::new(fields);

        let branch = Branch {
            id: reader.text(ID),
            code: reader.integer(CODE),
            name: reader.text(NAME),
            address: reader.text(ADDRESS),
        };

        reader.finish(branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DelimitedParser;

    #[test]
    fn test_branch_from_sheet() {
        let rows = DelimitedParser::new()
            .parse("id,codigo,nome,endereco\nb1,101,Centro,\"Av. Princesa Isabel, 574\"\nb2,abc,Praia,");

        let centro = Branch::from_fields(&rows[0]);
        assert!(centro.is_clean());
        assert_eq!(centro.value.code, 101);
        assert_eq!(centro.value.address, "Av. Princesa Isabel, 574");

        let praia = Branch::from_fields(&rows[1]);
        assert_eq!(praia.value.code, 0);
        assert_eq!(praia.value.address, "");
        assert_eq!(praia.warnings.len(), 2);
    }
}
