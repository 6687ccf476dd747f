use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amount with and without VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    #[serde(with = "rust_decimal::serde::float")]
    pub excl_vat: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub incl_vat: Option<Decimal>,
}

impl Price {
    pub fn new(excl_vat: Decimal, incl_vat: Option<Decimal>) -> Self {
        Self { excl_vat, incl_vat }
    }
}
