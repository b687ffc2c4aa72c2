use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalogue product, resolved onto order lines when requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i32,
}
