//! Discount Data

use crate::domain::discounts::records::DiscountUuid;

/// New Discount Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscount {
    pub uuid: DiscountUuid,
    pub discount: f64,
    pub description: String,
}
