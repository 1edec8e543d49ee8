//! Discount Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Discount UUID
pub type DiscountUuid = TypedUuid<DiscountRecord>;

/// Discount Record
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountRecord {
    pub uuid: DiscountUuid,

    /// Percentage off.
    pub discount: f64,
    pub description: String,
    pub created_at: Timestamp,
}
