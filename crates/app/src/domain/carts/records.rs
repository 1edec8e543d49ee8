//! Cart Records

use jiff::Timestamp;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Cart UUID, the opaque token a shopper holds.
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub items: Vec<CartItemRecord>,

    /// Sum of line subtotals.
    pub total: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The live product behind a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,

    /// Current price, which may differ from the captured line price.
    pub unit_price: u64,
    pub is_active: bool,
}

/// Cart Item Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub product: CartProduct,
    pub quantity: u16,

    /// Price captured when the line was created.
    pub unit_price: u64,
    pub subtotal: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
