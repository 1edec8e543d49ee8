//! Order Records

use jiff::Timestamp;
use storefront::orders::OrderStatus;

use crate::{
    domain::{customers::records::CustomerUuid, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub items: Vec<OrderItemRecord>,

    /// Sum of item subtotals.
    pub total: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u16,
    pub unit_price: u64,
    pub subtotal: u64,
}
