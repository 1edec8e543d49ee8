//! Cart Data

use storefront::carts::{AddMode, Quantity};

use crate::domain::{
    carts::records::{CartItemUuid, CartUuid},
    products::records::ProductUuid,
};

/// New Cart Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCart {
    pub uuid: CartUuid,
}

/// New Cart Item Data
///
/// `uuid` is only used when the product has no line yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: Quantity,
    pub mode: AddMode,
}
