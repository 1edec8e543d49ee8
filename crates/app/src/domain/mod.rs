//! Storefront Domain Concerns

pub mod carts;
pub mod categories;
pub mod comments;
pub mod customers;
pub mod discounts;
pub mod orders;
pub mod products;
