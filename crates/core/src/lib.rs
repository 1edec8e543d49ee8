//! Storefront
//!
//! Framework-free storefront domain logic: slug assignment, the nested-set category tree,
//! cart state, product search filters and order status rules.

pub mod carts;
pub mod categories;
pub mod orders;
pub mod prelude;
pub mod search;
pub mod slugs;
