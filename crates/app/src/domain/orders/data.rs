//! Order Data

use crate::domain::{customers::records::CustomerUuid, orders::records::OrderUuid};

/// Checkout Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,

    /// Free text, at most 700 characters.
    pub notes: Option<String>,
}
