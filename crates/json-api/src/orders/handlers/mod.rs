//! Order Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use storefront::orders::OrderStatus;

pub(crate) mod checkout;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentStatus {
    Unpaid,
    Paid,
    Canceled,
}

impl From<OrderStatus> for PaymentStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unpaid => Self::Unpaid,
            OrderStatus::Paid => Self::Paid,
            OrderStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<PaymentStatus> for OrderStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => Self::Unpaid,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Canceled => Self::Canceled,
        }
    }
}
