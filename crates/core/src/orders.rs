//! Order and comment statuses

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of order notes, in characters.
pub const MAX_ORDER_NOTES_LENGTH: usize = 700;

/// Unknown status code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status code {0:?}")]
pub struct UnknownStatusCode(pub String);

/// Rejected order status change.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("order cannot move from {from} to {to}")]
pub struct StatusTransitionError {
    /// Current status.
    pub from: OrderStatus,

    /// Requested status.
    pub to: OrderStatus,
}

/// Order payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment.
    #[default]
    Unpaid,

    /// Paid.
    Paid,

    /// Canceled.
    Canceled,
}

impl OrderStatus {
    /// Storage code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Unpaid => "u",
            Self::Paid => "p",
            Self::Canceled => "c",
        }
    }

    /// Parse a storage code.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStatusCode`] for anything but `u`, `p` or `c`.
    pub fn from_code(code: &str) -> Result<Self, UnknownStatusCode> {
        match code {
            "u" => Ok(Self::Unpaid),
            "p" => Ok(Self::Paid),
            "c" => Ok(Self::Canceled),
            other => Err(UnknownStatusCode(other.to_owned())),
        }
    }

    /// Whether an order may move from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unpaid, Self::Paid | Self::Canceled) | (Self::Paid, Self::Canceled)
        )
    }

    /// Validate a status change.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] for transitions other than unpaid to paid, unpaid to
    /// canceled and paid to canceled.
    pub fn transition_to(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
        })
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatusCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "canceled" => Ok(Self::Canceled),
            other => Self::from_code(other),
        }
    }
}

/// Comment moderation status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentStatus {
    /// Awaiting moderation.
    #[default]
    Waiting,

    /// Visible on the product page.
    Approved,

    /// Rejected.
    NotApproved,
}

impl CommentStatus {
    /// Storage code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Waiting => "w",
            Self::Approved => "a",
            Self::NotApproved => "na",
        }
    }

    /// Parse a storage code.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStatusCode`] for anything but `w`, `a` or `na`.
    pub fn from_code(code: &str) -> Result<Self, UnknownStatusCode> {
        match code {
            "w" => Ok(Self::Waiting),
            "a" => Ok(Self::Approved),
            "na" => Ok(Self::NotApproved),
            other => Err(UnknownStatusCode(other.to_owned())),
        }
    }

    /// Whether the comment is shown publicly.
    pub fn is_visible(self) -> bool {
        self == Self::Approved
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Waiting => "waiting",
            Self::Approved => "approved",
            Self::NotApproved => "not-approved",
        })
    }
}

/// Whether order notes fit the length limit.
pub fn notes_fit(notes: &str) -> bool {
    notes.chars().count() <= MAX_ORDER_NOTES_LENGTH
}
