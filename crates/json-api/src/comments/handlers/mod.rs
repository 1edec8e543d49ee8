//! Comment Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use storefront::orders::CommentStatus;

pub(crate) mod create;
pub(crate) mod index;
pub(crate) mod update;

/// Comment moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ModerationStatus {
    /// Awaiting moderation
    Waiting,

    /// Shown on the product page
    Approved,

    /// Rejected
    NotApproved,
}

impl From<CommentStatus> for ModerationStatus {
    fn from(status: CommentStatus) -> Self {
        match status {
            CommentStatus::Waiting => Self::Waiting,
            CommentStatus::Approved => Self::Approved,
            CommentStatus::NotApproved => Self::NotApproved,
        }
    }
}

impl From<ModerationStatus> for CommentStatus {
    fn from(status: ModerationStatus) -> Self {
        match status {
            ModerationStatus::Waiting => Self::Waiting,
            ModerationStatus::Approved => Self::Approved,
            ModerationStatus::NotApproved => Self::NotApproved,
        }
    }
}
