//! Comment Records

use jiff::Timestamp;
use storefront::orders::CommentStatus;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Comment UUID
pub type CommentUuid = TypedUuid<CommentRecord>;

/// Comment Record
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub uuid: CommentUuid,
    pub product_uuid: ProductUuid,

    /// Author name.
    pub name: String,
    pub body: String,
    pub status: CommentStatus,
    pub created_at: Timestamp,
}
