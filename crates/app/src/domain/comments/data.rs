//! Comment Data

use crate::domain::{comments::records::CommentUuid, products::records::ProductUuid};

/// New Comment Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub uuid: CommentUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub body: String,
}
