//! Customer Records

use jiff::{Timestamp, civil::Date};

use crate::uuids::TypedUuid;

/// Customer UUID
pub type CustomerUuid = TypedUuid<CustomerRecord>;

/// Customer Record
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub uuid: CustomerUuid,
    pub name: String,
    pub phone_number: String,
    pub birth_date: Option<Date>,
    pub created_at: Timestamp,
}
