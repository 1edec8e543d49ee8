//! Customer Data

use jiff::civil::Date;

use crate::domain::customers::records::CustomerUuid;

/// New Customer Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub uuid: CustomerUuid,
    pub name: String,
    pub phone_number: String,
    pub birth_date: Option<Date>,
}
