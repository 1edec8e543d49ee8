//! Test Helpers

use crate::domain::products::{data::NewProduct, records::ProductUuid};

/// An active product with no relations and a derived slug.
pub(crate) fn new_product(name: &str, unit_price: u64) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        slug: None,
        unit_price,
        description: String::new(),
        short_description: String::new(),
        inventory: 10,
        is_active: true,
        cover: None,
        categories: Vec::new(),
        discounts: Vec::new(),
    }
}
