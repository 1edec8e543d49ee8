//! Storefront prelude.
//!
//! Common types for code that drives the storefront domain.

pub use crate::{
    carts::{AddMode, CartError, CartLine, CartLineView, CartState, Quantity, QuantityError},
    categories::{CategorySeed, CategoryTree, DEFAULT_PATH_SEPARATOR, NestedSetBounds, TreeError},
    orders::{CommentStatus, OrderStatus, StatusTransitionError, UnknownStatusCode},
    search::{Page, PageError, PriceRange, PriceRangeError, normalize_query},
    slugs::{SlugError, assign_slug, is_valid_slug, slugify, unique_slug},
};
