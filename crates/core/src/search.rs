//! Product search filters

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Products per page when the request does not say.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Invalid price bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceRangeError {
    /// The lower bound is above the upper bound.
    #[error("min_price {min} is greater than max_price {max}")]
    Inverted {
        /// Lower bound.
        min: u64,

        /// Upper bound.
        max: u64,
    },
}

/// Invalid pagination.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// Pages are numbered from 1.
    #[error("page numbers start at 1")]
    ZeroPage,

    /// Page size outside `1..=100`.
    #[error("page size {0} is outside 1..=100")]
    Size(u32),
}

/// Inclusive unit price bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    min: Option<u64>,
    max: Option<u64>,
}

impl PriceRange {
    /// Validate price bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PriceRangeError::Inverted`] when both bounds are set and `min > max`.
    pub fn new(min: Option<u64>, max: Option<u64>) -> Result<Self, PriceRangeError> {
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(PriceRangeError::Inverted { min, max });
        }

        Ok(Self { min, max })
    }

    /// Lower bound.
    pub fn min(&self) -> Option<u64> {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> Option<u64> {
        self.max
    }

    /// Whether `price` lies within the bounds.
    pub fn contains(&self, price: u64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// A 1-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Validate a page request, filling in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for page zero or a size outside `1..=100`.
    pub fn new(number: Option<u32>, size: Option<u32>) -> Result<Self, PageError> {
        let number = number.unwrap_or(1);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);

        if number == 0 {
            return Err(PageError::ZeroPage);
        }

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(PageError::Size(size));
        }

        Ok(Self { number, size })
    }

    /// Page number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Items per page.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Items to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    /// Number of pages needed for `total` items.
    pub fn count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size)).max(1)
    }
}

/// Trim a free-text query; blank queries match everything.
pub fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|query| !query.is_empty())
        .map(str::to_owned)
}
