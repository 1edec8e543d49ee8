//! Carts
//!
//! Cart contents as an explicit value: callers load a [`CartState`], mutate it and persist
//! the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest quantity a single add request may carry.
pub const MIN_REQUESTED_QUANTITY: u16 = 1;

/// Largest quantity a single add request may carry.
pub const MAX_REQUESTED_QUANTITY: u16 = 30;

/// Largest quantity one cart line can hold.
pub const MAX_LINE_QUANTITY: u16 = 32_767;

/// Requested quantity outside the accepted range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("quantity {0} is outside 1..=30")]
pub struct QuantityError(pub i64);

/// Errors raised while changing cart lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The line would exceed [`MAX_LINE_QUANTITY`].
    #[error("line quantity {requested} exceeds the limit of 32767")]
    LineQuantityExceeded {
        /// Quantity the line would have had.
        requested: u32,
    },
}

/// A validated quantity for one add-to-cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct Quantity(u16);

impl Quantity {
    /// Validate a requested quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] unless `value` is within `1..=30`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        u16::try_from(value)
            .ok()
            .filter(|value| (MIN_REQUESTED_QUANTITY..=MAX_REQUESTED_QUANTITY).contains(value))
            .map(Self)
            .ok_or(QuantityError(value))
    }

    /// Quantity as a number.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u16 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

/// How an add request combines with an existing line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddMode {
    /// Add to the existing quantity.
    #[default]
    Increment,

    /// Overwrite the existing quantity.
    Replace,
}

impl AddMode {
    /// Mode for the `replace` flag of an add request.
    pub fn from_replace(replace: bool) -> Self {
        if replace { Self::Replace } else { Self::Increment }
    }
}

/// One product line: quantity and the unit price captured when the line was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Units in the cart.
    pub quantity: u16,

    /// Unit price in minor units.
    pub unit_price: u64,
}

impl CartLine {
    /// Quantity times unit price.
    pub fn subtotal(&self) -> u64 {
        u64::from(self.quantity).saturating_mul(self.unit_price)
    }
}

/// A cart line joined with its live product.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView<'a, K, P> {
    /// Product key.
    pub key: &'a K,

    /// Live product returned by the lookup.
    pub product: P,

    /// Units in the cart.
    pub quantity: u16,

    /// Unit price captured for the line.
    pub unit_price: u64,

    /// Quantity times unit price.
    pub subtotal: u64,
}

/// Cart contents keyed by product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState<K: Ord> {
    lines: BTreeMap<K, CartLine>,
}

impl<K: Ord> Default for CartState<K> {
    fn default() -> Self {
        Self {
            lines: BTreeMap::new(),
        }
    }
}

impl<K: Ord> FromIterator<(K, CartLine)> for CartState<K> {
    fn from_iter<T: IntoIterator<Item = (K, CartLine)>>(iter: T) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl<K: Ord> CartState<K> {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// A new line captures `unit_price`; an existing line keeps its price and combines
    /// quantities according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineQuantityExceeded`] when the line would exceed
    /// [`MAX_LINE_QUANTITY`]. The cart is left unchanged.
    pub fn add(
        &mut self,
        product: K,
        unit_price: u64,
        quantity: Quantity,
        mode: AddMode,
    ) -> Result<CartLine, CartError> {
        let current = self.lines.get(&product).copied();

        let requested = match (current, mode) {
            (Some(line), AddMode::Increment) => u32::from(line.quantity) + u32::from(quantity.get()),
            _ => u32::from(quantity.get()),
        };

        let quantity = u16::try_from(requested)
            .ok()
            .filter(|quantity| *quantity <= MAX_LINE_QUANTITY)
            .ok_or(CartError::LineQuantityExceeded { requested })?;

        let line = CartLine {
            quantity,
            unit_price: current.map_or(unit_price, |line| line.unit_price),
        };

        self.lines.insert(product, line);

        Ok(line)
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product: &K) -> bool {
        self.lines.remove(product).is_some()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line for a product.
    pub fn get(&self, product: &K) -> Option<&CartLine> {
        self.lines.get(product)
    }

    /// Quantity held for a product, zero when absent.
    pub fn quantity_of(&self, product: &K) -> u16 {
        self.lines.get(product).map_or(0, |line| line.quantity)
    }

    /// Raw lines in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &CartLine)> {
        self.lines.iter()
    }

    /// Lines joined with live products.
    ///
    /// Lines whose product no longer resolves are skipped. Each call looks products up again.
    pub fn lines<'a, P, F>(&'a self, mut lookup: F) -> impl Iterator<Item = CartLineView<'a, K, P>>
    where
        F: FnMut(&K) -> Option<P>,
    {
        self.lines.iter().filter_map(move |(key, line)| {
            lookup(key).map(|product| CartLineView {
                key,
                product,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal(),
            })
        })
    }

    /// Sum of subtotals over lines whose product still resolves.
    pub fn total<P, F>(&self, lookup: F) -> u64
    where
        F: FnMut(&K) -> Option<P>,
    {
        self.lines(lookup)
            .fold(0, |total, line| total.saturating_add(line.subtotal))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use testresult::TestResult;

    use super::*;

    fn qty(value: i64) -> Result<Quantity, QuantityError> {
        Quantity::new(value)
    }

    #[test]
    fn quantity_accepts_form_range() {
        assert!(Quantity::new(1).is_ok(), "1 is the smallest choice");
        assert!(Quantity::new(30).is_ok(), "30 is the largest choice");
        assert_eq!(Quantity::new(0), Err(QuantityError(0)));
        assert_eq!(Quantity::new(31), Err(QuantityError(31)));
        assert_eq!(Quantity::new(-4), Err(QuantityError(-4)));
    }

    #[test]
    fn increment_then_total() -> TestResult {
        let mut cart = CartState::new();

        cart.add("p", 50, qty(2)?, AddMode::Increment)?;
        cart.add("p", 50, qty(3)?, AddMode::Increment)?;

        let lines: Vec<_> = cart.lines(|key| Some(*key)).collect();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|line| line.quantity), Some(5));
        assert_eq!(lines.first().map(|line| line.subtotal), Some(250));
        assert_eq!(cart.total(|key| Some(*key)), 250);

        Ok(())
    }

    #[test]
    fn replace_overwrites_quantity() -> TestResult {
        let mut cart = CartState::new();

        cart.add("p", 50, qty(7)?, AddMode::Increment)?;
        cart.add("p", 50, qty(2)?, AddMode::Replace)?;

        assert_eq!(cart.quantity_of(&"p"), 2);

        Ok(())
    }

    #[test]
    fn existing_line_keeps_captured_price() -> TestResult {
        let mut cart = CartState::new();

        cart.add("p", 50, qty(1)?, AddMode::Increment)?;
        let line = cart.add("p", 80, qty(1)?, AddMode::Increment)?;

        assert_eq!(line.unit_price, 50);
        assert_eq!(line.subtotal(), 100);

        Ok(())
    }

    #[test]
    fn overflowing_line_is_rejected_without_change() -> TestResult {
        let mut cart: CartState<&str> = [(
            "p",
            CartLine {
                quantity: MAX_LINE_QUANTITY - 1,
                unit_price: 10,
            },
        )]
        .into_iter()
        .collect();

        let before = cart.clone();
        let result = cart.add("p", 10, qty(5)?, AddMode::Increment);

        assert_eq!(
            result,
            Err(CartError::LineQuantityExceeded {
                requested: u32::from(MAX_LINE_QUANTITY) + 4
            })
        );
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn remove_absent_product_is_a_no_op() -> TestResult {
        let mut cart = CartState::new();

        cart.add("p", 50, qty(1)?, AddMode::Increment)?;

        let before = cart.clone();

        assert!(!cart.remove(&"missing"), "nothing should be removed");
        assert_eq!(cart, before);
        assert!(cart.remove(&"p"), "line should be removed");
        assert!(cart.is_empty(), "cart should be empty");

        Ok(())
    }

    #[test]
    fn lines_skip_unresolved_products() -> TestResult {
        let mut cart = CartState::new();

        cart.add("kept", 10, qty(1)?, AddMode::Increment)?;
        cart.add("gone", 99, qty(3)?, AddMode::Increment)?;

        let lookup = |key: &&'static str| (*key != "gone").then_some(*key);
        let products: Vec<&str> = cart.lines(lookup).map(|line| line.product).collect();

        assert_eq!(products, vec!["kept"]);
        assert_eq!(cart.total(lookup), 10);
        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn serializes_as_map_keyed_by_product() -> TestResult {
        let mut cart = CartState::new();

        cart.add("42".to_string(), 50, qty(2)?, AddMode::Increment)?;

        let json = serde_json::to_value(&cart)?;

        assert_eq!(
            json,
            serde_json::json!({ "42": { "quantity": 2, "unit_price": 50 } })
        );

        let restored: CartState<String> = serde_json::from_value(json)?;

        assert_eq!(restored, cart);

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = CartState::new();

        cart.add(1_u32, 10, qty(1)?, AddMode::Increment)?;
        cart.add(2_u32, 10, qty(1)?, AddMode::Increment)?;
        cart.clear();

        assert!(cart.is_empty(), "cart should be empty after clear");
        assert_eq!(cart.total(|key| Some(*key)), 0);

        Ok(())
    }

    proptest! {
        #[test]
        fn add_mode_arithmetic(first in 1_i64..=30, second in 1_i64..=30, replace in any::<bool>()) {
            let mut cart = CartState::new();

            let first = Quantity::new(first);
            let second = Quantity::new(second);

            prop_assert!(first.is_ok() && second.is_ok());

            let (Ok(first), Ok(second)) = (first, second) else {
                return Ok(());
            };

            prop_assert!(cart.add(7_u8, 5, first, AddMode::Increment).is_ok());
            prop_assert!(cart.add(7_u8, 5, second, AddMode::from_replace(replace)).is_ok());

            let expected = if replace { second.get() } else { first.get() + second.get() };

            prop_assert_eq!(cart.quantity_of(&7), expected);
            prop_assert_eq!(cart.total(|key| Some(*key)), u64::from(expected) * 5);
        }
    }
}
