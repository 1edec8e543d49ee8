//! Catalog-to-checkout flow over the domain types

use storefront::prelude::*;
use testresult::TestResult;

#[test]
fn category_tree_drives_paths_and_slugs() -> TestResult {
    let mut tree = CategoryTree::new();

    tree.insert(1, "Men", None)?;
    tree.insert(2, "Shoes", Some(1))?;
    tree.insert(3, "Shirts", Some(1))?;
    tree.insert(4, "Women", None)?;

    let men = tree.bounds(1).ok_or("men has bounds")?;

    assert_eq!(men.descendant_count(), 2);
    assert!(tree.is_descendant_of(2, 1));
    assert!(!tree.is_descendant_of(2, 4));
    assert_eq!(
        tree.full_path(2, DEFAULT_PATH_SEPARATOR).as_deref(),
        Some("Men>Shoes")
    );

    tree.move_to(2, Some(4))?;

    assert_eq!(
        tree.full_path(2, DEFAULT_PATH_SEPARATOR).as_deref(),
        Some("Women>Shoes")
    );
    assert_eq!(tree.move_to(4, Some(2)), Err(TreeError::InvalidMove));

    let sibling_slugs = ["shoes", "shoes-1"];

    assert_eq!(assign_slug("Shoes", sibling_slugs)?, "shoes-2");
    assert_eq!(assign_slug("Shirts", sibling_slugs)?, "shirts");

    Ok(())
}

#[test]
fn cart_lines_become_an_order_total() -> TestResult {
    let mut cart = CartState::new();

    cart.add("lamp", 50, Quantity::new(2)?, AddMode::Increment)?;
    cart.add("lamp", 80, Quantity::new(3)?, AddMode::Increment)?;
    cart.add("desk", 300, Quantity::new(1)?, AddMode::Increment)?;

    let lamp = cart.get(&"lamp").copied().ok_or("lamp line")?;

    assert_eq!(lamp.quantity, 5);
    assert_eq!(lamp.unit_price, 50);
    assert_eq!(cart.total(|_| Some(())), 550);

    let status = OrderStatus::default().transition_to(OrderStatus::Paid)?;

    assert_eq!(status, OrderStatus::Paid);
    assert!(OrderStatus::Canceled.transition_to(OrderStatus::Paid).is_err());

    Ok(())
}

#[test]
fn search_filters_validate_input() -> TestResult {
    let page = Page::new(Some(2), None)?;

    assert_eq!(page.offset(), 3);
    assert_eq!(page.count(7), 3);
    assert!(PriceRange::new(Some(500), Some(100)).is_err());
    assert_eq!(normalize_query(Some("  lamp ")).as_deref(), Some("lamp"));

    Ok(())
}
