//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use storefront::carts::{AddMode, CartLine, CartState, Quantity};
use tracing::{Span, debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{NewCart, NewCartItem},
            errors::CartsServiceError,
            records::{CartItemRecord, CartItemUuid, CartProduct, CartRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }
}

/// Stored lines as a cart state keyed by product.
fn cart_state(items: &[CartItemRecord]) -> CartState<ProductUuid> {
    items
        .iter()
        .map(|item| {
            (
                item.product.uuid,
                CartLine {
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                },
            )
        })
        .collect()
}

fn cart_total(items: &[CartItemRecord]) -> u64 {
    let products: FxHashMap<ProductUuid, &CartProduct> = items
        .iter()
        .map(|item| (item.product.uuid, &item.product))
        .collect();

    cart_state(items).total(|product| products.get(product).copied())
}

fn item_error(error: sqlx::Error) -> CartsServiceError {
    match error {
        sqlx::Error::RowNotFound => CartsServiceError::ItemNotFound,
        other => other.into(),
    }
}

fn line_write_error(error: sqlx::Error) -> CartsServiceError {
    match CartsServiceError::from(error) {
        CartsServiceError::AlreadyExists => CartsServiceError::ItemAlreadyExists,
        other => other,
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(cart_uuid = %cart),
        err
    )]
    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut record = self.carts_repository.get_cart(&mut tx, cart).await?;

        let items = self.items_repository.list_items(&mut tx, cart).await?;

        tx.commit().await?;

        record.total = cart_total(&items);
        record.items = items;

        Ok(record)
    }

    #[tracing::instrument(
        name = "carts.service.create_cart",
        skip(self, cart),
        fields(cart_uuid = %cart.uuid),
        err
    )]
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .carts_repository
            .create_cart(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "carts.service.delete_cart",
        skip(self),
        fields(cart_uuid = %cart),
        err
    )]
    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.carts_repository.delete_cart(&mut tx, cart).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.list_items",
        skip(self),
        fields(cart_uuid = %cart),
        err
    )]
    async fn list_items(&self, cart: CartUuid) -> Result<Vec<CartItemRecord>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.get_cart(&mut tx, cart).await?;

        let items = self.items_repository.list_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(items)
    }

    #[tracing::instrument(
        name = "carts.service.get_item",
        skip(self),
        fields(cart_uuid = %cart, item_uuid = %item),
        err
    )]
    async fn get_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<CartItemRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.get_cart(&mut tx, cart).await?;

        let item = self
            .items_repository
            .get_item(&mut tx, cart, item)
            .await
            .map_err(item_error)?;

        tx.commit().await?;

        Ok(item)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            cart_uuid = %cart,
            product_uuid = %item.product_uuid,
            quantity = item.quantity.get(),
            mode = ?item.mode,
            line_quantity = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.lock_cart(&mut tx, cart).await?;

        let product = match self
            .products_repository
            .get_product(&mut tx, item.product_uuid)
            .await
        {
            Ok(product) if product.is_active => product,
            Ok(_) | Err(sqlx::Error::RowNotFound) => {
                return Err(CartsServiceError::ProductNotFound);
            }
            Err(error) => return Err(error.into()),
        };

        let items = self.items_repository.list_items(&mut tx, cart).await?;

        let line = cart_state(&items).add(
            product.uuid,
            product.unit_price,
            item.quantity,
            item.mode,
        )?;

        let stored = self
            .items_repository
            .upsert_item(&mut tx, cart, item.uuid, product.uuid, line)
            .await
            .map_err(line_write_error)?;

        self.carts_repository.touch_cart(&mut tx, cart).await?;

        let added = self.items_repository.get_item(&mut tx, cart, stored).await?;

        tx.commit().await?;

        Span::current().record("line_quantity", added.quantity);

        debug!(item_uuid = %added.uuid, subtotal = added.subtotal, "cart line written");

        Ok(added)
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self),
        fields(cart_uuid = %cart, item_uuid = %item, quantity = quantity.get()),
        err
    )]
    async fn update_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: Quantity,
    ) -> Result<CartItemRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.lock_cart(&mut tx, cart).await?;

        let current = self
            .items_repository
            .get_item(&mut tx, cart, item)
            .await
            .map_err(item_error)?;

        let items = self.items_repository.list_items(&mut tx, cart).await?;

        let line = cart_state(&items).add(
            current.product.uuid,
            current.unit_price,
            quantity,
            AddMode::Replace,
        )?;

        self.items_repository
            .update_quantity(&mut tx, cart, item, line.quantity)
            .await?;

        self.carts_repository.touch_cart(&mut tx, cart).await?;

        let updated = self.items_repository.get_item(&mut tx, cart, item).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(cart_uuid = %cart, item_uuid = %item),
        err
    )]
    async fn remove_item(&self, cart: CartUuid, item: CartItemUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.lock_cart(&mut tx, cart).await?;

        let rows_affected = self
            .items_repository
            .delete_item(&mut tx, cart, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        self.carts_repository.touch_cart(&mut tx, cart).await?;

        tx.commit().await?;

        info!("removed cart line");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a cart with its lines and total.
    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;

    /// Creates a new, empty cart.
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError>;

    /// Deletes a cart and its lines.
    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError>;

    /// Lines of a cart, oldest first.
    async fn list_items(&self, cart: CartUuid) -> Result<Vec<CartItemRecord>, CartsServiceError>;

    /// Retrieve a single cart line.
    async fn get_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Add an active product to the cart, merging with or replacing an existing line.
    async fn add_item(
        &self,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Set the quantity of an existing line.
    async fn update_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: Quantity,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Remove a line from the cart.
    async fn remove_item(&self, cart: CartUuid, item: CartItemUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::{
            ProductsService,
            data::{NewProduct, ProductUpdate},
            records::ProductRecord,
        },
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    async fn new_cart(ctx: &TestContext) -> Result<CartUuid, CartsServiceError> {
        let uuid = CartUuid::new();

        ctx.carts.create_cart(NewCart { uuid }).await?;

        Ok(uuid)
    }

    fn add(product: ProductUuid, quantity: i64, mode: AddMode) -> TestResult<NewCartItem> {
        Ok(NewCartItem {
            uuid: CartItemUuid::new(),
            product_uuid: product,
            quantity: Quantity::new(quantity)?,
            mode,
        })
    }

    fn reprice(product: &ProductRecord, unit_price: u64) -> ProductUpdate {
        ProductUpdate {
            name: product.name.clone(),
            slug: None,
            unit_price,
            description: product.description.clone(),
            short_description: product.short_description.clone(),
            inventory: product.inventory,
            is_active: product.is_active,
            cover: product.cover.clone(),
            categories: product.categories.clone(),
            discounts: product.discounts.clone(),
        }
    }

    #[tokio::test]
    async fn create_cart_starts_empty() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = new_cart(&ctx).await?;

        let cart = ctx.carts.get_cart(uuid).await?;

        assert_eq!(cart.uuid, uuid);
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn create_cart_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = new_cart(&ctx).await?;

        let result = ctx.carts.create_cart(NewCart { uuid }).await;

        assert!(
            matches!(result, Err(CartsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_twice_merges_quantities() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let product = ctx.products.create_product(new_product("Pen", 50)).await?;

        let first = ctx
            .carts
            .add_item(cart, add(product.uuid, 2, AddMode::Increment)?)
            .await?;
        let merged = ctx
            .carts
            .add_item(cart, add(product.uuid, 3, AddMode::Increment)?)
            .await?;

        assert_eq!(merged.uuid, first.uuid, "one line per product");
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.subtotal, 250);

        let cart = ctx.carts.get_cart(cart).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, 250);

        Ok(())
    }

    #[tokio::test]
    async fn reused_line_uuid_for_another_product_is_a_line_conflict() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let pen = ctx.products.create_product(new_product("Pen", 50)).await?;
        let ink = ctx.products.create_product(new_product("Ink", 30)).await?;

        let line = ctx
            .carts
            .add_item(cart, add(pen.uuid, 1, AddMode::Increment)?)
            .await?;

        let result = ctx
            .carts
            .add_item(
                cart,
                NewCartItem {
                    uuid: line.uuid,
                    ..add(ink.uuid, 1, AddMode::Increment)?
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemAlreadyExists)),
            "expected ItemAlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn replace_mode_overwrites_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let product = ctx.products.create_product(new_product("Pen", 50)).await?;

        ctx.carts
            .add_item(cart, add(product.uuid, 4, AddMode::Increment)?)
            .await?;
        let replaced = ctx
            .carts
            .add_item(cart, add(product.uuid, 1, AddMode::Replace)?)
            .await?;

        assert_eq!(replaced.quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn line_keeps_price_captured_on_first_add() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let product = ctx.products.create_product(new_product("Pen", 50)).await?;

        ctx.carts
            .add_item(cart, add(product.uuid, 1, AddMode::Increment)?)
            .await?;

        ctx.products
            .update_product(product.uuid, reprice(&product, 80))
            .await?;

        let line = ctx
            .carts
            .add_item(cart, add(product.uuid, 1, AddMode::Increment)?)
            .await?;

        assert_eq!(line.unit_price, 50);
        assert_eq!(line.product.unit_price, 80);
        assert_eq!(line.subtotal, 100);

        Ok(())
    }

    #[tokio::test]
    async fn totals_sum_every_line() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let pen = ctx.products.create_product(new_product("Pen", 50)).await?;
        let ink = ctx.products.create_product(new_product("Ink", 120)).await?;

        ctx.carts
            .add_item(cart, add(pen.uuid, 2, AddMode::Increment)?)
            .await?;
        ctx.carts
            .add_item(cart, add(ink.uuid, 3, AddMode::Increment)?)
            .await?;

        let cart = ctx.carts.get_cart(cart).await?;

        assert_eq!(cart.total, 2 * 50 + 3 * 120);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_sets_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let product = ctx.products.create_product(new_product("Pen", 50)).await?;

        let line = ctx
            .carts
            .add_item(cart, add(product.uuid, 2, AddMode::Increment)?)
            .await?;

        let updated = ctx
            .carts
            .update_item(cart, line.uuid, Quantity::new(7)?)
            .await?;

        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.subtotal, 350);

        Ok(())
    }

    #[tokio::test]
    async fn removing_unknown_line_leaves_cart_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let product = ctx.products.create_product(new_product("Pen", 50)).await?;

        ctx.carts
            .add_item(cart, add(product.uuid, 2, AddMode::Increment)?)
            .await?;

        let result = ctx.carts.remove_item(cart, CartItemUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
        assert_eq!(ctx.carts.list_items(cart).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_deletes_the_line() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let product = ctx.products.create_product(new_product("Pen", 50)).await?;

        let line = ctx
            .carts
            .add_item(cart, add(product.uuid, 2, AddMode::Increment)?)
            .await?;

        ctx.carts.remove_item(cart, line.uuid).await?;

        let result = ctx.carts.get_item(cart, line.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn inactive_products_cannot_be_added() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;
        let product = ctx
            .products
            .create_product(NewProduct {
                is_active: false,
                ..new_product("Retired", 10)
            })
            .await?;

        let result = ctx
            .carts
            .add_item(cart, add(product.uuid, 1, AddMode::Increment)?)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_to_unknown_cart_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product("Pen", 50)).await?;

        let result = ctx
            .carts
            .add_item(CartUuid::new(), add(product.uuid, 1, AddMode::Increment)?)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_cart_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = new_cart(&ctx).await?;

        ctx.carts.delete_cart(uuid).await?;

        let result = ctx.carts.get_cart(uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }
}
