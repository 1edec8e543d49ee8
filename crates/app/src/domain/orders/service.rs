//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use storefront::orders::{OrderStatus, notes_fit};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{
            records::CartUuid,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        customers::{records::CustomerUuid, repository::PgCustomersRepository},
        orders::{
            data::Checkout,
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    carts: PgCartsRepository,
    cart_items: PgCartItemsRepository,
    customers: PgCustomersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
            cart_items: PgCartItemsRepository::new(),
            customers: PgCustomersRepository::new(),
        }
    }
}

fn order_total(items: &[OrderItemRecord]) -> u64 {
    items
        .iter()
        .fold(0, |total, item| total.saturating_add(item.subtotal))
}

fn attach_items(orders: &mut [OrderRecord], items: Vec<OrderItemRecord>) {
    let mut by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

    for item in items {
        by_order.entry(item.order_uuid).or_default().push(item);
    }

    for order in orders {
        order.items = by_order.remove(&order.uuid).unwrap_or_default();
        order.total = order_total(&order.items);
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.checkout",
        skip(self, checkout),
        fields(
            cart_uuid = %cart,
            order_uuid = %checkout.uuid,
            customer_uuid = %checkout.customer_uuid
        ),
        err
    )]
    async fn checkout(
        &self,
        cart: CartUuid,
        checkout: Checkout,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if checkout.notes.as_deref().is_some_and(|notes| !notes_fit(notes)) {
            return Err(OrdersServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        self.carts
            .lock_cart(&mut tx, cart)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::CartNotFound,
                other => other.into(),
            })?;

        if !self
            .customers
            .customer_exists(&mut tx, checkout.customer_uuid)
            .await?
        {
            return Err(OrdersServiceError::CustomerNotFound);
        }

        let lines = self.cart_items.list_items(&mut tx, cart).await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let mut order = self.repository.create_order(&mut tx, &checkout).await?;

        let items: Vec<OrderItemRecord> = lines
            .iter()
            .map(|line| OrderItemRecord {
                uuid: OrderItemUuid::new(),
                order_uuid: order.uuid,
                product_uuid: line.product.uuid,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal,
            })
            .collect();

        self.repository
            .create_order_items(&mut tx, order.uuid, &items)
            .await?;

        self.cart_items.clear_items(&mut tx, cart).await?;
        self.carts.touch_cart(&mut tx, cart).await?;

        tx.commit().await?;

        order.total = order_total(&items);
        order.items = items;

        info!(
            order_uuid = %order.uuid,
            items = order.items.len(),
            total = order.total,
            "checked out cart"
        );

        Ok(order)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.repository.get_order(&mut tx, order).await?;

        let items = self
            .repository
            .list_order_items(&mut tx, &[order.uuid])
            .await?;

        tx.commit().await?;

        attach_items(std::slice::from_mut(&mut order), items);

        Ok(order)
    }

    async fn list_customer_orders(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.customers.customer_exists(&mut tx, customer).await? {
            return Err(OrdersServiceError::CustomerNotFound);
        }

        let mut orders = self
            .repository
            .list_customer_orders(&mut tx, customer)
            .await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let items = self.repository.list_order_items(&mut tx, &uuids).await?;

        tx.commit().await?;

        attach_items(&mut orders, items);

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self),
        fields(order_uuid = %order, status = %status),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, order).await?;

        let next = current.status.transition_to(status)?;

        let mut updated = self.repository.update_status(&mut tx, order, next).await?;

        let items = self
            .repository
            .list_order_items(&mut tx, &[order])
            .await?;

        tx.commit().await?;

        attach_items(std::slice::from_mut(&mut updated), items);

        info!(from = %current.status, to = %next, "order status changed");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn a cart into an unpaid order and empty the cart.
    async fn checkout(
        &self,
        cart: CartUuid,
        checkout: Checkout,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve an order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Orders of a customer, newest first.
    async fn list_customer_orders(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Move an order to another status.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
