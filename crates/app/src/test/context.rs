//! Test context for service-level integration tests.

use crate::{
    database::Db,
    domain::{
        carts::PgCartsService, categories::PgCategoriesService, comments::PgCommentsService,
        customers::PgCustomersService, discounts::PgDiscountsService, orders::PgOrdersService,
        products::PgProductsService,
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub categories: PgCategoriesService,
    pub products: PgProductsService,
    pub comments: PgCommentsService,
    pub discounts: PgDiscountsService,
    pub carts: PgCartsService,
    pub customers: PgCustomersService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            categories: PgCategoriesService::new(db.clone()),
            products: PgProductsService::new(db.clone()),
            comments: PgCommentsService::new(db.clone()),
            discounts: PgDiscountsService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            customers: PgCustomersService::new(db.clone()),
            orders: PgOrdersService::new(db),
            db: test_db,
        }
    }
}
