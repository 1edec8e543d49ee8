//! App Router

use salvo::Router;

use crate::{carts, categories, comments, customers, discounts, orders, products};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("categories")
                .get(categories::index::handler)
                .post(categories::create::handler)
                .push(Router::with_path("tree").get(categories::tree::handler))
                .push(
                    Router::with_path("{category}")
                        .get(categories::get::handler)
                        .put(categories::update::handler)
                        .delete(categories::delete::handler),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler)
                        .push(
                            Router::with_path("comments")
                                .get(comments::index::handler)
                                .post(comments::create::handler),
                        ),
                ),
        )
        .push(Router::with_path("comments/{comment}").patch(comments::update::handler))
        .push(
            Router::with_path("discounts")
                .get(discounts::index::handler)
                .post(discounts::create::handler)
                .push(Router::with_path("{discount}").get(discounts::get::handler)),
        )
        .push(
            Router::with_path("carts")
                .post(carts::create::handler)
                .push(
                    Router::with_path("{cart}")
                        .get(carts::get::handler)
                        .delete(carts::delete::handler)
                        .push(Router::with_path("checkout").post(orders::checkout::handler))
                        .push(
                            Router::with_path("items")
                                .get(carts::items::index::handler)
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .get(carts::items::get::handler)
                                        .patch(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                ),
        )
        .push(
            Router::with_path("customers")
                .post(customers::create::handler)
                .push(
                    Router::with_path("{customer}")
                        .get(customers::get::handler)
                        .push(Router::with_path("orders").get(orders::index::handler)),
                ),
        )
        .push(
            Router::with_path("orders/{order}")
                .get(orders::get::handler)
                .patch(orders::update::handler),
        )
}
