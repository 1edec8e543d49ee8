//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, civil::date};
use salvo::{affix_state::inject, prelude::*};
use storefront::{
    categories::NestedSetBounds,
    orders::{CommentStatus, OrderStatus},
};
use storefront_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartProduct, CartRecord, CartUuid},
        },
        categories::{
            MockCategoriesService,
            records::{CategoryRecord, CategoryUuid},
        },
        comments::{
            MockCommentsService,
            records::{CommentRecord, CommentUuid},
        },
        customers::{
            MockCustomersService,
            records::{CustomerRecord, CustomerUuid},
        },
        discounts::{
            MockDiscountsService,
            records::{DiscountRecord, DiscountUuid},
        },
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
    },
};

use crate::state::State;

/// One mock per service. Mocks without expectations fail the test when called.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) categories: MockCategoriesService,
    pub(crate) products: MockProductsService,
    pub(crate) comments: MockCommentsService,
    pub(crate) discounts: MockDiscountsService,
    pub(crate) carts: MockCartsService,
    pub(crate) customers: MockCustomersService,
    pub(crate) orders: MockOrdersService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            categories: Arc::new(self.categories),
            products: Arc::new(self.products),
            comments: Arc::new(self.comments),
            discounts: Arc::new(self.discounts),
            carts: Arc::new(self.carts),
            customers: Arc::new(self.customers),
            orders: Arc::new(self.orders),
        })
    }
}

pub(crate) fn service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

pub(crate) fn categories_service(categories: MockCategoriesService, route: Router) -> Service {
    service(
        Mocks {
            categories,
            ..Mocks::default()
        },
        route,
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    service(
        Mocks {
            products,
            ..Mocks::default()
        },
        route,
    )
}

pub(crate) fn comments_service(comments: MockCommentsService, route: Router) -> Service {
    service(
        Mocks {
            comments,
            ..Mocks::default()
        },
        route,
    )
}

pub(crate) fn discounts_service(discounts: MockDiscountsService, route: Router) -> Service {
    service(
        Mocks {
            discounts,
            ..Mocks::default()
        },
        route,
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    service(
        Mocks {
            carts,
            ..Mocks::default()
        },
        route,
    )
}

pub(crate) fn customers_service(customers: MockCustomersService, route: Router) -> Service {
    service(
        Mocks {
            customers,
            ..Mocks::default()
        },
        route,
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    service(
        Mocks {
            orders,
            ..Mocks::default()
        },
        route,
    )
}

pub(crate) fn make_category(
    uuid: CategoryUuid,
    title: &str,
    parent: Option<CategoryUuid>,
    bounds: NestedSetBounds,
) -> CategoryRecord {
    CategoryRecord {
        uuid,
        title: title.to_owned(),
        slug: title.to_lowercase(),
        description: String::new(),
        parent_uuid: parent,
        top_product_uuid: None,
        bounds,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn bounds(tree_id: u32, lft: u32, rgt: u32, level: u32) -> NestedSetBounds {
    NestedSetBounds {
        tree_id,
        lft,
        rgt,
        level,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Desk Lamp".to_owned(),
        slug: "desk-lamp".to_owned(),
        unit_price: 100,
        description: String::new(),
        short_description: String::new(),
        inventory: 10,
        is_active: true,
        cover: None,
        categories: Vec::new(),
        discounts: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_comment(uuid: CommentUuid, product: ProductUuid) -> CommentRecord {
    CommentRecord {
        uuid,
        product_uuid: product,
        name: "Sara".to_owned(),
        body: "Bright and sturdy".to_owned(),
        status: CommentStatus::Waiting,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_discount(uuid: DiscountUuid) -> DiscountRecord {
    DiscountRecord {
        uuid,
        discount: 15.0,
        description: "Winter sale".to_owned(),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart_item(uuid: CartItemUuid, quantity: u16) -> CartItemRecord {
    CartItemRecord {
        uuid,
        product: CartProduct {
            uuid: ProductUuid::new(),
            name: "Desk Lamp".to_owned(),
            slug: "desk-lamp".to_owned(),
            unit_price: 50,
            is_active: true,
        },
        quantity,
        unit_price: 50,
        subtotal: 50 * u64::from(quantity),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(uuid: CartUuid, items: Vec<CartItemRecord>) -> CartRecord {
    CartRecord {
        uuid,
        total: items.iter().map(|item| item.subtotal).sum(),
        items,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_customer(uuid: CustomerUuid) -> CustomerRecord {
    CustomerRecord {
        uuid,
        name: "Reza".to_owned(),
        phone_number: "+98 21 5555 0100".to_owned(),
        birth_date: Some(date(1990, 4, 12)),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, customer: CustomerUuid) -> OrderRecord {
    let item = OrderItemRecord {
        uuid: OrderItemUuid::new(),
        order_uuid: uuid,
        product_uuid: ProductUuid::new(),
        quantity: 5,
        unit_price: 50,
        subtotal: 250,
    };

    OrderRecord {
        uuid,
        customer_uuid: customer,
        status: OrderStatus::Unpaid,
        notes: None,
        items: vec![item],
        total: 250,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
