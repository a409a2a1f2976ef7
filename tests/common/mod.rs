#![allow(dead_code)]

use axum_restaurant_api::{
    db::{create_orm_conn, run_migrations},
    dto::{
        cart::AddToCartRequest,
        orders::CheckoutRequest,
    },
    entity::{
        categories::{self, ActiveModel as CategoryActive},
        customers::ActiveModel as CustomerActive,
        menu_items::{self, ActiveModel as MenuItemActive},
        sea_orm_active_enums::{CategoryType, OrderType},
    },
    middleware::{auth::AuthUser, identity::Identity},
    services::cart_service,
    state::AppState,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

pub async fn test_state() -> AppState {
    let orm = create_orm_conn("sqlite::memory:")
        .await
        .expect("connect to sqlite");
    run_migrations(&orm).await.expect("run migrations");
    AppState::new(orm, "test-secret", 24)
}

pub async fn seed_category(state: &AppState, name: &str) -> categories::Model {
    CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        category_type: Set(CategoryType::MainCourse),
        description: Set(None),
        display_order: Set(1),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await
    .expect("insert category")
}

pub async fn seed_menu_item(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: i64,
) -> menu_items::Model {
    let now = Utc::now();
    MenuItemActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        image: Set(None),
        is_available: Set(true),
        stock_quantity: Set(50),
        low_stock_threshold: Set(10),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .expect("insert menu item")
}

pub async fn set_price(state: &AppState, menu_item_id: Uuid, price: i64) {
    let item = menu_items::Entity::find_by_id(menu_item_id)
        .one(&state.orm)
        .await
        .expect("load menu item")
        .expect("menu item exists");
    let mut active: MenuItemActive = item.into();
    active.price = Set(price);
    active.update(&state.orm).await.expect("update price");
}

pub async fn set_available(state: &AppState, menu_item_id: Uuid, available: bool) {
    let item = menu_items::Entity::find_by_id(menu_item_id)
        .one(&state.orm)
        .await
        .expect("load menu item")
        .expect("menu item exists");
    let mut active: MenuItemActive = item.into();
    active.is_available = Set(available);
    active.update(&state.orm).await.expect("update availability");
}

pub fn session() -> Identity {
    Identity::new_session()
}

pub fn admin() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    }
}

pub fn regular_user() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: "user".into(),
    }
}

pub async fn add(state: &AppState, identity: &Identity, menu_item_id: Uuid, quantity: i32) {
    cart_service::add_item(
        state,
        identity,
        None,
        AddToCartRequest {
            menu_item_id,
            quantity,
        },
    )
    .await
    .expect("add to cart");
}

pub fn checkout_request(name: &str, email: &str) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: name.to_string(),
        customer_email: email.to_string(),
        customer_phone: "555-0100".to_string(),
        order_type: OrderType::DineIn,
        table_number: Some(4),
        ..Default::default()
    }
}

pub async fn set_stock(state: &AppState, menu_item_id: Uuid, stock: i32) {
    let item = menu_items::Entity::find_by_id(menu_item_id)
        .one(&state.orm)
        .await
        .expect("load menu item")
        .expect("menu item exists");
    let mut active: MenuItemActive = item.into();
    active.stock_quantity = Set(stock);
    active.update(&state.orm).await.expect("update stock");
}

/// A customer profile without a linked account.
pub async fn seed_customer(state: &AppState, email: &str) -> Uuid {
    let now = Utc::now();
    CustomerActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(None),
        name: Set("Guest Customer".into()),
        email: Set(email.to_string()),
        phone: Set("555-0142".into()),
        address: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .expect("insert customer")
    .id
}
