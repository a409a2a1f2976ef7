use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod customers;
pub mod doc;
pub mod health;
pub mod menu;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(menu::router())
        .merge(cart::router())
        .merge(checkout::router())
        .merge(orders::router())
        .nest("/auth", auth::router())
        .nest("/customers", customers::router())
        .nest("/admin", admin::router())
}
