use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::menu::MenuPage,
    error::AppResult,
    middleware::identity::Caller,
    response::{ApiResponse, Meta},
    services::{cart_service, catalog_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/menu", get(menu))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    params(
        ("x-session-token" = Option<String>, Header, description = "Anonymous cart session")
    ),
    responses(
        (status = 200, description = "Menu grouped by category with the current cart summary", body = ApiResponse<MenuPage>)
    ),
    tag = "Menu"
)]
pub async fn menu(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<MenuPage>>> {
    let sections = catalog_service::menu_sections(&state).await?;
    let cart = cart_service::summary_for(&state, caller.identity.as_ref()).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        MenuPage { sections, cart },
        Some(Meta::empty()),
    )))
}
