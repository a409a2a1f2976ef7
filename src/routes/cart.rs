use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};

use crate::{
    dto::cart::{
        AddToCartRequest, CartActionResponse, CartSummary, CartView, RemoveFromCartRequest,
        UpdateCartItemRequest,
    },
    error::{AppError, AppResult},
    middleware::{
        identity::{Caller, session_headers},
        validate::ValidJson,
    },
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(view_cart))
        .route("/cart-info", get(cart_info))
        .route("/add-to-cart", post(add_to_cart))
        .route("/update-cart-item", post(update_cart_item))
        .route("/remove-from-cart", post(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-session-token" = Option<String>, Header, description = "Anonymous cart session")
    ),
    responses(
        (status = 200, description = "Cart lines with live totals", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let cart = cart_service::view_cart(&state, caller.identity.as_ref()).await?;
    Ok(Json(ApiResponse::success("OK", cart, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/cart-info",
    params(
        ("x-session-token" = Option<String>, Header, description = "Anonymous cart session")
    ),
    responses(
        (status = 200, description = "Cart totals; zero when there is no cart", body = CartSummary)
    ),
    tag = "Cart"
)]
pub async fn cart_info(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<CartSummary>> {
    let summary = cart_service::summary_for(&state, caller.identity.as_ref()).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/add-to-cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added; quantity accumulates for repeated adds", body = CartActionResponse),
        (status = 400, description = "Invalid quantity or payload"),
        (status = 404, description = "Menu item not found"),
        (status = 409, description = "Menu item not available"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(payload): ValidJson<AddToCartRequest>,
) -> AppResult<(HeaderMap, Json<CartActionResponse>)> {
    let identity = caller.identity_or_new_session();
    let resp = cart_service::add_item(&state, &identity, caller.user_id(), payload).await?;
    Ok((session_headers(&identity), Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/update-cart-item",
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity set; zero or less removes the item", body = CartActionResponse),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(payload): ValidJson<UpdateCartItemRequest>,
) -> AppResult<(HeaderMap, Json<CartActionResponse>)> {
    let user_id = caller.user_id();
    let identity = caller.identity.ok_or(AppError::NotFound("Cart item"))?;
    let resp = cart_service::update_item(&state, &identity, user_id, payload).await?;
    Ok((session_headers(&identity), Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/remove-from-cart",
    request_body = RemoveFromCartRequest,
    responses(
        (status = 200, description = "Item removed", body = CartActionResponse),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(payload): ValidJson<RemoveFromCartRequest>,
) -> AppResult<(HeaderMap, Json<CartActionResponse>)> {
    let user_id = caller.user_id();
    let identity = caller.identity.ok_or(AppError::NotFound("Cart item"))?;
    let resp = cart_service::remove_item(&state, &identity, user_id, payload).await?;
    Ok((session_headers(&identity), Json(resp)))
}
