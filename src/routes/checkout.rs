use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
};

use crate::{
    dto::orders::{CheckoutPreview, CheckoutReceipt, CheckoutRequest},
    error::{AppError, AppResult},
    middleware::{
        identity::{Caller, session_headers},
        validate::ValidJson,
    },
    response::{ApiResponse, Meta},
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/checkout", get(checkout_form).post(place_order))
}

#[utoipa::path(
    get,
    path = "/api/checkout",
    params(
        ("x-session-token" = Option<String>, Header, description = "Anonymous cart session")
    ),
    responses(
        (status = 200, description = "Cart about to be checked out", body = ApiResponse<CheckoutPreview>),
        (status = 400, description = "Cart is empty"),
    ),
    tag = "Checkout"
)]
pub async fn checkout_form(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<CheckoutPreview>>> {
    let preview = checkout_service::preview(&state, caller.identity.as_ref()).await?;
    Ok(Json(ApiResponse::success("OK", preview, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    params(
        ("x-session-token" = Option<String>, Header, description = "Anonymous cart session")
    ),
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Cart is empty or required fields are missing"),
    ),
    tag = "Checkout"
)]
pub async fn place_order(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(payload): ValidJson<CheckoutRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<ApiResponse<CheckoutReceipt>>)> {
    let user_id = caller.user_id();
    let identity = caller.identity.ok_or(AppError::EmptyCart)?;
    let resp = checkout_service::checkout(&state, &identity, user_id, payload).await?;
    Ok((StatusCode::CREATED, session_headers(&identity), Json(resp)))
}
