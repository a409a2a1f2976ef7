use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::orders::{OrderWithItems, TrackOrderQuery},
    error::AppResult,
    middleware::validate::ValidQuery,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order-confirmation/{order_number}", get(order_confirmation))
        .route("/track-order", get(track_order))
}

#[utoipa::path(
    get,
    path = "/api/order-confirmation/{order_number}",
    params(
        ("order_number" = String, Path, description = "Six character order number")
    ),
    responses(
        (status = 200, description = "Placed order with its items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn order_confirmation(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::order_confirmation(&state, &order_number).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/track-order",
    params(
        ("order_number" = String, Query, description = "Order number, any letter case")
    ),
    responses(
        (status = 200, description = "Order status and items", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "order_number missing"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn track_order(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<TrackOrderQuery>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::track_order(&state, query).await?;
    Ok(Json(resp))
}
