use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{self, Actor},
    dto::orders::{
        OrderList, OrderListQuery, OrderWithItems, UpdateOrderStatusRequest,
        UpdatePaymentStatusRequest,
    },
    entity::{
        customer_orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as CustomerOrders},
        sea_orm_active_enums::{OrderStatus, PaymentStatus},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

const LIKE_ESCAPE: char = '!';

/// `%term%` with LIKE wildcards in the term escaped by `!`.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn lower_contains(column: OrderCol, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((CustomerOrders, column))))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    if let Some(order_type) = query.order_type {
        condition = condition.add(OrderCol::OrderType.eq(order_type));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(&search.to_lowercase());
        condition = condition.add(
            Condition::any()
                .add(lower_contains(OrderCol::OrderNumber, &pattern))
                .add(lower_contains(OrderCol::CustomerName, &pattern))
                .add(lower_contains(OrderCol::CustomerEmail, &pattern)),
        );
    }

    let finder = CustomerOrders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = CustomerOrders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let data = order_service::items_for(&state.orm, order).await?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

pub fn parse_order_status(raw: &str) -> AppResult<OrderStatus> {
    OrderStatus::try_from_value(&raw.trim().to_string())
        .map_err(|_| AppError::validation("Invalid status"))
}

pub fn parse_payment_status(raw: &str) -> AppResult<PaymentStatus> {
    PaymentStatus::try_from_value(&raw.trim().to_string())
        .map_err(|_| AppError::validation("Invalid payment status"))
}

/// Any recognized status may be set; the order is untouched otherwise.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status = parse_order_status(&payload.status)?;

    let existing = CustomerOrders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    let previous = existing.status;

    let mut active: OrderActive = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(
        order_number = %order.order_number,
        from = ?previous,
        to = ?order.status,
        "order status updated"
    );

    audit::record(
        state,
        Actor {
            user_id: Some(user.user_id),
            session_key: None,
        },
        "order_status_update",
        "customer_orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    let message = format!(
        "Order #{} status updated to {}",
        order.order_number,
        order.status.label()
    );
    Ok(ApiResponse::success(
        message,
        Order::from(order),
        Some(Meta::empty()),
    ))
}

pub async fn update_payment_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let payment_status = parse_payment_status(&payload.payment_status)?;

    let existing = CustomerOrders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let mut active: OrderActive = existing.into();
    active.payment_status = Set(payment_status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(
        order_number = %order.order_number,
        payment_status = ?order.payment_status,
        "payment status updated"
    );

    audit::record(
        state,
        Actor {
            user_id: Some(user.user_id),
            session_key: None,
        },
        "order_payment_update",
        "customer_orders",
        serde_json::json!({ "order_id": order.id, "payment_status": order.payment_status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment status updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}
