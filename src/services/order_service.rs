use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::{
    dto::orders::{OrderWithItems, TrackOrderQuery},
    entity::{
        customer_order_items::{Column as OrderItemCol, Entity as CustomerOrderItems},
        customer_orders::{Column as OrderCol, Entity as CustomerOrders, Model as OrderModel},
        menu_items::Entity as MenuItems,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn items_for<C: ConnectionTrait>(
    db: &C,
    order: OrderModel,
) -> Result<OrderWithItems, DbErr> {
    let items = CustomerOrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .find_also_related(MenuItems)
        .all(db)
        .await?
        .into_iter()
        .map(|(item, menu_item)| OrderItem::from_entity(item, menu_item.map(|m| m.name)))
        .collect();

    Ok(OrderWithItems {
        order: Order::from(order),
        items,
    })
}

/// Case-insensitive lookup by the customer-facing order number.
pub async fn find_by_number(state: &AppState, order_number: &str) -> AppResult<OrderWithItems> {
    let normalized = order_number.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(AppError::NotFound("Order"));
    }

    let order = CustomerOrders::find()
        .filter(OrderCol::OrderNumber.eq(normalized))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    Ok(items_for(&state.orm, order).await?)
}

pub async fn order_confirmation(
    state: &AppState,
    order_number: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let data = find_by_number(state, order_number).await?;
    let message = format!("Order #{} confirmed", data.order.order_number);
    Ok(ApiResponse::success(message, data, Some(Meta::empty())))
}

pub async fn track_order(
    state: &AppState,
    query: TrackOrderQuery,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order_number = query
        .order_number
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("order_number is required"))?;

    let data = find_by_number(state, order_number).await?;
    let message = format!("Order is {}", data.order.status.label());
    Ok(ApiResponse::success(message, data, Some(Meta::empty())))
}
