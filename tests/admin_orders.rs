mod common;

use axum_restaurant_api::{
    dto::orders::{
        CheckoutRequest, OrderListQuery, UpdateOrderStatusRequest, UpdatePaymentStatusRequest,
    },
    entity::sea_orm_active_enums::{OrderStatus, OrderType, PaymentStatus},
    error::AppError,
    routes::params::Pagination,
    services::{admin_service, catalog_service, checkout_service, order_service},
    state::AppState,
};
use uuid::Uuid;

async fn place_order(state: &AppState, request: CheckoutRequest) -> (Uuid, String) {
    let category = common::seed_category(state, &format!("Cat {}", Uuid::new_v4())).await;
    let item = common::seed_menu_item(state, category.id, "Noodles", 1000).await;
    let guest = common::session();
    common::add(state, &guest, item.id, 1).await;
    let receipt = checkout_service::checkout(state, &guest, None, request)
        .await
        .expect("checkout")
        .data
        .expect("receipt");
    (receipt.order.order.id, receipt.order_number)
}

#[tokio::test]
async fn invalid_status_is_rejected_and_order_unchanged() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let (id, number) = place_order(&state, common::checkout_request("Ada", "ada@example.com")).await;
    let admin = common::admin();

    let err = admin_service::update_order_status(
        &state,
        &admin,
        id,
        UpdateOrderStatusRequest {
            status: "teleported".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "Invalid status"));

    let stored = order_service::find_by_number(&state, &number).await?;
    assert_eq!(stored.order.status, OrderStatus::Confirmed);

    let resp = admin_service::update_order_status(
        &state,
        &admin,
        id,
        UpdateOrderStatusRequest {
            status: "preparing".into(),
        },
    )
    .await?;
    assert_eq!(resp.data.expect("order").status, OrderStatus::Preparing);

    let stored = order_service::find_by_number(&state, &number).await?;
    assert_eq!(stored.order.status, OrderStatus::Preparing);
    Ok(())
}

#[tokio::test]
async fn payment_status_can_be_updated() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let (id, _) = place_order(&state, common::checkout_request("Ada", "ada@example.com")).await;
    let admin = common::admin();

    let resp = admin_service::update_payment_status(
        &state,
        &admin,
        id,
        UpdatePaymentStatusRequest {
            payment_status: "paid".into(),
        },
    )
    .await?;
    assert_eq!(resp.data.expect("order").payment_status, PaymentStatus::Paid);

    let err = admin_service::update_payment_status(
        &state,
        &admin,
        id,
        UpdatePaymentStatusRequest {
            payment_status: "maybe".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = admin_service::update_payment_status(
        &state,
        &admin,
        Uuid::new_v4(),
        UpdatePaymentStatusRequest {
            payment_status: "paid".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Order")));
    Ok(())
}

#[tokio::test]
async fn search_matches_email_substring_ignoring_case() -> anyhow::Result<()> {
    let state = common::test_state().await;
    place_order(&state, common::checkout_request("Ada", "Ada.Lovelace@Example.com")).await;
    place_order(&state, common::checkout_request("Grace", "grace@navy.mil")).await;
    let admin = common::admin();

    let resp = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            search: Some("LOVELACE@example".into()),
            ..Default::default()
        },
    )
    .await?;
    let orders = resp.data.expect("orders").items;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_name, "Ada");
    assert_eq!(resp.meta.expect("meta").total, Some(1));

    let resp = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            search: Some("grace".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(resp.data.expect("orders").items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn search_treats_wildcards_literally() -> anyhow::Result<()> {
    let state = common::test_state().await;
    place_order(&state, common::checkout_request("Ada", "ada@example.com")).await;
    let admin = common::admin();

    let resp = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            search: Some("%".into()),
            ..Default::default()
        },
    )
    .await?;
    assert!(resp.data.expect("orders").items.is_empty());
    Ok(())
}

#[tokio::test]
async fn filters_and_newest_first_ordering() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let (first_id, _) =
        place_order(&state, common::checkout_request("Ada", "ada@example.com")).await;
    let (takeaway_id, _) = place_order(
        &state,
        CheckoutRequest {
            order_type: OrderType::Takeaway,
            table_number: None,
            ..common::checkout_request("Grace", "grace@example.com")
        },
    )
    .await;
    let admin = common::admin();

    admin_service::update_order_status(
        &state,
        &admin,
        first_id,
        UpdateOrderStatusRequest {
            status: "completed".into(),
        },
    )
    .await?;

    let all = admin_service::list_all_orders(&state, &admin, OrderListQuery::default())
        .await?
        .data
        .expect("orders")
        .items;
    let ids: Vec<Uuid> = all.iter().map(|order| order.id).collect();
    assert_eq!(ids, vec![takeaway_id, first_id]);

    let completed = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            status: Some(OrderStatus::Completed),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("orders")
    .items;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, first_id);

    let takeaway = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            order_type: Some(OrderType::Takeaway),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("orders")
    .items;
    assert_eq!(takeaway.len(), 1);
    assert_eq!(takeaway[0].id, takeaway_id);

    let paged = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            per_page: Some(1),
            page: Some(2),
            ..Default::default()
        },
    )
    .await?;
    let meta = paged.meta.expect("meta");
    assert_eq!((meta.page, meta.per_page, meta.total), (Some(2), Some(1), Some(2)));
    assert_eq!(paged.data.expect("orders").items[0].id, first_id);
    Ok(())
}

#[tokio::test]
async fn non_admins_are_forbidden() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let (id, number) = place_order(&state, common::checkout_request("Ada", "ada@example.com")).await;
    let user = common::regular_user();

    let err = admin_service::list_all_orders(&state, &user, OrderListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = admin_service::update_order_status(
        &state,
        &user,
        id,
        UpdateOrderStatusRequest {
            status: "cancelled".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = catalog_service::list_low_stock(&state, &user, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let stored = order_service::find_by_number(&state, &number).await?;
    assert_eq!(stored.order.status, OrderStatus::Confirmed);
    Ok(())
}

#[tokio::test]
async fn low_stock_lists_items_at_or_below_threshold() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Mains").await;
    // Seeded items carry 50 in stock against a threshold of 10.
    common::seed_menu_item(&state, category.id, "Plenty", 900).await;
    let scarce = common::seed_menu_item(&state, category.id, "Scarce", 900).await;
    common::set_stock(&state, scarce.id, 3).await;

    let resp = catalog_service::list_low_stock(&state, &common::admin(), Pagination::default())
        .await?;
    let items = resp.data.expect("items").items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, scarce.id);
    assert!(items[0].is_low_stock);
    Ok(())
}
