mod common;

use axum_restaurant_api::{
    dto::cart::{AddToCartRequest, RemoveFromCartRequest, UpdateCartItemRequest},
    entity::audit_logs::{Column as AuditCol, Entity as AuditLogs},
    error::AppError,
    middleware::identity::Identity,
    services::{
        cart_service::{self, MAX_LINE_QUANTITY},
        catalog_service,
    },
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

#[tokio::test]
async fn adding_the_same_item_twice_accumulates_one_line() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Mains").await;
    let pizza = common::seed_menu_item(&state, category.id, "Pizza", 1200).await;
    let guest = common::session();

    let first = cart_service::add_item(
        &state,
        &guest,
        None,
        AddToCartRequest {
            menu_item_id: pizza.id,
            quantity: 1,
        },
    )
    .await?;
    assert!(first.success);
    assert_eq!(first.message, "Pizza added to cart");
    assert_eq!((first.cart_total, first.cart_items_count), (1200, 1));

    let second = cart_service::add_item(
        &state,
        &guest,
        None,
        AddToCartRequest {
            menu_item_id: pizza.id,
            quantity: 2,
        },
    )
    .await?;
    assert_eq!((second.cart_total, second.cart_items_count), (3600, 3));

    let view = cart_service::view_cart(&state, Some(&guest)).await?;
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].quantity, 3);
    assert_eq!(view.items[0].subtotal, 3600);
    Ok(())
}

#[tokio::test]
async fn update_sets_quantity_and_zero_removes() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Mains").await;
    let soup = common::seed_menu_item(&state, category.id, "Soup", 500).await;
    let guest = common::session();
    common::add(&state, &guest, soup.id, 1).await;

    let line_id = cart_service::view_cart(&state, Some(&guest)).await?.items[0].id;

    let updated = cart_service::update_item(
        &state,
        &guest,
        None,
        UpdateCartItemRequest {
            cart_item_id: line_id,
            quantity: 5,
        },
    )
    .await?;
    assert_eq!(updated.message, "Cart updated");
    assert_eq!((updated.cart_total, updated.cart_items_count), (2500, 5));

    let removed = cart_service::update_item(
        &state,
        &guest,
        None,
        UpdateCartItemRequest {
            cart_item_id: line_id,
            quantity: 0,
        },
    )
    .await?;
    assert_eq!(removed.message, "Item removed from cart");
    assert_eq!((removed.cart_total, removed.cart_items_count), (0, 0));
    assert!(cart_service::view_cart(&state, Some(&guest)).await?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn remove_deletes_the_line() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Mains").await;
    let a = common::seed_menu_item(&state, category.id, "A", 500).await;
    let b = common::seed_menu_item(&state, category.id, "B", 350).await;
    let guest = common::session();
    common::add(&state, &guest, a.id, 2).await;
    common::add(&state, &guest, b.id, 1).await;

    let view = cart_service::view_cart(&state, Some(&guest)).await?;
    let a_line = view
        .items
        .iter()
        .find(|line| line.menu_item.id == a.id)
        .expect("line for A");

    let resp = cart_service::remove_item(
        &state,
        &guest,
        None,
        RemoveFromCartRequest {
            cart_item_id: a_line.id,
        },
    )
    .await?;
    assert_eq!(resp.message, "Item removed from cart");
    assert_eq!((resp.cart_total, resp.cart_items_count), (350, 1));
    Ok(())
}

#[tokio::test]
async fn unavailable_and_unknown_items_are_rejected() {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Desserts").await;
    let cake = common::seed_menu_item(&state, category.id, "Cake", 700).await;
    common::set_available(&state, cake.id, false).await;
    let guest = common::session();

    let err = cart_service::add_item(
        &state,
        &guest,
        None,
        AddToCartRequest {
            menu_item_id: cake.id,
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(ref name) if name == "Cake"));

    let err = cart_service::add_item(
        &state,
        &guest,
        None,
        AddToCartRequest {
            menu_item_id: Uuid::new_v4(),
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Menu item")));

    let err = cart_service::add_item(
        &state,
        &guest,
        None,
        AddToCartRequest {
            menu_item_id: cake.id,
            quantity: 0,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Nothing was added by any of the rejected calls.
    let summary = cart_service::summary_for(&state, Some(&guest)).await.unwrap();
    assert_eq!((summary.cart_total, summary.cart_items_count), (0, 0));
}

#[tokio::test]
async fn items_in_another_cart_are_not_found() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Mains").await;
    let pasta = common::seed_menu_item(&state, category.id, "Pasta", 900).await;
    let owner = common::session();
    let stranger = common::session();
    common::add(&state, &owner, pasta.id, 1).await;
    common::add(&state, &stranger, pasta.id, 1).await;

    let line_id = cart_service::view_cart(&state, Some(&owner)).await?.items[0].id;

    let err = cart_service::update_item(
        &state,
        &stranger,
        None,
        UpdateCartItemRequest {
            cart_item_id: line_id,
            quantity: 9,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Cart item")));

    let err = cart_service::remove_item(
        &state,
        &stranger,
        None,
        RemoveFromCartRequest {
            cart_item_id: line_id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Cart item")));

    let owner_view = cart_service::view_cart(&state, Some(&owner)).await?;
    assert_eq!(owner_view.items[0].quantity, 1);
    Ok(())
}

#[tokio::test]
async fn totals_follow_current_menu_prices() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Drinks").await;
    let tea = common::seed_menu_item(&state, category.id, "Tea", 300).await;
    let guest = common::session();
    common::add(&state, &guest, tea.id, 2).await;

    common::set_price(&state, tea.id, 400).await;

    let summary = cart_service::summary_for(&state, Some(&guest)).await?;
    assert_eq!(summary.cart_total, 800);
    assert_eq!(summary.cart_items_count, 2);
    Ok(())
}

#[tokio::test]
async fn callers_without_a_cart_see_zero_totals() -> anyhow::Result<()> {
    let state = common::test_state().await;

    let none = cart_service::summary_for(&state, None).await?;
    assert_eq!((none.cart_total, none.cart_items_count), (0, 0));

    let fresh = Identity::AnonymousSession("never-used".into());
    let view = cart_service::view_cart(&state, Some(&fresh)).await?;
    assert!(view.cart_id.is_none());
    assert!(view.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn menu_lists_available_items_by_category() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let mains = common::seed_category(&state, "Mains").await;
    let empty = common::seed_category(&state, "Specials").await;
    let burger = common::seed_menu_item(&state, mains.id, "Burger", 1100).await;
    let hidden = common::seed_menu_item(&state, mains.id, "Off Menu", 100).await;
    common::set_available(&state, hidden.id, false).await;

    let sections = catalog_service::menu_sections(&state).await?;
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].category.id, mains.id);
    assert_ne!(sections[0].category.id, empty.id);
    let ids: Vec<Uuid> = sections[0].items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![burger.id]);
    Ok(())
}

#[tokio::test]
async fn quantities_past_the_line_limit_leave_the_cart_usable() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Mains").await;
    let fries = common::seed_menu_item(&state, category.id, "Fries", 300).await;
    let guest = common::session();

    let err = cart_service::add_item(
        &state,
        &guest,
        None,
        AddToCartRequest {
            menu_item_id: fries.id,
            quantity: i32::MAX,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    common::add(&state, &guest, fries.id, MAX_LINE_QUANTITY).await;

    let err = cart_service::add_item(
        &state,
        &guest,
        None,
        AddToCartRequest {
            menu_item_id: fries.id,
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let line_id = cart_service::view_cart(&state, Some(&guest)).await?.items[0].id;
    let err = cart_service::update_item(
        &state,
        &guest,
        None,
        UpdateCartItemRequest {
            cart_item_id: line_id,
            quantity: MAX_LINE_QUANTITY + 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let view = cart_service::view_cart(&state, Some(&guest)).await?;
    assert_eq!(view.items[0].quantity, MAX_LINE_QUANTITY);
    assert_eq!(view.total_amount, i64::from(MAX_LINE_QUANTITY) * 300);
    Ok(())
}

#[tokio::test]
async fn cart_audit_rows_keep_the_signed_in_user() -> anyhow::Result<()> {
    let state = common::test_state().await;
    let category = common::seed_category(&state, "Mains").await;
    let salad = common::seed_menu_item(&state, category.id, "Salad", 650).await;
    let customer =
        Identity::AuthenticatedCustomer(common::seed_customer(&state, "cara@example.com").await);
    let user_id = Uuid::new_v4();

    cart_service::add_item(
        &state,
        &customer,
        Some(user_id),
        AddToCartRequest {
            menu_item_id: salad.id,
            quantity: 1,
        },
    )
    .await?;

    let row = AuditLogs::find()
        .filter(AuditCol::Action.eq("cart_add"))
        .one(&state.orm)
        .await?
        .expect("audit row");
    assert_eq!(row.user_id, Some(user_id));
    assert_eq!(row.session_key, None);
    Ok(())
}
