use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    audit::{self, Actor},
    dto::cart::{
        AddToCartRequest, CartActionResponse, CartLine, CartSummary, CartView,
        RemoveFromCartRequest, UpdateCartItemRequest,
    },
    entity::{
        cart_items::{
            ActiveModel as CartItemActive, Column as CartItemCol, Entity as CartItems,
            Model as CartItemModel,
        },
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        menu_items::{Entity as MenuItems, Model as MenuItemModel},
    },
    error::{AppError, AppResult},
    middleware::identity::Identity,
    models::MenuItem,
    services::catalog_service,
    state::AppState,
};

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 999;

fn quantity_too_large() -> AppError {
    AppError::validation(format!("quantity cannot exceed {MAX_LINE_QUANTITY}"))
}

pub async fn find_cart<C: ConnectionTrait>(
    db: &C,
    identity: &Identity,
) -> Result<Option<CartModel>, DbErr> {
    let filter = match identity {
        Identity::AuthenticatedCustomer(id) => CartCol::CustomerId.eq(*id),
        Identity::AnonymousSession(token) => CartCol::SessionKey.eq(token.as_str()),
    };
    Carts::find().filter(filter).one(db).await
}

pub async fn get_or_create_cart(state: &AppState, identity: &Identity) -> AppResult<CartModel> {
    if let Some(cart) = find_cart(&state.orm, identity).await? {
        return Ok(cart);
    }

    let now = Utc::now();
    let created = CartActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(identity.customer_id()),
        session_key: Set(identity.session_key().map(str::to_string)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await;

    match created {
        Ok(cart) => {
            tracing::debug!(cart_id = %cart.id, "cart created");
            Ok(cart)
        }
        // A concurrent request created the cart first; use theirs.
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            find_cart(&state.orm, identity)
                .await?
                .ok_or_else(|| AppError::Orm(err))
        }
        Err(err) => Err(err.into()),
    }
}

/// Cart items joined with their menu items, oldest first.
pub async fn load_lines<C: ConnectionTrait>(
    db: &C,
    cart_id: Uuid,
) -> Result<Vec<(CartItemModel, MenuItemModel)>, DbErr> {
    let rows = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart_id))
        .find_also_related(MenuItems)
        .order_by_asc(CartItemCol::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, menu_item)| menu_item.map(|m| (item, m)))
        .collect())
}

/// `(total_amount, total_items)` at current menu prices.
pub fn totals(lines: &[(CartItemModel, MenuItemModel)]) -> (i64, i64) {
    lines
        .iter()
        .fold((0, 0), |(amount, count), (item, menu_item)| {
            let quantity = i64::from(item.quantity);
            (amount + quantity * menu_item.price, count + quantity)
        })
}

pub async fn summary(state: &AppState, cart_id: Uuid) -> AppResult<CartSummary> {
    let lines = load_lines(&state.orm, cart_id).await?;
    let (cart_total, cart_items_count) = totals(&lines);
    Ok(CartSummary {
        cart_total,
        cart_items_count,
    })
}

/// Zero totals when the caller has no cart yet.
pub async fn summary_for(state: &AppState, identity: Option<&Identity>) -> AppResult<CartSummary> {
    let Some(identity) = identity else {
        return Ok(CartSummary::default());
    };
    match find_cart(&state.orm, identity).await? {
        Some(cart) => summary(state, cart.id).await,
        None => Ok(CartSummary::default()),
    }
}

pub async fn view_cart(state: &AppState, identity: Option<&Identity>) -> AppResult<CartView> {
    let Some(identity) = identity else {
        return Ok(CartView::empty());
    };
    let Some(cart) = find_cart(&state.orm, identity).await? else {
        return Ok(CartView::empty());
    };
    let lines = load_lines(&state.orm, cart.id).await?;
    Ok(build_view(cart.id, lines))
}

pub fn build_view(cart_id: Uuid, lines: Vec<(CartItemModel, MenuItemModel)>) -> CartView {
    let (total_amount, total_items) = totals(&lines);
    let items = lines
        .into_iter()
        .map(|(item, menu_item)| CartLine {
            id: item.id,
            subtotal: i64::from(item.quantity) * menu_item.price,
            menu_item: MenuItem::from(menu_item),
            quantity: item.quantity,
        })
        .collect();

    CartView {
        cart_id: Some(cart_id),
        items,
        total_amount,
        total_items,
    }
}

pub async fn add_item(
    state: &AppState,
    identity: &Identity,
    user_id: Option<Uuid>,
    payload: AddToCartRequest,
) -> AppResult<CartActionResponse> {
    if payload.quantity <= 0 {
        return Err(AppError::validation("quantity must be greater than 0"));
    }
    if payload.quantity > MAX_LINE_QUANTITY {
        return Err(quantity_too_large());
    }

    let menu_item = catalog_service::orderable_item(state, payload.menu_item_id).await?;
    let cart = get_or_create_cart(state, identity).await?;

    let existing = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .filter(CartItemCol::MenuItemId.eq(menu_item.id))
        .one(&state.orm)
        .await?;

    match existing {
        Some(item) => increment_quantity(state, &item, payload.quantity).await?,
        None => {
            let now = Utc::now();
            let inserted = CartItemActive {
                id: Set(Uuid::new_v4()),
                cart_id: Set(cart.id),
                menu_item_id: Set(menu_item.id),
                quantity: Set(payload.quantity),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&state.orm)
            .await;

            match inserted {
                Ok(_) => {}
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    let item = CartItems::find()
                        .filter(CartItemCol::CartId.eq(cart.id))
                        .filter(CartItemCol::MenuItemId.eq(menu_item.id))
                        .one(&state.orm)
                        .await?
                        .ok_or(AppError::Orm(err))?;
                    increment_quantity(state, &item, payload.quantity).await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    audit::record(
        state,
        actor(identity, user_id),
        "cart_add",
        "cart_items",
        serde_json::json!({
            "cart_id": cart.id,
            "menu_item_id": menu_item.id,
            "quantity": payload.quantity,
        }),
    )
    .await;

    let summary = summary(state, cart.id).await?;
    Ok(CartActionResponse::new(
        format!("{} added to cart", menu_item.name),
        summary,
    ))
}

/// Adds `by` in the database, refusing to push the line past [`MAX_LINE_QUANTITY`].
async fn increment_quantity(state: &AppState, item: &CartItemModel, by: i32) -> AppResult<()> {
    item.quantity
        .checked_add(by)
        .filter(|total| *total <= MAX_LINE_QUANTITY)
        .ok_or_else(quantity_too_large)?;

    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let result = CartItems::update_many()
        .col_expr(
            CartItemCol::Quantity,
            Expr::col(CartItemCol::Quantity).add(by),
        )
        .col_expr(CartItemCol::UpdatedAt, Expr::value(now))
        .filter(CartItemCol::Id.eq(item.id))
        // A concurrent add may have raised the quantity since `item` was read.
        .filter(CartItemCol::Quantity.lte(MAX_LINE_QUANTITY - by))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(quantity_too_large());
    }
    Ok(())
}

/// Finds an item that belongs to the caller's own cart.
async fn owned_item(
    state: &AppState,
    identity: &Identity,
    cart_item_id: Uuid,
) -> AppResult<(CartModel, CartItemModel)> {
    let cart = find_cart(&state.orm, identity)
        .await?
        .ok_or(AppError::NotFound("Cart item"))?;
    let item = CartItems::find_by_id(cart_item_id)
        .filter(CartItemCol::CartId.eq(cart.id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Cart item"))?;
    Ok((cart, item))
}

/// Sets the quantity outright; zero or less removes the line.
pub async fn update_item(
    state: &AppState,
    identity: &Identity,
    user_id: Option<Uuid>,
    payload: UpdateCartItemRequest,
) -> AppResult<CartActionResponse> {
    if payload.quantity > MAX_LINE_QUANTITY {
        return Err(quantity_too_large());
    }
    let (cart, item) = owned_item(state, identity, payload.cart_item_id).await?;

    let message = if payload.quantity <= 0 {
        CartItems::delete_by_id(item.id).exec(&state.orm).await?;
        "Item removed from cart"
    } else {
        let mut active: CartItemActive = item.into();
        active.quantity = Set(payload.quantity);
        active.updated_at = Set(Utc::now().into());
        active.update(&state.orm).await?;
        "Cart updated"
    };

    audit::record(
        state,
        actor(identity, user_id),
        "cart_update",
        "cart_items",
        serde_json::json!({
            "cart_id": cart.id,
            "cart_item_id": payload.cart_item_id,
            "quantity": payload.quantity,
        }),
    )
    .await;

    let summary = summary(state, cart.id).await?;
    Ok(CartActionResponse::new(message, summary))
}

pub async fn remove_item(
    state: &AppState,
    identity: &Identity,
    user_id: Option<Uuid>,
    payload: RemoveFromCartRequest,
) -> AppResult<CartActionResponse> {
    let (cart, item) = owned_item(state, identity, payload.cart_item_id).await?;

    let result = CartItems::delete_by_id(item.id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Cart item"));
    }

    audit::record(
        state,
        actor(identity, user_id),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "cart_id": cart.id, "cart_item_id": item.id }),
    )
    .await;

    let summary = summary(state, cart.id).await?;
    Ok(CartActionResponse::new("Item removed from cart", summary))
}

fn actor(identity: &Identity, user_id: Option<Uuid>) -> Actor<'_> {
    Actor {
        user_id,
        session_key: identity.session_key(),
    }
}
