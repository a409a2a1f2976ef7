use chrono::Utc;
use rand::Rng;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{self, Actor},
    dto::orders::{CheckoutPreview, CheckoutReceipt, CheckoutRequest, OrderWithItems},
    entity::{
        cart_items::{Column as CartItemCol, Entity as CartItems},
        carts::Entity as Carts,
        customer_order_items::ActiveModel as OrderItemActive,
        customer_orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as CustomerOrders,
            Model as OrderModel,
        },
        sea_orm_active_enums::{OrderStatus, OrderType, PaymentStatus},
    },
    error::{AppError, AppResult},
    middleware::identity::Identity,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

pub const ORDER_NUMBER_LEN: usize = 6;
const ORDER_NUMBER_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 32;

const MISSING_FIELDS: &str = "Please fill in all required fields.";

/// One uniformly random draw from `[A-Z0-9]{6}`.
pub fn random_order_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ORDER_NUMBER_LEN)
        .map(|_| ORDER_NUMBER_ALPHABET[rng.gen_range(0..ORDER_NUMBER_ALPHABET.len())] as char)
        .collect()
}

pub fn is_order_number(value: &str) -> bool {
    value.len() == ORDER_NUMBER_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

async fn order_number_taken<C: ConnectionTrait>(db: &C, candidate: &str) -> AppResult<bool> {
    let count = CustomerOrders::find()
        .filter(OrderCol::OrderNumber.eq(candidate))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Draws order numbers until one is free and inserts the order under it.
///
/// Each insert runs in a savepoint so that losing a race on the unique index
/// to a concurrent checkout only discards that attempt, not the whole checkout.
async fn insert_with_unique_number<G, F>(
    txn: &DatabaseTransaction,
    next_number: &mut G,
    build: F,
) -> AppResult<OrderModel>
where
    G: FnMut() -> String,
    F: Fn(String) -> OrderActive,
{
    for attempt in 1..=MAX_ORDER_NUMBER_ATTEMPTS {
        let candidate = next_number();
        if order_number_taken(txn, &candidate).await? {
            tracing::debug!(attempt, "order number collision, retrying");
            continue;
        }

        let savepoint = txn.begin().await?;
        match build(candidate).insert(&savepoint).await {
            Ok(order) => {
                savepoint.commit().await?;
                return Ok(order);
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                savepoint.rollback().await?;
                tracing::debug!(attempt, "order number taken concurrently, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Conflict(
        "could not allocate a unique order number".into(),
    ))
}

/// Contact and fulfilment details after trimming and validation.
#[derive(Debug, Clone)]
struct OrderDetails {
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    order_type: OrderType,
    table_number: Option<i32>,
    delivery_address: Option<String>,
    notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate(payload: CheckoutRequest) -> AppResult<OrderDetails> {
    let customer_name = payload.customer_name.trim().to_string();
    let customer_email = payload.customer_email.trim().to_string();
    let customer_phone = payload.customer_phone.trim().to_string();
    if customer_name.is_empty() || customer_email.is_empty() || customer_phone.is_empty() {
        return Err(AppError::validation(MISSING_FIELDS));
    }

    if let Some(table) = payload.table_number {
        if table <= 0 {
            return Err(AppError::validation(
                "table_number must be a positive number",
            ));
        }
    }

    Ok(OrderDetails {
        customer_name,
        customer_email,
        customer_phone,
        order_type: payload.order_type,
        table_number: payload.table_number,
        delivery_address: non_blank(payload.delivery_address),
        notes: non_blank(payload.notes),
    })
}

/// What the checkout form shows: the current cart, or `EmptyCart`.
pub async fn preview(state: &AppState, identity: Option<&Identity>) -> AppResult<CheckoutPreview> {
    let cart = cart_service::view_cart(state, identity).await?;
    if cart.items.is_empty() {
        return Err(AppError::EmptyCart);
    }
    Ok(CheckoutPreview { cart })
}

/// Converts the caller's cart into a confirmed order.
///
/// The order, its price snapshots and the cart clear-out commit together or
/// not at all. The cart row is locked for the duration, so two checkouts of
/// the same cart run one after the other and the second finds it empty.
pub async fn checkout(
    state: &AppState,
    identity: &Identity,
    user_id: Option<Uuid>,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    checkout_with_order_numbers(state, identity, user_id, payload, || {
        random_order_number(&mut rand::thread_rng())
    })
    .await
}

/// [`checkout`] drawing candidate order numbers from `next_number`.
pub async fn checkout_with_order_numbers<G>(
    state: &AppState,
    identity: &Identity,
    user_id: Option<Uuid>,
    payload: CheckoutRequest,
    mut next_number: G,
) -> AppResult<ApiResponse<CheckoutReceipt>>
where
    G: FnMut() -> String,
{
    let cart = cart_service::find_cart(&state.orm, identity)
        .await?
        .ok_or(AppError::EmptyCart)?;

    // An empty cart wins over missing contact details.
    let line_count = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .count(&state.orm)
        .await?;
    if line_count == 0 {
        return Err(AppError::EmptyCart);
    }

    let details = validate(payload)?;

    let txn = state.orm.begin().await?;

    Carts::find_by_id(cart.id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::EmptyCart)?;

    let lines = cart_service::load_lines(&txn, cart.id).await?;
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }
    let (total_amount, _) = cart_service::totals(&lines);

    let now = Utc::now();
    let order = insert_with_unique_number(&txn, &mut next_number, |order_number| OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(order_number),
        customer_id: Set(identity.customer_id()),
        customer_name: Set(details.customer_name.clone()),
        customer_email: Set(details.customer_email.clone()),
        customer_phone: Set(details.customer_phone.clone()),
        // Checkout places orders straight into `confirmed`.
        status: Set(OrderStatus::Confirmed),
        payment_status: Set(PaymentStatus::Pending),
        total_amount: Set(total_amount),
        order_type: Set(details.order_type),
        table_number: Set(details.table_number),
        delivery_address: Set(details.delivery_address.clone()),
        notes: Set(details.notes.clone()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    })
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (cart_item, menu_item) in &lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(menu_item.id),
            quantity: Set(cart_item.quantity),
            price_at_time: Set(menu_item.price),
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from_entity(item, Some(menu_item.name.clone())));
    }

    CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total_amount = order.total_amount,
        lines = items.len(),
        "order placed"
    );

    audit::record(
        state,
        Actor {
            user_id,
            session_key: identity.session_key(),
        },
        "checkout",
        "customer_orders",
        serde_json::json!({ "order_id": order.id, "order_number": order.order_number }),
    )
    .await;

    let order_number = order.order_number.clone();
    Ok(ApiResponse::success(
        format!("Order #{order_number} placed successfully!"),
        CheckoutReceipt {
            confirmation_path: format!("/api/order-confirmation/{order_number}"),
            order_number,
            order: OrderWithItems {
                order: Order::from(order),
                items,
            },
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn order_numbers_use_six_uppercase_alphanumerics() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let number = random_order_number(&mut rng);
            assert!(is_order_number(&number), "bad order number {number}");
        }
    }

    #[test]
    fn every_symbol_of_the_alphabet_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: HashSet<char> = (0..2_000)
            .flat_map(|_| random_order_number(&mut rng).chars().collect::<Vec<_>>())
            .collect();
        assert_eq!(seen.len(), ORDER_NUMBER_ALPHABET.len());
    }

    #[test]
    fn is_order_number_rejects_lowercase_and_wrong_length() {
        assert!(is_order_number("AB12CD"));
        assert!(!is_order_number("ab12cd"));
        assert!(!is_order_number("AB12C"));
        assert!(!is_order_number("AB12CD7"));
    }

    #[test]
    fn contact_fields_are_required_after_trimming() {
        let err = validate(CheckoutRequest {
            customer_name: "  ".into(),
            customer_email: "a@b.c".into(),
            customer_phone: "555".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS);

        let ok = validate(CheckoutRequest {
            customer_name: " Ada ".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: "555".into(),
            notes: Some("   ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ok.customer_name, "Ada");
        assert_eq!(ok.order_type, OrderType::DineIn);
        assert!(ok.notes.is_none());
    }

    #[test]
    fn table_number_must_be_positive() {
        let err = validate(CheckoutRequest {
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: "555".into(),
            table_number: Some(0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
