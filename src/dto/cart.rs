use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MenuItem;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddToCartRequest {
    pub menu_item_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCartItemRequest {
    pub cart_item_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RemoveFromCartRequest {
    pub cart_item_id: Uuid,
}

/// Totals computed from live menu prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartSummary {
    pub cart_total: i64,
    pub cart_items_count: i64,
}

/// Body returned by every cart mutation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartActionResponse {
    pub success: bool,
    pub message: String,
    pub cart_total: i64,
    pub cart_items_count: i64,
}

impl CartActionResponse {
    pub fn new(message: impl Into<String>, summary: CartSummary) -> Self {
        Self {
            success: true,
            message: message.into(),
            cart_total: summary.cart_total,
            cart_items_count: summary.cart_items_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub menu_item: MenuItem,
    pub quantity: i32,
    pub subtotal: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub cart_id: Option<Uuid>,
    pub items: Vec<CartLine>,
    pub total_amount: i64,
    pub total_items: i64,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            cart_id: None,
            items: Vec::new(),
            total_amount: 0,
            total_items: 0,
        }
    }
}
