use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::cart::CartSummary,
    models::{Category, MenuItem},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuPage {
    pub sections: Vec<MenuSection>,
    pub cart: CartSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MenuItemList {
    #[schema(value_type = Vec<MenuItem>)]
    pub items: Vec<MenuItem>,
}
