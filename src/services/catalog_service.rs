use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::menu::{MenuItemList, MenuSection},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        menu_items::{Column as MenuCol, Entity as MenuItems, Model as MenuItemModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, MenuItem},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Active categories in display order, each with its available items.
/// Categories with nothing on offer are left out.
pub async fn menu_sections(state: &AppState) -> AppResult<Vec<MenuSection>> {
    let categories = Categories::find()
        .filter(CategoryCol::IsActive.eq(true))
        .order_by_asc(CategoryCol::DisplayOrder)
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?;

    let category_ids: Vec<Uuid> = categories.iter().map(|c| c.id).collect();
    let items = MenuItems::find()
        .filter(MenuCol::CategoryId.is_in(category_ids))
        .filter(MenuCol::IsAvailable.eq(true))
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?;

    let mut by_category: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
    for item in items {
        by_category
            .entry(item.category_id)
            .or_default()
            .push(MenuItem::from(item));
    }

    let sections = categories
        .into_iter()
        .filter_map(|category| {
            let items = by_category.remove(&category.id)?;
            Some(MenuSection {
                category: Category::from(category),
                items,
            })
        })
        .collect();

    Ok(sections)
}

/// Loads a menu item that a customer is about to order.
pub async fn orderable_item(state: &AppState, menu_item_id: Uuid) -> AppResult<MenuItemModel> {
    let item = MenuItems::find_by_id(menu_item_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Menu item"))?;

    if !item.is_available {
        return Err(AppError::Unavailable(item.name));
    }

    Ok(item)
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<MenuItemList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = MenuItems::find()
        .filter(
            Expr::col(MenuCol::StockQuantity).lte(Expr::col(MenuCol::LowStockThreshold)),
        )
        .order_by_asc(MenuCol::StockQuantity)
        .order_by_asc(MenuCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Low stock",
        MenuItemList { items },
        Some(meta),
    ))
}
