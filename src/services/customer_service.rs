use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::{self, Actor},
    dto::customers::CreateCustomerRequest,
    entity::customers::{
        ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
        Model as CustomerModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Customer,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn find_by_user(state: &AppState, user_id: Uuid) -> AppResult<Option<CustomerModel>> {
    let customer = Customers::find()
        .filter(CustomerCol::UserId.eq(user_id))
        .one(&state.orm)
        .await?;
    Ok(customer)
}

/// Links a customer profile to the authenticated account.
pub async fn create_for_user(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let name = required(&payload.name, "name")?;
    let email = required(&payload.email, "email")?.to_lowercase();
    let phone = required(&payload.phone, "phone")?;
    if !email.contains('@') {
        return Err(AppError::validation("email is not a valid address"));
    }

    if find_by_user(state, user.user_id).await?.is_some() {
        return Err(AppError::validation(
            "a customer profile already exists for this account",
        ));
    }

    let taken = Customers::find()
        .filter(CustomerCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::validation("Email is already taken"));
    }

    let now = Utc::now();
    let customer = CustomerActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(Some(user.user_id)),
        name: Set(name.to_string()),
        email: Set(email),
        phone: Set(phone.to_string()),
        address: Set(payload
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Actor {
            user_id: Some(user.user_id),
            session_key: None,
        },
        "customer_create",
        "customers",
        serde_json::json!({ "customer_id": customer.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Customer created",
        Customer::from(customer),
        Some(Meta::empty()),
    ))
}

pub async fn get_for_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Customer>> {
    let customer = find_by_user(state, user.user_id)
        .await?
        .ok_or(AppError::NotFound("Customer"))?;
    Ok(ApiResponse::success(
        "OK",
        Customer::from(customer),
        Some(Meta::empty()),
    ))
}

fn required<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value)
}
