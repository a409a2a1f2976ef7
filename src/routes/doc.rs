use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{
            AddToCartRequest, CartActionResponse, CartLine, CartSummary, CartView,
            RemoveFromCartRequest, UpdateCartItemRequest,
        },
        customers::CreateCustomerRequest,
        menu::{MenuItemList, MenuPage, MenuSection},
        orders::{
            CheckoutPreview, CheckoutReceipt, CheckoutRequest, OrderList, OrderWithItems,
            UpdateOrderStatusRequest, UpdatePaymentStatusRequest,
        },
    },
    entity::sea_orm_active_enums::{CategoryType, OrderStatus, OrderType, PaymentStatus},
    models::{Category, Customer, MenuItem, Order, OrderItem, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, checkout, customers, health, menu, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        customers::create_customer,
        customers::my_profile,
        menu::menu,
        cart::view_cart,
        cart::cart_info,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        checkout::checkout_form,
        checkout::place_order,
        orders::order_confirmation,
        orders::track_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::update_payment_status,
        admin::list_low_stock
    ),
    components(
        schemas(
            User,
            Customer,
            Category,
            MenuItem,
            Order,
            OrderItem,
            CategoryType,
            OrderStatus,
            OrderType,
            PaymentStatus,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateCustomerRequest,
            MenuSection,
            MenuPage,
            MenuItemList,
            AddToCartRequest,
            UpdateCartItemRequest,
            RemoveFromCartRequest,
            CartSummary,
            CartActionResponse,
            CartLine,
            CartView,
            CheckoutRequest,
            CheckoutPreview,
            CheckoutReceipt,
            OrderWithItems,
            OrderList,
            UpdateOrderStatusRequest,
            UpdatePaymentStatusRequest,
            params::Pagination,
            Meta,
            ApiResponse<MenuPage>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutReceipt>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Order>,
            ApiResponse<MenuItemList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Customers", description = "Customer profile endpoints"),
        (name = "Menu", description = "Menu browsing"),
        (name = "Cart", description = "Cart endpoints, anonymous carts ride on x-session-token"),
        (name = "Checkout", description = "Turns the cart into an order"),
        (name = "Orders", description = "Order confirmation and tracking"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
