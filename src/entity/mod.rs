pub mod audit_logs;
pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod customer_order_items;
pub mod customer_orders;
pub mod customers;
pub mod menu_items;
pub mod sea_orm_active_enums;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use customer_order_items::Entity as CustomerOrderItems;
pub use customer_orders::Entity as CustomerOrders;
pub use customers::Entity as Customers;
pub use menu_items::Entity as MenuItems;
pub use users::Entity as Users;
