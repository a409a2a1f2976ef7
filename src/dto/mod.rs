pub mod auth;
pub mod cart;
pub mod customers;
pub mod menu;
pub mod orders;
