pub mod auth;
pub mod cart;
pub mod delivery;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod recipes;
