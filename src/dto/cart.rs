use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    /// Grams for kg products (multiples of 250), unit count otherwise.
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SyncCartLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Client-side cart snapshot submitted at checkout time; it overwrites the
/// server-side cart before the order is created.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SyncCartRequest {
    pub items: Vec<SyncCartLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineDto {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    /// Centavos.
    pub subtotal: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineDto>,
    /// Centavos; always recomputed from the lines.
    pub total: i64,
}
