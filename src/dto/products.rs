use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    /// Centavos; per kilogram for weight products.
    pub price: i64,
    pub stock_quantity: i32,
    /// `piece` or `kg`; legacy `weight` is accepted and normalized.
    pub unit_type: Option<String>,
    pub category: Option<String>,
    pub image_path: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock_quantity: Option<i32>,
    pub unit_type: Option<String>,
    pub category: Option<String>,
    pub image_path: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
