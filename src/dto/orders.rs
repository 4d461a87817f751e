use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::cart::SyncCartLine;
use crate::models::{Order, OrderItem, ProductLabel};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub billing_address: Option<String>,
    /// Only `cod` is accepted.
    pub payment_method: String,
    /// Optional client snapshot reconciled into the server cart first.
    pub cart: Option<Vec<SyncCartLine>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub labels: Vec<ProductLabel>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
