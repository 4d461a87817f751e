use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Centavos; per kilogram for weight products.
    pub price: i64,
    pub stock_quantity: i32,
    pub unit_type: String,
    pub is_available: bool,
    pub category: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_number: String,
    pub total_amount: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub shipping_address: String,
    pub billing_address: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub delivery_status: String,
    pub delivery_cancel_reason: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub unit_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductLabel {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub qr_code_path: String,
    pub label_path: String,
    pub is_printed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProofOfDelivery {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier_id: Uuid,
    pub photo_path: Option<String>,
    pub signature_path: Option<String>,
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time_minutes: i32,
    pub difficulty_level: String,
    pub image_path: Option<String>,
    pub status: String,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeReview {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeComment {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub comment: String,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(m: entity::users::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            password_hash: m.password_hash,
            role: m.role,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::products::Model> for Product {
    fn from(m: entity::products::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            stock_quantity: m.stock_quantity,
            unit_type: m.unit_type,
            is_available: m.is_available,
            category: m.category,
            image_path: m.image_path,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::orders::Model> for Order {
    fn from(m: entity::orders::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            order_number: m.order_number,
            total_amount: m.total_amount,
            status: m.status,
            payment_status: m.payment_status,
            payment_method: m.payment_method,
            shipping_address: m.shipping_address,
            billing_address: m.billing_address,
            assigned_to: m.assigned_to,
            delivery_status: m.delivery_status,
            delivery_cancel_reason: m.delivery_cancel_reason,
            delivered_at: m.delivered_at.map(|dt| dt.with_timezone(&Utc)),
            cancelled_at: m.cancelled_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(m: entity::order_items::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            product_id: m.product_id,
            quantity: m.quantity,
            price: m.price,
            unit_type: m.unit_type,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::product_labels::Model> for ProductLabel {
    fn from(m: entity::product_labels::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            product_id: m.product_id,
            qr_code_path: m.qr_code_path,
            label_path: m.label_path,
            is_printed: m.is_printed,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::proof_of_deliveries::Model> for ProofOfDelivery {
    fn from(m: entity::proof_of_deliveries::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            courier_id: m.courier_id,
            photo_path: m.photo_path,
            signature_path: m.signature_path,
            delivered_at: m.delivered_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::recipes::Model> for Recipe {
    fn from(m: entity::recipes::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            ingredients: serde_json::from_value(m.ingredients).unwrap_or_default(),
            instructions: serde_json::from_value(m.instructions).unwrap_or_default(),
            cooking_time_minutes: m.cooking_time_minutes,
            difficulty_level: m.difficulty_level,
            image_path: m.image_path,
            status: m.status,
            created_by: m.created_by,
            approved_by: m.approved_by,
            approved_at: m.approved_at.map(|dt| dt.with_timezone(&Utc)),
            rejection_reason: m.rejection_reason,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::recipe_reviews::Model> for RecipeReview {
    fn from(m: entity::recipe_reviews::Model) -> Self {
        Self {
            id: m.id,
            recipe_id: m.recipe_id,
            user_id: m.user_id,
            rating: m.rating,
            comment: m.comment,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::recipe_comments::Model> for RecipeComment {
    fn from(m: entity::recipe_comments::Model) -> Self {
        Self {
            id: m.id,
            recipe_id: m.recipe_id,
            user_id: m.user_id,
            parent_id: m.parent_id,
            comment: m.comment,
            is_edited: m.is_edited,
            edited_at: m.edited_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::notifications::Model> for Notification {
    fn from(m: entity::notifications::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            kind: m.kind,
            title: m.title,
            message: m.message,
            data: m.data,
            read_at: m.read_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}
