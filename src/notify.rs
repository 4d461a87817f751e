use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    entity::users::{Column as UserCol, Entity as Users},
    entity::notifications::ActiveModel as NotificationActive,
    error::AppResult,
    middleware::auth::Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Database,
    Mail,
}

/// Everything the system notifies about. Each variant declares which
/// channels it goes out on; actual mail delivery is an external concern and
/// only logged here.
#[derive(Debug, Clone)]
pub enum NotificationPayload {
    OrderPlaced {
        order_id: Uuid,
        order_number: String,
        total_amount: i64,
    },
    OrderStatusChanged {
        order_id: Uuid,
        order_number: String,
        status: String,
    },
    HighValueOrder {
        order_id: Uuid,
        order_number: String,
        total_amount: i64,
    },
    LowStock {
        product_id: Uuid,
        name: String,
        stock_quantity: i32,
    },
    DeliveryAssigned {
        order_id: Uuid,
        order_number: String,
    },
    RecipeApproved {
        recipe_id: Uuid,
        title: String,
    },
    RecipeRejected {
        recipe_id: Uuid,
        title: String,
        reason: String,
    },
}

fn peso(centavos: i64) -> String {
    format!("P{}.{:02}", centavos / 100, centavos % 100)
}

impl NotificationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::OrderPlaced { .. } => "order_placed",
            NotificationPayload::OrderStatusChanged { .. } => "order_status_changed",
            NotificationPayload::HighValueOrder { .. } => "high_value_order",
            NotificationPayload::LowStock { .. } => "low_stock",
            NotificationPayload::DeliveryAssigned { .. } => "delivery_assigned",
            NotificationPayload::RecipeApproved { .. } => "recipe_approved",
            NotificationPayload::RecipeRejected { .. } => "recipe_rejected",
        }
    }

    pub fn channels(&self) -> &'static [Channel] {
        match self {
            NotificationPayload::OrderPlaced { .. }
            | NotificationPayload::RecipeApproved { .. }
            | NotificationPayload::RecipeRejected { .. } => {
                &[Channel::Database, Channel::Mail]
            }
            _ => &[Channel::Database],
        }
    }

    pub fn title(&self) -> String {
        match self {
            NotificationPayload::OrderPlaced { order_number, .. } => {
                format!("Order {order_number} placed")
            }
            NotificationPayload::OrderStatusChanged { order_number, .. } => {
                format!("Order {order_number} updated")
            }
            NotificationPayload::HighValueOrder { order_number, .. } => {
                format!("High-value order {order_number}")
            }
            NotificationPayload::LowStock { name, .. } => format!("Low stock: {name}"),
            NotificationPayload::DeliveryAssigned { order_number, .. } => {
                format!("Delivery assignment: {order_number}")
            }
            NotificationPayload::RecipeApproved { title, .. } => {
                format!("Recipe approved: {title}")
            }
            NotificationPayload::RecipeRejected { title, .. } => {
                format!("Recipe rejected: {title}")
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            NotificationPayload::OrderPlaced { total_amount, .. } => format!(
                "We received your order totalling {}. It will be prepared shortly.",
                peso(*total_amount)
            ),
            NotificationPayload::OrderStatusChanged { status, .. } => {
                format!("Your order is now {status}.")
            }
            NotificationPayload::HighValueOrder { total_amount, .. } => {
                format!("An order totalling {} was placed.", peso(*total_amount))
            }
            NotificationPayload::LowStock {
                name,
                stock_quantity,
                ..
            } => format!("{name} is down to {stock_quantity} in stock."),
            NotificationPayload::DeliveryAssigned { order_number, .. } => {
                format!("Order {order_number} has been assigned to you.")
            }
            NotificationPayload::RecipeApproved { .. } => {
                "Your recipe has been approved and is now public.".to_string()
            }
            NotificationPayload::RecipeRejected { reason, .. } => {
                format!("Your recipe was rejected: {reason}")
            }
        }
    }

    pub fn data(&self) -> serde_json::Value {
        match self {
            NotificationPayload::OrderPlaced {
                order_id,
                order_number,
                total_amount,
            }
            | NotificationPayload::HighValueOrder {
                order_id,
                order_number,
                total_amount,
            } => serde_json::json!({
                "order_id": order_id,
                "order_number": order_number,
                "total_amount": total_amount,
            }),
            NotificationPayload::OrderStatusChanged {
                order_id,
                order_number,
                status,
            } => serde_json::json!({
                "order_id": order_id,
                "order_number": order_number,
                "status": status,
            }),
            NotificationPayload::LowStock {
                product_id,
                name,
                stock_quantity,
            } => serde_json::json!({
                "product_id": product_id,
                "name": name,
                "stock_quantity": stock_quantity,
            }),
            NotificationPayload::DeliveryAssigned {
                order_id,
                order_number,
            } => serde_json::json!({
                "order_id": order_id,
                "order_number": order_number,
            }),
            NotificationPayload::RecipeApproved { recipe_id, title } => serde_json::json!({
                "recipe_id": recipe_id,
                "title": title,
            }),
            NotificationPayload::RecipeRejected {
                recipe_id,
                title,
                reason,
            } => serde_json::json!({
                "recipe_id": recipe_id,
                "title": title,
                "reason": reason,
            }),
        }
    }
}

/// Deliver a payload to one user over its declared channels.
pub async fn dispatch(orm: &OrmConn, user_id: Uuid, payload: NotificationPayload) -> AppResult<()> {
    for channel in payload.channels() {
        match channel {
            Channel::Database => {
                NotificationActive {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    kind: Set(payload.kind().to_string()),
                    title: Set(payload.title()),
                    message: Set(payload.message()),
                    data: Set(payload.data()),
                    read_at: Set(None),
                    created_at: NotSet,
                }
                .insert(orm)
                .await?;
            }
            Channel::Mail => {
                // Mail delivery belongs to an external collaborator.
                tracing::info!(
                    user_id = %user_id,
                    kind = payload.kind(),
                    "mail notification queued"
                );
            }
        }
    }
    Ok(())
}

/// Fan a payload out to every admin account.
pub async fn dispatch_to_admins(orm: &OrmConn, payload: NotificationPayload) -> AppResult<()> {
    let admins = Users::find()
        .filter(UserCol::Role.eq(Role::Admin.as_str()))
        .all(orm)
        .await?;
    for admin in admins {
        dispatch(orm, admin.id, payload.clone()).await?;
    }
    Ok(())
}
