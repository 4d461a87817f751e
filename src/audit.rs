use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Every mutating action the API records. The string form is what lands in
/// the `audit_logs.action` column, so variants map to stable snake_case tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    ProductCreate,
    ProductUpdate,
    ProductDelete,
    CartAdd,
    CartUpdate,
    CartRemove,
    Checkout,
    OrderCancel,
    OrderStatusUpdate,
    PaymentStatusUpdate,
    CourierAssign,
    InventoryAdjust,
    DeliveryAccept,
    DeliveryDelivered,
    DeliveryCancel,
    PaymentSettled,
    RecipeCreate,
    RecipeApprove,
    RecipeReject,
    CommentDelete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::ProductCreate => "product_create",
            AuditAction::ProductUpdate => "product_update",
            AuditAction::ProductDelete => "product_delete",
            AuditAction::CartAdd => "cart_add",
            AuditAction::CartUpdate => "cart_update",
            AuditAction::CartRemove => "cart_remove",
            AuditAction::Checkout => "checkout",
            AuditAction::OrderCancel => "order_cancel",
            AuditAction::OrderStatusUpdate => "order_status_update",
            AuditAction::PaymentStatusUpdate => "payment_status_update",
            AuditAction::CourierAssign => "courier_assign",
            AuditAction::InventoryAdjust => "inventory_adjust",
            AuditAction::DeliveryAccept => "delivery_accept",
            AuditAction::DeliveryDelivered => "delivery_delivered",
            AuditAction::DeliveryCancel => "delivery_cancel",
            AuditAction::PaymentSettled => "payment_settled",
            AuditAction::RecipeCreate => "recipe_create",
            AuditAction::RecipeApprove => "recipe_approve",
            AuditAction::RecipeReject => "recipe_reject",
            AuditAction::CommentDelete => "comment_delete",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tags_are_stable() {
        // Stored rows are queried by these strings; renames break history.
        assert_eq!(AuditAction::Checkout.as_str(), "checkout");
        assert_eq!(AuditAction::DeliveryDelivered.as_str(), "delivery_delivered");
        assert_eq!(AuditAction::UserLogin.as_str(), "user_login");
        assert_eq!(AuditAction::InventoryAdjust.as_str(), "inventory_adjust");
    }
}
