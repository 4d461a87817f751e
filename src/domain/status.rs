use chrono::{DateTime, Duration, Utc};

use crate::error::AppError;

/// Customers may cancel a pending order for this long after placing it.
pub const CANCEL_WINDOW_MINUTES: i64 = 30;

/// Customer-facing order progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Admin-driven status moves. Delivered and cancelled are terminal.
    pub fn can_become(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Processing)
            | (OrderStatus::Pending, OrderStatus::Cancelled)
            | (OrderStatus::Pending, OrderStatus::Delivered)
            | (OrderStatus::Processing, OrderStatus::Delivered)
            | (OrderStatus::Processing, OrderStatus::Cancelled) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Only cash on delivery is live; other methods are reserved.
pub const PAYMENT_METHOD_COD: &str = "cod";

/// Recipe moderation pipeline. Author moves draft/rejected -> submitted,
/// admins move submitted -> under_review -> approved/rejected.
pub const RECIPE_DRAFT: &str = "draft";
pub const RECIPE_SUBMITTED: &str = "submitted";
pub const RECIPE_UNDER_REVIEW: &str = "under_review";
pub const RECIPE_APPROVED: &str = "approved";
pub const RECIPE_REJECTED: &str = "rejected";

/// Courier-facing fulfillment state, independent of [`OrderStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    ForDelivery,
    OutForDelivery,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryAction {
    Accept,
    Deliver,
    Cancel,
}

impl DeliveryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryAction::Accept => "accept",
            DeliveryAction::Deliver => "deliver",
            DeliveryAction::Cancel => "cancel",
        }
    }
}

impl DeliveryStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "for_delivery" => Some(DeliveryStatus::ForDelivery),
            "out_for_delivery" => Some(DeliveryStatus::OutForDelivery),
            "delivered" => Some(DeliveryStatus::Delivered),
            "cancelled" => Some(DeliveryStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::ForDelivery => "for_delivery",
            DeliveryStatus::OutForDelivery => "out_for_delivery",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }

    /// The full transition table. Anything not listed fails.
    pub fn apply(self, action: DeliveryAction) -> Result<DeliveryStatus, AppError> {
        match (self, action) {
            (DeliveryStatus::ForDelivery, DeliveryAction::Accept) => {
                Ok(DeliveryStatus::OutForDelivery)
            }
            (DeliveryStatus::OutForDelivery, DeliveryAction::Deliver) => {
                Ok(DeliveryStatus::Delivered)
            }
            (DeliveryStatus::ForDelivery, DeliveryAction::Cancel)
            | (DeliveryStatus::OutForDelivery, DeliveryAction::Cancel) => {
                Ok(DeliveryStatus::Cancelled)
            }
            (from, action) => Err(AppError::InvalidTransition {
                machine: "delivery",
                from: from.as_str().to_string(),
                action: action.as_str(),
            }),
        }
    }

    /// Order status the courier action drags the order into, reconciling the
    /// two otherwise independent machines: a delivered delivery means a
    /// delivered order, a courier cancel means a cancelled order.
    pub fn implied_order_status(self) -> Option<OrderStatus> {
        match self {
            DeliveryStatus::Delivered => Some(OrderStatus::Delivered),
            DeliveryStatus::Cancelled => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// A customer may cancel iff the order is still pending and the window has
/// not elapsed. The boundary is exclusive: at exactly 30 minutes it is closed.
pub fn is_cancellable(
    status: OrderStatus,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    status == OrderStatus::Pending
        && now < created_at + Duration::minutes(CANCEL_WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_happy_path() {
        let s = DeliveryStatus::ForDelivery;
        let s = s.apply(DeliveryAction::Accept).unwrap();
        assert_eq!(s, DeliveryStatus::OutForDelivery);
        let s = s.apply(DeliveryAction::Deliver).unwrap();
        assert_eq!(s, DeliveryStatus::Delivered);
    }

    #[test]
    fn delivery_cancel_from_either_active_state() {
        assert_eq!(
            DeliveryStatus::ForDelivery
                .apply(DeliveryAction::Cancel)
                .unwrap(),
            DeliveryStatus::Cancelled
        );
        assert_eq!(
            DeliveryStatus::OutForDelivery
                .apply(DeliveryAction::Cancel)
                .unwrap(),
            DeliveryStatus::Cancelled
        );
    }

    #[test]
    fn delivery_transition_table_is_total() {
        let states = [
            DeliveryStatus::ForDelivery,
            DeliveryStatus::OutForDelivery,
            DeliveryStatus::Delivered,
            DeliveryStatus::Cancelled,
        ];
        let actions = [
            DeliveryAction::Accept,
            DeliveryAction::Deliver,
            DeliveryAction::Cancel,
        ];
        for state in states {
            for action in actions {
                let allowed = matches!(
                    (state, action),
                    (DeliveryStatus::ForDelivery, DeliveryAction::Accept)
                        | (DeliveryStatus::OutForDelivery, DeliveryAction::Deliver)
                        | (DeliveryStatus::ForDelivery, DeliveryAction::Cancel)
                        | (DeliveryStatus::OutForDelivery, DeliveryAction::Cancel)
                );
                assert_eq!(state.apply(action).is_ok(), allowed, "{state:?} {action:?}");
            }
        }
    }

    #[test]
    fn accept_from_terminal_states_fails() {
        for state in [DeliveryStatus::Delivered, DeliveryStatus::Cancelled] {
            let err = state.apply(DeliveryAction::Accept).unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn cancellable_only_while_pending_and_inside_window() {
        let created = Utc::now();
        let at = |mins: i64, secs: i64| created + Duration::minutes(mins) + Duration::seconds(secs);

        assert!(is_cancellable(OrderStatus::Pending, created, at(29, 59)));
        // Exactly 30 minutes is outside the window.
        assert!(!is_cancellable(OrderStatus::Pending, created, at(30, 0)));
        assert!(!is_cancellable(OrderStatus::Pending, created, at(30, 1)));
        assert!(!is_cancellable(OrderStatus::Processing, created, at(0, 10)));
        assert!(!is_cancellable(OrderStatus::Cancelled, created, at(0, 10)));
    }

    #[test]
    fn admin_status_moves() {
        assert!(OrderStatus::Pending.can_become(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_become(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_become(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_become(OrderStatus::Processing));
    }

    #[test]
    fn courier_terminal_states_imply_order_status() {
        assert_eq!(
            DeliveryStatus::Delivered.implied_order_status(),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(
            DeliveryStatus::Cancelled.implied_order_status(),
            Some(OrderStatus::Cancelled)
        );
        assert_eq!(DeliveryStatus::OutForDelivery.implied_order_status(), None);
    }
}
