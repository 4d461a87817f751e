use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    domain::status::{DeliveryAction, DeliveryStatus, PAYMENT_METHOD_COD, PaymentStatus},
    dto::delivery::{CancelDeliveryRequest, DeliveredResponse, MarkDeliveredRequest},
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        proof_of_deliveries::ActiveModel as ProofActive,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_courier},
    models::{Order, OrderItem},
    notify::{self, NotificationPayload},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Orders currently on the courier's plate: assigned and not yet terminal.
pub async fn list_assigned(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    ensure_courier(user)?;

    let orders = Orders::find()
        .filter(OrderCol::AssignedTo.eq(user.user_id))
        .filter(
            Condition::any()
                .add(OrderCol::DeliveryStatus.eq(DeliveryStatus::ForDelivery.as_str()))
                .add(OrderCol::DeliveryStatus.eq(DeliveryStatus::OutForDelivery.as_str())),
        )
        .order_by_asc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "Assigned orders",
        OrderList { items: orders },
        Some(Meta::empty()),
    ))
}

async fn load_assigned<C: sea_orm::ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    id: Uuid,
    lock: bool,
) -> AppResult<OrderModel> {
    let mut finder = Orders::find().filter(OrderCol::Id.eq(id));
    if lock {
        finder = finder.lock(LockType::Update);
    }
    let order = finder.one(conn).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    // Couriers may only touch orders assigned to them.
    if order.assigned_to != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(order)
}

fn delivery_status_of(order: &OrderModel) -> AppResult<DeliveryStatus> {
    DeliveryStatus::parse(&order.delivery_status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown delivery status")))
}

pub async fn accept(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Order>> {
    ensure_courier(user)?;
    let txn = state.orm.begin().await?;

    let order = load_assigned(&txn, user, id, true).await?;
    let next = delivery_status_of(&order)?.apply(DeliveryAction::Accept)?;

    let mut active: OrderActive = order.into();
    active.delivery_status = Set(next.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::DeliveryAccept,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Delivery accepted",
        order.into(),
        Some(Meta::empty()),
    ))
}

pub async fn mark_delivered(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: MarkDeliveredRequest,
) -> AppResult<ApiResponse<DeliveredResponse>> {
    ensure_courier(user)?;
    let txn = state.orm.begin().await?;

    let order = load_assigned(&txn, user, id, true).await?;
    let next = delivery_status_of(&order)?.apply(DeliveryAction::Deliver)?;
    let now = Utc::now();

    let customer_id = order.user_id;
    let mut active: OrderActive = order.into();
    active.delivery_status = Set(next.as_str().to_string());
    active.delivered_at = Set(Some(now.into()));
    if let Some(status) = next.implied_order_status() {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;

    let proof = ProofActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        courier_id: Set(user.user_id),
        photo_path: Set(payload.photo_path),
        signature_path: Set(payload.signature_path),
        delivered_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    let changed = NotificationPayload::OrderStatusChanged {
        order_id: order.id,
        order_number: order.order_number.clone(),
        status: order.status.clone(),
    };
    if let Err(err) = notify::dispatch(&state.orm, customer_id, changed).await {
        tracing::warn!(error = %err, "delivered notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::DeliveryDelivered,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Marked delivered",
        DeliveredResponse {
            order: order.into(),
            proof: proof.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn mark_cancelled(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CancelDeliveryRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_courier(user)?;
    if payload.reason.trim().is_empty() {
        return Err(AppError::field("reason", "must not be empty"));
    }

    let txn = state.orm.begin().await?;

    let order = load_assigned(&txn, user, id, true).await?;
    let next = delivery_status_of(&order)?.apply(DeliveryAction::Cancel)?;
    let now = Utc::now();

    let customer_id = order.user_id;
    let mut active: OrderActive = order.into();
    active.delivery_status = Set(next.as_str().to_string());
    active.delivery_cancel_reason = Set(Some(payload.reason.clone()));
    active.cancelled_at = Set(Some(now.into()));
    if let Some(status) = next.implied_order_status() {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    let changed = NotificationPayload::OrderStatusChanged {
        order_id: order.id,
        order_number: order.order_number.clone(),
        status: order.status.clone(),
    };
    if let Err(err) = notify::dispatch(&state.orm, customer_id, changed).await {
        tracing::warn!(error = %err, "cancel notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::DeliveryCancel,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "reason": payload.reason })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Delivery cancelled",
        order.into(),
        Some(Meta::empty()),
    ))
}

/// Record the cash-on-delivery payment as received. Idempotent: settling an
/// already-paid order reports success without another write.
pub async fn settle_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_courier(user)?;
    let txn = state.orm.begin().await?;

    let order = load_assigned(&txn, user, id, true).await?;
    if order.payment_method != PAYMENT_METHOD_COD {
        return Err(AppError::BadRequest(
            "Only cash-on-delivery orders are settled by couriers".into(),
        ));
    }

    if order.payment_status == PaymentStatus::Paid.as_str() {
        txn.commit().await?;
        return Ok(ApiResponse::success(
            "Payment already settled",
            order.into(),
            Some(Meta::empty()),
        ));
    }

    let mut active: OrderActive = order.into();
    active.payment_status = Set(PaymentStatus::Paid.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::PaymentSettled,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment settled",
        order.into(),
        Some(Meta::empty()),
    ))
}

/// Resolve an order from a scanned QR token (the order number).
pub async fn lookup_by_qr(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_courier(user)?;

    let order = Orders::find()
        .filter(OrderCol::OrderNumber.eq(code))
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Order found",
        OrderWithItems {
            order: order.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}
