use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    domain::{
        status::{
            CANCEL_WINDOW_MINUTES, DeliveryStatus, OrderStatus, PAYMENT_METHOD_COD, PaymentStatus,
            is_cancellable,
        },
        units::{self, UnitType},
    },
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        product_labels::ActiveModel as LabelActive,
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, ProductLabel},
    notify::{self, NotificationPayload},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    if payload.payment_method != PAYMENT_METHOD_COD {
        return Err(AppError::UnsupportedPaymentMethod(payload.payment_method));
    }
    if payload.shipping_address.trim().is_empty() {
        return Err(AppError::field("shipping_address", "must not be empty"));
    }

    // Reconcile any client-side optimistic cart before snapshotting.
    if let Some(lines) = &payload.cart {
        super::cart_service::sync_cart(state, user, lines).await?;
    }

    let txn = state.orm.begin().await?;

    let mut lines = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .all(&txn)
        .await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    // Lock products in a stable order so overlapping checkouts cannot deadlock.
    lines.sort_by_key(|line| line.product_id);

    let mut total_amount: i64 = 0;
    // (product id, name, unit price, unit type, cart quantity, stock after)
    let mut snapshots: Vec<(Uuid, String, i64, UnitType, i32, i32)> = Vec::new();

    for line in &lines {
        let product = Products::find_by_id(line.product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let product = match product {
            Some(p) => p,
            None => return Err(AppError::NotFound),
        };

        let unit = UnitType::parse(&product.unit_type);
        if !product.is_available
            || line.quantity as i64 > units::max_quantity(unit, product.stock_quantity)
        {
            return Err(AppError::InsufficientStock {
                product: product.name,
            });
        }

        // Conditional decrement: the stock check and write are one statement,
        // so a concurrent checkout cannot drive stock negative.
        let needed = units::stock_units(unit, line.quantity);
        let updated = Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).sub(needed),
            )
            .filter(ProdCol::Id.eq(product.id))
            .filter(ProdCol::StockQuantity.gte(needed))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(AppError::InsufficientStock {
                product: product.name,
            });
        }

        total_amount += units::line_subtotal(product.price, unit, line.quantity);
        snapshots.push((
            product.id,
            product.name.clone(),
            product.price,
            unit,
            line.quantity,
            product.stock_quantity - needed,
        ));
    }

    let order_id = Uuid::new_v4();
    let order_number = build_order_number(order_id);

    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        order_number: Set(order_number.clone()),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
        payment_method: Set(PAYMENT_METHOD_COD.to_string()),
        shipping_address: Set(payload.shipping_address),
        billing_address: Set(payload.billing_address),
        assigned_to: Set(None),
        delivery_status: Set(DeliveryStatus::ForDelivery.as_str().to_string()),
        delivery_cancel_reason: Set(None),
        delivered_at: Set(None),
        cancelled_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();
    let mut labels: Vec<ProductLabel> = Vec::new();

    for (product_id, _, price, unit, quantity, _) in &snapshots {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(*product_id),
            quantity: Set(*quantity),
            price: Set(*price),
            unit_type: Set(unit.as_str().to_string()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        order_items.push(item.into());

        let label = LabelActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(*product_id),
            qr_code_path: Set(format!("qrcodes/{order_number}/{product_id}.png")),
            label_path: Set(format!("labels/{order_number}/{product_id}.pdf")),
            is_printed: Set(false),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        labels.push(label.into());
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    let placed = NotificationPayload::OrderPlaced {
        order_id: order.id,
        order_number: order.order_number.clone(),
        total_amount,
    };
    if let Err(err) = notify::dispatch(&state.orm, user.user_id, placed).await {
        tracing::warn!(error = %err, "order placed notification failed");
    }

    if total_amount >= state.config.high_value_threshold {
        let alert = NotificationPayload::HighValueOrder {
            order_id: order.id,
            order_number: order.order_number.clone(),
            total_amount,
        };
        if let Err(err) = notify::dispatch_to_admins(&state.orm, alert).await {
            tracing::warn!(error = %err, "high value alert failed");
        }
    }

    for (product_id, name, _, _, _, stock_after) in &snapshots {
        if *stock_after <= state.config.low_stock_threshold {
            let alert = NotificationPayload::LowStock {
                product_id: *product_id,
                name: name.clone(),
                stock_quantity: *stock_after,
            };
            if let Err(err) = notify::dispatch_to_admins(&state.orm, alert).await {
                tracing::warn!(error = %err, "low stock alert failed");
            }
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::Checkout,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "order_number": order.order_number })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse {
            order: order.into(),
            items: order_items,
            labels,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
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
        "OK",
        OrderWithItems {
            order: order.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;

    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let status = OrderStatus::parse(&order.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown order status")))?;
    if status != OrderStatus::Pending {
        return Err(AppError::InvalidTransition {
            machine: "order",
            from: order.status.clone(),
            action: "cancel",
        });
    }
    let created_at = order.created_at.with_timezone(&Utc);
    if !is_cancellable(status, created_at, Utc::now()) {
        return Err(AppError::CancellationWindowExpired(CANCEL_WINDOW_MINUTES));
    }

    // Put the ordered quantities back on the shelf.
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&txn)
        .await?;
    for item in &items {
        let unit = UnitType::parse(&item.unit_type);
        let restore = units::stock_units(unit, item.quantity);
        Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).add(restore),
            )
            .filter(ProdCol::Id.eq(item.product_id))
            .exec(&txn)
            .await?;
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Cancelled.as_str().to_string());
    active.delivery_status = Set(DeliveryStatus::Cancelled.as_str().to_string());
    active.cancelled_at = Set(Some(Utc::now().into()));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    let changed = NotificationPayload::OrderStatusChanged {
        order_id: order.id,
        order_number: order.order_number.clone(),
        status: order.status.clone(),
    };
    if let Err(err) = notify::dispatch(&state.orm, user.user_id, changed).await {
        tracing::warn!(error = %err, "cancel notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::OrderCancel,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order cancelled",
        order.into(),
        Some(Meta::empty()),
    ))
}

fn build_order_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.to_string();
    let short = &suffix[..8];
    format!("SB-{}-{}", date, short)
}
