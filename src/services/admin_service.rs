use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    domain::status::{
        DeliveryStatus, OrderStatus, PaymentStatus, RECIPE_APPROVED, RECIPE_REJECTED,
        RECIPE_SUBMITTED, RECIPE_UNDER_REVIEW,
    },
    dto::orders::{OrderList, OrderWithItems},
    dto::products::ProductList,
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        product_labels::{
            ActiveModel as LabelActive, Column as LabelCol, Entity as ProductLabels,
        },
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        recipes::{ActiveModel as RecipeActive, Entity as Recipes},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_admin},
    models::{Order, OrderItem, Product, ProductLabel, Recipe},
    notify::{self, NotificationPayload},
    response::{ApiResponse, Meta},
    routes::admin::{
        InventoryAdjustRequest, LowStockQuery, UpdateOrderStatusRequest,
        UpdatePaymentStatusRequest,
    },
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
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
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id).one(&state.orm).await?;
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

    let data = OrderWithItems {
        order: order.into(),
        items,
    };
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let next = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid order status".into()))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current = OrderStatus::parse(&existing.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown order status")))?;
    if !current.can_become(next) {
        return Err(AppError::InvalidTransition {
            machine: "order",
            from: existing.status.clone(),
            action: "update_status",
        });
    }

    let customer_id = existing.user_id;
    let mut active: OrderActive = existing.into();
    active.status = Set(next.as_str().to_string());
    // Cancelling the order also terminates its delivery leg.
    if next == OrderStatus::Cancelled {
        active.delivery_status = Set(DeliveryStatus::Cancelled.as_str().to_string());
        active.cancelled_at = Set(Some(Utc::now().into()));
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    let changed = NotificationPayload::OrderStatusChanged {
        order_id: order.id,
        order_number: order.order_number.clone(),
        status: order.status.clone(),
    };
    if let Err(err) = notify::dispatch(&state.orm, customer_id, changed).await {
        tracing::warn!(error = %err, "status notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::OrderStatusUpdate,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_payment_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let next = PaymentStatus::parse(&payload.payment_status)
        .ok_or_else(|| AppError::BadRequest("Invalid payment status".into()))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.payment_status = Set(next.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::PaymentStatusUpdate,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "payment_status": order.payment_status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment status updated",
        order.into(),
        Some(Meta::empty()),
    ))
}

pub async fn assign_courier(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    courier_id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let courier = Users::find()
        .filter(UserCol::Id.eq(courier_id))
        .filter(UserCol::Role.eq(Role::Delivery.as_str()))
        .one(&state.orm)
        .await?;
    if courier.is_none() {
        return Err(AppError::field("courier_id", "no such courier"));
    }

    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    // Reassignment is only possible before the courier accepts.
    if order.delivery_status != DeliveryStatus::ForDelivery.as_str() {
        return Err(AppError::InvalidTransition {
            machine: "delivery",
            from: order.delivery_status.clone(),
            action: "assign",
        });
    }

    let mut active: OrderActive = order.into();
    active.assigned_to = Set(Some(courier_id));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    let assigned = NotificationPayload::DeliveryAssigned {
        order_id: order.id,
        order_number: order.order_number.clone(),
    };
    if let Err(err) = notify::dispatch(&state.orm, courier_id, assigned).await {
        tracing::warn!(error = %err, "assignment notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CourierAssign,
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "courier_id": courier_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Courier assigned",
        order.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let threshold = query.threshold.unwrap_or(state.config.low_stock_threshold);
    let (page, limit, offset) = query.pagination.normalize();

    let mut finder = Products::find().filter(ProdCol::StockQuantity.lte(threshold));
    finder = finder
        .order_by_asc(ProdCol::StockQuantity)
        .order_by_desc(ProdCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let data = ProductList { items };
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Low stock", data, Some(meta)))
}

pub async fn adjust_inventory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: InventoryAdjustRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    if payload.delta == 0 {
        return Err(AppError::field("delta", "must not be 0"));
    }

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let new_stock = product.stock_quantity + payload.delta;
    if new_stock < 0 {
        return Err(AppError::field("delta", "stock cannot be negative"));
    }

    let mut active: ProductActive = product.into();
    active.stock_quantity = Set(new_stock);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    if updated.stock_quantity <= state.config.low_stock_threshold {
        let alert = NotificationPayload::LowStock {
            product_id: updated.id,
            name: updated.name.clone(),
            stock_quantity: updated.stock_quantity,
        };
        if let Err(err) = notify::dispatch_to_admins(&state.orm, alert).await {
            tracing::warn!(error = %err, "low stock alert failed");
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::InventoryAdjust,
        Some("products"),
        Some(serde_json::json!({ "product_id": updated.id, "delta": payload.delta })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Inventory updated",
        updated.into(),
        Some(Meta::empty()),
    ))
}

pub async fn mark_label_printed(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    product_id: Uuid,
) -> AppResult<ApiResponse<ProductLabel>> {
    ensure_admin(user)?;

    let label = ProductLabels::find()
        .filter(LabelCol::OrderId.eq(order_id))
        .filter(LabelCol::ProductId.eq(product_id))
        .one(&state.orm)
        .await?;
    let label = match label {
        Some(l) => l,
        None => return Err(AppError::NotFound),
    };

    let mut active: LabelActive = label.into();
    active.is_printed = Set(true);
    let label = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Label printed",
        label.into(),
        Some(Meta::empty()),
    ))
}

pub async fn start_recipe_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Recipe>> {
    ensure_admin(user)?;
    let recipe = Recipes::find_by_id(id).one(&state.orm).await?;
    let recipe = match recipe {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if recipe.status != RECIPE_SUBMITTED {
        return Err(AppError::InvalidTransition {
            machine: "recipe",
            from: recipe.status.clone(),
            action: "start_review",
        });
    }

    let mut active: RecipeActive = recipe.into();
    active.status = Set(RECIPE_UNDER_REVIEW.to_string());
    active.updated_at = Set(Utc::now().into());
    let recipe = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Recipe under review",
        recipe.into(),
        Some(Meta::empty()),
    ))
}

pub async fn approve_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Recipe>> {
    ensure_admin(user)?;
    let recipe = Recipes::find_by_id(id).one(&state.orm).await?;
    let recipe = match recipe {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if recipe.status != RECIPE_SUBMITTED && recipe.status != RECIPE_UNDER_REVIEW {
        return Err(AppError::InvalidTransition {
            machine: "recipe",
            from: recipe.status.clone(),
            action: "approve",
        });
    }

    let author_id = recipe.created_by;
    let title = recipe.title.clone();
    let mut active: RecipeActive = recipe.into();
    active.status = Set(RECIPE_APPROVED.to_string());
    active.approved_by = Set(Some(user.user_id));
    active.approved_at = Set(Some(Utc::now().into()));
    active.rejection_reason = Set(None);
    active.updated_at = Set(Utc::now().into());
    let recipe = active.update(&state.orm).await?;

    let approved = NotificationPayload::RecipeApproved {
        recipe_id: recipe.id,
        title,
    };
    if let Err(err) = notify::dispatch(&state.orm, author_id, approved).await {
        tracing::warn!(error = %err, "approval notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeApprove,
        Some("recipes"),
        Some(serde_json::json!({ "recipe_id": recipe.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Recipe approved",
        recipe.into(),
        Some(Meta::empty()),
    ))
}

pub async fn reject_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    reason: String,
) -> AppResult<ApiResponse<Recipe>> {
    ensure_admin(user)?;
    if reason.trim().is_empty() {
        return Err(AppError::field("reason", "must not be empty"));
    }

    let recipe = Recipes::find_by_id(id).one(&state.orm).await?;
    let recipe = match recipe {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if recipe.status != RECIPE_SUBMITTED && recipe.status != RECIPE_UNDER_REVIEW {
        return Err(AppError::InvalidTransition {
            machine: "recipe",
            from: recipe.status.clone(),
            action: "reject",
        });
    }

    let author_id = recipe.created_by;
    let title = recipe.title.clone();
    let mut active: RecipeActive = recipe.into();
    active.status = Set(RECIPE_REJECTED.to_string());
    active.rejection_reason = Set(Some(reason.clone()));
    active.updated_at = Set(Utc::now().into());
    let recipe = active.update(&state.orm).await?;

    let rejected = NotificationPayload::RecipeRejected {
        recipe_id: recipe.id,
        title,
        reason,
    };
    if let Err(err) = notify::dispatch(&state.orm, author_id, rejected).await {
        tracing::warn!(error = %err, "rejection notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeReject,
        Some("recipes"),
        Some(serde_json::json!({ "recipe_id": recipe.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Recipe rejected",
        recipe.into(),
        Some(Meta::empty()),
    ))
}
