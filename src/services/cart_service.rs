use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    domain::units::{self, UnitType},
    dto::cart::{AddToCartRequest, CartLineDto, CartView, SyncCartLine, UpdateCartItemRequest},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        products::{Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Quantity rules shared by every cart mutation: the product must be
/// available, the quantity must fit the unit granularity, and it may not
/// exceed what is in stock.
fn check_line(product: &ProductModel, quantity: i32) -> Result<UnitType, AppError> {
    if !product.is_available {
        return Err(AppError::field("product_id", "product is not available"));
    }
    let unit = UnitType::parse(&product.unit_type);
    units::validate_quantity(unit, quantity)?;
    if quantity as i64 > units::max_quantity(unit, product.stock_quantity) {
        return Err(AppError::field("quantity", "exceeds available stock"));
    }
    Ok(unit)
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .find_also_related(Products)
        .order_by_desc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    let mut total: i64 = 0;
    for (line, product) in rows {
        let product = match product {
            Some(p) => p,
            // Line referencing a deleted product; skip it.
            None => continue,
        };
        let unit = UnitType::parse(&product.unit_type);
        let subtotal = units::line_subtotal(product.price, unit, line.quantity);
        total += subtotal;
        items.push(CartLineDto {
            id: line.id,
            product: Product::from(product),
            quantity: line.quantity,
            subtotal,
        });
    }

    Ok(ApiResponse::success(
        "OK",
        CartView { items, total },
        Some(Meta::empty()),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartLineDto>> {
    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::field("product_id", "product not found")),
    };

    let exist = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(payload.product_id))
        .one(&state.orm)
        .await?;

    // Adding an already-carted product merges by summing quantities.
    let new_quantity = match &exist {
        Some(line) => line.quantity + payload.quantity,
        None => payload.quantity,
    };
    let unit = check_line(&product, new_quantity)?;

    let line = match exist {
        Some(line) => {
            let mut active: CartActive = line.into();
            active.quantity = Set(new_quantity);
            active.update(&state.orm).await?
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(payload.product_id),
                quantity: Set(new_quantity),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CartAdd,
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": payload.product_id, "quantity": new_quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let subtotal = units::line_subtotal(product.price, unit, line.quantity);
    let dto = CartLineDto {
        id: line.id,
        product: Product::from(product),
        quantity: line.quantity,
        subtotal,
    };
    Ok(ApiResponse::success("OK", dto, None))
}

pub async fn update_cart_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartLineDto>> {
    let line = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(product_id))
        .one(&state.orm)
        .await?;
    let line = match line {
        Some(l) => l,
        None => return Err(AppError::NotFound),
    };

    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let unit = check_line(&product, payload.quantity)?;

    let mut active: CartActive = line.into();
    active.quantity = Set(payload.quantity);
    let line = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CartUpdate,
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let subtotal = units::line_subtotal(product.price, unit, line.quantity);
    let dto = CartLineDto {
        id: line.id,
        product: Product::from(product),
        quantity: line.quantity,
        subtotal,
    };
    Ok(ApiResponse::success("OK", dto, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CartRemove,
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Overwrite the server-side cart with a client snapshot. Lines with zero or
/// negative quantity are dropped; everything else is validated like a normal
/// add. Used directly and from checkout.
pub async fn sync_cart(state: &AppState, user: &AuthUser, lines: &[SyncCartLine]) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    for line in lines {
        if line.quantity <= 0 {
            continue;
        }
        let product = Products::find_by_id(line.product_id).one(&txn).await?;
        let product = match product {
            Some(p) => p,
            None => return Err(AppError::field("product_id", "product not found")),
        };
        check_line(&product, line.quantity)?;

        CartActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(())
}
