mod common;

use seabasket_api::{
    dto::{cart::AddToCartRequest, delivery::MarkDeliveredRequest, orders::CheckoutRequest},
    error::AppError,
    middleware::auth::Role,
    services::{admin_service, cart_service, delivery_service, order_service},
};

// Full courier leg: assign -> accept -> deliver with proof -> settle COD.
#[tokio::test]
async fn delivery_lifecycle_and_cod_settlement() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let customer = common::create_user(&state, Role::Customer, "customer@example.com").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;
    let courier = common::create_user(&state, Role::Delivery, "courier@example.com").await?;
    let other_courier =
        common::create_user(&state, Role::Delivery, "courier2@example.com").await?;

    let squid = common::create_product(&state, "Squid Rings", 22000, 30, "piece").await?;
    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: squid,
            quantity: 3,
        },
    )
    .await?;
    let order = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            shipping_address: "45 Wharf Rd".into(),
            billing_address: None,
            payment_method: "cod".into(),
            cart: None,
        },
    )
    .await?
    .data
    .expect("checkout")
    .order;

    // Courier cannot deliver before accepting.
    admin_service::assign_courier(&state, &admin, order.id, courier.user_id).await?;
    let err = delivery_service::mark_delivered(
        &state,
        &courier,
        order.id,
        MarkDeliveredRequest {
            photo_path: None,
            signature_path: None,
        },
    )
    .await
    .expect_err("deliver before accept");
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    // Another courier cannot touch the order.
    let err = delivery_service::accept(&state, &other_courier, order.id)
        .await
        .expect_err("foreign courier");
    assert!(matches!(err, AppError::Forbidden));

    let accepted = delivery_service::accept(&state, &courier, order.id).await?;
    assert_eq!(
        accepted.data.expect("accepted").delivery_status,
        "out_for_delivery"
    );

    // Accepting twice is an invalid transition.
    let err = delivery_service::accept(&state, &courier, order.id)
        .await
        .expect_err("double accept");
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    // Resolve by scanned order number.
    let scanned = delivery_service::lookup_by_qr(&state, &courier, &order.order_number).await?;
    assert_eq!(scanned.data.expect("scan").order.id, order.id);

    let delivered = delivery_service::mark_delivered(
        &state,
        &courier,
        order.id,
        MarkDeliveredRequest {
            photo_path: Some("proofs/photo.jpg".into()),
            signature_path: None,
        },
    )
    .await?
    .data
    .expect("delivered");
    assert_eq!(delivered.order.delivery_status, "delivered");
    // Delivering the package completes the order itself.
    assert_eq!(delivered.order.status, "delivered");
    assert!(delivered.order.delivered_at.is_some());
    assert_eq!(delivered.proof.order_id, order.id);
    assert_eq!(
        delivered.proof.photo_path.as_deref(),
        Some("proofs/photo.jpg")
    );

    // COD settlement is idempotent.
    let settled = delivery_service::settle_payment(&state, &courier, order.id).await?;
    assert_eq!(settled.data.expect("settled").payment_status, "paid");
    let again = delivery_service::settle_payment(&state, &courier, order.id).await?;
    assert_eq!(again.message, "Payment already settled");
    assert_eq!(again.data.expect("still paid").payment_status, "paid");

    Ok(())
}

#[tokio::test]
async fn courier_cancel_requires_reason_and_does_not_restock() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let customer = common::create_user(&state, Role::Customer, "customer@example.com").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;
    let courier = common::create_user(&state, Role::Delivery, "courier@example.com").await?;

    let danggit = common::create_product(&state, "Dried Danggit", 12000, 20, "piece").await?;
    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: danggit,
            quantity: 2,
        },
    )
    .await?;
    let order = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            shipping_address: "45 Wharf Rd".into(),
            billing_address: None,
            payment_method: "cod".into(),
            cart: None,
        },
    )
    .await?
    .data
    .expect("checkout")
    .order;

    admin_service::assign_courier(&state, &admin, order.id, courier.user_id).await?;
    delivery_service::accept(&state, &courier, order.id).await?;

    let err = delivery_service::mark_cancelled(
        &state,
        &courier,
        order.id,
        seabasket_api::dto::delivery::CancelDeliveryRequest { reason: "  ".into() },
    )
    .await
    .expect_err("blank reason");
    assert!(matches!(err, AppError::Validation(_)));

    let cancelled = delivery_service::mark_cancelled(
        &state,
        &courier,
        order.id,
        seabasket_api::dto::delivery::CancelDeliveryRequest {
            reason: "Recipient unreachable".into(),
        },
    )
    .await?
    .data
    .expect("cancelled");
    assert_eq!(cancelled.delivery_status, "cancelled");
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(
        cancelled.delivery_cancel_reason.as_deref(),
        Some("Recipient unreachable")
    );

    // Goods left the warehouse; a failed delivery is reconciled manually,
    // not restocked automatically.
    use sea_orm::EntityTrait;
    let product = seabasket_api::entity::products::Entity::find_by_id(danggit)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(product.stock_quantity, 18);

    Ok(())
}
