mod common;

use seabasket_api::{
    dto::{cart::AddToCartRequest, orders::CheckoutRequest},
    entity::products::Entity as Products,
    error::AppError,
    middleware::auth::Role,
    services::{cart_service, order_service},
};

use sea_orm::EntityTrait;

// Integration flow: mixed piece/kg cart -> checkout -> cancel restores stock.
#[tokio::test]
async fn checkout_totals_and_cancel_restore_stock() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let customer = common::create_user(&state, Role::Customer, "customer@example.com").await?;

    // Bangus at 185.00/kg, sardines at 35.00 apiece.
    let bangus = common::create_product(&state, "Bangus", 18500, 10, "kg").await?;
    let sardines = common::create_product(&state, "Canned Sardines", 3500, 50, "piece").await?;

    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: bangus,
            quantity: 250,
        },
    )
    .await?;
    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: sardines,
            quantity: 2,
        },
    )
    .await?;

    let resp = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            shipping_address: "123 Seaside St, Iloilo".into(),
            billing_address: None,
            payment_method: "cod".into(),
            cart: None,
        },
    )
    .await?;
    let checkout = resp.data.expect("checkout data");

    // 250g of 185.00/kg rounds half-up to 46.25; two tins add 70.00.
    assert_eq!(checkout.order.total_amount, 4625 + 7000);
    assert_eq!(checkout.order.status, "pending");
    assert_eq!(checkout.order.delivery_status, "for_delivery");
    assert_eq!(checkout.items.len(), 2);
    assert_eq!(checkout.labels.len(), 2);
    assert!(checkout.order.order_number.starts_with("SB-"));

    // 250g reserved a whole kilogram; piece stock dropped by the count.
    let bangus_after = Products::find_by_id(bangus)
        .one(&state.orm)
        .await?
        .expect("bangus");
    assert_eq!(bangus_after.stock_quantity, 9);
    let sardines_after = Products::find_by_id(sardines)
        .one(&state.orm)
        .await?
        .expect("sardines");
    assert_eq!(sardines_after.stock_quantity, 48);

    // Checkout empties the cart.
    let cart = cart_service::list_cart(&state, &customer).await?;
    assert!(cart.data.expect("cart").items.is_empty());

    // Cancel within the window puts everything back.
    let cancelled = order_service::cancel_order(&state, &customer, checkout.order.id).await?;
    let cancelled = cancelled.data.expect("cancelled order");
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.delivery_status, "cancelled");
    assert!(cancelled.cancelled_at.is_some());

    let bangus_restored = Products::find_by_id(bangus)
        .one(&state.orm)
        .await?
        .expect("bangus");
    assert_eq!(bangus_restored.stock_quantity, 10);
    let sardines_restored = Products::find_by_id(sardines)
        .one(&state.orm)
        .await?
        .expect("sardines");
    assert_eq!(sardines_restored.stock_quantity, 50);

    // A cancelled order cannot be cancelled twice.
    let err = order_service::cancel_order(&state, &customer, checkout.order.id)
        .await
        .expect_err("double cancel");
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    Ok(())
}

// Two buyers race for the last pieces on the shelf; the conditional stock
// decrement lets exactly one of them through.
#[tokio::test]
async fn concurrent_checkouts_cannot_oversell() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let ana = common::create_user(&state, Role::Customer, "ana@example.com").await?;
    let ben = common::create_user(&state, Role::Customer, "ben@example.com").await?;

    // Five packs left; both carts want three.
    let danggit = common::create_product(&state, "Dried Danggit", 12000, 5, "piece").await?;
    // A second shared product so both checkouts walk a multi-line lock order.
    let sardines = common::create_product(&state, "Canned Sardines", 3500, 50, "piece").await?;

    for buyer in [&ana, &ben] {
        cart_service::add_to_cart(
            &state,
            buyer,
            AddToCartRequest {
                product_id: danggit,
                quantity: 3,
            },
        )
        .await?;
        cart_service::add_to_cart(
            &state,
            buyer,
            AddToCartRequest {
                product_id: sardines,
                quantity: 1,
            },
        )
        .await?;
    }

    fn cod_checkout() -> CheckoutRequest {
        CheckoutRequest {
            shipping_address: "123 Seaside St, Iloilo".into(),
            billing_address: None,
            payment_method: "cod".into(),
            cart: None,
        }
    }

    let ana_checkout = order_service::checkout(&state, &ana, cod_checkout());
    let ben_checkout = order_service::checkout(&state, &ben, cod_checkout());
    let (first, second) = tokio::join!(ana_checkout, ben_checkout);

    assert!(
        first.is_ok() != second.is_ok(),
        "exactly one checkout should win"
    );
    let (loser, err) = match (first, second) {
        (Err(err), Ok(_)) => (&ana, err),
        (Ok(_), Err(err)) => (&ben, err),
        _ => unreachable!(),
    };
    assert!(matches!(err, AppError::InsufficientStock { .. }));

    // Winner took three packs, the loser's transaction rolled back whole.
    let danggit_after = Products::find_by_id(danggit)
        .one(&state.orm)
        .await?
        .expect("danggit");
    assert_eq!(danggit_after.stock_quantity, 2);
    let sardines_after = Products::find_by_id(sardines)
        .one(&state.orm)
        .await?
        .expect("sardines");
    assert_eq!(sardines_after.stock_quantity, 49);

    // The failed checkout leaves the loser's cart untouched.
    let cart = cart_service::list_cart(&state, loser).await?;
    assert_eq!(cart.data.expect("cart").items.len(), 2);

    Ok(())
}

#[tokio::test]
async fn checkout_rejects_oversell_and_bad_payment() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let customer = common::create_user(&state, Role::Customer, "buyer@example.com").await?;
    let crab = common::create_product(&state, "Blue Crab", 48000, 2, "kg").await?;

    // Granularity: grams must land on the 250g step.
    let err = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: crab,
            quantity: 300,
        },
    )
    .await
    .expect_err("off-step grams");
    assert!(matches!(err, AppError::Validation(_)));

    // More grams than the shelf holds.
    let err = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: crab,
            quantity: 2250,
        },
    )
    .await
    .expect_err("beyond stock");
    assert!(matches!(err, AppError::Validation(_)));

    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: crab,
            quantity: 2000,
        },
    )
    .await?;

    // Only cash on delivery is supported.
    let err = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            shipping_address: "123 Seaside St".into(),
            billing_address: None,
            payment_method: "card".into(),
            cart: None,
        },
    )
    .await
    .expect_err("card checkout");
    assert!(matches!(err, AppError::UnsupportedPaymentMethod(_)));

    Ok(())
}
