use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::delivery::{CancelDeliveryRequest, DeliveredResponse, MarkDeliveredRequest},
    dto::orders::{OrderList, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::delivery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_assigned))
        .route("/orders/{id}/accept", post(accept_delivery))
        .route("/orders/{id}/delivered", post(mark_delivered))
        .route("/orders/{id}/cancel", post(cancel_delivery))
        .route("/orders/{id}/settle", post(settle_payment))
        .route("/scan/{code}", get(lookup_by_qr))
}

#[utoipa::path(
    get,
    path = "/api/delivery/orders",
    responses(
        (status = 200, description = "Orders assigned to the courier", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn list_assigned(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = delivery_service::list_assigned(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Delivery accepted", body = ApiResponse<Order>),
        (status = 403, description = "Not assigned to this courier"),
        (status = 409, description = "Invalid transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn accept_delivery(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = delivery_service::accept(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/delivered",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = MarkDeliveredRequest,
    responses(
        (status = 200, description = "Delivered with proof", body = ApiResponse<DeliveredResponse>),
        (status = 403, description = "Not assigned to this courier"),
        (status = 409, description = "Invalid transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn mark_delivered(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarkDeliveredRequest>,
) -> AppResult<Json<ApiResponse<DeliveredResponse>>> {
    let resp = delivery_service::mark_delivered(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = CancelDeliveryRequest,
    responses(
        (status = 200, description = "Delivery cancelled with reason", body = ApiResponse<Order>),
        (status = 400, description = "Missing reason"),
        (status = 409, description = "Invalid transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn cancel_delivery(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelDeliveryRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = delivery_service::mark_cancelled(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/settle",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "COD payment recorded", body = ApiResponse<Order>),
        (status = 400, description = "Not a cash-on-delivery order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn settle_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = delivery_service::settle_payment(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/delivery/scan/{code}",
    params(
        ("code" = String, Path, description = "Scanned order number")
    ),
    responses(
        (status = 200, description = "Order resolved from QR code", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Unknown code"),
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn lookup_by_qr(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = delivery_service::lookup_by_qr(&state, &user, &code).await?;
    Ok(Json(resp))
}
