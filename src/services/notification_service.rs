use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::notifications::NotificationList,
    entity::notifications::{
        ActiveModel as NotificationActive, Column as NotifCol, Entity as Notifications,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    response::{ApiResponse, Meta},
    routes::params::NotificationQuery,
    state::AppState,
};

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
    query: NotificationQuery,
) -> AppResult<ApiResponse<NotificationList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(NotifCol::UserId.eq(user.user_id));
    if query.unread_only.unwrap_or(false) {
        condition = condition.add(NotifCol::ReadAt.is_null());
    }

    let finder = Notifications::find()
        .filter(condition)
        .order_by_desc(NotifCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Notification::from)
        .collect();

    Ok(ApiResponse::success(
        "Notifications",
        NotificationList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Notification>> {
    let notification = Notifications::find()
        .filter(NotifCol::Id.eq(id))
        .filter(NotifCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let notification = match notification {
        Some(n) => n,
        None => return Err(AppError::NotFound),
    };

    // Re-reading an already-read notification is a no-op.
    if notification.read_at.is_some() {
        return Ok(ApiResponse::success(
            "Already read",
            notification.into(),
            Some(Meta::empty()),
        ));
    }

    let mut active: NotificationActive = notification.into();
    active.read_at = Set(Some(Utc::now().into()));
    let notification = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Marked read",
        notification.into(),
        Some(Meta::empty()),
    ))
}

pub async fn mark_all_read(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Notifications::update_many()
        .col_expr(
            NotifCol::ReadAt,
            sea_orm::sea_query::Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(
                Utc::now(),
            )),
        )
        .filter(NotifCol::UserId.eq(user.user_id))
        .filter(NotifCol::ReadAt.is_null())
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "All read",
        serde_json::json!({ "updated": result.rows_affected }),
        Some(Meta::empty()),
    ))
}
