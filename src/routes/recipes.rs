use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::recipes::{
        CommentRequest, CommentThreadList, CreateRecipeRequest, EditCommentRequest,
        ReactionRequest, ReactionSummary, RecipeDetail, RecipeList, ReviewList, ReviewRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Recipe, RecipeComment, RecipeReview},
    response::ApiResponse,
    routes::params::{Pagination, RecipeQuery},
    services::recipe_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes))
        .route("/", post(create_recipe))
        .route("/{id}", get(get_recipe))
        .route("/{id}/submit", post(submit_recipe))
        .route("/{id}/reviews", get(list_reviews))
        .route("/{id}/reviews", post(create_review))
        .route("/{id}/comments", get(list_comments))
        .route("/{id}/comments", post(create_comment))
        .route("/{id}/reactions", post(react_to_recipe))
        .route("/reviews/{id}", put(update_review))
        .route("/reviews/{id}", delete(delete_review))
        .route("/comments/{id}", put(edit_comment))
        .route("/comments/{id}", delete(delete_comment))
        .route("/comments/{id}/reactions", post(react_to_comment))
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search by title"),
        ("difficulty" = Option<String>, Query, description = "Filter by difficulty"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc"),
    ),
    responses(
        (status = 200, description = "List approved recipes", body = ApiResponse<RecipeList>)
    ),
    tag = "Recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> AppResult<Json<ApiResponse<RecipeList>>> {
    let resp = recipe_service::list_recipes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe with live rating summary", body = ApiResponse<RecipeDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Recipes"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RecipeDetail>>> {
    let resp = recipe_service::get_recipe(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Create recipe draft", body = ApiResponse<Recipe>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    let resp = recipe_service::create_recipe(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Submit draft for moderation", body = ApiResponse<Recipe>),
        (status = 403, description = "Not the author"),
        (status = 409, description = "Invalid transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn submit_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    let resp = recipe_service::submit_recipe(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Recipe ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Reviews for a recipe", body = ApiResponse<ReviewList>)
    ),
    tag = "Recipes"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = recipe_service::list_reviews(&state, id, pagination).await?;
    Ok(Json(resp))
}

// Duplicate reviews come back with success = false and the existing row.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review created or duplicate flagged", body = ApiResponse<RecipeReview>),
        (status = 400, description = "Rating out of range"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApiResponse<RecipeReview>>> {
    let resp = recipe_service::create_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/recipes/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<RecipeReview>),
        (status = 403, description = "Not the author"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApiResponse<RecipeReview>>> {
    let resp = recipe_service::update_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Not the author or an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = recipe_service::delete_review(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Comment threads, oldest first", body = ApiResponse<CommentThreadList>)
    ),
    tag = "Recipes"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CommentThreadList>>> {
    let resp = recipe_service::list_comments(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment created", body = ApiResponse<RecipeComment>),
        (status = 400, description = "Empty comment or parent on another recipe"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<Json<ApiResponse<RecipeComment>>> {
    let resp = recipe_service::create_comment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/recipes/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = EditCommentRequest,
    responses(
        (status = 200, description = "Comment edited", body = ApiResponse<RecipeComment>),
        (status = 403, description = "Not the author or edit window expired"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn edit_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditCommentRequest>,
) -> AppResult<Json<ApiResponse<RecipeComment>>> {
    let resp = recipe_service::edit_comment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted with its replies"),
        (status = 403, description = "Not the author or an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = recipe_service::delete_comment(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/reactions",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = ReactionRequest,
    responses(
        (status = 200, description = "Toggled reaction with live counts", body = ApiResponse<ReactionSummary>),
        (status = 400, description = "Unknown reaction type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn react_to_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReactionRequest>,
) -> AppResult<Json<ApiResponse<ReactionSummary>>> {
    let resp = recipe_service::react_to_recipe(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/comments/{id}/reactions",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = ReactionRequest,
    responses(
        (status = 200, description = "Toggled reaction with live counts", body = ApiResponse<ReactionSummary>),
        (status = 400, description = "Unknown reaction type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn react_to_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReactionRequest>,
) -> AppResult<Json<ApiResponse<ReactionSummary>>> {
    let resp = recipe_service::react_to_comment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
