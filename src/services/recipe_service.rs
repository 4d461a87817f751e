use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    domain::{
        comments::{can_delete, can_edit},
        reactions::{ReactionChange, ReactionKind, toggle},
        status::{RECIPE_APPROVED, RECIPE_DRAFT, RECIPE_REJECTED, RECIPE_SUBMITTED},
    },
    dto::recipes::{
        CommentRequest, CommentThread, CommentThreadList, CreateRecipeRequest, EditCommentRequest,
        ReactionRequest, ReactionSummary, RecipeDetail, RecipeList, ReviewList, ReviewRequest,
    },
    entity::{
        comment_reactions::{
            ActiveModel as CommentReactionActive, Column as CommentReactionCol,
            Entity as CommentReactions,
        },
        recipe_comments::{
            ActiveModel as CommentActive, Column as CommentCol, Entity as RecipeComments,
            Model as CommentModel,
        },
        recipe_reactions::{
            ActiveModel as RecipeReactionActive, Column as RecipeReactionCol,
            Entity as RecipeReactions,
        },
        recipe_reviews::{
            ActiveModel as ReviewActive, Column as ReviewCol, Entity as RecipeReviews,
        },
        recipes::{ActiveModel as RecipeActive, Column as RecipeCol, Entity as Recipes, Model as RecipeModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Recipe, RecipeComment, RecipeReview},
    response::{ApiResponse, Meta},
    routes::params::{RecipeQuery, Pagination, SortOrder},
    state::AppState,
};

pub async fn list_recipes(
    state: &AppState,
    query: RecipeQuery,
) -> AppResult<ApiResponse<RecipeList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(RecipeCol::Status.eq(RECIPE_APPROVED));

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(RecipeCol::Title).ilike(pattern.clone()))
                .add(Expr::col(RecipeCol::Description).ilike(pattern)),
        );
    }

    if let Some(difficulty) = query.difficulty.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(RecipeCol::DifficultyLevel.eq(difficulty.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Recipes::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(RecipeCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(RecipeCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Recipe::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

async fn load_approved(state: &AppState, id: Uuid) -> AppResult<RecipeModel> {
    let recipe = Recipes::find_by_id(id).one(&state.orm).await?;
    match recipe {
        Some(r) if r.status == RECIPE_APPROVED => Ok(r),
        _ => Err(AppError::NotFound),
    }
}

pub async fn get_recipe(state: &AppState, id: Uuid) -> AppResult<ApiResponse<RecipeDetail>> {
    let recipe = load_approved(state, id).await?;

    // Rating aggregates are computed live rather than maintained as counters.
    #[derive(Debug, FromQueryResult)]
    struct RatingRow {
        total: Option<i64>,
        count: i64,
    }

    let row = RecipeReviews::find()
        .select_only()
        .column_as(ReviewCol::Rating.sum(), "total")
        .column_as(ReviewCol::Id.count(), "count")
        .filter(ReviewCol::RecipeId.eq(id))
        .into_model::<RatingRow>()
        .one(&state.orm)
        .await?;

    let (average_rating, review_count) = match row {
        Some(r) if r.count > 0 => (
            r.total.map(|t| t as f64 / r.count as f64),
            r.count,
        ),
        _ => (None, 0),
    };

    Ok(ApiResponse::success(
        "Recipe",
        RecipeDetail {
            recipe: recipe.into(),
            average_rating,
            review_count,
        },
        Some(Meta::empty()),
    ))
}

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRecipeRequest,
) -> AppResult<ApiResponse<Recipe>> {
    if payload.title.trim().is_empty() {
        return Err(AppError::field("title", "must not be empty"));
    }
    if payload.ingredients.is_empty() {
        return Err(AppError::field("ingredients", "must not be empty"));
    }
    if payload.instructions.is_empty() {
        return Err(AppError::field("instructions", "must not be empty"));
    }
    if payload.cooking_time_minutes <= 0 {
        return Err(AppError::field("cooking_time_minutes", "must be positive"));
    }

    let recipe = RecipeActive {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        description: Set(payload.description),
        ingredients: Set(serde_json::json!(payload.ingredients)),
        instructions: Set(serde_json::json!(payload.instructions)),
        cooking_time_minutes: Set(payload.cooking_time_minutes),
        difficulty_level: Set(payload.difficulty_level),
        image_path: Set(payload.image_path),
        status: Set(RECIPE_DRAFT.to_string()),
        created_by: Set(user.user_id),
        approved_by: Set(None),
        approved_at: Set(None),
        rejection_reason: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeCreate,
        Some("recipes"),
        Some(serde_json::json!({ "recipe_id": recipe.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Recipe created",
        recipe.into(),
        Some(Meta::empty()),
    ))
}

pub async fn submit_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Recipe>> {
    let recipe = Recipes::find_by_id(id).one(&state.orm).await?;
    let recipe = match recipe {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if recipe.created_by != user.user_id {
        return Err(AppError::Forbidden);
    }
    if recipe.status != RECIPE_DRAFT && recipe.status != RECIPE_REJECTED {
        return Err(AppError::InvalidTransition {
            machine: "recipe",
            from: recipe.status.clone(),
            action: "submit",
        });
    }

    let mut active: RecipeActive = recipe.into();
    active.status = Set(RECIPE_SUBMITTED.to_string());
    active.rejection_reason = Set(None);
    active.updated_at = Set(Utc::now().into());
    let recipe = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Recipe submitted",
        recipe.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(
    state: &AppState,
    recipe_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    load_approved(state, recipe_id).await?;
    let (page, limit, offset) = pagination.normalize();

    let finder = RecipeReviews::find()
        .filter(ReviewCol::RecipeId.eq(recipe_id))
        .order_by_desc(ReviewCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(RecipeReview::from)
        .collect();

    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
    payload: ReviewRequest,
) -> AppResult<ApiResponse<RecipeReview>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::field("rating", "must be between 1 and 5"));
    }
    load_approved(state, recipe_id).await?;

    // One review per user per recipe; the existing one is returned with a
    // failure flag instead of creating a duplicate.
    let existing = RecipeReviews::find()
        .filter(ReviewCol::RecipeId.eq(recipe_id))
        .filter(ReviewCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if let Some(review) = existing {
        return Ok(ApiResponse::failure(
            "You have already reviewed this recipe",
            review.into(),
        ));
    }

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        recipe_id: Set(recipe_id),
        user_id: Set(user.user_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Review added",
        review.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: ReviewRequest,
) -> AppResult<ApiResponse<RecipeReview>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::field("rating", "must be between 1 and 5"));
    }
    let review = RecipeReviews::find_by_id(review_id).one(&state.orm).await?;
    let review = match review {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if review.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let mut active: ReviewActive = review.into();
    active.rating = Set(payload.rating);
    active.comment = Set(payload.comment);
    active.updated_at = Set(Utc::now().into());
    let review = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Review updated",
        review.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let review = RecipeReviews::find_by_id(review_id).one(&state.orm).await?;
    let review = match review {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if !can_delete(review.user_id, user.user_id, user.is_admin()) {
        return Err(AppError::Forbidden);
    }

    RecipeReviews::delete_by_id(review_id)
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Review deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn create_comment(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
    payload: CommentRequest,
) -> AppResult<ApiResponse<RecipeComment>> {
    if payload.comment.trim().is_empty() {
        return Err(AppError::field("comment", "must not be empty"));
    }
    load_approved(state, recipe_id).await?;

    // Replies always hang off a top-level comment; replying to a reply
    // re-parents onto the original thread root.
    let parent_id = match payload.parent_id {
        Some(pid) => {
            let parent = RecipeComments::find_by_id(pid).one(&state.orm).await?;
            let parent = match parent {
                Some(p) => p,
                None => return Err(AppError::field("parent_id", "comment not found")),
            };
            if parent.recipe_id != recipe_id {
                return Err(AppError::field("parent_id", "comment is on another recipe"));
            }
            Some(parent.parent_id.unwrap_or(parent.id))
        }
        None => None,
    };

    let comment = CommentActive {
        id: Set(Uuid::new_v4()),
        recipe_id: Set(recipe_id),
        user_id: Set(user.user_id),
        parent_id: Set(parent_id),
        comment: Set(payload.comment),
        is_edited: Set(false),
        edited_at: Set(None),
        is_hidden: Set(false),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Comment added",
        comment.into(),
        Some(Meta::empty()),
    ))
}

pub async fn edit_comment(
    state: &AppState,
    user: &AuthUser,
    comment_id: Uuid,
    payload: EditCommentRequest,
) -> AppResult<ApiResponse<RecipeComment>> {
    if payload.comment.trim().is_empty() {
        return Err(AppError::field("comment", "must not be empty"));
    }
    let comment = RecipeComments::find_by_id(comment_id)
        .one(&state.orm)
        .await?;
    let comment = match comment {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let created_at = comment.created_at.with_timezone(&Utc);
    if !can_edit(comment.user_id, user.user_id, created_at, Utc::now()) {
        return Err(AppError::Forbidden);
    }

    let now = Utc::now();
    let mut active: CommentActive = comment.into();
    active.comment = Set(payload.comment);
    active.is_edited = Set(true);
    active.edited_at = Set(Some(now.into()));
    let comment = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Comment updated",
        comment.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_comment(
    state: &AppState,
    user: &AuthUser,
    comment_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let comment = RecipeComments::find_by_id(comment_id)
        .one(&state.orm)
        .await?;
    let comment = match comment {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    if !can_delete(comment.user_id, user.user_id, user.is_admin()) {
        return Err(AppError::Forbidden);
    }

    // Replies and reactions go with it via cascading foreign keys.
    RecipeComments::delete_by_id(comment_id)
        .exec(&state.orm)
        .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CommentDelete,
        Some("recipe_comments"),
        Some(serde_json::json!({ "comment_id": comment_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Comment deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Visible threads: non-hidden top-level comments, oldest first, each with
/// its non-hidden replies oldest first.
pub async fn list_comments(
    state: &AppState,
    recipe_id: Uuid,
) -> AppResult<ApiResponse<CommentThreadList>> {
    load_approved(state, recipe_id).await?;

    let all: Vec<CommentModel> = RecipeComments::find()
        .filter(CommentCol::RecipeId.eq(recipe_id))
        .filter(CommentCol::IsHidden.eq(false))
        .order_by_asc(CommentCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut threads: Vec<CommentThread> = Vec::new();
    let mut replies: Vec<CommentModel> = Vec::new();
    for comment in all {
        if comment.parent_id.is_none() {
            threads.push(CommentThread {
                comment: comment.into(),
                replies: Vec::new(),
            });
        } else {
            replies.push(comment);
        }
    }
    for reply in replies {
        let Some(parent_id) = reply.parent_id else {
            continue;
        };
        if let Some(thread) = threads.iter_mut().find(|t| t.comment.id == parent_id) {
            thread.replies.push(reply.into());
        }
        // Replies under a hidden parent are not shown.
    }

    Ok(ApiResponse::success(
        "Comments",
        CommentThreadList { items: threads },
        Some(Meta::empty()),
    ))
}

#[derive(Debug, FromQueryResult)]
struct ReactionCountRow {
    reaction_type: String,
    count: i64,
}

fn summarize(rows: Vec<ReactionCountRow>, user_reaction: Option<ReactionKind>) -> ReactionSummary {
    let mut counts = BTreeMap::new();
    for row in rows {
        counts.insert(row.reaction_type, row.count);
    }
    ReactionSummary {
        counts,
        user_reaction: user_reaction.map(|k| k.as_str().to_string()),
    }
}

pub async fn react_to_recipe(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
    payload: ReactionRequest,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let kind = ReactionKind::parse(&payload.reaction_type)
        .ok_or_else(|| AppError::field("reaction_type", "unknown reaction type"))?;
    load_approved(state, recipe_id).await?;

    let existing = RecipeReactions::find()
        .filter(RecipeReactionCol::RecipeId.eq(recipe_id))
        .filter(RecipeReactionCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let existing_kind = existing
        .as_ref()
        .and_then(|r| ReactionKind::parse(&r.reaction_type));

    let current = match (toggle(existing_kind, kind), existing) {
        (ReactionChange::Added, _) => {
            RecipeReactionActive {
                id: Set(Uuid::new_v4()),
                recipe_id: Set(recipe_id),
                user_id: Set(user.user_id),
                reaction_type: Set(kind.as_str().to_string()),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?;
            Some(kind)
        }
        (ReactionChange::Removed, Some(row)) => {
            RecipeReactions::delete_by_id(row.id).exec(&state.orm).await?;
            None
        }
        (ReactionChange::Replaced, Some(row)) => {
            let mut active: RecipeReactionActive = row.into();
            active.reaction_type = Set(kind.as_str().to_string());
            active.update(&state.orm).await?;
            Some(kind)
        }
        // Removed/Replaced only come out of toggle when a reaction exists.
        (_, None) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "reaction toggle without an existing row"
            )));
        }
    };

    let rows = RecipeReactions::find()
        .select_only()
        .column(RecipeReactionCol::ReactionType)
        .column_as(RecipeReactionCol::Id.count(), "count")
        .filter(RecipeReactionCol::RecipeId.eq(recipe_id))
        .group_by(RecipeReactionCol::ReactionType)
        .into_model::<ReactionCountRow>()
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Reaction recorded",
        summarize(rows, current),
        Some(Meta::empty()),
    ))
}

pub async fn react_to_comment(
    state: &AppState,
    user: &AuthUser,
    comment_id: Uuid,
    payload: ReactionRequest,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let kind = ReactionKind::parse(&payload.reaction_type)
        .ok_or_else(|| AppError::field("reaction_type", "unknown reaction type"))?;

    let comment = RecipeComments::find_by_id(comment_id)
        .one(&state.orm)
        .await?;
    if comment.is_none() {
        return Err(AppError::NotFound);
    }

    let existing = CommentReactions::find()
        .filter(CommentReactionCol::CommentId.eq(comment_id))
        .filter(CommentReactionCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let existing_kind = existing
        .as_ref()
        .and_then(|r| ReactionKind::parse(&r.reaction_type));

    let current = match (toggle(existing_kind, kind), existing) {
        (ReactionChange::Added, _) => {
            CommentReactionActive {
                id: Set(Uuid::new_v4()),
                comment_id: Set(comment_id),
                user_id: Set(user.user_id),
                reaction_type: Set(kind.as_str().to_string()),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?;
            Some(kind)
        }
        (ReactionChange::Removed, Some(row)) => {
            CommentReactions::delete_by_id(row.id)
                .exec(&state.orm)
                .await?;
            None
        }
        (ReactionChange::Replaced, Some(row)) => {
            let mut active: CommentReactionActive = row.into();
            active.reaction_type = Set(kind.as_str().to_string());
            active.update(&state.orm).await?;
            Some(kind)
        }
        (_, None) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "reaction toggle without an existing row"
            )));
        }
    };

    let rows = CommentReactions::find()
        .select_only()
        .column(CommentReactionCol::ReactionType)
        .column_as(CommentReactionCol::Id.count(), "count")
        .filter(CommentReactionCol::CommentId.eq(comment_id))
        .group_by(CommentReactionCol::ReactionType)
        .into_model::<ReactionCountRow>()
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Reaction recorded",
        summarize(rows, current),
        Some(Meta::empty()),
    ))
}
