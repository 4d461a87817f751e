use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Recipe, RecipeComment, RecipeReview};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time_minutes: i32,
    pub difficulty_level: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    /// 1 to 5.
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    /// When replying, the comment being replied to.
    pub parent_id: Option<Uuid>,
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditCommentRequest {
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReactionRequest {
    /// One of like, love, yum, fire, clap.
    pub reaction_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectRecipeRequest {
    pub reason: String,
}

/// Live per-type counts plus the caller's own reaction, if any.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionSummary {
    pub counts: BTreeMap<String, i64>,
    pub user_reaction: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: RecipeComment,
    pub replies: Vec<RecipeComment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentThreadList {
    pub items: Vec<CommentThread>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeList {
    pub items: Vec<Recipe>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<RecipeReview>,
}
