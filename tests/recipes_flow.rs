mod common;

use seabasket_api::{
    dto::recipes::{CommentRequest, CreateRecipeRequest, ReactionRequest, ReviewRequest},
    error::AppError,
    middleware::auth::Role,
    routes::params::{NotificationQuery, Pagination},
    services::{admin_service, notification_service, recipe_service},
};

fn sinigang_draft() -> CreateRecipeRequest {
    CreateRecipeRequest {
        title: "Sinigang na Hipon".into(),
        description: Some("Sour tamarind soup with prawns".into()),
        ingredients: vec!["500g prawns".into(), "tamarind mix".into(), "kangkong".into()],
        instructions: vec!["Boil broth".into(), "Add prawns".into(), "Season".into()],
        cooking_time_minutes: 35,
        difficulty_level: "easy".into(),
        image_path: None,
    }
}

#[tokio::test]
async fn moderation_reviews_and_duplicate_flag() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let author = common::create_user(&state, Role::Customer, "author@example.com").await?;
    let reviewer = common::create_user(&state, Role::Customer, "reviewer@example.com").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;

    let recipe = recipe_service::create_recipe(&state, &author, sinigang_draft())
        .await?
        .data
        .expect("recipe");
    assert_eq!(recipe.status, "draft");

    // Drafts are invisible to the public listing.
    let err = recipe_service::get_recipe(&state, recipe.id)
        .await
        .expect_err("draft visible");
    assert!(matches!(err, AppError::NotFound));

    // Only the author can submit.
    let err = recipe_service::submit_recipe(&state, &reviewer, recipe.id)
        .await
        .expect_err("foreign submit");
    assert!(matches!(err, AppError::Forbidden));
    recipe_service::submit_recipe(&state, &author, recipe.id).await?;

    admin_service::start_recipe_review(&state, &admin, recipe.id).await?;
    let approved = admin_service::approve_recipe(&state, &admin, recipe.id)
        .await?
        .data
        .expect("approved");
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.approved_by, Some(admin.user_id));

    // Approval notifies the author.
    let inbox = notification_service::list_notifications(
        &state,
        &author,
        NotificationQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            unread_only: Some(true),
        },
    )
    .await?
    .data
    .expect("inbox");
    assert!(inbox.items.iter().any(|n| n.kind == "recipe_approved"));

    // First review lands; the second from the same user is flagged, not stored.
    let first = recipe_service::create_review(
        &state,
        &reviewer,
        recipe.id,
        ReviewRequest {
            rating: 5,
            comment: Some("Perfectly sour".into()),
        },
    )
    .await?;
    assert!(first.success);

    let duplicate = recipe_service::create_review(
        &state,
        &reviewer,
        recipe.id,
        ReviewRequest {
            rating: 1,
            comment: None,
        },
    )
    .await?;
    assert!(!duplicate.success);
    assert_eq!(duplicate.data.expect("existing review").rating, 5);

    let detail = recipe_service::get_recipe(&state, recipe.id)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.review_count, 1);
    assert_eq!(detail.average_rating, Some(5.0));

    // Ratings outside 1..=5 are rejected.
    let err = recipe_service::create_review(
        &state,
        &author,
        recipe.id,
        ReviewRequest {
            rating: 6,
            comment: None,
        },
    )
    .await
    .expect_err("rating out of range");
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn comment_threads_flatten_to_one_level() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let author = common::create_user(&state, Role::Customer, "author@example.com").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;

    let recipe = recipe_service::create_recipe(&state, &author, sinigang_draft())
        .await?
        .data
        .expect("recipe");
    recipe_service::submit_recipe(&state, &author, recipe.id).await?;
    admin_service::approve_recipe(&state, &admin, recipe.id).await?;

    let top = recipe_service::create_comment(
        &state,
        &author,
        recipe.id,
        CommentRequest {
            parent_id: None,
            comment: "Any substitute for tamarind?".into(),
        },
    )
    .await?
    .data
    .expect("top comment");

    let reply = recipe_service::create_comment(
        &state,
        &admin,
        recipe.id,
        CommentRequest {
            parent_id: Some(top.id),
            comment: "Green mango works".into(),
        },
    )
    .await?
    .data
    .expect("reply");
    assert_eq!(reply.parent_id, Some(top.id));

    // Replying to a reply re-parents onto the thread root.
    let nested = recipe_service::create_comment(
        &state,
        &author,
        recipe.id,
        CommentRequest {
            parent_id: Some(reply.id),
            comment: "Tried it, works great".into(),
        },
    )
    .await?
    .data
    .expect("nested reply");
    assert_eq!(nested.parent_id, Some(top.id));

    let threads = recipe_service::list_comments(&state, recipe.id)
        .await?
        .data
        .expect("threads");
    assert_eq!(threads.items.len(), 1);
    assert_eq!(threads.items[0].comment.id, top.id);
    assert_eq!(threads.items[0].replies.len(), 2);
    // Oldest first within the thread.
    assert_eq!(threads.items[0].replies[0].id, reply.id);

    Ok(())
}

#[tokio::test]
async fn reaction_toggle_add_remove_replace() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let author = common::create_user(&state, Role::Customer, "author@example.com").await?;
    let fan = common::create_user(&state, Role::Customer, "fan@example.com").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;

    let recipe = recipe_service::create_recipe(&state, &author, sinigang_draft())
        .await?
        .data
        .expect("recipe");
    recipe_service::submit_recipe(&state, &author, recipe.id).await?;
    admin_service::approve_recipe(&state, &admin, recipe.id).await?;

    // First tap adds.
    let summary = recipe_service::react_to_recipe(
        &state,
        &fan,
        recipe.id,
        ReactionRequest {
            reaction_type: "yum".into(),
        },
    )
    .await?
    .data
    .expect("summary");
    assert_eq!(summary.counts.get("yum"), Some(&1));
    assert_eq!(summary.user_reaction.as_deref(), Some("yum"));

    // Same tap again removes.
    let summary = recipe_service::react_to_recipe(
        &state,
        &fan,
        recipe.id,
        ReactionRequest {
            reaction_type: "yum".into(),
        },
    )
    .await?
    .data
    .expect("summary");
    assert!(summary.counts.get("yum").is_none());
    assert_eq!(summary.user_reaction, None);

    // A different type replaces whatever is there.
    recipe_service::react_to_recipe(
        &state,
        &fan,
        recipe.id,
        ReactionRequest {
            reaction_type: "like".into(),
        },
    )
    .await?;
    let summary = recipe_service::react_to_recipe(
        &state,
        &fan,
        recipe.id,
        ReactionRequest {
            reaction_type: "fire".into(),
        },
    )
    .await?
    .data
    .expect("summary");
    assert!(summary.counts.get("like").is_none());
    assert_eq!(summary.counts.get("fire"), Some(&1));
    assert_eq!(summary.user_reaction.as_deref(), Some("fire"));

    // Unknown reaction types are rejected.
    let err = recipe_service::react_to_recipe(
        &state,
        &fan,
        recipe.id,
        ReactionRequest {
            reaction_type: "meh".into(),
        },
    )
    .await
    .expect_err("unknown reaction");
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}
