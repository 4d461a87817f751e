use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    /// Top-level comments have no parent; replies point at a top-level comment.
    pub parent_id: Option<Uuid>,
    pub comment: String,
    pub is_edited: bool,
    pub edited_at: Option<DateTimeWithTimeZone>,
    pub is_hidden: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id"
    )]
    Recipes,
    #[sea_orm(has_many = "super::comment_reactions::Entity")]
    CommentReactions,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl Related<super::comment_reactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommentReactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
