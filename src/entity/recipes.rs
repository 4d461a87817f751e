use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Ordered JSON array of ingredient strings.
    pub ingredients: Json,
    /// Ordered JSON array of instruction steps.
    pub instructions: Json,
    pub cooking_time_minutes: i32,
    pub difficulty_level: String,
    pub image_path: Option<String>,
    pub status: String,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_reviews::Entity")]
    RecipeReviews,
    #[sea_orm(has_many = "super::recipe_comments::Entity")]
    RecipeComments,
    #[sea_orm(has_many = "super::recipe_reactions::Entity")]
    RecipeReactions,
}

impl Related<super::recipe_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeReviews.def()
    }
}

impl Related<super::recipe_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeComments.def()
    }
}

impl Related<super::recipe_reactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeReactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
