use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comment_reactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub reaction_type: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipe_comments::Entity",
        from = "Column::CommentId",
        to = "super::recipe_comments::Column::Id"
    )]
    RecipeComments,
}

impl Related<super::recipe_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeComments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
