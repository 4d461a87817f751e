use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_number: String,
    pub total_amount: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub shipping_address: String,
    pub billing_address: Option<String>,
    /// Courier the order is assigned to, if any.
    pub assigned_to: Option<Uuid>,
    pub delivery_status: String,
    pub delivery_cancel_reason: Option<String>,
    pub delivered_at: Option<DateTimeWithTimeZone>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::product_labels::Entity")]
    ProductLabels,
    #[sea_orm(has_many = "super::proof_of_deliveries::Entity")]
    ProofOfDeliveries,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::product_labels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLabels.def()
    }
}

impl Related<super::proof_of_deliveries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProofOfDeliveries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
