//! Association between book stores and customers

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "book_store_customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub book_store_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub customer_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book_store::Entity",
        from = "Column::BookStoreId",
        to = "super::book_store::Column::Id"
    )]
    BookStore,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::book_store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookStore.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
