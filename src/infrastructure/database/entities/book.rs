//! Book entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub book_store_id: i64,

    #[sea_orm(nullable)]
    pub genre: Option<String>,

    /// Kept as text, exactly as submitted
    #[sea_orm(nullable)]
    pub price: Option<String>,

    #[sea_orm(nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable)]
    pub author: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book_store::Entity",
        from = "Column::BookStoreId",
        to = "super::book_store::Column::Id"
    )]
    BookStore,
}

impl Related<super::book_store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookStore.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
