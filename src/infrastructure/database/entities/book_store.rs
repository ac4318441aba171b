//! BookStore entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "book_stores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(nullable)]
    pub name: Option<String>,

    #[sea_orm(nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    #[sea_orm(nullable)]
    pub state: Option<String>,

    #[sea_orm(nullable)]
    pub zip: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee::Entity")]
    Employees,
    #[sea_orm(has_many = "super::book::Entity")]
    Books,
    #[sea_orm(has_many = "super::book_store_customer::Entity")]
    BookStoreCustomers,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl Related<super::book_store_customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookStoreCustomers.def()
    }
}

/// Many-to-many through `book_store_customer`
impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_store_customer::Relation::Customer.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_store_customer::Relation::BookStore.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
