//! SeaORM implementation of CustomerRepository

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::customer::{Customer, CustomerRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{book_store_customer, customer};

pub struct SeaOrmCustomerRepository<C> {
    db: Arc<C>,
}

impl<C> SeaOrmCustomerRepository<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

fn entity_to_domain(m: customer::Model) -> Customer {
    Customer {
        id: Some(m.id),
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
    }
}

#[async_trait]
impl<C> CustomerRepository for SeaOrmCustomerRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Customer>> {
        let model = customer::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        let models = customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Customer>> {
        let models = customer::Entity::find()
            .inner_join(book_store_customer::Entity)
            .filter(book_store_customer::Column::BookStoreId.eq(book_store_id))
            .order_by_asc(customer::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_book_store_ids(&self, customer_id: i64) -> DomainResult<Vec<i64>> {
        let links = book_store_customer::Entity::find()
            .filter(book_store_customer::Column::CustomerId.eq(customer_id))
            .order_by_asc(book_store_customer::Column::BookStoreId)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(links.into_iter().map(|l| l.book_store_id).collect())
    }

    async fn save(&self, c: Customer) -> DomainResult<Customer> {
        let is_new = c.id.is_none();
        let model = customer::ActiveModel {
            id: match c.id {
                Some(id) => Set(id),
                None => NotSet,
            },
            first_name: Set(c.first_name),
            last_name: Set(c.last_name),
            email: Set(c.email),
        };

        let saved = if is_new {
            model.insert(self.db.as_ref()).await.map_err(db_err)?
        } else {
            model.update(self.db.as_ref()).await.map_err(db_err)?
        };
        debug!("Customer saved: ID={}", saved.id);
        Ok(entity_to_domain(saved))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        book_store_customer::Entity::delete_many()
            .filter(book_store_customer::Column::CustomerId.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;

        let result = customer::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Customer", id));
        }
        Ok(())
    }

    async fn link(&self, book_store_id: i64, customer_id: i64) -> DomainResult<()> {
        let existing = book_store_customer::Entity::find_by_id((book_store_id, customer_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(());
        }

        let link = book_store_customer::ActiveModel {
            book_store_id: Set(book_store_id),
            customer_id: Set(customer_id),
        };
        book_store_customer::Entity::insert(link)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(db_err)?;
        debug!(
            "Customer {} linked to book store {}",
            customer_id, book_store_id
        );
        Ok(())
    }

    async fn unlink_book_store(&self, book_store_id: i64) -> DomainResult<u64> {
        let result = book_store_customer::Entity::delete_many()
            .filter(book_store_customer::Column::BookStoreId.eq(book_store_id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
