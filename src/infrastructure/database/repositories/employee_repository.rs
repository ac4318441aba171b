//! SeaORM implementation of EmployeeRepository

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::employee::{Employee, EmployeeRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::employee;

pub struct SeaOrmEmployeeRepository<C> {
    db: Arc<C>,
}

impl<C> SeaOrmEmployeeRepository<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

fn entity_to_domain(m: employee::Model) -> Employee {
    Employee {
        id: Some(m.id),
        first_name: m.first_name,
        last_name: m.last_name,
        phone: m.phone,
        job_title: m.job_title,
        book_store_id: m.book_store_id,
    }
}

#[async_trait]
impl<C> EmployeeRepository for SeaOrmEmployeeRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Employee>> {
        let model = employee::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Employee>> {
        let models = employee::Entity::find()
            .order_by_asc(employee::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Employee>> {
        let models = employee::Entity::find()
            .filter(employee::Column::BookStoreId.eq(book_store_id))
            .order_by_asc(employee::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, e: Employee) -> DomainResult<Employee> {
        let is_new = e.id.is_none();
        let model = employee::ActiveModel {
            id: match e.id {
                Some(id) => Set(id),
                None => NotSet,
            },
            book_store_id: Set(e.book_store_id),
            first_name: Set(e.first_name),
            last_name: Set(e.last_name),
            phone: Set(e.phone),
            job_title: Set(e.job_title),
        };

        let saved = if is_new {
            model.insert(self.db.as_ref()).await.map_err(db_err)?
        } else {
            model.update(self.db.as_ref()).await.map_err(db_err)?
        };
        debug!(
            "Employee saved: ID={} (book store {})",
            saved.id, saved.book_store_id
        );
        Ok(entity_to_domain(saved))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = employee::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Employee", id));
        }
        Ok(())
    }

    async fn delete_by_book_store(&self, book_store_id: i64) -> DomainResult<u64> {
        let result = employee::Entity::delete_many()
            .filter(employee::Column::BookStoreId.eq(book_store_id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
