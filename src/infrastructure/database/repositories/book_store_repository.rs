//! SeaORM implementation of BookStoreRepository

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, EntityTrait, QueryOrder, Set,
};
use tracing::{debug, info};

use super::db_err;
use crate::domain::book_store::{BookStore, BookStoreRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::book_store;

/// Works over the pool (`DatabaseConnection`) or an open `DatabaseTransaction`.
pub struct SeaOrmBookStoreRepository<C> {
    db: Arc<C>,
}

impl<C> SeaOrmBookStoreRepository<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: book_store::Model) -> BookStore {
    BookStore {
        id: Some(m.id),
        name: m.name,
        address: m.address,
        city: m.city,
        state: m.state,
        zip: m.zip,
        phone: m.phone,
    }
}

fn domain_to_active(s: BookStore) -> book_store::ActiveModel {
    book_store::ActiveModel {
        id: match s.id {
            Some(id) => Set(id),
            None => NotSet,
        },
        name: Set(s.name),
        address: Set(s.address),
        city: Set(s.city),
        state: Set(s.state),
        zip: Set(s.zip),
        phone: Set(s.phone),
    }
}

#[async_trait]
impl<C> BookStoreRepository for SeaOrmBookStoreRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<BookStore>> {
        let model = book_store::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<BookStore>> {
        let models = book_store::Entity::find()
            .order_by_asc(book_store::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, store: BookStore) -> DomainResult<BookStore> {
        let is_new = store.id.is_none();
        let model = domain_to_active(store);

        let saved = if is_new {
            model.insert(self.db.as_ref()).await.map_err(db_err)?
        } else {
            model.update(self.db.as_ref()).await.map_err(db_err)?
        };

        if is_new {
            info!("Book store created: ID={}", saved.id);
        } else {
            debug!("Book store updated: ID={}", saved.id);
        }
        Ok(entity_to_domain(saved))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = book_store::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("BookStore", id));
        }
        Ok(())
    }
}
