//! SeaORM implementation of BookRepository

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::book::{Book, BookRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::book;

pub struct SeaOrmBookRepository<C> {
    db: Arc<C>,
}

impl<C> SeaOrmBookRepository<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

fn entity_to_domain(m: book::Model) -> Book {
    Book {
        id: Some(m.id),
        genre: m.genre,
        price: m.price,
        description: m.description,
        author: m.author,
        book_store_id: m.book_store_id,
    }
}

#[async_trait]
impl<C> BookRepository for SeaOrmBookRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Book>> {
        let model = book::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Book>> {
        let models = book::Entity::find()
            .order_by_asc(book::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Book>> {
        let models = book::Entity::find()
            .filter(book::Column::BookStoreId.eq(book_store_id))
            .order_by_asc(book::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, b: Book) -> DomainResult<Book> {
        let is_new = b.id.is_none();
        let model = book::ActiveModel {
            id: match b.id {
                Some(id) => Set(id),
                None => NotSet,
            },
            book_store_id: Set(b.book_store_id),
            genre: Set(b.genre),
            price: Set(b.price),
            description: Set(b.description),
            author: Set(b.author),
        };

        let saved = if is_new {
            model.insert(self.db.as_ref()).await.map_err(db_err)?
        } else {
            model.update(self.db.as_ref()).await.map_err(db_err)?
        };
        debug!("Book saved: ID={} (book store {})", saved.id, saved.book_store_id);
        Ok(entity_to_domain(saved))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = book::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Book", id));
        }
        Ok(())
    }

    async fn delete_by_book_store(&self, book_store_id: i64) -> DomainResult<u64> {
        let result = book::Entity::delete_many()
            .filter(book::Column::BookStoreId.eq(book_store_id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
