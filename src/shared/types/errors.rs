use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} with ID={id} does not exist.")]
    NotFound { entity: &'static str, id: i64 },

    /// The entity exists but is not attached to the book store it was addressed under.
    #[error("{entity} with ID={id} does not belong to book store with ID={book_store_id}.")]
    InvalidRelationship {
        entity: &'static str,
        id: i64,
        book_store_id: i64,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid_relationship(entity: &'static str, id: i64, book_store_id: i64) -> Self {
        Self::InvalidRelationship {
            entity,
            id,
            book_store_id,
        }
    }

    /// Whether the caller sent a request that can never succeed as-is.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound { .. } | DomainError::InvalidRelationship { .. }
        )
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(String),
}
