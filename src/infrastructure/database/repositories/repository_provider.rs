//! SeaORM implementation of RepositoryProvider and UnitOfWork

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::book::BookRepository;
use crate::domain::book_store::BookStoreRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::employee::EmployeeRepository;
use crate::domain::repositories::{Repositories, RepositoryProvider, UnitOfWork};
use crate::domain::{DomainError, DomainResult};

use super::book_repository::SeaOrmBookRepository;
use super::book_store_repository::SeaOrmBookStoreRepository;
use super::customer_repository::SeaOrmCustomerRepository;
use super::db_err;
use super::employee_repository::SeaOrmEmployeeRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-entity repository accessors.
/// Write units of work take `write_lock` for their whole lifetime: SQLite
/// refuses a second deferred transaction that upgrades to a write lock
/// with `SQLITE_BUSY` instead of waiting for it.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let store = repos.book_stores().find_by_id(1).await?;
/// let uow = repos.begin().await?;
/// uow.employees().delete_by_book_store(1).await?;
/// uow.commit().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    write_lock: Arc<Mutex<()>>,
    book_stores: SeaOrmBookStoreRepository<DatabaseConnection>,
    employees: SeaOrmEmployeeRepository<DatabaseConnection>,
    customers: SeaOrmCustomerRepository<DatabaseConnection>,
    books: SeaOrmBookRepository<DatabaseConnection>,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        let shared = Arc::new(db.clone());
        Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
            book_stores: SeaOrmBookStoreRepository::new(shared.clone()),
            employees: SeaOrmEmployeeRepository::new(shared.clone()),
            customers: SeaOrmCustomerRepository::new(shared.clone()),
            books: SeaOrmBookRepository::new(shared),
        }
    }
}

impl Repositories for SeaOrmRepositoryProvider {
    fn book_stores(&self) -> &dyn BookStoreRepository {
        &self.book_stores
    }

    fn employees(&self) -> &dyn EmployeeRepository {
        &self.employees
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn books(&self) -> &dyn BookRepository {
        &self.books
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let guard = self.write_lock.clone().lock_owned().await;
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmUnitOfWork::new(txn, Some(guard))))
    }

    async fn begin_read(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmUnitOfWork::new(txn, None)))
    }
}

/// Repositories sharing one `DatabaseTransaction`.
///
/// SeaORM rolls the transaction back when it is dropped uncommitted.
pub struct SeaOrmUnitOfWork {
    txn: Arc<DatabaseTransaction>,
    /// Held by write units of work until commit or drop.
    writer: Option<OwnedMutexGuard<()>>,
    book_stores: SeaOrmBookStoreRepository<DatabaseTransaction>,
    employees: SeaOrmEmployeeRepository<DatabaseTransaction>,
    customers: SeaOrmCustomerRepository<DatabaseTransaction>,
    books: SeaOrmBookRepository<DatabaseTransaction>,
}

impl SeaOrmUnitOfWork {
    fn new(txn: DatabaseTransaction, writer: Option<OwnedMutexGuard<()>>) -> Self {
        let txn = Arc::new(txn);
        Self {
            writer,
            book_stores: SeaOrmBookStoreRepository::new(txn.clone()),
            employees: SeaOrmEmployeeRepository::new(txn.clone()),
            customers: SeaOrmCustomerRepository::new(txn.clone()),
            books: SeaOrmBookRepository::new(txn.clone()),
            txn,
        }
    }
}

impl Repositories for SeaOrmUnitOfWork {
    fn book_stores(&self) -> &dyn BookStoreRepository {
        &self.book_stores
    }

    fn employees(&self) -> &dyn EmployeeRepository {
        &self.employees
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn books(&self) -> &dyn BookRepository {
        &self.books
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let SeaOrmUnitOfWork {
            txn,
            writer,
            book_stores,
            employees,
            customers,
            books,
        } = *self;
        // The repositories hold the other references to the transaction.
        drop((book_stores, employees, customers, books));

        let txn = Arc::try_unwrap(txn)
            .map_err(|_| DomainError::Storage("transaction is still in use".to_string()))?;
        let result = txn.commit().await.map_err(db_err);
        drop(writer);
        result
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::domain::{Book, BookStore, Customer, Employee};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig};

    async fn setup() -> SeaOrmRepositoryProvider {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmRepositoryProvider::new(db)
    }

    fn store(name: &str) -> BookStore {
        BookStore {
            name: Some(name.to_string()),
            city: Some("Springfield".to_string()),
            ..BookStore::default()
        }
    }

    #[tokio::test]
    async fn save_inserts_then_overwrites() {
        let repos = setup().await;

        let created = repos.book_stores().save(store("Alpha")).await.unwrap();
        let id = created.id.expect("id assigned on insert");

        let updated = repos
            .book_stores()
            .save(BookStore {
                id: Some(id),
                name: Some("Beta".to_string()),
                ..BookStore::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Beta"));
        assert_eq!(updated.city, None);

        let all = repos.book_stores().find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], updated);
    }

    #[tokio::test]
    async fn delete_missing_store_is_not_found() {
        let repos = setup().await;
        let err = repos.book_stores().delete(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id: 99, .. }));
    }

    #[tokio::test]
    async fn children_are_filtered_by_store() {
        let repos = setup().await;
        let a = repos.book_stores().save(store("A")).await.unwrap().id.unwrap();
        let b = repos.book_stores().save(store("B")).await.unwrap().id.unwrap();

        for store_id in [a, a, b] {
            repos
                .employees()
                .save(Employee {
                    first_name: Some("Jo".to_string()),
                    book_store_id: store_id,
                    ..Employee::default()
                })
                .await
                .unwrap();
            repos
                .books()
                .save(Book {
                    genre: Some("Fantasy".to_string()),
                    price: Some("12.99".to_string()),
                    book_store_id: store_id,
                    ..Book::default()
                })
                .await
                .unwrap();
        }

        assert_eq!(repos.employees().find_by_book_store(a).await.unwrap().len(), 2);
        assert_eq!(repos.books().find_by_book_store(b).await.unwrap().len(), 1);

        assert_eq!(repos.employees().delete_by_book_store(a).await.unwrap(), 2);
        assert_eq!(repos.employees().find_all().await.unwrap().len(), 1);
        assert_eq!(repos.books().delete_by_book_store(a).await.unwrap(), 2);
        assert_eq!(repos.books().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn link_is_idempotent_and_visible_from_both_sides() {
        let repos = setup().await;
        let a = repos.book_stores().save(store("A")).await.unwrap().id.unwrap();
        let b = repos.book_stores().save(store("B")).await.unwrap().id.unwrap();
        let customer = repos
            .customers()
            .save(Customer {
                email: Some("ann@example.com".to_string()),
                ..Customer::default()
            })
            .await
            .unwrap();
        let cid = customer.id.unwrap();

        repos.customers().link(a, cid).await.unwrap();
        repos.customers().link(a, cid).await.unwrap();
        repos.customers().link(b, cid).await.unwrap();

        assert_eq!(repos.customers().find_book_store_ids(cid).await.unwrap(), vec![a, b]);
        assert_eq!(repos.customers().find_by_book_store(a).await.unwrap(), vec![customer]);

        assert_eq!(repos.customers().unlink_book_store(a).await.unwrap(), 1);
        assert_eq!(repos.customers().find_book_store_ids(cid).await.unwrap(), vec![b]);
        assert!(repos.customers().find_by_id(cid).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unit_of_work_commits() {
        let repos = setup().await;

        let uow = repos.begin().await.unwrap();
        let id = uow.book_stores().save(store("Alpha")).await.unwrap().id.unwrap();
        uow.commit().await.unwrap();

        assert!(repos.book_stores().find_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let repos = setup().await;

        {
            let uow = repos.begin().await.unwrap();
            uow.book_stores().save(store("Alpha")).await.unwrap();
        }

        assert!(repos.book_stores().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_unit_of_work_does_not_hold_the_writer_lock() {
        let repos = setup().await;
        let id = repos.book_stores().save(store("Alpha")).await.unwrap().id.unwrap();

        let read = repos.begin_read().await.unwrap();
        assert!(read.book_stores().find_by_id(id).await.unwrap().is_some());
        assert!(repos.write_lock.try_lock().is_ok());
        drop(read);

        let uow = repos.begin().await.unwrap();
        assert!(repos.write_lock.try_lock().is_err());
        uow.commit().await.unwrap();
        assert!(repos.write_lock.try_lock().is_ok());
    }
}
