//! Book store aggregate service
//!
//! Resolves find-or-create requests, checks that children belong to the store
//! they are addressed under and runs every mutation in one unit of work.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::dto::{BookStoreBook, BookStoreCustomer, BookStoreData, BookStoreEmployee};
use crate::domain::{
    Book, BookStore, Customer, DomainError, DomainResult, Employee, Lookup, Repositories,
    RepositoryProvider,
};

/// Service for book store business operations
pub struct BookStoreService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookStoreService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a book store or overwrite every scalar field of an existing one.
    pub async fn save_book_store(&self, data: BookStoreData) -> DomainResult<BookStoreData> {
        let uow = self.repos.begin().await?;

        let mut store = match Lookup::from(data.book_store_id) {
            Lookup::Create => BookStore::default(),
            Lookup::Existing(id) => require_book_store(&*uow, id).await?,
        };
        data.apply_to(&mut store);

        let store = uow.book_stores().save(store).await?;
        let view = project(&*uow, store).await?;
        uow.commit().await?;

        info!(book_store_id = ?view.book_store_id, "Book store saved");
        Ok(view)
    }

    pub async fn save_employee(
        &self,
        book_store_id: i64,
        data: BookStoreEmployee,
    ) -> DomainResult<BookStoreEmployee> {
        let uow = self.repos.begin().await?;
        require_book_store(&*uow, book_store_id).await?;

        let mut employee = match Lookup::from(data.employee_id) {
            Lookup::Create => Employee::default(),
            Lookup::Existing(id) => {
                let employee = uow
                    .employees()
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Employee", id))?;
                if employee.book_store_id != book_store_id {
                    warn!(
                        employee_id = id,
                        book_store_id, "Employee belongs to book store {}", employee.book_store_id
                    );
                    return Err(DomainError::invalid_relationship("Employee", id, book_store_id));
                }
                employee
            }
        };
        data.apply_to(&mut employee);
        employee.book_store_id = book_store_id;

        let employee = uow.employees().save(employee).await?;
        uow.commit().await?;

        info!(employee_id = ?employee.id, book_store_id, "Employee saved");
        Ok(employee.into())
    }

    /// Save a customer and associate it with the store.
    ///
    /// An existing customer must already be a member of the store.
    pub async fn save_customer(
        &self,
        book_store_id: i64,
        data: BookStoreCustomer,
    ) -> DomainResult<BookStoreCustomer> {
        let uow = self.repos.begin().await?;
        require_book_store(&*uow, book_store_id).await?;

        let mut customer = match Lookup::from(data.customer_id) {
            Lookup::Create => Customer::default(),
            Lookup::Existing(id) => {
                let customer = uow
                    .customers()
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Customer", id))?;
                let stores = uow.customers().find_book_store_ids(id).await?;
                if !stores.contains(&book_store_id) {
                    warn!(customer_id = id, book_store_id, "Customer is not a member of book store");
                    return Err(DomainError::invalid_relationship("Customer", id, book_store_id));
                }
                customer
            }
        };
        data.apply_to(&mut customer);

        let customer = uow.customers().save(customer).await?;
        if let Some(customer_id) = customer.id {
            uow.customers().link(book_store_id, customer_id).await?;
        }
        uow.commit().await?;

        info!(customer_id = ?customer.id, book_store_id, "Customer saved");
        Ok(customer.into())
    }

    pub async fn save_book(
        &self,
        book_store_id: i64,
        data: BookStoreBook,
    ) -> DomainResult<BookStoreBook> {
        let uow = self.repos.begin().await?;
        require_book_store(&*uow, book_store_id).await?;

        let mut book = match Lookup::from(data.book_id) {
            Lookup::Create => Book::default(),
            Lookup::Existing(id) => {
                let book = uow
                    .books()
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Book", id))?;
                if book.book_store_id != book_store_id {
                    warn!(book_id = id, book_store_id, "Book belongs to book store {}", book.book_store_id);
                    return Err(DomainError::invalid_relationship("Book", id, book_store_id));
                }
                book
            }
        };
        data.apply_to(&mut book);
        book.book_store_id = book_store_id;

        let book = uow.books().save(book).await?;
        uow.commit().await?;

        info!(book_id = ?book.id, book_store_id, "Book saved");
        Ok(book.into())
    }

    /// The store and its three collections, read in one transaction.
    pub async fn retrieve_book_store_by_id(&self, id: i64) -> DomainResult<BookStoreData> {
        let uow = self.repos.begin_read().await?;
        let store = require_book_store(&*uow, id).await?;
        project(&*uow, store).await
    }

    /// Every book store with its nested collections left empty.
    pub async fn retrieve_all_book_stores(&self) -> DomainResult<Vec<BookStoreData>> {
        let stores = self.repos.book_stores().find_all().await?;
        Ok(stores.into_iter().map(BookStoreData::from).collect())
    }

    pub async fn list_books_for_book_store(&self, book_store_id: i64) -> DomainResult<Vec<BookStoreBook>> {
        let uow = self.repos.begin_read().await?;
        require_book_store(&*uow, book_store_id).await?;
        let books = uow.books().find_by_book_store(book_store_id).await?;
        Ok(books.into_iter().map(Into::into).collect())
    }

    /// Delete a store with its employees, books and customer associations.
    /// Customers themselves are kept.
    pub async fn delete_book_store_by_id(&self, id: i64) -> DomainResult<()> {
        let uow = self.repos.begin().await?;
        require_book_store(&*uow, id).await?;

        let employees = uow.employees().delete_by_book_store(id).await?;
        let books = uow.books().delete_by_book_store(id).await?;
        let links = uow.customers().unlink_book_store(id).await?;
        uow.book_stores().delete(id).await?;
        uow.commit().await?;

        info!(
            book_store_id = id,
            employees, books, customer_links = links, "Book store deleted"
        );
        Ok(())
    }
}

async fn require_book_store<R>(repos: &R, id: i64) -> DomainResult<BookStore>
where
    R: Repositories + ?Sized,
{
    repos
        .book_stores()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("BookStore", id))
}

async fn project<R>(repos: &R, store: BookStore) -> DomainResult<BookStoreData>
where
    R: Repositories + ?Sized,
{
    let Some(id) = store.id else {
        return Ok(store.into());
    };
    let customers = repos.customers().find_by_book_store(id).await?;
    let employees = repos.employees().find_by_book_store(id).await?;
    let books = repos.books().find_by_book_store(id).await?;
    Ok(BookStoreData::with_members(store, customers, employees, books))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn service() -> BookStoreService {
        BookStoreService::new(Arc::new(InMemoryRepositoryProvider::new()))
    }

    fn store_named(name: &str) -> BookStoreData {
        BookStoreData {
            book_store_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn employee_named(id: Option<i64>, first_name: &str) -> BookStoreEmployee {
        BookStoreEmployee {
            employee_id: id,
            employee_first_name: Some(first_name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_retrieve_returns_same_fields() {
        let svc = service();
        let saved = svc
            .save_book_store(BookStoreData {
                book_store_name: Some("Alpha".into()),
                book_store_city: Some("Springfield".into()),
                book_store_zip: Some("12345".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(saved.book_store_id, Some(1));

        let found = svc.retrieve_book_store_by_id(1).await.unwrap();
        assert_eq!(found, saved);
        assert_eq!(found.book_store_city.as_deref(), Some("Springfield"));
    }

    #[tokio::test]
    async fn update_overwrites_every_scalar() {
        let svc = service();
        svc.save_book_store(BookStoreData {
            book_store_name: Some("Alpha".into()),
            book_store_phone: Some("555-0100".into()),
            ..Default::default()
        })
        .await
        .unwrap();

        let updated = svc
            .save_book_store(BookStoreData {
                book_store_id: Some(1),
                book_store_name: Some("Beta".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.book_store_name.as_deref(), Some("Beta"));
        assert_eq!(updated.book_store_phone, None);
    }

    #[tokio::test]
    async fn updating_missing_store_is_not_found() {
        let err = service()
            .save_book_store(BookStoreData {
                book_store_id: Some(9),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "BookStore", id: 9 }));
    }

    #[tokio::test]
    async fn employee_under_another_store_is_rejected() {
        let svc = service();
        svc.save_book_store(store_named("Alpha")).await.unwrap();
        svc.save_book_store(store_named("Beta")).await.unwrap();

        let jo = svc.save_employee(1, employee_named(None, "Jo")).await.unwrap();
        assert_eq!(jo.employee_id, Some(1));
        let alpha = svc.retrieve_book_store_by_id(1).await.unwrap();
        assert_eq!(alpha.employees, vec![jo.clone()]);

        let err = svc.save_employee(2, employee_named(Some(1), "Jo")).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidRelationship { entity: "Employee", id: 1, book_store_id: 2 }
        ));

        // Rejected save leaves the employee untouched.
        let alpha = svc.retrieve_book_store_by_id(1).await.unwrap();
        assert_eq!(alpha.employees, vec![jo]);
    }

    #[tokio::test]
    async fn employee_update_keeps_identity() {
        let svc = service();
        svc.save_book_store(store_named("Alpha")).await.unwrap();
        svc.save_employee(1, employee_named(None, "Jo")).await.unwrap();

        let renamed = svc.save_employee(1, employee_named(Some(1), "Joanna")).await.unwrap();
        assert_eq!(renamed.employee_id, Some(1));

        let alpha = svc.retrieve_book_store_by_id(1).await.unwrap();
        assert_eq!(alpha.employees.len(), 1);
        assert_eq!(alpha.employees[0].employee_first_name.as_deref(), Some("Joanna"));
    }

    #[tokio::test]
    async fn children_of_missing_store_are_not_found() {
        let svc = service();
        let err = svc.save_employee(4, employee_named(None, "Jo")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "BookStore", id: 4 }));

        let err = svc.save_book(4, BookStoreBook::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "BookStore", id: 4 }));

        let err = svc.save_customer(4, BookStoreCustomer::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "BookStore", id: 4 }));
    }

    #[tokio::test]
    async fn missing_child_id_is_not_found() {
        let svc = service();
        svc.save_book_store(store_named("Alpha")).await.unwrap();

        let err = svc.save_employee(1, employee_named(Some(7), "Jo")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Employee", id: 7 }));

        let book = BookStoreBook {
            book_id: Some(7),
            ..Default::default()
        };
        let err = svc.save_book(1, book).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Book", id: 7 }));

        let customer = BookStoreCustomer {
            customer_id: Some(99),
            ..Default::default()
        };
        let err = svc.save_customer(1, customer).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Customer", id: 99 }));
        assert!(svc.repos.customers().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn customer_membership_is_bidirectional() {
        let svc = service();
        svc.save_book_store(store_named("Alpha")).await.unwrap();
        svc.save_book_store(store_named("Beta")).await.unwrap();

        let ann = svc
            .save_customer(
                1,
                BookStoreCustomer {
                    customer_first_name: Some("Ann".into()),
                    customer_email: Some("ann@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let ann_id = ann.customer_id.unwrap();

        let alpha = svc.retrieve_book_store_by_id(1).await.unwrap();
        assert_eq!(alpha.customers, vec![ann.clone()]);
        let stores = svc.repos.customers().find_book_store_ids(ann_id).await.unwrap();
        assert_eq!(stores, vec![1]);

        // Not a member of Beta yet.
        let again = BookStoreCustomer {
            customer_id: Some(ann_id),
            ..ann.clone()
        };
        let err = svc.save_customer(2, again.clone()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidRelationship { entity: "Customer", .. }));

        // Saving again under Alpha does not duplicate the association.
        svc.save_customer(1, again).await.unwrap();
        let alpha = svc.retrieve_book_store_by_id(1).await.unwrap();
        assert_eq!(alpha.customers.len(), 1);
    }

    #[tokio::test]
    async fn book_under_another_store_is_rejected() {
        let svc = service();
        svc.save_book_store(store_named("Alpha")).await.unwrap();
        svc.save_book_store(store_named("Beta")).await.unwrap();

        let book = svc
            .save_book(
                1,
                BookStoreBook {
                    genre: Some("Fiction".into()),
                    price: Some("12.99".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(book.price.as_deref(), Some("12.99"));

        let err = svc.save_book(2, book.clone()).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidRelationship { entity: "Book", book_store_id: 2, .. }
        ));

        assert_eq!(svc.list_books_for_book_store(1).await.unwrap(), vec![book]);
        assert!(svc.list_books_for_book_store(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retrieve_all_leaves_collections_empty() {
        let svc = service();
        svc.save_book_store(store_named("Alpha")).await.unwrap();
        svc.save_book_store(store_named("Beta")).await.unwrap();
        svc.save_employee(1, employee_named(None, "Jo")).await.unwrap();
        svc.save_book(1, BookStoreBook::default()).await.unwrap();
        svc.save_customer(1, BookStoreCustomer::default()).await.unwrap();

        let all = svc.retrieve_all_book_stores().await.unwrap();
        assert_eq!(all.len(), 2);
        for store in all {
            assert!(store.customers.is_empty());
            assert!(store.employees.is_empty());
            assert!(store.books.is_empty());
        }
    }

    #[tokio::test]
    async fn delete_cascades_but_keeps_customers() {
        let svc = service();
        svc.save_book_store(store_named("Alpha")).await.unwrap();
        svc.save_book_store(store_named("Beta")).await.unwrap();
        svc.save_employee(1, employee_named(None, "Jo")).await.unwrap();
        svc.save_book(1, BookStoreBook::default()).await.unwrap();
        let shared = svc.save_customer(1, BookStoreCustomer::default()).await.unwrap();
        let shared_id = shared.customer_id.unwrap();
        svc.repos.customers().link(2, shared_id).await.unwrap();

        svc.delete_book_store_by_id(1).await.unwrap();

        let err = svc.retrieve_book_store_by_id(1).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(svc.repos.employees().find_all().await.unwrap().is_empty());
        assert!(svc.repos.books().find_all().await.unwrap().is_empty());

        let customer = svc.repos.customers().find_by_id(shared_id).await.unwrap();
        assert!(customer.is_some());
        let beta = svc.retrieve_book_store_by_id(2).await.unwrap();
        assert_eq!(beta.customers.len(), 1);
        let stores = svc.repos.customers().find_book_store_ids(shared_id).await.unwrap();
        assert_eq!(stores, vec![2]);
    }

    #[tokio::test]
    async fn deleting_missing_store_is_not_found() {
        let err = service().delete_book_store_by_id(3).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "BookStore", id: 3 }));
    }

    #[tokio::test]
    async fn list_books_of_missing_store_is_not_found() {
        let err = service().list_books_for_book_store(3).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    async fn sqlite_file_service(path: &str) -> BookStoreService {
        use sea_orm_migration::MigratorTrait;

        use crate::infrastructure::database::migrator::Migrator;
        use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

        let db = init_database(&DatabaseConfig::sqlite(path)).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        BookStoreService::new(Arc::new(SeaOrmRepositoryProvider::new(db)))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_to_a_file_database_all_succeed() {
        let path = std::env::temp_dir().join(format!("bookstore-{}.db", uuid::Uuid::new_v4()));
        let path = path.to_string_lossy().into_owned();
        let svc = Arc::new(sqlite_file_service(&path).await);
        svc.save_book_store(store_named("Alpha")).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..40 {
            let svc = svc.clone();
            tasks.push(tokio::spawn(async move {
                svc.save_employee(1, employee_named(None, &format!("Jo{}", i)))
                    .await
                    .map(|_| ())
            }));
        }
        for _ in 0..10 {
            let svc = svc.clone();
            tasks.push(tokio::spawn(async move {
                svc.retrieve_book_store_by_id(1).await.map(|_| ())
            }));
        }

        let mut failures = Vec::new();
        for task in tasks {
            if let Err(e) = task.await.unwrap() {
                failures.push(e.to_string());
            }
        }
        let view = svc.retrieve_book_store_by_id(1).await.unwrap();

        drop(svc);
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path, suffix));
        }

        assert!(failures.is_empty(), "{} writes failed: {:?}", failures.len(), failures);
        assert_eq!(view.employees.len(), 40);
    }
}
