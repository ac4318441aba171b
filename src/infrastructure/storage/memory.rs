//! In-memory repository provider
//!
//! Implements every repository trait over `DashMap` tables. Used for
//! development (`database.backend = "memory"`) and by service tests.
//!
//! A unit of work copies the tables, works on the copy and writes it back on
//! commit. Write units of work are serialized by a lock; a read unit of work
//! takes its copy under the same lock and releases it at once. Readers
//! outside a unit of work are not isolated from a commit that is being
//! written back.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::repositories::{Repositories, RepositoryProvider, UnitOfWork};
use crate::domain::{
    Book, BookRepository, BookStore, BookStoreRepository, Customer, CustomerRepository,
    DomainError, DomainResult, Employee, EmployeeRepository,
};

#[derive(Default)]
struct Tables {
    book_stores: DashMap<i64, BookStore>,
    employees: DashMap<i64, Employee>,
    customers: DashMap<i64, Customer>,
    books: DashMap<i64, Book>,
    /// (book_store_id, customer_id)
    links: DashSet<(i64, i64)>,
    book_store_seq: AtomicI64,
    employee_seq: AtomicI64,
    customer_seq: AtomicI64,
    book_seq: AtomicI64,
}

impl Tables {
    fn snapshot(&self) -> Tables {
        Tables {
            book_stores: self.book_stores.clone(),
            employees: self.employees.clone(),
            customers: self.customers.clone(),
            books: self.books.clone(),
            links: self.links.clone(),
            book_store_seq: AtomicI64::new(self.book_store_seq.load(Ordering::SeqCst)),
            employee_seq: AtomicI64::new(self.employee_seq.load(Ordering::SeqCst)),
            customer_seq: AtomicI64::new(self.customer_seq.load(Ordering::SeqCst)),
            book_seq: AtomicI64::new(self.book_seq.load(Ordering::SeqCst)),
        }
    }

    fn overwrite_from(&self, other: &Tables) {
        sync_map(&self.book_stores, &other.book_stores);
        sync_map(&self.employees, &other.employees);
        sync_map(&self.customers, &other.customers);
        sync_map(&self.books, &other.books);

        self.links.retain(|link| other.links.contains(link));
        for link in other.links.iter() {
            self.links.insert(*link);
        }

        for (mine, theirs) in [
            (&self.book_store_seq, &other.book_store_seq),
            (&self.employee_seq, &other.employee_seq),
            (&self.customer_seq, &other.customer_seq),
            (&self.book_seq, &other.book_seq),
        ] {
            mine.fetch_max(theirs.load(Ordering::SeqCst), Ordering::SeqCst);
        }
    }

    fn require_book_store(&self, id: i64) -> DomainResult<()> {
        if self.book_stores.contains_key(&id) {
            Ok(())
        } else {
            Err(DomainError::Storage(format!(
                "FOREIGN KEY constraint failed: book store {} does not exist",
                id
            )))
        }
    }
}

fn sync_map<V: Clone>(target: &DashMap<i64, V>, source: &DashMap<i64, V>) {
    target.retain(|id, _| source.contains_key(id));
    for entry in source.iter() {
        target.insert(*entry.key(), entry.value().clone());
    }
}

fn sorted<V: Clone>(map: &DashMap<i64, V>, keep: impl Fn(&V) -> bool) -> Vec<V> {
    let mut rows: Vec<(i64, V)> = map
        .iter()
        .filter(|e| keep(e.value()))
        .map(|e| (*e.key(), e.value().clone()))
        .collect();
    rows.sort_by_key(|(id, _)| *id);
    rows.into_iter().map(|(_, v)| v).collect()
}

/// Assigns the next id for a new row, or checks that an existing row is there.
fn resolve_id<V>(
    map: &DashMap<i64, V>,
    seq: &AtomicI64,
    id: Option<i64>,
    entity: &str,
) -> DomainResult<i64> {
    match id {
        None => Ok(seq.fetch_add(1, Ordering::SeqCst) + 1),
        Some(id) if map.contains_key(&id) => Ok(id),
        Some(id) => Err(DomainError::Storage(format!(
            "None of the records are updated: {} {}",
            entity, id
        ))),
    }
}

/// All four repositories over one set of tables.
struct MemoryRepos {
    tables: Arc<Tables>,
}

#[async_trait]
impl BookStoreRepository for MemoryRepos {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<BookStore>> {
        Ok(self.tables.book_stores.get(&id).map(|s| s.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<BookStore>> {
        Ok(sorted(&self.tables.book_stores, |_| true))
    }

    async fn save(&self, mut store: BookStore) -> DomainResult<BookStore> {
        let t = &self.tables;
        let id = resolve_id(&t.book_stores, &t.book_store_seq, store.id, "book store")?;
        store.id = Some(id);
        t.book_stores.insert(id, store.clone());
        Ok(store)
    }

    /// Removes the store with its employees, books and customer links, like
    /// the `ON DELETE CASCADE` foreign keys of the SQLite schema.
    async fn delete(&self, id: i64) -> DomainResult<()> {
        let t = &self.tables;
        t.book_stores
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("BookStore", id))?;
        t.employees.retain(|_, e| e.book_store_id != id);
        t.books.retain(|_, b| b.book_store_id != id);
        t.links.retain(|&(store_id, _)| store_id != id);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryRepos {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Employee>> {
        Ok(self.tables.employees.get(&id).map(|e| e.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Employee>> {
        Ok(sorted(&self.tables.employees, |_| true))
    }

    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Employee>> {
        Ok(sorted(&self.tables.employees, |e| e.book_store_id == book_store_id))
    }

    async fn save(&self, mut employee: Employee) -> DomainResult<Employee> {
        let t = &self.tables;
        t.require_book_store(employee.book_store_id)?;
        let id = resolve_id(&t.employees, &t.employee_seq, employee.id, "employee")?;
        employee.id = Some(id);
        t.employees.insert(id, employee.clone());
        Ok(employee)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables
            .employees
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Employee", id))?;
        Ok(())
    }

    async fn delete_by_book_store(&self, book_store_id: i64) -> DomainResult<u64> {
        let before = self.tables.employees.len();
        self.tables
            .employees
            .retain(|_, e| e.book_store_id != book_store_id);
        Ok((before - self.tables.employees.len()) as u64)
    }
}

#[async_trait]
impl CustomerRepository for MemoryRepos {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Customer>> {
        Ok(self.tables.customers.get(&id).map(|c| c.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        Ok(sorted(&self.tables.customers, |_| true))
    }

    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Customer>> {
        let links = &self.tables.links;
        Ok(sorted(&self.tables.customers, |c| {
            c.id.is_some_and(|id| links.contains(&(book_store_id, id)))
        }))
    }

    async fn find_book_store_ids(&self, customer_id: i64) -> DomainResult<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .tables
            .links
            .iter()
            .filter(|link| link.1 == customer_id)
            .map(|link| link.0)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn save(&self, mut customer: Customer) -> DomainResult<Customer> {
        let t = &self.tables;
        let id = resolve_id(&t.customers, &t.customer_seq, customer.id, "customer")?;
        customer.id = Some(id);
        t.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables.links.retain(|link| link.1 != id);
        self.tables
            .customers
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Customer", id))?;
        Ok(())
    }

    async fn link(&self, book_store_id: i64, customer_id: i64) -> DomainResult<()> {
        let t = &self.tables;
        t.require_book_store(book_store_id)?;
        if !t.customers.contains_key(&customer_id) {
            return Err(DomainError::Storage(format!(
                "FOREIGN KEY constraint failed: customer {} does not exist",
                customer_id
            )));
        }
        t.links.insert((book_store_id, customer_id));
        Ok(())
    }

    async fn unlink_book_store(&self, book_store_id: i64) -> DomainResult<u64> {
        let before = self.tables.links.len();
        self.tables.links.retain(|link| link.0 != book_store_id);
        Ok((before - self.tables.links.len()) as u64)
    }
}

#[async_trait]
impl BookRepository for MemoryRepos {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Book>> {
        Ok(self.tables.books.get(&id).map(|b| b.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Book>> {
        Ok(sorted(&self.tables.books, |_| true))
    }

    async fn find_by_book_store(&self, book_store_id: i64) -> DomainResult<Vec<Book>> {
        Ok(sorted(&self.tables.books, |b| b.book_store_id == book_store_id))
    }

    async fn save(&self, mut book: Book) -> DomainResult<Book> {
        let t = &self.tables;
        t.require_book_store(book.book_store_id)?;
        let id = resolve_id(&t.books, &t.book_seq, book.id, "book")?;
        book.id = Some(id);
        t.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables
            .books
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Book", id))?;
        Ok(())
    }

    async fn delete_by_book_store(&self, book_store_id: i64) -> DomainResult<u64> {
        let before = self.tables.books.len();
        self.tables.books.retain(|_, b| b.book_store_id != book_store_id);
        Ok((before - self.tables.books.len()) as u64)
    }
}

macro_rules! impl_repositories {
    ($ty:ty) => {
        impl Repositories for $ty {
            fn book_stores(&self) -> &dyn BookStoreRepository {
                &self.repos
            }

            fn employees(&self) -> &dyn EmployeeRepository {
                &self.repos
            }

            fn customers(&self) -> &dyn CustomerRepository {
                &self.repos
            }

            fn books(&self) -> &dyn BookRepository {
                &self.repos
            }
        }
    };
}

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    repos: MemoryRepos,
    write_lock: Arc<Mutex<()>>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            repos: MemoryRepos {
                tables: Arc::new(Tables::default()),
            },
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl_repositories!(InMemoryRepositoryProvider);

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let guard = self.write_lock.clone().lock_owned().await;
        let working = Arc::new(self.repos.tables.snapshot());
        Ok(Box::new(InMemoryUnitOfWork {
            shared: self.repos.tables.clone(),
            repos: MemoryRepos { tables: working },
            writer: Some(guard),
        }))
    }

    async fn begin_read(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let working = {
            let _guard = self.write_lock.lock().await;
            Arc::new(self.repos.tables.snapshot())
        };
        Ok(Box::new(InMemoryUnitOfWork {
            shared: self.repos.tables.clone(),
            repos: MemoryRepos { tables: working },
            writer: None,
        }))
    }
}

struct InMemoryUnitOfWork {
    shared: Arc<Tables>,
    repos: MemoryRepos,
    /// `None` for a read unit of work, whose copy is never published.
    writer: Option<OwnedMutexGuard<()>>,
}

impl_repositories!(InMemoryUnitOfWork);

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        if self.writer.is_some() {
            self.shared.overwrite_from(&self.repos.tables);
        }
        Ok(())
    }
}
