//! Book store projections
//!
//! The denormalized view of a book store aggregate exchanged at the boundary.
//! Field names on the wire follow the `bookStoreName` / `employeeFirstName`
//! convention. Every scalar is optional and absent means null.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Book, BookStore, Customer, Employee};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookStoreData {
    /// Absent to create a new store
    pub book_store_id: Option<i64>,
    #[validate(length(max = 255))]
    pub book_store_name: Option<String>,
    #[validate(length(max = 255))]
    pub book_store_address: Option<String>,
    #[validate(length(max = 255))]
    pub book_store_city: Option<String>,
    #[validate(length(max = 255))]
    pub book_store_state: Option<String>,
    #[validate(length(max = 255))]
    pub book_store_zip: Option<String>,
    #[validate(length(max = 255))]
    pub book_store_phone: Option<String>,
    /// Output only; ignored on save
    #[serde(default)]
    pub customers: Vec<BookStoreCustomer>,
    /// Output only; ignored on save
    #[serde(default)]
    pub employees: Vec<BookStoreEmployee>,
    /// Output only; ignored on save
    #[serde(default)]
    pub books: Vec<BookStoreBook>,
}

impl BookStoreData {
    /// Full projection with the nested collections populated.
    pub fn with_members(
        store: BookStore,
        customers: Vec<Customer>,
        employees: Vec<Employee>,
        books: Vec<Book>,
    ) -> Self {
        Self {
            customers: customers.into_iter().map(Into::into).collect(),
            employees: employees.into_iter().map(Into::into).collect(),
            books: books.into_iter().map(Into::into).collect(),
            ..Self::from(store)
        }
    }

    /// Overwrites every scalar field of `store`, leaving its id alone.
    pub fn apply_to(&self, store: &mut BookStore) {
        store.name = self.book_store_name.clone();
        store.address = self.book_store_address.clone();
        store.city = self.book_store_city.clone();
        store.state = self.book_store_state.clone();
        store.zip = self.book_store_zip.clone();
        store.phone = self.book_store_phone.clone();
    }
}

/// Scalar projection; nested collections are empty.
impl From<BookStore> for BookStoreData {
    fn from(store: BookStore) -> Self {
        Self {
            book_store_id: store.id,
            book_store_name: store.name,
            book_store_address: store.address,
            book_store_city: store.city,
            book_store_state: store.state,
            book_store_zip: store.zip,
            book_store_phone: store.phone,
            customers: Vec::new(),
            employees: Vec::new(),
            books: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookStoreEmployee {
    pub employee_id: Option<i64>,
    #[validate(length(max = 255))]
    pub employee_first_name: Option<String>,
    #[validate(length(max = 255))]
    pub employee_last_name: Option<String>,
    #[validate(length(max = 255))]
    pub employee_phone: Option<String>,
    #[validate(length(max = 255))]
    pub employee_job_title: Option<String>,
}

impl BookStoreEmployee {
    pub fn apply_to(&self, employee: &mut Employee) {
        employee.first_name = self.employee_first_name.clone();
        employee.last_name = self.employee_last_name.clone();
        employee.phone = self.employee_phone.clone();
        employee.job_title = self.employee_job_title.clone();
    }
}

impl From<Employee> for BookStoreEmployee {
    fn from(e: Employee) -> Self {
        Self {
            employee_id: e.id,
            employee_first_name: e.first_name,
            employee_last_name: e.last_name,
            employee_phone: e.phone,
            employee_job_title: e.job_title,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookStoreCustomer {
    pub customer_id: Option<i64>,
    #[validate(length(max = 255))]
    pub customer_first_name: Option<String>,
    #[validate(length(max = 255))]
    pub customer_last_name: Option<String>,
    #[validate(email, length(max = 255))]
    pub customer_email: Option<String>,
}

impl BookStoreCustomer {
    pub fn apply_to(&self, customer: &mut Customer) {
        customer.first_name = self.customer_first_name.clone();
        customer.last_name = self.customer_last_name.clone();
        customer.email = self.customer_email.clone();
    }
}

impl From<Customer> for BookStoreCustomer {
    fn from(c: Customer) -> Self {
        Self {
            customer_id: c.id,
            customer_first_name: c.first_name,
            customer_last_name: c.last_name,
            customer_email: c.email,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookStoreBook {
    pub book_id: Option<i64>,
    #[validate(length(max = 255))]
    pub genre: Option<String>,
    /// Kept as text, e.g. "12.99"
    #[validate(length(max = 255))]
    pub price: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub author: Option<String>,
}

impl BookStoreBook {
    pub fn apply_to(&self, book: &mut Book) {
        book.genre = self.genre.clone();
        book.price = self.price.clone();
        book.description = self.description.clone();
        book.author = self.author.clone();
    }
}

impl From<Book> for BookStoreBook {
    fn from(b: Book) -> Self {
        Self {
            book_id: b.id,
            genre: b.genre,
            price: b.price,
            description: b.description,
            author: b.author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_follow_the_entity_prefix() {
        let data = BookStoreData {
            book_store_id: Some(1),
            book_store_name: Some("Alpha".into()),
            employees: vec![BookStoreEmployee {
                employee_id: Some(2),
                employee_first_name: Some("Jo".into()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["bookStoreId"], 1);
        assert_eq!(value["bookStoreName"], "Alpha");
        assert_eq!(value["bookStoreCity"], serde_json::Value::Null);
        assert_eq!(value["employees"][0]["employeeFirstName"], "Jo");
        assert_eq!(value["customers"], json!([]));
    }

    #[test]
    fn collections_may_be_omitted_on_input() {
        let data: BookStoreData = serde_json::from_value(json!({ "bookStoreName": "Alpha" })).unwrap();
        assert_eq!(data.book_store_id, None);
        assert!(data.books.is_empty());
    }

    #[test]
    fn apply_overwrites_with_nulls() {
        let mut store = BookStore {
            id: Some(3),
            name: Some("Old".into()),
            city: Some("Springfield".into()),
            ..Default::default()
        };
        BookStoreData {
            book_store_name: Some("New".into()),
            ..Default::default()
        }
        .apply_to(&mut store);

        assert_eq!(store.id, Some(3));
        assert_eq!(store.name.as_deref(), Some("New"));
        assert_eq!(store.city, None);
    }

    #[test]
    fn customer_email_must_be_valid() {
        let bad = BookStoreCustomer {
            customer_email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let absent = BookStoreCustomer::default();
        assert!(absent.validate().is_ok());
    }

    #[test]
    fn long_text_is_rejected() {
        let book = BookStoreBook {
            author: Some("x".repeat(256)),
            ..Default::default()
        };
        assert!(book.validate().is_err());
    }
}
