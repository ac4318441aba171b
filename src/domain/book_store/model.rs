//! BookStore domain entity

/// A book store. Its employees, books and customers are stored separately and
/// reached through their own repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookStore {
    /// `None` until the store has been persisted.
    pub id: Option<i64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}
