//! Book domain entity

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub id: Option<i64>,
    pub genre: Option<String>,
    /// Free-form text, stored as entered.
    pub price: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub book_store_id: i64,
}
