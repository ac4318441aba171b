//! Employee domain entity

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Employee {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    /// Owning book store. Required once persisted.
    pub book_store_id: i64,
}
