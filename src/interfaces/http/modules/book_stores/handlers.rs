//! Book store REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::application::{
    BookStoreBook, BookStoreCustomer, BookStoreData, BookStoreEmployee, BookStoreService,
};
use crate::interfaces::http::common::{
    domain_error_response, ApiError, ApiResponse, MessageResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct BookStoreState {
    pub service: Arc<BookStoreService>,
}

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn created<T>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

#[utoipa::path(
    post,
    path = "/api/v1/book-stores",
    tag = "Book Stores",
    request_body = BookStoreData,
    responses(
        (status = 201, description = "Book store saved", body = ApiResponse<BookStoreData>),
        (status = 404, description = "bookStoreId given but unknown"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_book_store(
    State(state): State<BookStoreState>,
    ValidatedJson(body): ValidatedJson<BookStoreData>,
) -> Result<Created<BookStoreData>, ApiError> {
    info!("Saving book store {:?}", body.book_store_name);
    state
        .service
        .save_book_store(body)
        .await
        .map(created)
        .map_err(domain_error_response)
}

#[utoipa::path(
    put,
    path = "/api/v1/book-stores/{id}",
    tag = "Book Stores",
    params(("id" = i64, Path, description = "Book store ID")),
    request_body = BookStoreData,
    responses(
        (status = 200, description = "Book store updated", body = ApiResponse<BookStoreData>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_book_store(
    State(state): State<BookStoreState>,
    Path(id): Path<i64>,
    ValidatedJson(mut body): ValidatedJson<BookStoreData>,
) -> Result<Json<ApiResponse<BookStoreData>>, ApiError> {
    info!("Updating book store {}", id);
    body.book_store_id = Some(id);
    state
        .service
        .save_book_store(body)
        .await
        .map(|view| Json(ApiResponse::success(view)))
        .map_err(domain_error_response)
}

#[utoipa::path(
    get,
    path = "/api/v1/book-stores",
    tag = "Book Stores",
    responses(
        (status = 200, description = "All book stores, nested collections empty", body = ApiResponse<Vec<BookStoreData>>)
    )
)]
pub async fn list_book_stores(
    State(state): State<BookStoreState>,
) -> Result<Json<ApiResponse<Vec<BookStoreData>>>, ApiError> {
    state
        .service
        .retrieve_all_book_stores()
        .await
        .map(|stores| Json(ApiResponse::success(stores)))
        .map_err(domain_error_response)
}

#[utoipa::path(
    get,
    path = "/api/v1/book-stores/{id}",
    tag = "Book Stores",
    params(("id" = i64, Path, description = "Book store ID")),
    responses(
        (status = 200, description = "Book store with customers, employees and books", body = ApiResponse<BookStoreData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_book_store(
    State(state): State<BookStoreState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookStoreData>>, ApiError> {
    state
        .service
        .retrieve_book_store_by_id(id)
        .await
        .map(|view| Json(ApiResponse::success(view)))
        .map_err(domain_error_response)
}

#[utoipa::path(
    delete,
    path = "/api/v1/book-stores/{id}",
    tag = "Book Stores",
    params(("id" = i64, Path, description = "Book store ID")),
    responses(
        (status = 200, description = "Deleted with employees, books and customer links", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_book_store(
    State(state): State<BookStoreState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    info!("Deleting book store {}", id);
    state
        .service
        .delete_book_store_by_id(id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Deletion of book store with ID={} was successful.", id),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/book-stores/{id}/employees",
    tag = "Book Stores",
    params(("id" = i64, Path, description = "Book store ID")),
    request_body = BookStoreEmployee,
    responses(
        (status = 201, description = "Employee saved", body = ApiResponse<BookStoreEmployee>),
        (status = 400, description = "Employee belongs to another book store"),
        (status = 404, description = "Book store or employee not found")
    )
)]
pub async fn save_employee(
    State(state): State<BookStoreState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<BookStoreEmployee>,
) -> Result<Created<BookStoreEmployee>, ApiError> {
    state
        .service
        .save_employee(id, body)
        .await
        .map(created)
        .map_err(domain_error_response)
}

#[utoipa::path(
    post,
    path = "/api/v1/book-stores/{id}/customers",
    tag = "Book Stores",
    params(("id" = i64, Path, description = "Book store ID")),
    request_body = BookStoreCustomer,
    responses(
        (status = 201, description = "Customer saved and linked", body = ApiResponse<BookStoreCustomer>),
        (status = 400, description = "Customer is not a member of the book store"),
        (status = 404, description = "Book store or customer not found")
    )
)]
pub async fn save_customer(
    State(state): State<BookStoreState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<BookStoreCustomer>,
) -> Result<Created<BookStoreCustomer>, ApiError> {
    state
        .service
        .save_customer(id, body)
        .await
        .map(created)
        .map_err(domain_error_response)
}

#[utoipa::path(
    post,
    path = "/api/v1/book-stores/{id}/books",
    tag = "Book Stores",
    params(("id" = i64, Path, description = "Book store ID")),
    request_body = BookStoreBook,
    responses(
        (status = 201, description = "Book saved", body = ApiResponse<BookStoreBook>),
        (status = 400, description = "Book belongs to another book store"),
        (status = 404, description = "Book store or book not found")
    )
)]
pub async fn save_book(
    State(state): State<BookStoreState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<BookStoreBook>,
) -> Result<Created<BookStoreBook>, ApiError> {
    state
        .service
        .save_book(id, body)
        .await
        .map(created)
        .map_err(domain_error_response)
}

#[utoipa::path(
    get,
    path = "/api/v1/book-stores/{id}/books",
    tag = "Book Stores",
    params(("id" = i64, Path, description = "Book store ID")),
    responses(
        (status = 200, description = "Books of the book store", body = ApiResponse<Vec<BookStoreBook>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_books(
    State(state): State<BookStoreState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<BookStoreBook>>>, ApiError> {
    state
        .service
        .list_books_for_book_store(id)
        .await
        .map(|books| Json(ApiResponse::success(books)))
        .map_err(domain_error_response)
}
