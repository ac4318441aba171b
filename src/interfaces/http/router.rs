//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, MessageResponse};
use super::modules::book_stores::{self, BookStoreState};
use super::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use crate::application::{
    BookStoreBook, BookStoreCustomer, BookStoreData, BookStoreEmployee, BookStoreService,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        book_stores::create_book_store,
        book_stores::update_book_store,
        book_stores::list_book_stores,
        book_stores::get_book_store,
        book_stores::delete_book_store,
        book_stores::save_employee,
        book_stores::save_customer,
        book_stores::save_book,
        book_stores::list_books,
    ),
    components(
        schemas(
            ApiResponse<String>,
            MessageResponse,
            HealthResponse,
            ComponentHealth,
            BookStoreData,
            BookStoreEmployee,
            BookStoreCustomer,
            BookStoreBook,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Book Stores", description = "Book stores with their employees, customers and books"),
    ),
    info(
        title = "Book Store Service API",
        version = "1.0.0",
        description = "REST API for book stores, their employees, customers and books",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `db` is pinged by `/health`; pass `None` for the in-memory backend.
pub fn create_api_router(
    service: Arc<BookStoreService>,
    db: Option<DatabaseConnection>,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let book_store_routes = Router::new()
        .route(
            "/",
            get(book_stores::list_book_stores).post(book_stores::create_book_store),
        )
        .route(
            "/{id}",
            get(book_stores::get_book_store)
                .put(book_stores::update_book_store)
                .delete(book_stores::delete_book_store),
        )
        .route("/{id}/employees", post(book_stores::save_employee))
        .route("/{id}/customers", post(book_stores::save_customer))
        .route(
            "/{id}/books",
            get(book_stores::list_books).post(book_stores::save_book),
        )
        .with_state(BookStoreState { service });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/book-stores", book_store_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use sea_orm_migration::MigratorTrait;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

    async fn app() -> Router {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let service = Arc::new(BookStoreService::new(Arc::new(SeaOrmRepositoryProvider::new(
            db.clone(),
        ))));
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(service, Some(db), handle)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };

        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn create_get_and_list_book_store() {
        let app = app().await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/book-stores",
            Some(json!({ "bookStoreName": "Alpha", "bookStoreCity": "Springfield" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["bookStoreId"], 1);

        let (_, body) = call(
            &app,
            "POST",
            "/api/v1/book-stores/1/employees",
            Some(json!({ "employeeFirstName": "Jo" })),
        )
        .await;
        assert_eq!(body["data"]["employeeId"], 1);

        let (status, body) = call(&app, "GET", "/api/v1/book-stores/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bookStoreCity"], "Springfield");
        assert_eq!(body["data"]["employees"][0]["employeeFirstName"], "Jo");

        let (status, body) = call(&app, "GET", "/api/v1/book-stores", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["employees"], json!([]));
    }

    #[tokio::test]
    async fn put_uses_the_path_id() {
        let app = app().await;
        call(&app, "POST", "/api/v1/book-stores", Some(json!({ "bookStoreName": "Alpha" }))).await;

        let (status, body) = call(
            &app,
            "PUT",
            "/api/v1/book-stores/1",
            Some(json!({ "bookStoreId": 99, "bookStoreName": "Beta" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bookStoreId"], 1);
        assert_eq!(body["data"]["bookStoreName"], "Beta");

        let (status, body) = call(&app, "PUT", "/api/v1/book-stores/5", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "BookStore with ID=5 does not exist.");
    }

    #[tokio::test]
    async fn ownership_mismatch_is_400() {
        let app = app().await;
        call(&app, "POST", "/api/v1/book-stores", Some(json!({ "bookStoreName": "Alpha" }))).await;
        call(&app, "POST", "/api/v1/book-stores", Some(json!({ "bookStoreName": "Beta" }))).await;
        call(
            &app,
            "POST",
            "/api/v1/book-stores/1/employees",
            Some(json!({ "employeeFirstName": "Jo" })),
        )
        .await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/book-stores/2/employees",
            Some(json!({ "employeeId": 1, "employeeFirstName": "Jo" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Employee with ID=1 does not belong to book store with ID=2."
        );
    }

    #[tokio::test]
    async fn customers_and_books_round_trip_through_the_store() {
        let app = app().await;
        call(&app, "POST", "/api/v1/book-stores", Some(json!({ "bookStoreName": "Alpha" }))).await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/book-stores/1/customers",
            Some(json!({ "customerFirstName": "Ann", "customerEmail": "ann@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["customerId"], 1);

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/book-stores/1/books",
            Some(json!({ "genre": "Fiction", "price": "12.99", "author": "Le Guin" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "GET", "/api/v1/book-stores/1/books", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["price"], "12.99");

        let (_, body) = call(&app, "GET", "/api/v1/book-stores/1", None).await;
        assert_eq!(body["data"]["customers"][0]["customerEmail"], "ann@example.com");
        assert_eq!(body["data"]["books"][0]["author"], "Le Guin");
    }

    #[tokio::test]
    async fn delete_reports_success_then_not_found() {
        let app = app().await;
        call(&app, "POST", "/api/v1/book-stores", Some(json!({ "bookStoreName": "Alpha" }))).await;
        call(
            &app,
            "POST",
            "/api/v1/book-stores/1/books",
            Some(json!({ "genre": "Poetry" })),
        )
        .await;

        let (status, body) = call(&app, "DELETE", "/api/v1/book-stores/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["message"],
            "Deletion of book store with ID=1 was successful."
        );

        let (status, _) = call(&app, "GET", "/api/v1/book-stores/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "DELETE", "/api/v1/book-stores/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_bodies_are_rejected() {
        let app = app().await;
        call(&app, "POST", "/api/v1/book-stores", Some(json!({ "bookStoreName": "Alpha" }))).await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/book-stores/1/customers",
            Some(json!({ "customerEmail": "not-an-email" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/book-stores",
            Some(json!({ "bookStoreName": 42 })),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn health_pings_the_database() {
        let app = app().await;
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = app().await;
        let req = Request::builder()
            .uri("/api/v1/book-stores")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }
}
