//! Handler tests for the Catalog domain
//!
//! These tests drive the domain router directly against the in-memory store:
//! - Request deserialization and validation
//! - Response serialization (camelCase product payloads)
//! - HTTP status codes
//! - Error responses
//!
//! Access control, the `/api` prefix and the error `path` are covered by
//! `api_test.rs`, which runs the full application router.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app_with(repository: InMemoryCatalogRepository) -> Router {
    let categories = CategoryService::new(repository.clone());
    let products = ProductService::new(repository.clone(), repository);
    handlers::router(categories, products)
}

fn app() -> Router {
    app_with(InMemoryCatalogRepository::new())
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn seed_category(app: &Router, name: &str) -> Category {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/categories", json!({ "name": name })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_category_returns_201() {
    let app = app();

    let response = app
        .oneshot(json_request("POST", "/categories", json!({ "name": "Books" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "id": 1, "name": "Books" }));
}

#[tokio::test]
async fn test_create_category_validates_input() {
    let app = app();

    let response = app
        .oneshot(json_request("POST", "/categories", json!({ "name": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.status, 400);
    assert_eq!(error.message, "name: Name is required");
}

#[tokio::test]
async fn test_create_category_rejects_malformed_json() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/categories")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_category_without_content_type_returns_415() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/categories")
        .body(Body::from(json!({ "name": "Books" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.status, 415);
    assert_eq!(
        error.message,
        "Expected request with `Content-Type: application/json`"
    );
}

#[tokio::test]
async fn test_create_category_with_oversized_body_returns_413() {
    let app = app();
    let name = "x".repeat(3 * 1024 * 1024);

    let response = app
        .oneshot(json_request("POST", "/categories", json!({ "name": name })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.status, 413);
    assert!(error.message.contains("length limit exceeded"));
}

#[tokio::test]
async fn test_create_category_with_wrong_field_type_returns_400() {
    let response = app()
        .oneshot(json_request("POST", "/categories", json!({ "name": 42 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_category_name_returns_409() {
    let app = app();
    seed_category(&app, "Books").await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/categories", json!({ "name": "Books" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Category with name 'Books' already exists.");

    let response = app.oneshot(get("/categories")).await.unwrap();
    let categories: Vec<Category> = json_body(response.into_body()).await;
    assert_eq!(categories.len(), 1);
}

#[tokio::test]
async fn test_list_categories_in_id_order() {
    let app = app();
    seed_category(&app, "Music").await;
    seed_category(&app, "Books").await;

    let response = app.oneshot(get("/categories")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!([{ "id": 1, "name": "Music" }, { "id": 2, "name": "Books" }])
    );
}

#[tokio::test]
async fn test_get_category_not_found() {
    let response = app().oneshot(get("/categories/7")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Category not found with ID 7");
}

#[tokio::test]
async fn test_get_category_with_invalid_id() {
    let response = app().oneshot(get("/categories/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Invalid ID: abc");
}

#[tokio::test]
async fn test_update_category_to_its_own_name() {
    let app = app();
    let books = seed_category(&app, "Books").await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/categories/{}", books.id),
            json!({ "name": "Books" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Category = json_body(response.into_body()).await;
    assert_eq!(updated, books);
}

#[tokio::test]
async fn test_update_category_to_taken_name_returns_409() {
    let app = app();
    seed_category(&app, "Books").await;
    let music = seed_category(&app, "Music").await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/categories/{}", music.id),
            json!({ "name": "Books" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_product_returns_camel_case_payload() {
    let app = app();
    seed_category(&app, "Books").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/categories/1/products",
            json!({ "name": "Novel", "price": 9.99 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Novel", "price": 9.99, "categoryId": 1 })
    );
}

#[tokio::test]
async fn test_create_product_under_missing_category() {
    let repository = InMemoryCatalogRepository::new();
    let app = app_with(repository.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/categories/5/products",
            json!({ "name": "Novel", "price": 9.99 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Category not found with ID 5");
    assert!(
        ProductRepository::find_by_id(&repository, 1)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_create_product_reports_every_invalid_field() {
    let app = app();
    seed_category(&app, "Books").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/categories/1/products",
            json!({ "name": " ", "price": -1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(
        error.message,
        "name: Name is required, price: Price must be greater than or equal to 0"
    );
}

#[tokio::test]
async fn test_list_products_by_category() {
    let app = app();
    seed_category(&app, "Books").await;
    seed_category(&app, "Music").await;
    for (uri, name) in [
        ("/categories/1/products", "Novel"),
        ("/categories/2/products", "Album"),
        ("/categories/1/products", "Atlas"),
    ] {
        app.clone()
            .oneshot(json_request("POST", uri, json!({ "name": name, "price": 1.5 })))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get("/categories/1/products"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Novel", "Atlas"]);

    let response = app.oneshot(get("/categories/9/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_product_moves_between_categories() {
    let app = app();
    seed_category(&app, "Books").await;
    seed_category(&app, "Music").await;
    app.clone()
        .oneshot(json_request(
            "POST",
            "/categories/1/products",
            json!({ "name": "Novel", "price": 9.99 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/products/1",
            json!({ "name": "Audiobook", "price": 14.0, "categoryId": 2 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.category_id, 2);
    assert_eq!(product.name, "Audiobook");

    let response = app.oneshot(get("/categories/1/products")).await.unwrap();
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_update_product_to_missing_category_leaves_it_unchanged() {
    let app = app();
    seed_category(&app, "Books").await;
    app.clone()
        .oneshot(json_request(
            "POST",
            "/categories/1/products",
            json!({ "name": "Novel", "price": 9.99 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/products/1",
            json!({ "name": "Novel", "price": 9.99, "categoryId": 99 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/products/1")).await.unwrap();
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.category_id, 1);
}

#[tokio::test]
async fn test_delete_product_returns_204_then_404() {
    let app = app();
    seed_category(&app, "Books").await;
    app.clone()
        .oneshot(json_request(
            "POST",
            "/categories/1/products",
            json!({ "name": "Novel", "price": 9.99 }),
        ))
        .await
        .unwrap();

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/products/1")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let response = app.oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Product not found with ID 1");
}

#[tokio::test]
async fn test_delete_category_cascades_to_products() {
    let app = app();
    seed_category(&app, "Books").await;
    for name in ["Novel", "Atlas", "Poems"] {
        app.clone()
            .oneshot(json_request(
                "POST",
                "/categories/1/products",
                json!({ "name": name, "price": 3.0 }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/categories/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for id in 1..=3 {
        let response = app
            .clone()
            .oneshot(get(&format!("/products/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
