use axum::{
    Extension, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{AuditEvent, AuditOutcome, IdPath, Principal, ValidatedJson};
use serde_json::json;
use std::sync::Arc;

use crate::error::CatalogResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::ProductService;

type SharedService<P, C> = Arc<ProductService<P, C>>;

pub(super) fn router<P, C>(service: ProductService<P, C>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/categories/{id}/products",
            get(list_products).post(create_product),
        )
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// Products owned by the category in the path
async fn list_products<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    IdPath(category_id): IdPath,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.list_products_by_category(category_id).await?;
    Ok(Json(products))
}

async fn get_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

async fn create_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    principal: Option<Extension<Principal>>,
    headers: HeaderMap,
    IdPath(category_id): IdPath,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create_product(category_id, input).await?;

    AuditEvent::new(
        principal.as_deref(),
        "product.create",
        format!("product:{}", product.id),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({
        "name": product.name,
        "price": product.price,
        "category_id": product.category_id,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    principal: Option<Extension<Principal>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    let product = service.update_product(id, input).await?;

    AuditEvent::new(
        principal.as_deref(),
        "product.update",
        format!("product:{}", id),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({
        "name": product.name,
        "price": product.price,
        "category_id": product.category_id,
    }))
    .log();

    Ok(Json(product))
}

async fn delete_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    principal: Option<Extension<Principal>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode> {
    service.delete_product(id).await?;

    AuditEvent::new(
        principal.as_deref(),
        "product.delete",
        format!("product:{}", id),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
