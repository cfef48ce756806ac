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
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

pub(super) fn router<C: CategoryRepository + 'static>(service: CategoryService<C>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .with_state(shared_service)
}

async fn list_categories<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
) -> CatalogResult<Json<Vec<Category>>> {
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

async fn get_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Category>> {
    let category = service.get_category(id).await?;
    Ok(Json(category))
}

async fn create_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    principal: Option<Extension<Principal>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;

    AuditEvent::new(
        principal.as_deref(),
        "category.create",
        format!("category:{}", category.id),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "name": category.name }))
    .log();

    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    principal: Option<Extension<Principal>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    let category = service.update_category(id, input).await?;

    AuditEvent::new(
        principal.as_deref(),
        "category.update",
        format!("category:{}", id),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "name": category.name }))
    .log();

    Ok(Json(category))
}

async fn delete_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    principal: Option<Extension<Principal>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode> {
    service.delete_category(id).await?;

    AuditEvent::new(
        principal.as_deref(),
        "category.delete",
        format!("category:{}", id),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
