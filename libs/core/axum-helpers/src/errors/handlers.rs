use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AppError, ErrorResponse};

/// Fallback handler for requests that match no route.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("No handler found for {} {}", method, uri.path()))
}

/// Middleware that completes error payloads with the request path.
///
/// Responses produced by [`AppError`] carry their [`ErrorResponse`] in the
/// response extensions; the body is re-rendered with `path` set. A bare 405
/// from the router is turned into an error payload as well.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    if response.status() == StatusCode::METHOD_NOT_ALLOWED
        && response.extensions().get::<ErrorResponse>().is_none()
    {
        let allow = response.headers().get(header::ALLOW).cloned();
        response = AppError::MethodNotAllowed(format!(
            "Request method '{}' is not supported",
            method
        ))
        .into_response();
        if let Some(allow) = allow {
            response.headers_mut().insert(header::ALLOW, allow);
        }
    }

    with_path(response, &path)
}

fn with_path(mut response: Response, path: &str) -> Response {
    let Some(payload) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };
    let payload = payload.with_path(path);

    let body = match serde_json::to_vec(&payload) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to serialize error payload: {:?}", e);
            return response;
        }
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.extensions.insert(payload);
    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn missing() -> AppError {
        AppError::NotFound("Category not found with ID 7".to_string())
    }

    async fn ok() -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new()
            .route("/api/categories/{id}", get(missing))
            .route("/api/ok", get(ok))
            .fallback(not_found)
            .layer(middleware::from_fn(error_envelope))
    }

    async fn send(method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_error_payload_gets_request_path() {
        let (status, body) = send(Method::GET, "/api/categories/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.status, 404);
        assert_eq!(payload.path, "/api/categories/7");
        assert_eq!(payload.message, "Category not found with ID 7");
    }

    #[tokio::test]
    async fn test_fallback_names_method_and_path() {
        let (status, body) = send(Method::DELETE, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.message, "No handler found for DELETE /nowhere");
        assert_eq!(payload.path, "/nowhere");
    }

    #[tokio::test]
    async fn test_method_not_allowed_is_wrapped() {
        let (status, body) = send(Method::PATCH, "/api/ok").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.status, 405);
        assert_eq!(payload.path, "/api/ok");
    }

    #[tokio::test]
    async fn test_success_untouched() {
        let (status, body) = send(Method::GET, "/api/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }
}
