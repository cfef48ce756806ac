use super::AuthError;
use super::credentials::{CredentialVerifier, Principal};
use super::policy::{AccessLevel, required_access};
use crate::audit::{AuditEvent, AuditOutcome};
use crate::errors::{AppError, messages};
use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use std::sync::Arc;

/// State for [`basic_auth_middleware`].
#[derive(Clone)]
pub struct BasicAuth {
    verifier: Arc<dyn CredentialVerifier>,
    challenge: HeaderValue,
}

impl BasicAuth {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, realm: &str) -> Result<Self, AuthError> {
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
            .map_err(|_| AuthError::InvalidRealm(realm.to_string()))?;

        Ok(Self {
            verifier,
            challenge,
        })
    }

    async fn authenticate(&self, credentials: Authorization<Basic>) -> Option<Principal> {
        let verifier = Arc::clone(&self.verifier);
        let username = credentials.username().to_string();
        let password = credentials.password().to_string();

        // Argon2 verification is CPU bound.
        let verified = tokio::task::spawn_blocking(move || {
            verifier
                .verify(&username, &password)
                .map(|role| Principal::new(username, role))
        })
        .await;

        match verified {
            Ok(principal) => principal,
            Err(e) => {
                tracing::error!("Credential verification task failed: {:?}", e);
                None
            }
        }
    }

    fn challenge(&self) -> Response {
        (
            [(header::WWW_AUTHENTICATE, self.challenge.clone())],
            AppError::Unauthorized(messages::AUTHENTICATION_REQUIRED.to_string()),
        )
            .into_response()
    }
}

/// Enforces [`required_access`] with HTTP basic authentication.
///
/// Public requests pass through untouched. Otherwise the caller must present
/// valid credentials (401 with a `WWW-Authenticate` challenge if not) and,
/// for admin routes, hold the admin role (403 if not). The authenticated
/// [`Principal`] is inserted into request extensions.
pub async fn basic_auth_middleware(
    State(auth): State<BasicAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let level = required_access(request.method(), request.uri().path());
    if level == AccessLevel::Public {
        return next.run(request).await;
    }

    let Some(credentials) = request.headers().typed_get::<Authorization<Basic>>() else {
        tracing::debug!("No basic credentials on protected request");
        return auth.challenge();
    };

    let attempted = credentials.username().to_string();
    let Some(principal) = auth.authenticate(credentials).await else {
        tracing::info!("Rejected invalid credentials");
        access_event(None, &request, AuditOutcome::Failure)
            .with_details(serde_json::json!({ "attempted_username": attempted }))
            .log();
        return auth.challenge();
    };

    if level == AccessLevel::Admin && !principal.is_admin() {
        tracing::info!(user = %principal.username, role = %principal.role, "Denied non-admin write");
        access_event(Some(&principal), &request, AuditOutcome::Denied).log();
        return AppError::Forbidden(messages::ACCESS_DENIED.to_string()).into_response();
    }

    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Audit record for a request turned away by the middleware.
fn access_event(principal: Option<&Principal>, request: &Request, outcome: AuditOutcome) -> AuditEvent {
    AuditEvent::new(
        principal,
        "auth.access",
        format!("{} {}", request.method(), request.uri().path()),
        outcome,
    )
    .with_request_headers(request.headers())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::Role;
    use axum::{
        Extension, Router,
        body::Body,
        http::{Method, StatusCode},
        middleware,
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct Fixed;

    impl CredentialVerifier for Fixed {
        fn verify(&self, username: &str, password: &str) -> Option<Role> {
            match (username, password) {
                ("admin", "adminpass") => Some(Role::Admin),
                ("user", "userpass") => Some(Role::User),
                _ => None,
            }
        }
    }

    async fn whoami(principal: Option<Extension<Principal>>) -> String {
        principal
            .map(|Extension(p)| p.username)
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app() -> Router {
        let auth = BasicAuth::new(Arc::new(Fixed), "catalog").unwrap();
        Router::new()
            .route("/api/things", get(whoami).post(whoami))
            .route("/private", get(whoami))
            .layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
    }

    fn basic(user: &str, pass: &str) -> String {
        let mut headers = axum::http::HeaderMap::new();
        headers.typed_insert(Authorization::basic(user, pass));
        headers
            .get(header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    async fn call(method: Method, uri: &str, auth: Option<String>) -> (StatusCode, Response) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        (response.status(), response)
    }

    async fn text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_public_read_without_credentials() {
        let (status, response) = call(Method::GET, "/api/things", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_write_without_credentials_is_challenged() {
        let (status, response) = call(Method::POST, "/api/things", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"catalog\""
        );
    }

    #[tokio::test]
    async fn test_write_with_bad_password_is_challenged() {
        let (status, _) = call(Method::POST, "/api/things", Some(basic("admin", "nope"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_write_as_user_is_forbidden() {
        let (status, response) =
            call(Method::POST, "/api/things", Some(basic("user", "userpass"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[tokio::test]
    async fn test_write_as_admin_passes_principal() {
        let (status, response) =
            call(Method::POST, "/api/things", Some(basic("admin", "adminpass"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text(response).await, "admin");
    }

    #[tokio::test]
    async fn test_non_api_path_needs_any_role() {
        let (status, _) = call(Method::GET, "/private", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, response) = call(Method::GET, "/private", Some(basic("user", "userpass"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text(response).await, "user");
    }

    #[test]
    fn test_denied_write_is_audited_with_principal() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/categories/3")
            .header("x-forwarded-for", "10.1.2.3")
            .body(Body::empty())
            .unwrap();
        let user = Principal::new("user", Role::User);

        let event = access_event(Some(&user), &request, AuditOutcome::Denied);

        assert_eq!(event.outcome, AuditOutcome::Denied);
        assert_eq!(event.username.as_deref(), Some("user"));
        assert_eq!(event.role, Some(Role::User));
        assert_eq!(event.action, "auth.access");
        assert_eq!(event.resource, "DELETE /api/categories/3");
        assert_eq!(event.ip_address.as_deref(), Some("10.1.2.3"));
    }

    #[test]
    fn test_failed_login_is_audited_without_principal() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/categories")
            .body(Body::empty())
            .unwrap();

        let event = access_event(None, &request, AuditOutcome::Failure);

        assert_eq!(event.outcome, AuditOutcome::Failure);
        assert!(event.username.is_none());
        assert_eq!(event.resource, "POST /api/categories");
    }

    #[test]
    fn test_invalid_realm_rejected() {
        assert!(BasicAuth::new(Arc::new(Fixed), "bad\nrealm").is_err());
    }
}
