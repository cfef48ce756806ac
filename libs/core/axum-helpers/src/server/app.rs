use super::health::health_router;
use super::shutdown::ShutdownCoordinator;
use crate::auth::{BasicAuth, basic_auth_middleware};
use crate::errors::handlers::{error_envelope, not_found};
use crate::http::{CorsConfig, security_headers};
use axum::{Router, middleware};
use core_config::AppInfo;
use core_config::server::ServerConfig;
use std::future::{Future, IntoFuture};
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

/// Assembles the full application router.
///
/// - API routes nested under `/api`
/// - `/health` liveness endpoint
/// - JSON 404 fallback
/// - basic-auth access control, error envelope, tracing, security headers
/// - CORS when origins are configured, response compression
///
/// Domain routers apply their own state before being passed in.
///
/// # Example
/// ```ignore
/// let api_routes = Router::new().merge(domain_catalog::handlers::router(service));
/// let router = create_router(api_routes, app_info!(), auth, &CorsConfig::from_env()?);
/// ```
pub fn create_router(apis: Router, app_info: AppInfo, auth: BasicAuth, cors: &CorsConfig) -> Router {
    let router = Router::new()
        .nest("/api", apis)
        .merge(health_router(app_info))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
        .layer(middleware::from_fn(error_envelope))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = match cors.layer() {
        Some(cors_layer) => {
            info!(origins = cors.allowed_origins.len(), "CORS enabled");
            router.layer(cors_layer)
        }
        None => router,
    };

    router.layer(CompressionLayer::new())
}

/// Serves the router until SIGINT/SIGTERM, then drains and runs `cleanup`.
///
/// In-flight requests get `server_config.shutdown_timeout` to finish; the
/// cleanup future (closing the database pool, etc.) gets the same budget.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal = coordinator.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_shutdown().await });

    let drain_deadline = async {
        coordinator.wait_for_shutdown().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    let serve_result = tokio::select! {
        result = server.into_future() => result.inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        }),
        _ = drain_deadline => {
            warn!("In-flight requests exceeded {:?}, forcing shutdown", shutdown_timeout);
            Ok(())
        }
    };

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(_) => info!("Cleanup completed successfully"),
        Err(_) => warn!("Cleanup exceeded timeout of {:?}", shutdown_timeout),
    }

    serve_result
}
