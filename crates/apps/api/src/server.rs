use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use axum::Router;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use axum::routing::get_service;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::storage::LocalStorage;
use http::{HeaderValue, header};
use sqlx::SqlitePool;
use std::iter::once;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Adds an `x-execution-time` header with the handling time in seconds.
async fn execution_time_middleware(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let mut resp = next.run(req).await;
    let elapsed = format!("{:.6}", started.elapsed().as_secs_f64());
    if let Ok(v) = HeaderValue::from_str(&elapsed) {
        resp.headers_mut().insert("x-execution-time", v);
    }
    resp
}

fn cors_layer(settings: &AppSettings) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = settings
        .api
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_origin(allowed_origins)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::USER_AGENT,
            header::CACHE_CONTROL,
            header::PRAGMA,
        ])
}

/// Builds the full application: api routes, stored media and the middleware stack.
pub fn build_app(pool: SqlitePool, settings: AppSettings) -> Router {
    let storage = LocalStorage::new(
        settings.storage.media_folder.clone(),
        &format!("{}/media", settings.api.base_url()),
    );
    let api_state = ApiContext {
        pool,
        settings: settings.clone(),
        storage: Arc::new(storage),
    };

    // Object keys are random, so stored files never change.
    let serve_dir = ServeDir::new(&settings.storage.media_folder);
    let cache_layer = SetResponseHeaderLayer::if_not_present(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    // Outermost layer is added last.
    create_router(api_state)
        .nest_service("/media", get_service(serve_dir).layer(cache_layer))
        .layer(DefaultBodyLimit::max(settings.api.max_upload_bytes()))
        .layer(SetSensitiveRequestHeadersLayer::new(once(
            header::AUTHORIZATION,
        )))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&settings))
        .layer(from_fn(execution_time_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Serves the app on an already bound listener.
pub async fn serve_on(listener: TcpListener, pool: SqlitePool, settings: AppSettings) -> Result<()> {
    let app = build_app(pool, settings);
    info!("🐸 Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn serve(pool: SqlitePool, settings: AppSettings) -> Result<()> {
    info!("🚀 Initializing server...");
    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, pool, settings).await
}
