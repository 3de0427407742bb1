//! HTTP surface for the portfolio catalog.
//!
//! ```text
//! GET    /
//! GET    /projects
//! POST   /projects
//! GET    /projects/{name}
//! PUT    /projects/{name}
//! DELETE /projects/{name}
//! GET    /projects/{name}/categories
//! POST   /projects/{name}/categories
//! DELETE /projects/{name}/categories/{category_name}
//! GET    /categories
//! POST   /categories
//! GET    /categories/{name}
//! PUT    /categories/{name}
//! DELETE /categories/{name}
//! ```

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
    Router,
};
use log::{error, info, warn};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use config::{Config, ConfigError};
use error::AppError;
use routes::{categories, projects};
use state::{AppState, Store};

const CORS_MAX_AGE: Duration = Duration::from_secs(60 * 60);
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assembles every route with CORS and request logging.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{name}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/projects/{name}/categories",
            get(projects::list_categories).post(projects::add_category),
        )
        .route(
            "/projects/{name}/categories/{category_name}",
            delete(projects::remove_category),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{name}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

/// CORS policy: one allowed origin when configured, any origin otherwise.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    match origin {
        Some(origin) => {
            let value = HeaderValue::from_str(origin).map_err(|err| ConfigError::Invalid {
                key: "PORTFOLIO_CORS_ORIGIN",
                value: origin.to_string(),
                reason: err.to_string(),
            })?;
            Ok(cors.allow_origin(value))
        }
        None => Ok(cors.allow_origin(Any)),
    }
}

/// Opens the store, serves until a shutdown signal, then closes the store.
pub async fn run(config: Config) -> Result<(), AppError> {
    let store = Store::open(&config.db_path)?;
    let cors = cors_layer(config.cors_origin.as_deref())?;
    let router = build_router(AppState::new(store.clone()), cors);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|err| AppError::Internal(format!("bind failed on {address}: {err}")))?;
    info!("event=server_listen module=http status=ok address={address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    info!("event=server_stop module=http status=ok");
    store.close()
}

async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let mut response = next.run(request).await;
    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if status.is_server_error() {
        error!(
            "event=http_request module=http status=error request_id={request_id} method={method} route={route} http_status={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else if status.is_client_error() {
        warn!(
            "event=http_request module=http status=rejected request_id={request_id} method={method} route={route} http_status={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=http status=ok request_id={request_id} method={method} route={route} http_status={} duration_ms={duration_ms}",
            status.as_u16()
        );
    }

    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=http status=ok signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown_signal module=http status=error signal=ctrl_c error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=http status=ok signal=terminate");
            }
            Err(err) => {
                error!(
                    "event=shutdown_signal module=http status=error signal=terminate error={err}"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
