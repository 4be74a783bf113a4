//! Public reorder API.
//!
//! A returning customer's previous check-in can be pulled up by order id or
//! by phone number. Either way the response only carries contact details and
//! processing preferences; prices, deposits and payment state never leave the
//! store through these routes.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use deercheck_store::Store;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{info, Instrument};

pub mod error;
pub mod routes;

use routes::{
    healthz_handler, method_not_allowed_handler, missing_order_id_handler,
    previous_order_by_phone_handler, previous_order_handler, unknown_route_handler,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/api/previous-order/{order_id}",
            get(previous_order_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/api/previous-order",
            get(missing_order_id_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/api/previous-order/",
            get(missing_order_id_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/api/previous-orders",
            get(previous_order_by_phone_handler).fallback(method_not_allowed_handler),
        )
        .route("/healthz", get(healthz_handler))
        .fallback(unknown_route_handler)
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

/// Logs method, path and status. Query strings are left out since the phone
/// lookup carries a phone number there.
async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let route = request.uri().path().to_string();
    let span = tracing::info_span!("http.request", method = %method, route = %route);

    let response = next.run(request).instrument(span).await;
    info!(
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request complete"
    );
    response
}

pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install signal handler");
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
