pub mod auth;
pub mod dashboard;
pub mod devices;
pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::services::rate_limit::ClientIpKeyExtractor;
use crate::session::require_session;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        auth::current_session,
        devices::list_devices,
        devices::device_view,
        devices::readings_csv,
        devices::device_stream,
    ),
    components(
        schemas(
            auth::SessionResponse,
            devices::DeviceSummary,
            crate::devices::Device,
            crate::render::DeviceView,
            crate::render::view::ActiveView,
            crate::render::view::MetricCard,
            crate::render::view::MapView,
            crate::render::view::MapMarker,
            crate::render::view::TableRow,
            crate::render::view::ChartData,
            crate::render::view::ChartSeries,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Dashboard session"),
        (name = "devices", description = "Device selection and rendered telemetry"),
    ),
    info(
        title = "Datalogger Dashboard API",
        description = "Session-gated telemetry views for the datalogger devices. Log in through /login first.",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    // Login is the only route a visitor can hammer without a session
    let login_route = post(auth::login);
    let login_route = if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        login_route
    } else {
        tracing::info!(
            login_rate = %format!("1 per {}s burst {}", config.rate_limit_login_per_second, config.rate_limit_login_burst),
            "Rate limiting configured"
        );
        match GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor {
                trust_proxy_headers: config.trust_proxy_headers,
            })
            .per_second(config.rate_limit_login_per_second)
            .burst_size(config.rate_limit_login_burst)
            .finish()
        {
            Some(limiter) => login_route.layer(GovernorLayer {
                config: Arc::new(limiter),
            }),
            None => {
                tracing::error!("Invalid login rate limit settings, rate limiting disabled");
                login_route
            }
        }
    };

    let page_routes = Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/login", get(dashboard::login_page).merge(login_route))
        .route("/logout", post(auth::logout));

    // Everything under /api requires a live session
    let api_routes = Router::new()
        .route("/session", get(auth::current_session))
        .route("/devices", get(devices::list_devices))
        .route("/devices/{device}/view", get(devices::device_view))
        .route("/devices/{device}/readings.csv", get(devices::readings_csv))
        .route("/devices/{device}/stream", get(devices::device_stream))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // Health check routes (no session, no rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
