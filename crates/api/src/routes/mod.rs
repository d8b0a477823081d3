//! Route handlers for the Morning Light API.

pub mod dashboard;
pub mod health;
pub mod reminder;
pub mod settings;
pub mod subscriptions;
pub mod weights;

use axum::http::{header, HeaderName, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Reminder trigger (scheduler or manual test)
        .route(
            "/send-weight-reminder",
            get(reminder::send_reminder).post(reminder::send_reminder),
        )
        // API endpoints
        .route("/api/weights", get(weights::list).post(weights::create))
        .route("/api/weights/export", get(weights::export))
        .route("/api/weights/:id", delete(weights::delete))
        .route("/api/settings", get(settings::get).put(settings::put))
        .route(
            "/api/push-subscriptions",
            post(subscriptions::subscribe).delete(subscriptions::unsubscribe),
        )
        .route("/api/dashboard", get(dashboard::dashboard))
        .layer(cors())
}

/// Browser clients call from another origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}
