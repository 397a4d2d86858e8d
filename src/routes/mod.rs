//! Rutas de la API
//!
//! Composición del router completo: rutas públicas (signin, certificados,
//! health) y rutas protegidas por el middleware JWT (avalúos y dashboard).

pub mod appraisal_routes;
pub mod auth_routes;
pub mod certificate_routes;
pub mod dashboard_routes;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::json;

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::cors_middleware_with_origins;
use crate::state::AppState;

/// Construir la aplicación completa con su estado
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .nest(
            "/api/v1/appraisals",
            appraisal_routes::create_appraisal_router(),
        )
        .nest(
            "/api/v1/dashboard",
            dashboard_routes::create_dashboard_router(),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1/auth", auth_routes::create_auth_router())
        .nest(
            "/certificates",
            certificate_routes::create_certificate_router(),
        )
        .merge(protected)
        .layer(cors_middleware_with_origins(&state.config.cors_origins))
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Bienvenido a la API de Avalúos" }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
