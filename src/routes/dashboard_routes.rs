//! Rutas del dashboard

use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::{DashboardSummary, MonthlyValues, TopBrands, WeeklyValues};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/weekly-values", get(weekly_values))
        .route("/monthly-values", get(monthly_values))
        .route("/top-brands", get(top_brands))
}

async fn summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.summary().await?))
}

async fn weekly_values(State(state): State<AppState>) -> Result<Json<WeeklyValues>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.weekly_values().await?))
}

async fn monthly_values(State(state): State<AppState>) -> Result<Json<MonthlyValues>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.monthly_values().await?))
}

async fn top_brands(State(state): State<AppState>) -> Result<Json<TopBrands>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.top_brands().await?))
}
