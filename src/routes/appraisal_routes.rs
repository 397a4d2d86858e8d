//! Rutas de avalúos
//!
//! CRUD, búsqueda paginada y duplicación. Todas cuelgan del middleware
//! de autenticación.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::controllers::appraisal_controller::AppraisalController;
use crate::dto::appraisal_dto::{
    ApiResponse, AppraisalPayload, AppraisalResponse, DeleteConfirmation, PaginatedResponse,
    PaginationParams, SearchParams,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_appraisal_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appraisal))
        .route("/", get(list_appraisals))
        .route("/search", get(search_appraisals))
        .route("/:id", get(get_appraisal))
        .route("/:id", put(update_appraisal))
        .route("/:id", delete(delete_appraisal))
        .route("/:id/duplicate", post(duplicate_appraisal))
}

#[derive(Debug, Deserialize)]
struct FetchParams {
    include_deleted: Option<bool>,
}

async fn create_appraisal(
    State(state): State<AppState>,
    Json(payload): Json<AppraisalPayload>,
) -> Result<(StatusCode, Json<ApiResponse<AppraisalResponse>>), AppError> {
    let controller = AppraisalController::new(state.pool.clone());
    let response = controller.create(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_appraisals(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<AppraisalResponse>>, AppError> {
    let controller = AppraisalController::new(state.pool.clone());
    let response = controller.list(params).await?;
    Ok(Json(response))
}

async fn search_appraisals(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PaginatedResponse<AppraisalResponse>>, AppError> {
    let controller = AppraisalController::new(state.pool.clone());
    let response = controller.search(params).await?;
    Ok(Json(response))
}

async fn get_appraisal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<FetchParams>,
) -> Result<Json<ApiResponse<AppraisalResponse>>, AppError> {
    let controller = AppraisalController::new(state.pool.clone());
    let response = controller
        .get_by_id(id, params.include_deleted.unwrap_or(false))
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_appraisal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AppraisalPayload>,
) -> Result<Json<ApiResponse<AppraisalResponse>>, AppError> {
    let controller = AppraisalController::new(state.pool.clone());
    let response = controller.update(id, payload).await?;
    Ok(Json(response))
}

async fn delete_appraisal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    let controller = AppraisalController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn duplicate_appraisal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<ApiResponse<AppraisalResponse>>), AppError> {
    let controller = AppraisalController::new(state.pool.clone());
    let response = controller.duplicate(id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
