//! Rutas de certificados
//!
//! Única ruta sin autenticación además del signin: entrega el PDF del
//! certificado, inline o como descarga según el parámetro `download`.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::controllers::certificate_controller::CertificateController;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_certificate_router() -> Router<AppState> {
    Router::new().route("/appraisal/:id", get(generate_certificate))
}

#[derive(Debug, Deserialize)]
struct CertificateParams {
    download: Option<bool>,
}

async fn generate_certificate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<CertificateParams>,
) -> Result<impl IntoResponse, AppError> {
    let controller = CertificateController::new(state.pool.clone(), state.pdf_renderer.clone());
    let pdf = controller.render_certificate(id).await?;

    let mode = if params.download.unwrap_or(false) {
        "attachment"
    } else {
        "inline"
    };
    let disposition = format!("{}; filename=certificado_avaluo_{}.pdf", mode, id);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}
