//! Controller de certificados
//!
//! Resuelve el avalúo al contenido del certificado y delega la conversión
//! a PDF en el servicio externo configurado.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use crate::clients::pdf_client::PdfRenderer;
use crate::repositories::appraisal_repository::AppraisalRepository;
use crate::services::certificate_service::{build_certificate_html, resolve_certificate};
use crate::utils::errors::{not_found_error, AppError};

pub struct CertificateController {
    repository: AppraisalRepository,
    renderer: Arc<dyn PdfRenderer>,
}

impl CertificateController {
    pub fn new(pool: PgPool, renderer: Arc<dyn PdfRenderer>) -> Self {
        Self {
            repository: AppraisalRepository::new(pool),
            renderer,
        }
    }

    /// Generar el PDF del certificado de un avalúo activo
    pub async fn render_certificate(&self, id: i32) -> Result<Vec<u8>, AppError> {
        let appraisal = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Avalúo", id))?;
        let deductions = self.repository.deductions_for(id).await?;

        let data = resolve_certificate(&appraisal, &deductions, Utc::now().date_naive());
        let html = build_certificate_html(&data);
        let pdf = self.renderer.render_pdf(&html).await?;

        tracing::info!("📄 Certificado del avalúo {} generado ({} bytes)", id, pdf.len());
        Ok(pdf)
    }
}
