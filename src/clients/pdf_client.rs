//! Cliente del servicio de conversión HTML a PDF
//!
//! La generación del PDF corre en un servicio externo de renderizado.
//! El trait `PdfRenderer` aísla esa dependencia para poder sustituirla
//! en los tests.

use async_trait::async_trait;

use crate::utils::errors::AppError;

/// Conversor de HTML a bytes PDF
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, AppError>;
}

/// Cliente HTTP del servicio externo de renderizado
pub struct PdfServiceClient {
    base_url: String,
    client: reqwest::Client,
}

impl PdfServiceClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }
}

#[async_trait]
impl PdfRenderer for PdfServiceClient {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, AppError> {
        let url = format!("{}/convert", self.base_url.trim_end_matches('/'));

        tracing::debug!("Enviando {} bytes de HTML al servicio de PDF", html.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(html.to_string())
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApi(format!("Error contactando el servicio de PDF: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "El servicio de PDF respondió con estado {}",
                status
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            AppError::ExternalApi(format!("Error leyendo la respuesta del servicio de PDF: {}", e))
        })?;

        Ok(bytes.to_vec())
    }
}
