//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::clients::pdf_client::PdfRenderer;
use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub pdf_renderer: Arc<dyn PdfRenderer>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: EnvironmentConfig,
        pdf_renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            pool,
            config,
            pdf_renderer,
        }
    }
}
