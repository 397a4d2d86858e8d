//! Punto de entrada de la API de avalúos

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use appraisal_api::clients::pdf_client::PdfServiceClient;
use appraisal_api::config::database::DatabaseConfig;
use appraisal_api::config::EnvironmentConfig;
use appraisal_api::routes::create_app;
use appraisal_api::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 API de Avalúos de Vehículos");
    info!("==============================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos y aplicar migraciones embebidas
    let db_config = DatabaseConfig::default();
    let pool = match db_config.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    DatabaseConfig::run_migrations(&pool).await?;
    info!("✅ Base de datos lista, migraciones aplicadas");

    // Cliente del servicio externo de conversión a PDF
    let pdf_renderer = Arc::new(PdfServiceClient::new(config.pdf_service_url.clone()));

    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::new(pool, config, pdf_renderer);
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Autenticación:");
    info!("   POST /api/v1/auth/signin - Iniciar sesión");
    info!("📋 Avalúos:");
    info!("   POST /api/v1/appraisals - Crear avalúo");
    info!("   GET  /api/v1/appraisals - Listado paginado");
    info!("   GET  /api/v1/appraisals/search - Búsqueda paginada");
    info!("   GET  /api/v1/appraisals/:id - Obtener avalúo");
    info!("   PUT  /api/v1/appraisals/:id - Actualizar avalúo");
    info!("   DELETE /api/v1/appraisals/:id - Eliminar avalúo (lógico)");
    info!("   POST /api/v1/appraisals/:id/duplicate - Duplicar avalúo");
    info!("📊 Dashboard:");
    info!("   GET  /api/v1/dashboard/summary - Resumen del mes");
    info!("   GET  /api/v1/dashboard/weekly-values - Valores por día de la semana");
    info!("   GET  /api/v1/dashboard/monthly-values - Valores por mes");
    info!("   GET  /api/v1/dashboard/top-brands - Marcas con más avalúos");
    info!("📄 Certificados:");
    info!("   GET  /certificates/appraisal/:id - PDF del certificado");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
