//! Middleware de autenticación JWT
//!
//! Valida el bearer token de las rutas protegidas. La identidad del
//! llamador es opaca para el resto de la API: solo se exige que el token
//! sea válido y vigente, sin consultar la base de datos por request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

/// Identidad opaca que se inyecta en las extensions de la request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let claims = verify_token(token, &JwtConfig::from(&state.config))?;

    request.extensions_mut().insert(AuthenticatedUser {
        subject: claims.sub,
    });

    Ok(next.run(request).await)
}
