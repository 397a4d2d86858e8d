//! Controller de autenticación
//!
//! Adaptador mínimo del servicio de credenciales: verifica email y
//! contraseña contra la tabla de usuarios y emite el JWT que el resto de
//! la API exige como bearer token.

use bcrypt::verify;
use sqlx::PgPool;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{SigninRequest, TokenResponse};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt: JwtConfig::from(config),
        }
    }

    pub async fn signin(&self, request: SigninRequest) -> Result<TokenResponse, AppError> {
        request.validate()?;

        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales incorrectas".to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando contraseña: {}", e)))?;
        if !valid {
            return Err(AppError::Unauthorized("Credenciales incorrectas".to_string()));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
        }

        let token = generate_token(&user.email, &self.jwt)?;
        tracing::info!("🔐 Sesión iniciada para {}", user.email);

        Ok(TokenResponse::bearer(token, self.jwt.expiration))
    }
}
