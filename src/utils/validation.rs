//! Utilidades de validación
//!
//! Este módulo contiene las reglas compartidas de validación de
//! parámetros de consulta.

use crate::utils::errors::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Resolver y validar parámetros de paginación.
///
/// Aplica los defaults (página 1, 10 por página) y rechaza valores fuera
/// de contrato: página < 1 o límite fuera de [1, 100].
pub fn validate_pagination(
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<(i64, i64), AppError> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    if page < 1 {
        return Err(AppError::BadRequest(
            "El número de página debe ser mayor o igual a 1".to_string(),
        ));
    }

    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "El límite por página debe estar entre 1 y {}",
            MAX_LIMIT
        )));
    }

    Ok((page, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        assert_eq!(validate_pagination(None, None).unwrap(), (1, 10));
        assert_eq!(validate_pagination(Some(3), None).unwrap(), (3, 10));
        assert_eq!(validate_pagination(None, Some(25)).unwrap(), (1, 25));
    }

    #[test]
    fn test_rejects_out_of_contract_values() {
        assert!(validate_pagination(Some(0), None).is_err());
        assert!(validate_pagination(Some(-2), None).is_err());
        assert!(validate_pagination(None, Some(0)).is_err());
        assert!(validate_pagination(None, Some(101)).is_err());
    }

    #[test]
    fn test_limit_bounds_inclusive() {
        assert_eq!(validate_pagination(None, Some(1)).unwrap(), (1, 1));
        assert_eq!(validate_pagination(None, Some(100)).unwrap(), (1, 100));
    }
}
