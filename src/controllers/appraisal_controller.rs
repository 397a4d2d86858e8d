//! Controller de avalúos
//!
//! Orquesta las operaciones CRUD, la duplicación y el motor de búsqueda
//! paginada sobre los avalúos. La aritmética de páginas vive aquí: el
//! total de registros manda, y pedir una página más allá de la última es
//! un error explícito, nunca una página vacía.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;

use crate::dto::appraisal_dto::{
    ApiResponse, AppraisalPayload, AppraisalResponse, DeleteConfirmation, PaginatedResponse,
    PaginationMeta, PaginationParams, SearchParams,
};
use crate::models::appraisal::{AppraisalDeduction, VehicleAppraisal};
use crate::repositories::appraisal_repository::AppraisalRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::validate_pagination;

const NO_QUERY_MESSAGE: &str = "No se proporcionó un término de búsqueda";
const NONE_REGISTERED_MESSAGE: &str = "No hay avalúos registrados";
const NONE_FOUND_MESSAGE: &str = "No se encontraron avalúos para la búsqueda";

pub struct AppraisalController {
    repository: AppraisalRepository,
}

impl AppraisalController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AppraisalRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        payload: AppraisalPayload,
    ) -> Result<ApiResponse<AppraisalResponse>, AppError> {
        let (record, deductions) = payload.into_record();
        let (appraisal, stored) = self.repository.create(&record, &deductions).await?;

        Ok(ApiResponse::success_with_message(
            AppraisalResponse::from_record(appraisal, stored),
            "Avalúo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(
        &self,
        id: i32,
        include_deleted: bool,
    ) -> Result<AppraisalResponse, AppError> {
        let appraisal = if include_deleted {
            self.repository.find_by_id_including_deleted(id).await?
        } else {
            self.repository.find_by_id(id).await?
        }
        .ok_or_else(|| not_found_error("Avalúo", id))?;

        let deductions = self.repository.deductions_for(id).await?;
        Ok(AppraisalResponse::from_record(appraisal, deductions))
    }

    pub async fn update(
        &self,
        id: i32,
        payload: AppraisalPayload,
    ) -> Result<ApiResponse<AppraisalResponse>, AppError> {
        let (record, deductions) = payload.into_record();
        let (appraisal, stored) = self
            .repository
            .update(id, &record, &deductions)
            .await?
            .ok_or_else(|| not_found_error("Avalúo", id))?;

        Ok(ApiResponse::success_with_message(
            AppraisalResponse::from_record(appraisal, stored),
            "Avalúo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: i32) -> Result<DeleteConfirmation, AppError> {
        let deleted = self.repository.soft_delete(id).await?;
        if !deleted {
            return Err(not_found_error("Avalúo", id));
        }

        Ok(DeleteConfirmation {
            success: true,
            message: "Avalúo eliminado exitosamente".to_string(),
            id,
        })
    }

    pub async fn duplicate(&self, id: i32) -> Result<ApiResponse<AppraisalResponse>, AppError> {
        let today = Utc::now().date_naive();
        let (clone, deductions) = self
            .repository
            .duplicate(id, today)
            .await?
            .ok_or_else(|| not_found_error("Avalúo", id))?;

        Ok(ApiResponse::success_with_message(
            AppraisalResponse::from_record(clone, deductions),
            "Avalúo duplicado exitosamente".to_string(),
        ))
    }

    pub async fn list(
        &self,
        params: PaginationParams,
    ) -> Result<PaginatedResponse<AppraisalResponse>, AppError> {
        let (page, limit) = validate_pagination(params.page, params.limit)?;

        let total_count = self.repository.count_active().await?;
        let total_pages = total_pages_for(total_count, limit);
        reject_out_of_range(page, total_pages)?;

        let records = self
            .repository
            .list_page(limit, (page - 1) * limit)
            .await?;
        let data = self.with_deductions(records).await?;

        Ok(PaginatedResponse {
            data,
            pagination: pagination_meta(page, limit, total_count, total_pages),
            message: page_message(page, total_pages, NONE_REGISTERED_MESSAGE),
        })
    }

    pub async fn search(
        &self,
        params: SearchParams,
    ) -> Result<PaginatedResponse<AppraisalResponse>, AppError> {
        let (page, limit) = validate_pagination(params.page, params.limit)?;

        // Búsqueda en blanco: resultado vacío con su propio estado,
        // nunca "todos los registros"
        let term = params.query.unwrap_or_default();
        let term = term.trim();
        if term.is_empty() {
            return Ok(PaginatedResponse {
                data: Vec::new(),
                pagination: pagination_meta(page, limit, 0, 0),
                message: NO_QUERY_MESSAGE.to_string(),
            });
        }

        let total_count = self.repository.count_search(term).await?;
        let total_pages = total_pages_for(total_count, limit);
        reject_out_of_range(page, total_pages)?;

        let records = self
            .repository
            .search_page(term, limit, (page - 1) * limit)
            .await?;
        let data = self.with_deductions(records).await?;

        tracing::info!(
            "🔍 Búsqueda '{}': {} coincidencias, página {}/{}",
            term,
            total_count,
            page,
            total_pages.max(1)
        );

        Ok(PaginatedResponse {
            data,
            pagination: pagination_meta(page, limit, total_count, total_pages),
            message: page_message(page, total_pages, NONE_FOUND_MESSAGE),
        })
    }

    // Adjunta a cada avalúo de la página sus deducciones con una sola consulta
    async fn with_deductions(
        &self,
        records: Vec<VehicleAppraisal>,
    ) -> Result<Vec<AppraisalResponse>, AppError> {
        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();

        let mut by_parent: HashMap<i32, Vec<AppraisalDeduction>> = HashMap::new();
        for deduction in self.repository.deductions_for_many(&ids).await? {
            by_parent
                .entry(deduction.vehicle_appraisal_id)
                .or_default()
                .push(deduction);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let deductions = by_parent.remove(&record.id).unwrap_or_default();
                AppraisalResponse::from_record(record, deductions)
            })
            .collect())
    }
}

/// total_pages = ceil(total_count / limit); 0 registros dan 0 páginas
fn total_pages_for(total_count: i64, limit: i64) -> i64 {
    if total_count == 0 {
        0
    } else {
        (total_count + limit - 1) / limit
    }
}

fn reject_out_of_range(page: i64, total_pages: i64) -> Result<(), AppError> {
    if total_pages > 0 && page > total_pages {
        return Err(AppError::PageOutOfRange(format!(
            "La página {} no existe, solo hay {} página(s)",
            page, total_pages
        )));
    }
    Ok(())
}

fn pagination_meta(page: i64, limit: i64, total_count: i64, total_pages: i64) -> PaginationMeta {
    PaginationMeta {
        page,
        limit,
        total_count,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

fn page_message(page: i64, total_pages: i64, empty_message: &str) -> String {
    if total_pages == 0 {
        empty_message.to_string()
    } else if page == 1 {
        "Primera página de resultados".to_string()
    } else if page == total_pages {
        "Última página de resultados".to_string()
    } else {
        format!("Página {} de {}", page, total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_ceiling() {
        assert_eq!(total_pages_for(0, 10), 0);
        assert_eq!(total_pages_for(1, 10), 1);
        assert_eq!(total_pages_for(10, 10), 1);
        assert_eq!(total_pages_for(11, 10), 2);
        // 7 registros con límite 5 son exactamente 2 páginas
        assert_eq!(total_pages_for(7, 5), 2);
        assert_eq!(total_pages_for(100, 1), 100);
    }

    #[test]
    fn test_page_three_of_two_is_rejected() {
        assert!(reject_out_of_range(1, 2).is_ok());
        assert!(reject_out_of_range(2, 2).is_ok());

        let err = reject_out_of_range(3, 2).unwrap_err();
        assert!(matches!(err, AppError::PageOutOfRange(_)));
    }

    #[test]
    fn test_empty_result_set_never_out_of_range() {
        // Sin registros no hay páginas, pero pedir la página 1 no es error
        assert!(reject_out_of_range(1, 0).is_ok());
        assert!(reject_out_of_range(5, 0).is_ok());
    }

    #[test]
    fn test_pagination_meta_flags() {
        let meta = pagination_meta(1, 10, 35, 4);
        assert!(meta.has_next);
        assert!(!meta.has_prev);

        let meta = pagination_meta(4, 10, 35, 4);
        assert!(!meta.has_next);
        assert!(meta.has_prev);

        let meta = pagination_meta(2, 10, 35, 4);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_page_messages() {
        assert_eq!(page_message(1, 0, NONE_REGISTERED_MESSAGE), NONE_REGISTERED_MESSAGE);
        assert_eq!(page_message(1, 3, ""), "Primera página de resultados");
        assert_eq!(page_message(3, 3, ""), "Última página de resultados");
        assert_eq!(page_message(2, 3, ""), "Página 2 de 3");
        // Una sola página cuenta como primera
        assert_eq!(page_message(1, 1, ""), "Primera página de resultados");
    }
}
