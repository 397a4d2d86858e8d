//! Repositorio de avalúos vehiculares
//!
//! Acceso a datos de `vehicle_appraisals` y `appraisal_deductions`.
//! Todas las operaciones de lectura excluyen los registros con borrado
//! lógico salvo la variante explícita que los incluye; las escrituras que
//! tocan el avalúo y sus deducciones corren en una sola transacción.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::appraisal::{AppraisalDeduction, NewAppraisal, NewDeduction, VehicleAppraisal};
use crate::utils::errors::AppError;

// Columnas de texto inspeccionadas por la búsqueda
const SEARCH_TEXT_COLUMNS: &[&str] = &[
    "plate_number",
    "vin",
    "applicant",
    "owner",
    "color",
    "engine_number",
    "vehicle_description",
];

// Columnas numéricas comparadas como texto
const SEARCH_NUMERIC_COLUMNS: &[&str] = &["id", "model_year"];

const INSERT_COLUMNS: &str = "appraisal_date, vehicle_description, brand, model_year, color, \
     mileage, fuel_type, engine_size, plate_number, applicant, \
     owner, vin, engine_number, notes, \
     appraisal_value_usd, appraisal_value_local, appraisal_value_lower_cost, \
     appraisal_value_bank, appraisal_value_lower_bank, validity_days, validity_kms";

pub struct AppraisalRepository {
    pool: PgPool,
}

impl AppraisalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar un avalúo con sus deducciones iniciales en una transacción
    pub async fn create(
        &self,
        record: &NewAppraisal,
        deductions: &[NewDeduction],
    ) -> Result<(VehicleAppraisal, Vec<AppraisalDeduction>), AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO vehicle_appraisals ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $20, $21) \
             RETURNING *",
            INSERT_COLUMNS
        );

        let appraisal = sqlx::query_as::<_, VehicleAppraisal>(&sql)
            .bind(record.appraisal_date)
            .bind(&record.vehicle_description)
            .bind(&record.brand)
            .bind(record.model_year)
            .bind(&record.color)
            .bind(record.mileage)
            .bind(&record.fuel_type)
            .bind(record.engine_size)
            .bind(&record.plate_number)
            .bind(&record.applicant)
            .bind(&record.owner)
            .bind(&record.vin)
            .bind(&record.engine_number)
            .bind(&record.notes)
            .bind(record.appraisal_value_usd)
            .bind(record.appraisal_value_local)
            .bind(record.appraisal_value_lower_cost)
            .bind(record.appraisal_value_bank)
            .bind(record.appraisal_value_lower_bank)
            .bind(record.validity_days)
            .bind(record.validity_kms)
            .fetch_one(&mut *tx)
            .await?;

        let inserted = insert_deductions(&mut tx, appraisal.id, deductions).await?;

        tx.commit().await?;

        tracing::info!("Avalúo {} creado con {} deducciones", appraisal.id, inserted.len());
        Ok((appraisal, inserted))
    }

    /// Reemplazo completo de un avalúo activo y de su set de deducciones.
    ///
    /// Devuelve `None` si el id no corresponde a un registro activo; en ese
    /// caso la transacción se descarta sin efectos.
    pub async fn update(
        &self,
        id: i32,
        record: &NewAppraisal,
        deductions: &[NewDeduction],
    ) -> Result<Option<(VehicleAppraisal, Vec<AppraisalDeduction>)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = "UPDATE vehicle_appraisals SET \
             appraisal_date = $1, vehicle_description = $2, brand = $3, model_year = $4, \
             color = $5, mileage = $6, fuel_type = $7, engine_size = $8, plate_number = $9, \
             applicant = $10, owner = $11, vin = $12, engine_number = $13, notes = $14, \
             appraisal_value_usd = $15, appraisal_value_local = $16, \
             appraisal_value_lower_cost = $17, appraisal_value_bank = $18, \
             appraisal_value_lower_bank = $19, validity_days = $20, validity_kms = $21 \
             WHERE id = $22 AND is_deleted = FALSE \
             RETURNING *";

        let appraisal = sqlx::query_as::<_, VehicleAppraisal>(sql)
            .bind(record.appraisal_date)
            .bind(&record.vehicle_description)
            .bind(&record.brand)
            .bind(record.model_year)
            .bind(&record.color)
            .bind(record.mileage)
            .bind(&record.fuel_type)
            .bind(record.engine_size)
            .bind(&record.plate_number)
            .bind(&record.applicant)
            .bind(&record.owner)
            .bind(&record.vin)
            .bind(&record.engine_number)
            .bind(&record.notes)
            .bind(record.appraisal_value_usd)
            .bind(record.appraisal_value_local)
            .bind(record.appraisal_value_lower_cost)
            .bind(record.appraisal_value_bank)
            .bind(record.appraisal_value_lower_bank)
            .bind(record.validity_days)
            .bind(record.validity_kms)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(appraisal) = appraisal else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM appraisal_deductions WHERE vehicle_appraisal_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let inserted = insert_deductions(&mut tx, appraisal.id, deductions).await?;

        tx.commit().await?;

        tracing::info!("Avalúo {} actualizado", id);
        Ok(Some((appraisal, inserted)))
    }

    /// Buscar un avalúo activo por id
    pub async fn find_by_id(&self, id: i32) -> Result<Option<VehicleAppraisal>, AppError> {
        let appraisal = sqlx::query_as::<_, VehicleAppraisal>(
            "SELECT * FROM vehicle_appraisals WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appraisal)
    }

    /// Buscar un avalúo por id incluyendo los borrados lógicamente
    pub async fn find_by_id_including_deleted(
        &self,
        id: i32,
    ) -> Result<Option<VehicleAppraisal>, AppError> {
        let appraisal = sqlx::query_as::<_, VehicleAppraisal>(
            "SELECT * FROM vehicle_appraisals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appraisal)
    }

    /// Deducciones de un avalúo
    pub async fn deductions_for(&self, id: i32) -> Result<Vec<AppraisalDeduction>, AppError> {
        let deductions = sqlx::query_as::<_, AppraisalDeduction>(
            "SELECT * FROM appraisal_deductions WHERE vehicle_appraisal_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deductions)
    }

    /// Deducciones de varios avalúos en una sola consulta
    pub async fn deductions_for_many(
        &self,
        ids: &[i32],
    ) -> Result<Vec<AppraisalDeduction>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let deductions = sqlx::query_as::<_, AppraisalDeduction>(
            "SELECT * FROM appraisal_deductions \
             WHERE vehicle_appraisal_id = ANY($1) ORDER BY vehicle_appraisal_id, id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(deductions)
    }

    /// Marcar un avalúo activo como borrado. Devuelve false si no existía.
    pub async fn soft_delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE vehicle_appraisals SET is_deleted = TRUE \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Avalúo {} marcado como borrado", id);
        }
        Ok(deleted)
    }

    /// Clonar un avalúo activo con la fecha indicada, copiando sus
    /// deducciones. El clon recibe id propio.
    pub async fn duplicate(
        &self,
        id: i32,
        date: NaiveDate,
    ) -> Result<Option<(VehicleAppraisal, Vec<AppraisalDeduction>)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO vehicle_appraisals ({}) \
             SELECT $2, vehicle_description, brand, model_year, color, \
                    mileage, fuel_type, engine_size, plate_number, applicant, \
                    owner, vin, engine_number, notes, \
                    appraisal_value_usd, appraisal_value_local, appraisal_value_lower_cost, \
                    appraisal_value_bank, appraisal_value_lower_bank, validity_days, validity_kms \
             FROM vehicle_appraisals \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING *",
            INSERT_COLUMNS
        );

        let clone = sqlx::query_as::<_, VehicleAppraisal>(&sql)
            .bind(id)
            .bind(date)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(clone) = clone else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO appraisal_deductions (vehicle_appraisal_id, description, amount) \
             SELECT $1, description, amount FROM appraisal_deductions \
             WHERE vehicle_appraisal_id = $2",
        )
        .bind(clone.id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deductions = sqlx::query_as::<_, AppraisalDeduction>(
            "SELECT * FROM appraisal_deductions WHERE vehicle_appraisal_id = $1 ORDER BY id",
        )
        .bind(clone.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Avalúo {} duplicado como {}", id, clone.id);
        Ok(Some((clone, deductions)))
    }

    /// Total de avalúos activos
    pub async fn count_active(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM vehicle_appraisals WHERE is_deleted = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Página de avalúos activos, más recientes primero.
    /// Los registros sin fecha quedan al final.
    pub async fn list_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VehicleAppraisal>, AppError> {
        let appraisals = sqlx::query_as::<_, VehicleAppraisal>(
            "SELECT * FROM vehicle_appraisals WHERE is_deleted = FALSE \
             ORDER BY appraisal_date DESC NULLS LAST, id DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(appraisals)
    }

    /// Total de avalúos activos que coinciden con el término
    pub async fn count_search(&self, term: &str) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND ({})",
            search_predicate()
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(like_pattern(term))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Página de resultados de búsqueda, mismo orden que el listado
    pub async fn search_page(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VehicleAppraisal>, AppError> {
        let sql = format!(
            "SELECT * FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND ({}) \
             ORDER BY appraisal_date DESC NULLS LAST, id DESC \
             LIMIT $2 OFFSET $3",
            search_predicate()
        );

        let appraisals = sqlx::query_as::<_, VehicleAppraisal>(&sql)
            .bind(like_pattern(term))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(appraisals)
    }

    /// Avalúos activos con fecha dentro del rango cerrado
    pub async fn count_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND appraisal_date BETWEEN $1 AND $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Suma del valor principal de los avalúos del rango
    pub async fn total_value_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(appraisal_value_usd), 0) FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND appraisal_date BETWEEN $1 AND $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Solicitantes distintos dentro del rango
    pub async fn distinct_applicants_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT applicant) FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND applicant IS NOT NULL \
             AND appraisal_date BETWEEN $1 AND $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Suma del valor principal por mes calendario de un año
    pub async fn monthly_value_totals(
        &self,
        year: i32,
    ) -> Result<Vec<(i32, Decimal)>, AppError> {
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            "SELECT CAST(EXTRACT(MONTH FROM appraisal_date) AS INT4) AS month, \
                    COALESCE(SUM(appraisal_value_usd), 0) AS total \
             FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND appraisal_date IS NOT NULL \
             AND EXTRACT(YEAR FROM appraisal_date) = $1 \
             GROUP BY 1 ORDER BY 1",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Suma del valor principal por día de la semana dentro del rango.
    /// El día sigue la convención de PostgreSQL: 0 = domingo.
    pub async fn daily_value_totals(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(i32, Decimal)>, AppError> {
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            "SELECT CAST(EXTRACT(DOW FROM appraisal_date) AS INT4) AS dow, \
                    COALESCE(SUM(appraisal_value_usd), 0) AS total \
             FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND appraisal_date BETWEEN $1 AND $2 \
             GROUP BY 1 ORDER BY 1",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Marcas con más avalúos dentro del rango
    pub async fn top_brands_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: i64,
    ) -> Result<Vec<(String, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT brand, COUNT(*) AS total FROM vehicle_appraisals \
             WHERE is_deleted = FALSE AND brand IS NOT NULL AND brand <> '' \
             AND appraisal_date BETWEEN $1 AND $2 \
             GROUP BY brand ORDER BY total DESC, brand ASC \
             LIMIT $3",
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

async fn insert_deductions(
    tx: &mut PgConnection,
    appraisal_id: i32,
    deductions: &[NewDeduction],
) -> Result<Vec<AppraisalDeduction>, sqlx::Error> {
    let mut inserted = Vec::with_capacity(deductions.len());

    for deduction in deductions {
        let row = sqlx::query_as::<_, AppraisalDeduction>(
            "INSERT INTO appraisal_deductions (vehicle_appraisal_id, description, amount) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(appraisal_id)
        .bind(&deduction.description)
        .bind(deduction.amount)
        .fetch_one(&mut *tx)
        .await?;

        inserted.push(row);
    }

    Ok(inserted)
}

// Un solo parámetro posicional recorre todas las columnas buscables
fn search_predicate() -> String {
    let mut clauses: Vec<String> = SEARCH_TEXT_COLUMNS
        .iter()
        .map(|column| format!("{} ILIKE $1", column))
        .collect();

    clauses.extend(
        SEARCH_NUMERIC_COLUMNS
            .iter()
            .map(|column| format!("CAST({} AS TEXT) ILIKE $1", column)),
    );

    clauses.join(" OR ")
}

// El término se trata como literal: los comodines de LIKE se escapan
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
