//! Controller del dashboard
//!
//! Agregados mensuales y semanales sobre los avalúos activos. Las series
//! semanales y de marcas retroceden hasta doce períodos buscando el más
//! reciente con datos, para que las gráficas nunca lleguen vacías solo
//! porque el período actual no tiene actividad todavía.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use num_traits::ToPrimitive;
use sqlx::PgPool;

use crate::dto::dashboard_dto::{DashboardSummary, MonthlyValues, TopBrands, WeeklyValues};
use crate::repositories::appraisal_repository::AppraisalRepository;
use crate::utils::errors::AppError;

const WEEKDAY_LABELS: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];
const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

const MAX_WEEKS_BACK: i64 = 12;
const MAX_MONTHS_BACK: u32 = 12;
const TOP_BRANDS_LIMIT: i64 = 5;

pub struct DashboardController {
    repository: AppraisalRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AppraisalRepository::new(pool),
        }
    }

    /// Resumen del mes en curso contra el mes anterior
    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let today = Utc::now().date_naive();
        let (month_start, month_end) =
            month_bounds(today.year(), today.month()).ok_or_else(invalid_date_range)?;
        let (prev_year, prev_month) = previous_month(today.year(), today.month());
        let (prev_start, prev_end) =
            month_bounds(prev_year, prev_month).ok_or_else(invalid_date_range)?;

        let total_appraisals = self.repository.count_between(month_start, month_end).await?;
        let previous_appraisals = self.repository.count_between(prev_start, prev_end).await?;

        let total_value = self
            .repository
            .total_value_between(month_start, month_end)
            .await?;
        let previous_value = self
            .repository
            .total_value_between(prev_start, prev_end)
            .await?;

        let new_clients = self
            .repository
            .distinct_applicants_between(month_start, month_end)
            .await?;
        let previous_clients = self
            .repository
            .distinct_applicants_between(prev_start, prev_end)
            .await?;

        Ok(DashboardSummary {
            total_appraisals,
            total_appraisals_variation: variation(
                total_appraisals as f64,
                previous_appraisals as f64,
            ),
            total_value: total_value.trunc().to_i64().unwrap_or(0),
            total_value_variation: variation(
                total_value.to_f64().unwrap_or(0.0),
                previous_value.to_f64().unwrap_or(0.0),
            ),
            new_clients,
            new_clients_variation: variation(new_clients as f64, previous_clients as f64),
        })
    }

    /// Valores por día de la semana más reciente con actividad
    pub async fn weekly_values(&self) -> Result<WeeklyValues, AppError> {
        let today = Utc::now().date_naive();

        for weeks_back in 0..MAX_WEEKS_BACK {
            let (week_start, week_end) = week_bounds(today - Duration::weeks(weeks_back));
            let values = self.weekday_totals(week_start, week_end).await?;

            if values.iter().any(|v| *v != 0.0) {
                return Ok(WeeklyValues {
                    labels: WEEKDAY_LABELS,
                    values,
                    week_start,
                    week_end,
                });
            }
        }

        // Doce semanas sin actividad: semana actual en ceros
        let (week_start, week_end) = week_bounds(today);
        Ok(WeeklyValues {
            labels: WEEKDAY_LABELS,
            values: vec![0.0; 7],
            week_start,
            week_end,
        })
    }

    /// Valores por mes del año en curso
    pub async fn monthly_values(&self) -> Result<MonthlyValues, AppError> {
        let year = Utc::now().date_naive().year();

        let mut values = vec![0.0; 12];
        for (month, total) in self.repository.monthly_value_totals(year).await? {
            if (1..=12).contains(&month) {
                values[(month - 1) as usize] = total.to_f64().unwrap_or(0.0);
            }
        }

        Ok(MonthlyValues {
            labels: MONTH_LABELS,
            values,
        })
    }

    /// Top 5 de marcas del mes más reciente con datos
    pub async fn top_brands(&self) -> Result<TopBrands, AppError> {
        let today = Utc::now().date_naive();
        let mut year = today.year();
        let mut month = today.month();

        for _ in 0..MAX_MONTHS_BACK {
            let (first, last) = month_bounds(year, month).ok_or_else(invalid_date_range)?;
            let rows = self
                .repository
                .top_brands_between(first, last, TOP_BRANDS_LIMIT)
                .await?;

            if !rows.is_empty() {
                let (labels, values): (Vec<String>, Vec<i64>) = rows.into_iter().unzip();
                return Ok(TopBrands {
                    labels,
                    values,
                    month,
                    year,
                });
            }

            (year, month) = previous_month(year, month);
        }

        // Doce meses sin datos: series vacías con el mes actual
        Ok(TopBrands {
            labels: Vec::new(),
            values: Vec::new(),
            month: today.month(),
            year: today.year(),
        })
    }

    async fn weekday_totals(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<f64>, AppError> {
        let mut values = vec![0.0; 7];
        for (dow, total) in self.repository.daily_value_totals(from, to).await? {
            values[weekday_index(dow)] = total.to_f64().unwrap_or(0.0);
        }
        Ok(values)
    }
}

/// Variación porcentual con signo; "0%" cuando el período anterior está vacío
fn variation(current: f64, previous: f64) -> String {
    if previous == 0.0 {
        "0%".to_string()
    } else {
        format!("{:+.0}%", (current - previous) / previous * 100.0)
    }
}

/// Índice de la etiqueta Lun..Dom para un DOW de PostgreSQL (0 = domingo)
fn weekday_index(dow: i32) -> usize {
    if dow == 0 {
        6
    } else {
        (dow - 1).clamp(0, 6) as usize
    }
}

/// Semana de lunes a domingo que contiene a la fecha
fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((first, last))
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn invalid_date_range() -> AppError {
    AppError::Internal("Rango de fechas inválido".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_signed_percentage() {
        assert_eq!(variation(12.0, 10.0), "+20%");
        assert_eq!(variation(8.0, 10.0), "-20%");
        assert_eq!(variation(0.0, 10.0), "-100%");
        assert_eq!(variation(7.0, 3.0), "+133%");
    }

    #[test]
    fn test_variation_with_empty_previous_month() {
        assert_eq!(variation(15.0, 0.0), "0%");
        assert_eq!(variation(0.0, 0.0), "0%");
    }

    #[test]
    fn test_weekday_index_maps_postgres_dow() {
        // PostgreSQL entrega 0 para domingo
        assert_eq!(weekday_index(0), 6);
        assert_eq!(weekday_index(1), 0);
        assert_eq!(weekday_index(3), 2);
        assert_eq!(weekday_index(6), 5);
    }

    #[test]
    fn test_week_bounds_monday_to_sunday() {
        // Miércoles 18 de junio de 2025
        let date = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let (start, end) = week_bounds(date);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 22).unwrap());

        // Un lunes arranca su propia semana
        let (start, _) = week_bounds(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());
    }

    #[test]
    fn test_month_bounds_handles_leap_and_december() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (first, last) = month_bounds(2025, 12).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_previous_month_wraps_january() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 7), (2025, 6));
    }
}
