//! DTOs del dashboard
//!
//! Agregados de solo lectura sobre los avalúos activos. Las etiquetas de
//! días y meses van en español porque alimentan directamente las gráficas
//! del frontend.

use chrono::NaiveDate;
use serde::Serialize;

/// Resumen del mes en curso con su variación contra el mes anterior
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_appraisals: i64,
    pub total_appraisals_variation: String,
    pub total_value: i64,
    pub total_value_variation: String,
    pub new_clients: i64,
    pub new_clients_variation: String,
}

/// Valores por día de la última semana con actividad
#[derive(Debug, Serialize)]
pub struct WeeklyValues {
    pub labels: [&'static str; 7],
    pub values: Vec<f64>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

/// Valores por mes del año en curso
#[derive(Debug, Serialize)]
pub struct MonthlyValues {
    pub labels: [&'static str; 12],
    pub values: Vec<f64>,
}

/// Marcas con más avalúos del último mes con datos
#[derive(Debug, Serialize)]
pub struct TopBrands {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
    pub month: u32,
    pub year: i32,
}
