//! Modelo de VehicleAppraisal
//!
//! Este módulo contiene las entidades del avalúo vehicular y sus
//! deducciones. Mapean exactamente a las tablas `vehicle_appraisals`
//! y `appraisal_deductions` del schema PostgreSQL.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Avalúo vehicular - mapea exactamente a la tabla vehicle_appraisals.
///
/// Todas las columnas de datos son nullable: el generador del schema
/// histórico no marcaba NOT NULL, así que los lectores deben tolerar
/// ausencias aunque la normalización de entrada siempre escriba un valor
/// para los campos requeridos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleAppraisal {
    pub id: i32,
    pub appraisal_date: Option<NaiveDate>,
    pub vehicle_description: Option<String>,
    pub brand: Option<String>,
    pub model_year: Option<i32>,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub fuel_type: Option<String>,
    pub engine_size: Option<Decimal>,
    pub plate_number: Option<String>,
    pub applicant: Option<String>,
    pub owner: Option<String>,
    pub vin: Option<String>,
    pub engine_number: Option<String>,
    pub notes: Option<String>,
    pub appraisal_value_usd: Option<Decimal>,
    pub appraisal_value_local: Option<Decimal>,
    pub appraisal_value_lower_cost: Option<Decimal>,
    pub appraisal_value_bank: Option<Decimal>,
    pub appraisal_value_lower_bank: Option<Decimal>,
    pub validity_days: Option<i32>,
    pub validity_kms: Option<i32>,
    pub is_deleted: bool,
}

/// Deducción de un avalúo - mapea exactamente a la tabla appraisal_deductions.
///
/// Las deducciones no tienen identidad propia fuera de su avalúo: al
/// reemplazar o borrar el avalúo padre se reemplazan o borran en bloque.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppraisalDeduction {
    pub id: i32,
    pub vehicle_appraisal_id: i32,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
}

/// Datos canónicos para insertar o reemplazar un avalúo.
///
/// Los campos requeridos ya vienen normalizados (cero como fallback),
/// los opcionales quedan ausentes cuando la entrada fue inválida.
#[derive(Debug, Clone)]
pub struct NewAppraisal {
    pub appraisal_date: Option<NaiveDate>,
    pub vehicle_description: Option<String>,
    pub brand: Option<String>,
    pub model_year: Option<i32>,
    pub color: Option<String>,
    pub mileage: i32,
    pub fuel_type: Option<String>,
    pub engine_size: Decimal,
    pub plate_number: Option<String>,
    pub applicant: Option<String>,
    pub owner: Option<String>,
    pub vin: Option<String>,
    pub engine_number: Option<String>,
    pub notes: Option<String>,
    pub appraisal_value_usd: Decimal,
    pub appraisal_value_local: Decimal,
    pub appraisal_value_lower_cost: Option<Decimal>,
    pub appraisal_value_bank: Option<Decimal>,
    pub appraisal_value_lower_bank: Option<Decimal>,
    pub validity_days: i32,
    pub validity_kms: i32,
}

/// Datos canónicos de una deducción nueva
#[derive(Debug, Clone)]
pub struct NewDeduction {
    pub description: Option<String>,
    pub amount: Decimal,
}
