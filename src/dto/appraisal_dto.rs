use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::appraisal::{AppraisalDeduction, NewAppraisal, NewDeduction, VehicleAppraisal};
use crate::utils::normalize;

// Año mínimo aceptado para el modelo del vehículo
const MIN_MODEL_YEAR: i32 = 1900;

// Request para crear o reemplazar un avalúo.
//
// Los clientes envían los campos numéricos como número JSON, string
// numérico, string vacío o null de forma indistinta; cada campo se
// normaliza durante la deserialización según su tipo declarado, por lo
// que un body malformado en lo numérico nunca rechaza la petición.
#[derive(Debug, Deserialize)]
pub struct AppraisalPayload {
    #[serde(default, deserialize_with = "de_optional_date")]
    pub appraisal_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub vehicle_description: Option<String>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub brand: Option<String>,

    #[serde(default, deserialize_with = "de_model_year")]
    pub model_year: Option<i32>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub color: Option<String>,

    #[serde(default, deserialize_with = "de_required_integer")]
    pub mileage: i32,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub fuel_type: Option<String>,

    #[serde(default, deserialize_with = "de_required_decimal")]
    pub engine_size: Decimal,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub plate_number: Option<String>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub applicant: Option<String>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub owner: Option<String>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub vin: Option<String>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub engine_number: Option<String>,

    #[serde(default, deserialize_with = "de_optional_text")]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "de_required_decimal")]
    pub appraisal_value_usd: Decimal,

    // Alias heredado del cliente histórico
    #[serde(
        default,
        alias = "appraisal_value_trochez",
        deserialize_with = "de_required_decimal"
    )]
    pub appraisal_value_local: Decimal,

    // Los alias "apprasail_*" conservan un error ortográfico del cliente
    // histórico; solo se aceptan en la entrada, nunca se exponen
    #[serde(
        default,
        alias = "apprasail_value_lower_cost",
        deserialize_with = "de_optional_decimal"
    )]
    pub appraisal_value_lower_cost: Option<Decimal>,

    #[serde(
        default,
        alias = "apprasail_value_bank",
        deserialize_with = "de_optional_decimal"
    )]
    pub appraisal_value_bank: Option<Decimal>,

    #[serde(
        default,
        alias = "apprasail_value_lower_bank",
        deserialize_with = "de_optional_decimal"
    )]
    pub appraisal_value_lower_bank: Option<Decimal>,

    #[serde(default, deserialize_with = "de_required_integer")]
    pub validity_days: i32,

    #[serde(default, deserialize_with = "de_required_integer")]
    pub validity_kms: i32,

    #[serde(default)]
    pub deductions: Vec<DeductionPayload>,
}

// Deducción dentro del request de avalúo
#[derive(Debug, Deserialize)]
pub struct DeductionPayload {
    #[serde(default, deserialize_with = "de_optional_text")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "de_required_decimal")]
    pub amount: Decimal,
}

impl AppraisalPayload {
    /// Separa el payload en el registro canónico y sus deducciones
    pub fn into_record(self) -> (NewAppraisal, Vec<NewDeduction>) {
        let deductions = self
            .deductions
            .into_iter()
            .map(|d| NewDeduction {
                description: d.description,
                amount: d.amount,
            })
            .collect();

        let record = NewAppraisal {
            appraisal_date: self.appraisal_date,
            vehicle_description: self.vehicle_description,
            brand: self.brand,
            model_year: self.model_year,
            color: self.color,
            mileage: self.mileage,
            fuel_type: self.fuel_type,
            engine_size: self.engine_size,
            plate_number: self.plate_number,
            applicant: self.applicant,
            owner: self.owner,
            vin: self.vin,
            engine_number: self.engine_number,
            notes: self.notes,
            appraisal_value_usd: self.appraisal_value_usd,
            appraisal_value_local: self.appraisal_value_local,
            appraisal_value_lower_cost: self.appraisal_value_lower_cost,
            appraisal_value_bank: self.appraisal_value_bank,
            appraisal_value_lower_bank: self.appraisal_value_lower_bank,
            validity_days: self.validity_days,
            validity_kms: self.validity_kms,
        };

        (record, deductions)
    }
}

fn de_required_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize::required_decimal(&raw))
}

fn de_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize::optional_decimal(&raw))
}

fn de_required_integer<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize::required_integer(&raw))
}

fn de_model_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let max_year = Utc::now().year() + 1;
    Ok(normalize::bounded_optional_integer(&raw, MIN_MODEL_YEAR, max_year))
}

fn de_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize::optional_text(&raw))
}

fn de_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize::optional_date(&raw))
}

// Response de deducción
#[derive(Debug, Serialize)]
pub struct DeductionResponse {
    pub id: i32,
    pub vehicle_appraisal_id: i32,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
}

impl From<AppraisalDeduction> for DeductionResponse {
    fn from(deduction: AppraisalDeduction) -> Self {
        Self {
            id: deduction.id,
            vehicle_appraisal_id: deduction.vehicle_appraisal_id,
            description: deduction.description,
            amount: deduction.amount,
        }
    }
}

// Response de avalúo con sus deducciones
#[derive(Debug, Serialize)]
pub struct AppraisalResponse {
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
    pub deductions: Vec<DeductionResponse>,
}

impl AppraisalResponse {
    pub fn from_record(
        appraisal: VehicleAppraisal,
        deductions: Vec<AppraisalDeduction>,
    ) -> Self {
        Self {
            id: appraisal.id,
            appraisal_date: appraisal.appraisal_date,
            vehicle_description: appraisal.vehicle_description,
            brand: appraisal.brand,
            model_year: appraisal.model_year,
            color: appraisal.color,
            mileage: appraisal.mileage,
            fuel_type: appraisal.fuel_type,
            engine_size: appraisal.engine_size,
            plate_number: appraisal.plate_number,
            applicant: appraisal.applicant,
            owner: appraisal.owner,
            vin: appraisal.vin,
            engine_number: appraisal.engine_number,
            notes: appraisal.notes,
            appraisal_value_usd: appraisal.appraisal_value_usd,
            appraisal_value_local: appraisal.appraisal_value_local,
            appraisal_value_lower_cost: appraisal.appraisal_value_lower_cost,
            appraisal_value_bank: appraisal.appraisal_value_bank,
            appraisal_value_lower_bank: appraisal.appraisal_value_lower_bank,
            validity_days: appraisal.validity_days,
            validity_kms: appraisal.validity_kms,
            deductions: deductions.into_iter().map(DeductionResponse::from).collect(),
        }
    }
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

// Confirmación de borrado lógico
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub success: bool,
    pub message: String,
    pub id: i32,
}

// Parámetros de paginación para listados
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// Parámetros de búsqueda paginada
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// Metadatos de paginación del envelope de listados
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

// Envelope de respuesta paginada
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
    pub message: String,
}
