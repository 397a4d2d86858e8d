//! Servicio de certificados de avalúo
//!
//! Resuelve un avalúo y sus deducciones al contenido imprimible del
//! certificado: cada campo opcional se convierte en un string listo para
//! el documento (vacío cuando falta, nunca "null"), los montos se
//! formatean con su símbolo de moneda y su versión en letras, y el
//! conjunto se ensambla como HTML que el servicio externo convierte a PDF.

use chrono::{Datelike, NaiveDate};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::appraisal::{AppraisalDeduction, VehicleAppraisal};
use crate::utils::number_words::number_to_words;

// Meses abreviados para la fecha del certificado
const MONTHS_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Línea de deducción lista para imprimir
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionDisplay {
    pub description: String,
    pub amount: String,
}

/// Contenido del certificado con todos los campos resueltos a texto
#[derive(Debug, Clone)]
pub struct CertificateData {
    pub certificate_number: String,
    pub formatted_date: String,
    pub vehicle_description: String,
    pub brand: String,
    pub model_year: String,
    pub color: String,
    pub mileage: String,
    pub fuel_type: String,
    pub engine_size: String,
    pub plate_number: String,
    pub vin: String,
    pub engine_number: String,
    pub applicant: String,
    pub owner: String,
    pub notes: String,
    pub validity_days: String,
    pub validity_kms: String,
    pub deductions: Vec<DeductionDisplay>,
    pub total_deductions: String,
    pub appraisal_value: String,
    pub appraisal_value_words: String,
    pub appraisal_value_local: String,
    pub appraisal_value_local_words: String,
    pub bank_value: String,
    pub bank_value_words: String,
}

/// Resolver el contenido del certificado de un avalúo.
///
/// `today` sustituye a la fecha del avalúo cuando el registro no tiene
/// una; también sirve para fijar la fecha en tests.
pub fn resolve_certificate(
    appraisal: &VehicleAppraisal,
    deductions: &[AppraisalDeduction],
    today: NaiveDate,
) -> CertificateData {
    let date = appraisal.appraisal_date.unwrap_or(today);

    let total: Decimal = deductions.iter().filter_map(|d| d.amount).sum();

    let lines = deductions
        .iter()
        .map(|d| DeductionDisplay {
            description: display_text(d.description.as_deref()),
            amount: d
                .amount
                .map(|a| format_currency("₡", a))
                .unwrap_or_default(),
        })
        .collect();

    let (appraisal_value, appraisal_value_words) =
        monetary_display("$", appraisal.appraisal_value_usd);
    let (appraisal_value_local, appraisal_value_local_words) =
        monetary_display("₡", appraisal.appraisal_value_local);
    let (bank_value, bank_value_words) = monetary_display("$", appraisal.appraisal_value_bank);

    CertificateData {
        certificate_number: appraisal.id.to_string(),
        formatted_date: format_date(date),
        vehicle_description: display_text(appraisal.vehicle_description.as_deref()),
        brand: display_text(appraisal.brand.as_deref()),
        model_year: display_number(appraisal.model_year),
        color: display_text(appraisal.color.as_deref()),
        mileage: display_number(appraisal.mileage),
        fuel_type: display_text(appraisal.fuel_type.as_deref()),
        engine_size: appraisal
            .engine_size
            .map(|e| e.to_string())
            .unwrap_or_default(),
        plate_number: display_text(appraisal.plate_number.as_deref()),
        vin: display_text(appraisal.vin.as_deref()),
        engine_number: display_text(appraisal.engine_number.as_deref()),
        applicant: display_text(appraisal.applicant.as_deref()),
        owner: display_text(appraisal.owner.as_deref()),
        notes: display_text(appraisal.notes.as_deref()),
        validity_days: display_number(appraisal.validity_days),
        validity_kms: display_number(appraisal.validity_kms),
        deductions: lines,
        total_deductions: format_currency("₡", total),
        appraisal_value,
        appraisal_value_words,
        appraisal_value_local,
        appraisal_value_local_words,
        bank_value,
        bank_value_words,
    }
}

/// Formatear un monto con símbolo, separador de miles por espacio y
/// dos decimales
pub fn format_currency(symbol: &str, amount: Decimal) -> String {
    let text = format!("{:.2}", amount.round_dp(2));
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}{}.{}", symbol, group_thousands(int_part), frac_part)
}

// Un monto ausente o no positivo no aparece en el certificado: ni cifra
// ni letras, nunca una frase de "cero dólares"
fn monetary_display(symbol: &str, amount: Option<Decimal>) -> (String, String) {
    match amount {
        Some(value) if value > Decimal::ZERO => {
            let words = number_to_words(value.trunc().to_u64().unwrap_or(0));
            (format_currency(symbol, value), words)
        }
        _ => (String::new(), String::new()),
    }
}

fn format_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

fn display_text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn display_number(value: Option<i32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Ensamblar el documento HTML del certificado
pub fn build_certificate_html(data: &CertificateData) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n",
    );
    html.push_str(&format!(
        "<title>Certificado de Avalúo N.º {}</title>\n",
        escape_html(&data.certificate_number)
    ));
    html.push_str(
        "<style>\n\
         @page { size: A4; margin: 0; }\n\
         body { font-family: Helvetica, Arial, sans-serif; margin: 2.5cm; \
         color: #1a1a1a; font-size: 12px; }\n\
         h1 { text-align: center; font-size: 22px; letter-spacing: 2px; }\n\
         h2 { font-size: 14px; border-bottom: 1px solid #888; padding-bottom: 4px; }\n\
         table { width: 100%; border-collapse: collapse; margin-bottom: 12px; }\n\
         td, th { padding: 4px 6px; border: 1px solid #ccc; text-align: left; }\n\
         .label { width: 35%; font-weight: bold; background: #f4f4f4; }\n\
         .amount { text-align: right; white-space: nowrap; }\n\
         .total-row td { font-weight: bold; }\n\
         .value-line { margin: 6px 0; }\n\
         .words { text-transform: uppercase; }\n\
         .meta { text-align: center; color: #444; margin: 2px 0; }\n\
         .signature { margin-top: 70px; text-align: center; }\n\
         .signature .line { border-top: 1px solid #1a1a1a; width: 260px; \
         margin: 0 auto 4px auto; }\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str("<h1>CERTIFICADO DE AVALÚO</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Certificado N.º {}</p>\n",
        escape_html(&data.certificate_number)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Fecha del avalúo: {}</p>\n",
        escape_html(&data.formatted_date)
    ));

    html.push_str("<h2>Datos del vehículo</h2>\n<table>\n");
    for (label, value) in [
        ("Descripción", &data.vehicle_description),
        ("Marca", &data.brand),
        ("Año del modelo", &data.model_year),
        ("Color", &data.color),
        ("Kilometraje", &data.mileage),
        ("Combustible", &data.fuel_type),
        ("Cilindrada", &data.engine_size),
        ("Placa", &data.plate_number),
        ("VIN", &data.vin),
        ("N.º de motor", &data.engine_number),
        ("Solicitante", &data.applicant),
        ("Propietario", &data.owner),
    ] {
        html.push_str(&format!(
            "<tr><td class=\"label\">{}</td><td>{}</td></tr>\n",
            label,
            escape_html(value)
        ));
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Deducciones</h2>\n<table>\n");
    html.push_str("<tr><th>Detalle</th><th class=\"amount\">Monto</th></tr>\n");
    for line in &data.deductions {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"amount\">{}</td></tr>\n",
            escape_html(&line.description),
            escape_html(&line.amount)
        ));
    }
    html.push_str(&format!(
        "<tr class=\"total-row\"><td>Total de deducciones</td>\
         <td class=\"amount\">{}</td></tr>\n</table>\n",
        escape_html(&data.total_deductions)
    ));

    html.push_str("<h2>Valoración</h2>\n");
    if !data.appraisal_value.is_empty() {
        html.push_str(&format!(
            "<p class=\"value-line\">Valor de mercado: <strong>{}</strong> \
             (<span class=\"words\">{} DÓLARES</span>)</p>\n",
            escape_html(&data.appraisal_value),
            escape_html(&data.appraisal_value_words)
        ));
    }
    if !data.appraisal_value_local.is_empty() {
        html.push_str(&format!(
            "<p class=\"value-line\">Valor en moneda local: <strong>{}</strong> \
             (<span class=\"words\">{} COLONES</span>)</p>\n",
            escape_html(&data.appraisal_value_local),
            escape_html(&data.appraisal_value_local_words)
        ));
    }
    if !data.bank_value.is_empty() {
        html.push_str(&format!(
            "<p class=\"value-line\">Valor de garantía bancaria: <strong>{}</strong> \
             (<span class=\"words\">{} DÓLARES</span>)</p>\n",
            escape_html(&data.bank_value),
            escape_html(&data.bank_value_words)
        ));
    }

    if !data.notes.is_empty() {
        html.push_str(&format!(
            "<h2>Observaciones</h2>\n<p>{}</p>\n",
            escape_html(&data.notes)
        ));
    }

    if !data.validity_days.is_empty() || !data.validity_kms.is_empty() {
        html.push_str(&format!(
            "<p class=\"value-line\">Validez: {} días o {} km, \
             lo que ocurra primero.</p>\n",
            escape_html(&data.validity_days),
            escape_html(&data.validity_kms)
        ));
    }

    html.push_str(
        "<div class=\"signature\">\n<div class=\"line\"></div>\n\
         <p>Perito valuador autorizado</p>\n</div>\n",
    );
    html.push_str("</body>\n</html>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_appraisal() -> VehicleAppraisal {
        VehicleAppraisal {
            id: 77,
            appraisal_date: NaiveDate::from_ymd_opt(2024, 6, 15),
            vehicle_description: Some("Toyota Corolla 2015".to_string()),
            brand: Some("Toyota".to_string()),
            model_year: Some(2015),
            color: Some("Gris".to_string()),
            mileage: Some(120000),
            fuel_type: Some("Gasolina".to_string()),
            engine_size: Some(Decimal::from_str("1.8").unwrap()),
            plate_number: Some("ABC-123".to_string()),
            applicant: Some("Banco Nacional".to_string()),
            owner: Some("Juan Pérez".to_string()),
            vin: Some("1HGCM82633A004352".to_string()),
            engine_number: Some("4G63-12345".to_string()),
            notes: None,
            appraisal_value_usd: Some(Decimal::from_str("8500.75").unwrap()),
            appraisal_value_local: Some(Decimal::from(4250000)),
            appraisal_value_lower_cost: None,
            appraisal_value_bank: None,
            appraisal_value_lower_bank: None,
            validity_days: Some(30),
            validity_kms: Some(1000),
            is_deleted: false,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn test_format_currency_groups_thousands_with_spaces() {
        assert_eq!(format_currency("$", Decimal::from(950)), "$950.00");
        assert_eq!(
            format_currency("$", Decimal::from_str("12500.5").unwrap()),
            "$12 500.50"
        );
        assert_eq!(
            format_currency("₡", Decimal::from(4250000)),
            "₡4 250 000.00"
        );
        assert_eq!(
            format_currency("$", Decimal::from_str("1234567.89").unwrap()),
            "$1 234 567.89"
        );
        assert_eq!(format_currency("₡", Decimal::ZERO), "₡0.00");
    }

    #[test]
    fn test_resolve_formats_values_and_words() {
        let data = resolve_certificate(&sample_appraisal(), &[], today());

        assert_eq!(data.certificate_number, "77");
        assert_eq!(data.formatted_date, "15 Jun 2024");
        assert_eq!(data.appraisal_value, "$8 500.75");
        assert_eq!(data.appraisal_value_words, "OCHO MIL QUINIENTOS");
        assert_eq!(data.appraisal_value_local, "₡4 250 000.00");
        assert_eq!(
            data.appraisal_value_local_words,
            "CUATRO MILLONES DOSCIENTOS CINCUENTA MIL"
        );
    }

    #[test]
    fn test_resolve_absent_values_become_empty_placeholders() {
        let mut appraisal = sample_appraisal();
        appraisal.appraisal_value_usd = None;
        appraisal.appraisal_value_local = Some(Decimal::ZERO);
        appraisal.appraisal_value_bank = None;
        appraisal.brand = None;
        appraisal.notes = None;

        let data = resolve_certificate(&appraisal, &[], today());

        // Un monto ausente o cero no genera frase "CERO DÓLARES"
        assert_eq!(data.appraisal_value, "");
        assert_eq!(data.appraisal_value_words, "");
        assert_eq!(data.appraisal_value_local, "");
        assert_eq!(data.appraisal_value_local_words, "");
        assert_eq!(data.bank_value, "");
        assert_eq!(data.brand, "");
        assert_eq!(data.notes, "");
    }

    #[test]
    fn test_resolve_missing_date_uses_today() {
        let mut appraisal = sample_appraisal();
        appraisal.appraisal_date = None;

        let data = resolve_certificate(&appraisal, &[], today());
        assert_eq!(data.formatted_date, "10 Ene 2025");
    }

    #[test]
    fn test_resolve_sums_deductions_ignoring_null_amounts() {
        let deductions = vec![
            AppraisalDeduction {
                id: 1,
                vehicle_appraisal_id: 77,
                description: Some("Pintura rayada".to_string()),
                amount: Some(Decimal::from(7500)),
            },
            AppraisalDeduction {
                id: 2,
                vehicle_appraisal_id: 77,
                description: None,
                amount: None,
            },
            AppraisalDeduction {
                id: 3,
                vehicle_appraisal_id: 77,
                description: Some("Llantas gastadas".to_string()),
                amount: Some(Decimal::from(12500)),
            },
        ];

        let data = resolve_certificate(&sample_appraisal(), &deductions, today());

        assert_eq!(data.deductions.len(), 3);
        assert_eq!(data.deductions[0].amount, "₡7 500.00");
        assert_eq!(data.deductions[1].description, "");
        assert_eq!(data.deductions[1].amount, "");
        assert_eq!(data.total_deductions, "₡20 000.00");
    }

    #[test]
    fn test_html_includes_values_and_omits_empty_lines() {
        let mut appraisal = sample_appraisal();
        appraisal.appraisal_value_bank = None;

        let data = resolve_certificate(&appraisal, &[], today());
        let html = build_certificate_html(&data);

        assert!(html.contains("CERTIFICADO DE AVALÚO"));
        assert!(html.contains("Certificado N.º 77"));
        assert!(html.contains("$8 500.75"));
        assert!(html.contains("OCHO MIL QUINIENTOS DÓLARES"));
        assert!(!html.contains("garantía bancaria"));
    }

    #[test]
    fn test_html_escapes_markup_in_fields() {
        let mut appraisal = sample_appraisal();
        appraisal.owner = Some("Pérez & Hijos <SA>".to_string());

        let data = resolve_certificate(&appraisal, &[], today());
        let html = build_certificate_html(&data);

        assert!(html.contains("Pérez &amp; Hijos &lt;SA&gt;"));
        assert!(!html.contains("<SA>"));
    }
}
