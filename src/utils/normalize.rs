//! Normalización de valores de entrada
//!
//! Los clientes del sistema envían los campos numéricos de forma
//! inconsistente: números JSON, strings numéricos, strings vacíos o null.
//! Este módulo convierte cada valor crudo a su forma canónica según el
//! tipo declarado del campo, sin rechazar nunca la petición: toda entrada
//! malformada se resuelve al fallback del tipo (cero para campos
//! requeridos, ausente para opcionales).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Campo decimal requerido: entrada inválida, negativa o no finita ⇒ cero.
pub fn required_decimal(raw: &Value) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Campo decimal opcional: entrada inválida ⇒ ausente.
pub fn optional_decimal(raw: &Value) -> Option<Decimal> {
    parse_decimal(raw)
}

/// Campo entero requerido: entrada inválida, negativa o fraccionaria ⇒ cero.
pub fn required_integer(raw: &Value) -> i32 {
    parse_integer(raw).unwrap_or(0)
}

/// Campo entero opcional: entrada inválida ⇒ ausente.
pub fn optional_integer(raw: &Value) -> Option<i32> {
    parse_integer(raw)
}

/// Campo entero opcional acotado a un rango cerrado (ej. año del modelo).
pub fn bounded_optional_integer(raw: &Value, min: i32, max: i32) -> Option<i32> {
    parse_integer(raw).filter(|n| (min..=max).contains(n))
}

/// Campo de texto opcional: los strings en blanco pasan sin cambios,
/// solo null/ausente produce `None`. Este tipo nunca sustituye un default.
pub fn optional_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Campo de fecha opcional en formato ISO `YYYY-MM-DD`; malformada ⇒ ausente.
pub fn optional_date(raw: &Value) -> Option<NaiveDate> {
    match raw {
        Value::String(s) => NaiveDate::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn parse_decimal(raw: &Value) -> Option<Decimal> {
    let parsed = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                // from_f64_retain descarta NaN, infinitos y valores fuera
                // del rango representable
                n.as_f64().and_then(Decimal::from_f64_retain)
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Decimal::from_str(trimmed).ok()
            }
        }
        _ => None,
    };

    parsed.filter(|d| !d.is_sign_negative())
}

fn parse_integer(raw: &Value) -> Option<i32> {
    let parsed = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if n.as_u64().is_some() {
                // u64 mayor que i64::MAX nunca cabe en i32
                return None;
            } else {
                n.as_f64().and_then(whole_f64)
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_f64))
            }
        }
        _ => None,
    }?;

    if parsed < 0 {
        return None;
    }
    i32::try_from(parsed).ok()
}

// Acepta solo floats finitos sin parte fraccionaria
fn whole_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_decimal_parses_numbers_and_strings() {
        assert_eq!(required_decimal(&json!(1500)), Decimal::from(1500));
        assert_eq!(
            required_decimal(&json!(250.75)),
            Decimal::from_str("250.75").unwrap()
        );
        assert_eq!(
            required_decimal(&json!("12500.50")),
            Decimal::from_str("12500.50").unwrap()
        );
        assert_eq!(
            required_decimal(&json!("  99.9  ")),
            Decimal::from_str("99.9").unwrap()
        );
    }

    #[test]
    fn test_required_decimal_falls_back_to_zero() {
        assert_eq!(required_decimal(&json!(null)), Decimal::ZERO);
        assert_eq!(required_decimal(&json!("")), Decimal::ZERO);
        assert_eq!(required_decimal(&json!("   ")), Decimal::ZERO);
        assert_eq!(required_decimal(&json!("no es un número")), Decimal::ZERO);
        assert_eq!(required_decimal(&json!("12,500")), Decimal::ZERO);
        assert_eq!(required_decimal(&json!(-400)), Decimal::ZERO);
        assert_eq!(required_decimal(&json!(-0.01)), Decimal::ZERO);
        assert_eq!(required_decimal(&json!(true)), Decimal::ZERO);
        assert_eq!(required_decimal(&json!([1, 2])), Decimal::ZERO);
    }

    #[test]
    fn test_required_decimal_rejects_non_finite() {
        // NaN e infinito no sobreviven la serialización JSON, pero el
        // parser de f64 los cubre de todas formas
        assert!(Decimal::from_f64_retain(f64::NAN).is_none());
        assert!(Decimal::from_f64_retain(f64::INFINITY).is_none());
        assert_eq!(required_decimal(&json!(1e300)), Decimal::ZERO);
    }

    #[test]
    fn test_optional_decimal_absent_on_failure() {
        assert_eq!(optional_decimal(&json!(null)), None);
        assert_eq!(optional_decimal(&json!("")), None);
        assert_eq!(optional_decimal(&json!("basura")), None);
        assert_eq!(optional_decimal(&json!(-1)), None);
        assert_eq!(
            optional_decimal(&json!("8750.25")),
            Some(Decimal::from_str("8750.25").unwrap())
        );
        assert_eq!(optional_decimal(&json!(0)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_required_integer_whole_values_only() {
        assert_eq!(required_integer(&json!(120000)), 120000);
        assert_eq!(required_integer(&json!("85000")), 85000);
        assert_eq!(required_integer(&json!(90.0)), 90);
        assert_eq!(required_integer(&json!("90.0")), 90);
        assert_eq!(required_integer(&json!(12.5)), 0);
        assert_eq!(required_integer(&json!("12.5")), 0);
        assert_eq!(required_integer(&json!(-30)), 0);
        assert_eq!(required_integer(&json!(null)), 0);
        assert_eq!(required_integer(&json!("")), 0);
    }

    #[test]
    fn test_integer_overflow_falls_back() {
        assert_eq!(required_integer(&json!(i64::MAX)), 0);
        assert_eq!(required_integer(&json!(u64::MAX)), 0);
        assert_eq!(optional_integer(&json!(9_999_999_999_i64)), None);
        assert_eq!(optional_integer(&json!(i32::MAX as i64)), Some(i32::MAX));
    }

    #[test]
    fn test_optional_integer_absent_on_failure() {
        assert_eq!(optional_integer(&json!(null)), None);
        assert_eq!(optional_integer(&json!("abc")), None);
        assert_eq!(optional_integer(&json!(-5)), None);
        assert_eq!(optional_integer(&json!(365)), Some(365));
        assert_eq!(optional_integer(&json!(0)), Some(0));
    }

    #[test]
    fn test_bounded_optional_integer_range() {
        assert_eq!(bounded_optional_integer(&json!(2015), 1900, 2027), Some(2015));
        assert_eq!(bounded_optional_integer(&json!(1900), 1900, 2027), Some(1900));
        assert_eq!(bounded_optional_integer(&json!(2027), 1900, 2027), Some(2027));
        assert_eq!(bounded_optional_integer(&json!(1899), 1900, 2027), None);
        assert_eq!(bounded_optional_integer(&json!(2030), 1900, 2027), None);
        assert_eq!(bounded_optional_integer(&json!("2019"), 1900, 2027), Some(2019));
        assert_eq!(bounded_optional_integer(&json!(null), 1900, 2027), None);
    }

    #[test]
    fn test_optional_text_preserves_blanks() {
        assert_eq!(optional_text(&json!("")), Some(String::new()));
        assert_eq!(optional_text(&json!("   ")), Some("   ".to_string()));
        assert_eq!(
            optional_text(&json!("Toyota Corolla")),
            Some("Toyota Corolla".to_string())
        );
        assert_eq!(optional_text(&json!(null)), None);
        // Un número enviado a un campo de texto se conserva como string
        assert_eq!(optional_text(&json!(4588)), Some("4588".to_string()));
    }

    #[test]
    fn test_optional_date_iso_only() {
        assert_eq!(
            optional_date(&json!("2024-06-15")),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        assert_eq!(optional_date(&json!(" 2024-06-15 ")), NaiveDate::from_ymd_opt(2024, 6, 15));
        assert_eq!(optional_date(&json!("15/06/2024")), None);
        assert_eq!(optional_date(&json!("2024-13-40")), None);
        assert_eq!(optional_date(&json!("")), None);
        assert_eq!(optional_date(&json!(null)), None);
    }
}
