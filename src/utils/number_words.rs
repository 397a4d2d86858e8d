//! Conversión de números a palabras en español
//!
//! Los certificados de avalúo deben expresar los montos en letras además
//! de cifras. La conversión descompone el número por bandas de magnitud
//! (unidades, especiales del 10 al 19, decenas, centenas, miles, millones)
//! y recurre sobre el residuo de cada banda.

const UNITS: [&str; 10] = [
    "", "UN", "DOS", "TRES", "CUATRO", "CINCO", "SEIS", "SIETE", "OCHO", "NUEVE",
];

const TEENS: [&str; 10] = [
    "DIEZ",
    "ONCE",
    "DOCE",
    "TRECE",
    "CATORCE",
    "QUINCE",
    "DIECISEIS",
    "DIECISIETE",
    "DIECIOCHO",
    "DIECINUEVE",
];

const TENS: [&str; 10] = [
    "",
    "DIEZ",
    "VEINTE",
    "TREINTA",
    "CUARENTA",
    "CINCUENTA",
    "SESENTA",
    "SETENTA",
    "OCHENTA",
    "NOVENTA",
];

const HUNDREDS: [&str; 10] = [
    "",
    "CIENTO",
    "DOSCIENTOS",
    "TRESCIENTOS",
    "CUATROCIENTOS",
    "QUINIENTOS",
    "SEISCIENTOS",
    "SETECIENTOS",
    "OCHOCIENTOS",
    "NOVECIENTOS",
];

/// Convierte un entero no negativo a su forma en palabras, en mayúsculas.
///
/// Formas irregulares: 100 exacto es "CIEN" (no "CIENTO"), el bloque
/// 1000-1999 usa "UN MIL" y exactamente un millón es singular ("UN MILLÓN"
/// frente a "DOS MILLONES").
pub fn number_to_words(n: u64) -> String {
    match n {
        0 => "CERO".to_string(),
        1..=9 => UNITS[n as usize].to_string(),
        10..=19 => TEENS[(n - 10) as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            if n % 10 == 0 {
                tens.to_string()
            } else {
                format!("{} Y {}", tens, UNITS[(n % 10) as usize])
            }
        }
        100 => "CIEN".to_string(),
        101..=999 => {
            let hundreds = HUNDREDS[(n / 100) as usize];
            if n % 100 == 0 {
                hundreds.to_string()
            } else {
                format!("{} {}", hundreds, number_to_words(n % 100))
            }
        }
        1000..=999_999 => {
            let thousands = if n < 2000 {
                "UN MIL".to_string()
            } else {
                format!("{} MIL", number_to_words(n / 1000))
            };
            if n % 1000 == 0 {
                thousands
            } else {
                format!("{} {}", thousands, number_to_words(n % 1000))
            }
        }
        _ => {
            let millions = if n < 2_000_000 {
                "UN MILLÓN".to_string()
            } else {
                format!("{} MILLONES", number_to_words(n / 1_000_000))
            };
            if n % 1_000_000 == 0 {
                millions
            } else {
                format!("{} {}", millions, number_to_words(n % 1_000_000))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(number_to_words(0), "CERO");
    }

    #[test]
    fn test_units_and_teens() {
        assert_eq!(number_to_words(1), "UN");
        assert_eq!(number_to_words(9), "NUEVE");
        assert_eq!(number_to_words(10), "DIEZ");
        assert_eq!(number_to_words(11), "ONCE");
        assert_eq!(number_to_words(15), "QUINCE");
        assert_eq!(number_to_words(19), "DIECINUEVE");
    }

    #[test]
    fn test_tens_with_conjunction() {
        assert_eq!(number_to_words(20), "VEINTE");
        assert_eq!(number_to_words(21), "VEINTE Y UN");
        assert_eq!(number_to_words(45), "CUARENTA Y CINCO");
        assert_eq!(number_to_words(99), "NOVENTA Y NUEVE");
    }

    #[test]
    fn test_hundred_irregular_form() {
        assert_eq!(number_to_words(100), "CIEN");
        assert_eq!(number_to_words(101), "CIENTO UN");
        assert_eq!(number_to_words(150), "CIENTO CINCUENTA");
        assert_eq!(number_to_words(200), "DOSCIENTOS");
        assert_eq!(number_to_words(555), "QUINIENTOS CINCUENTA Y CINCO");
        assert_eq!(number_to_words(999), "NOVECIENTOS NOVENTA Y NUEVE");
    }

    #[test]
    fn test_thousands_irregular_form() {
        assert_eq!(number_to_words(1000), "UN MIL");
        assert_eq!(number_to_words(1001), "UN MIL UN");
        assert_eq!(number_to_words(1999), "UN MIL NOVECIENTOS NOVENTA Y NUEVE");
        assert_eq!(number_to_words(2000), "DOS MIL");
        assert_eq!(number_to_words(12500), "DOCE MIL QUINIENTOS");
        assert_eq!(
            number_to_words(999_999),
            "NOVECIENTOS NOVENTA Y NUEVE MIL NOVECIENTOS NOVENTA Y NUEVE"
        );
    }

    #[test]
    fn test_millions_singular_plural() {
        assert_eq!(number_to_words(1_000_000), "UN MILLÓN");
        assert_eq!(number_to_words(1_500_000), "UN MILLÓN QUINIENTOS MIL");
        assert_eq!(number_to_words(2_000_000), "DOS MILLONES");
        assert_eq!(
            number_to_words(3_250_000),
            "TRES MILLONES DOSCIENTOS CINCUENTA MIL"
        );
    }
}
