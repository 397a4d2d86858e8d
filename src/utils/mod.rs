//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, normalización de entrada y conversión de números a palabras.

pub mod errors;
pub mod jwt;
pub mod normalize;
pub mod number_words;
pub mod validation;
