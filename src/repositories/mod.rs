//! Repositorios de acceso a datos
//!
//! Este módulo contiene la capa de acceso a PostgreSQL. Los repositorios
//! encapsulan el SQL y devuelven modelos tipados.

pub mod appraisal_repository;
pub mod user_repository;
