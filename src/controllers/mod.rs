//! Controllers de la API
//!
//! Orquestan validación, repositorios y servicios por recurso. Los
//! handlers HTTP de `routes` delegan aquí.

pub mod appraisal_controller;
pub mod auth_controller;
pub mod certificate_controller;
pub mod dashboard_controller;
