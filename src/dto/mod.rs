//! DTOs de la API
//!
//! Requests, responses y envelopes compartidos de los endpoints HTTP.

pub mod appraisal_dto;
pub mod auth_dto;
pub mod dashboard_dto;
