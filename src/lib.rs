//! Motor de avalúos vehiculares
//!
//! Backend HTTP para el registro, búsqueda y certificación de avalúos
//! de vehículos. Expone una API REST sobre Axum con persistencia en
//! PostgreSQL y generación de certificados en PDF.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
