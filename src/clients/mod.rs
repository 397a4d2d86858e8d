//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for communicating with external APIs.

pub mod pdf_client;

// Re-export main types for convenience
pub use pdf_client::{PdfRenderer, PdfServiceClient};
