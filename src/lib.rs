//! # Hepatorisk
//!
//! Terminal client for a remote liver cancer risk prediction service.
//!
//! This crate provides:
//! - A 13-field patient record with presence, range and enumeration validation
//! - A prediction controller that submits the record as JSON and adapts the reply
//! - A four-tier risk classification with fixed recommendations
//! - Terminal UI for data entry and result display
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (patient draft/record, risk tiers)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (reqwest, log sanitization)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven settings for the binary
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{PredictionController, ServiceError, DEFAULT_ENDPOINT};
pub use domain::{PatientDraft, PatientField, PatientRecord, PredictionResult, RiskLevel};

/// Result type for Hepatorisk operations
pub type Result<T> = std::result::Result<T, PredictionError>;

/// Error surfaced by [`PredictionController::predict`].
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// Displays as the comma-joined list of field errors.
    #[error(transparent)]
    Validation(#[from] domain::ValidationErrors),

    #[error("Error de conexión: {0}")]
    Connection(#[from] ServiceError),
}
