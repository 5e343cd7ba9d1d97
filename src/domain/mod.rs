//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O. Patient input is validated here before it
//! is allowed anywhere near the network.

mod patient;
mod prediction;
mod record_store;
mod validation;

pub use patient::{
    ActivityLevel, AlcoholConsumption, Categorical, FieldValue, Flag, Gender, PatientDraft,
    PatientField, PatientRecord, SmokingStatus,
};
pub use prediction::{PredictionResult, RiskLevel};
pub use record_store::PatientRecordStore;
pub use validation::{ValidationErrors, ValidationReport};
