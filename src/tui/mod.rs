//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Patient data input with inline validation errors
//! - Risk tier, percentage and recommendations display

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::MedicalTheme;
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};
