//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest transport to the prediction service
//! - `sanitize`: secret filtering for logs

pub mod http;
pub mod sanitize;

pub use http::HttpTransport;
