//! Prediction controller: Orchestrates one risk prediction round-trip.
//!
//! This controller coordinates:
//! - Accumulating patient input in the record store
//! - Validation before any network activity
//! - The JSON POST to the prediction service
//! - Adapting the service reply into a tiered [`PredictionResult`]

use serde::Deserialize;

use crate::adapters::HttpTransport;
use crate::domain::{
    PatientDraft, PatientRecord, PatientRecordStore, PredictionResult, ValidationReport,
};
use crate::ports::{PredictionTransport, TransportError};
use crate::PredictionError;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";

/// Message used when the service fails without saying why.
const GENERIC_SERVER_ERROR: &str = "Error en el servidor";

/// Failures after validation, while talking to the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Non-2xx reply; `message` comes from the body's `error` field or is generic.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Encode(serde_json::Error),

    #[error("{0}")]
    Decode(serde_json::Error),
}

/// Success body returned by the prediction service.
#[derive(Debug, Deserialize)]
struct ServiceReply {
    riesgo_porcentaje: f64,
    mensaje_accion: String,
}

/// Error body returned by the prediction service.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Owns the patient record store for one form session and runs predictions.
pub struct PredictionController<T = HttpTransport>
where
    T: PredictionTransport,
{
    store: PatientRecordStore,
    endpoint: String,
    transport: T,
}

impl PredictionController<HttpTransport> {
    /// Create a controller that talks HTTP to `endpoint`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        Ok(Self::with_transport(endpoint, HttpTransport::new()?))
    }

    /// Create a controller pointed at [`DEFAULT_ENDPOINT`].
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_default_endpoint() -> Result<Self, TransportError> {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl<T> PredictionController<T>
where
    T: PredictionTransport,
{
    /// Create a controller with an injected transport.
    pub fn with_transport(endpoint: impl Into<String>, transport: T) -> Self {
        Self {
            store: PatientRecordStore::new(),
            endpoint: endpoint.into(),
            transport,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Merge form input into the current record. Not validated here.
    pub fn submit_update(&mut self, partial: PatientDraft) {
        self.store.merge(partial);
    }

    #[must_use]
    pub fn check_validity(&self) -> ValidationReport {
        self.store.validate()
    }

    /// Run a prediction for the current record.
    ///
    /// Pipeline:
    /// 1. Validate (no request is sent for an invalid record)
    /// 2. Convert to a complete record
    /// 3. POST it as JSON
    /// 4. Interpret the status and body
    /// 5. Classify the returned percentage
    ///
    /// # Errors
    /// `PredictionError::Validation` with every failing field, or
    /// `PredictionError::Connection` for anything that went wrong after validation.
    pub async fn predict(&self) -> Result<PredictionResult, PredictionError> {
        let record = match self.store.to_complete_record() {
            Ok(record) => record,
            Err(errors) => {
                tracing::warn!(
                    missing = errors.len(),
                    "Prediction rejected: patient record is incomplete"
                );
                return Err(PredictionError::Validation(errors));
            }
        };

        tracing::info!(endpoint = %self.endpoint, "Requesting risk prediction...");

        match self.request_prediction(&record).await {
            Ok(result) => {
                tracing::info!(
                    "Prediction complete: risk={}%, level={}",
                    result.risk_percentage,
                    result.risk_level
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Error connecting to the prediction service: {}", e);
                Err(PredictionError::Connection(e))
            }
        }
    }

    async fn request_prediction(
        &self,
        record: &PatientRecord,
    ) -> Result<PredictionResult, ServiceError> {
        tracing::debug!("Step 1: Encoding patient record...");
        let body = serde_json::to_vec(record).map_err(ServiceError::Encode)?;

        tracing::debug!("Step 2: Sending request...");
        let response = self.transport.post_json(&self.endpoint, body).await?;

        if !response.is_success() {
            return Err(ServiceError::Server {
                status: response.status,
                message: server_error_message(&response.body),
            });
        }

        tracing::debug!("Step 3: Decoding service reply...");
        let reply: ServiceReply =
            serde_json::from_slice(&response.body).map_err(ServiceError::Decode)?;

        Ok(PredictionResult::from_score(
            reply.riesgo_porcentaje,
            reply.mensaje_accion,
        ))
    }

    /// Drop all entered data.
    pub fn reset_record(&mut self) {
        self.store.clear();
    }

    #[must_use]
    pub fn current_record_snapshot(&self) -> PatientDraft {
        self.store.snapshot()
    }
}

/// Extract the `error` field from a failure body, falling back to a generic message.
fn server_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PatientField, RiskLevel};
    use crate::ports::MockTransport;

    const ENDPOINT: &str = "http://prediction.test/predict";

    fn complete_draft() -> PatientDraft {
        PatientDraft::default()
            .with(PatientField::Age, "45")
            .with(PatientField::Gender, "Male")
            .with(PatientField::Bmi, "31.2")
            .with(PatientField::AlcoholConsumption, "Heavy")
            .with(PatientField::SmokingStatus, "Current")
            .with(PatientField::HepatitisB, "1")
            .with(PatientField::HepatitisC, "0")
            .with(PatientField::LiverFunctionScore, "41.5")
            .with(PatientField::AlphaFetoproteinLevel, "210")
            .with(PatientField::CirrhosisHistory, "1")
            .with(PatientField::FamilyHistoryCancer, "1")
            .with(PatientField::PhysicalActivityLevel, "Low")
            .with(PatientField::Diabetes, "1")
    }

    fn controller(transport: MockTransport) -> PredictionController<MockTransport> {
        let mut controller = PredictionController::with_transport(ENDPOINT, transport);
        controller.submit_update(complete_draft());
        controller
    }

    #[tokio::test]
    async fn test_invalid_record_never_hits_network() {
        let mut controller =
            PredictionController::with_transport(ENDPOINT, MockTransport::replying(200, "{}"));
        controller.submit_update(PatientDraft::default().with(PatientField::Age, "45"));

        let expected = controller.check_validity().errors.join(", ");
        let err = controller.predict().await.unwrap_err();

        assert!(matches!(err, PredictionError::Validation(_)));
        assert_eq!(err.to_string(), expected);
        assert!(controller.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_prediction() {
        let controller = controller(MockTransport::replying(
            200,
            r#"{"riesgo_porcentaje": 82.4, "mensaje_accion": "Consulte urgentemente"}"#,
        ));

        let result = controller.predict().await.expect("Should predict");

        assert_eq!(result.risk_percentage, 82);
        assert_eq!(result.risk_level, RiskLevel::VeryHigh);
        assert_eq!(result.clinical_message, "Consulte urgentemente");
        assert_eq!(result.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn test_request_body_is_complete_record() {
        let controller = controller(MockTransport::replying(
            200,
            r#"{"riesgo_porcentaje": 10, "mensaje_accion": "Sin hallazgos"}"#,
        ));
        controller.predict().await.expect("Should predict");

        let calls = controller.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, ENDPOINT);

        let sent: serde_json::Value = serde_json::from_slice(&calls[0].1).expect("JSON body");
        assert_eq!(sent.as_object().map(|o| o.len()), Some(13));
        assert_eq!(sent["age"].as_f64(), Some(45.0));
        assert_eq!(sent["alpha_fetoprotein_level"].as_f64(), Some(210.0));
        assert_eq!(sent["hepatitis_b"], 1);
        assert_eq!(sent["smoking_status"], "Current");
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let controller = controller(MockTransport::replying(
            503,
            r#"{"error": "modelo no disponible"}"#,
        ));

        let err = controller.predict().await.unwrap_err();

        assert!(matches!(
            err,
            PredictionError::Connection(ServiceError::Server { status: 503, .. })
        ));
        assert!(err.to_string().contains("modelo no disponible"));
        assert_eq!(err.to_string(), "Error de conexión: modelo no disponible");
    }

    #[tokio::test]
    async fn test_server_error_without_message_uses_generic() {
        for body in [r#"{"detail": "x"}"#, r#"{"error": ""}"#, "<html>502</html>"] {
            let controller = controller(MockTransport::replying(502, body));
            let err = controller.predict().await.unwrap_err();
            assert_eq!(err.to_string(), "Error de conexión: Error en el servidor");
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_wrapped() {
        let controller = controller(MockTransport::failing("connection refused"));
        let err = controller.predict().await.unwrap_err();
        assert_eq!(err.to_string(), "Error de conexión: connection refused");
    }

    #[tokio::test]
    async fn test_malformed_reply_is_wrapped() {
        let controller = controller(MockTransport::replying(200, r#"{"riesgo_porcentaje": "alto"}"#));
        let err = controller.predict().await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Connection(ServiceError::Decode(_))
        ));
        assert!(err.to_string().starts_with("Error de conexión: "));
    }

    #[test]
    fn test_reset_clears_snapshot() {
        let mut controller = controller(MockTransport::replying(200, "{}"));
        assert!(!controller.current_record_snapshot().is_empty());

        controller.reset_record();

        assert!(controller.current_record_snapshot().is_empty());
        assert!(!controller.check_validity().is_valid);
    }

    #[test]
    fn test_submit_update_merges() {
        let mut controller = controller(MockTransport::replying(200, "{}"));
        controller.submit_update(PatientDraft::default().with(PatientField::Age, "200"));

        let report = controller.check_validity();
        assert_eq!(report.errors, ["Edad es requerida"]);
        assert_eq!(controller.current_record_snapshot().len(), 13);
    }

    #[test]
    fn test_default_endpoint() {
        let controller = PredictionController::with_default_endpoint().expect("Should build");
        assert_eq!(controller.endpoint(), "http://127.0.0.1:5000/predict");
    }
}
