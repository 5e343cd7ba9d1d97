//! End-to-end checks of the HTTP transport against a local prediction stub.

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use hepatorisk::{PatientDraft, PatientField, PredictionController, PredictionError, RiskLevel};

type Captured = Arc<Mutex<Option<(Option<String>, Value)>>>;

async fn spawn_stub(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured: Captured = Arc::default();

    let app = Router::new()
        .route(
            "/predict",
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        let content_type = headers
                            .get("content-type")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        *captured.lock().expect("capture lock") = Some((content_type, body));
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (format!("http://{addr}/predict"), captured)
}

fn complete_draft() -> PatientDraft {
    PatientDraft::default()
        .with(PatientField::Age, 58.0)
        .with(PatientField::Gender, "Male")
        .with(PatientField::Bmi, "29.4")
        .with(PatientField::AlcoholConsumption, "Regular")
        .with(PatientField::SmokingStatus, "Former")
        .with(PatientField::HepatitisB, 1u8)
        .with(PatientField::HepatitisC, 0u8)
        .with(PatientField::LiverFunctionScore, 48.5)
        .with(PatientField::AlphaFetoproteinLevel, 35.2)
        .with(PatientField::CirrhosisHistory, 1u8)
        .with(PatientField::FamilyHistoryCancer, 0u8)
        .with(PatientField::PhysicalActivityLevel, "Low")
        .with(PatientField::Diabetes, 1u8)
}

#[tokio::test]
async fn test_prediction_roundtrip() {
    let (endpoint, captured) = spawn_stub(
        StatusCode::OK,
        json!({"riesgo_porcentaje": 82.4, "mensaje_accion": "Derivar a hepatología"}),
    )
    .await;

    let mut controller = PredictionController::new(endpoint).expect("client");
    controller.submit_update(complete_draft());

    let result = controller.predict().await.expect("prediction");
    assert_eq!(result.risk_percentage, 82);
    assert_eq!(result.risk_level, RiskLevel::VeryHigh);
    assert_eq!(result.clinical_message, "Derivar a hepatología");
    assert_eq!(result.recommendations.len(), 2);

    let (content_type, body) = captured
        .lock()
        .expect("capture lock")
        .clone()
        .expect("request received");
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let object = body.as_object().expect("json object");
    assert_eq!(object.len(), 13);
    assert_eq!(object["age"], json!(58.0));
    assert_eq!(object["gender"], json!("Male"));
    assert_eq!(object["hepatitis_b"], json!(1));
}

#[tokio::test]
async fn test_server_error_message_is_surfaced() {
    let (endpoint, _) = spawn_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "modelo no disponible"}),
    )
    .await;

    let mut controller = PredictionController::new(endpoint).expect("client");
    controller.submit_update(complete_draft());

    let err = controller.predict().await.unwrap_err();
    assert!(matches!(err, PredictionError::Connection(_)));
    assert_eq!(err.to_string(), "Error de conexión: modelo no disponible");
}

#[tokio::test]
async fn test_unreachable_service() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut controller =
        PredictionController::new(format!("http://{addr}/predict")).expect("client");
    controller.submit_update(complete_draft());

    let err = controller.predict().await.unwrap_err();
    assert!(err.to_string().starts_with("Error de conexión: "));
}

#[tokio::test]
async fn test_invalid_record_never_reaches_service() {
    let (endpoint, captured) = spawn_stub(StatusCode::OK, json!({})).await;

    let mut controller = PredictionController::new(endpoint).expect("client");
    controller.submit_update(complete_draft().with(PatientField::Age, 130.0));

    let err = controller.predict().await.unwrap_err();
    assert!(matches!(err, PredictionError::Validation(_)));
    assert!(captured.lock().expect("capture lock").is_none());
}
