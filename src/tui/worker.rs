//! Background prediction worker.
//!
//! Runs `PredictionController::predict` on a separate thread so the TUI main
//! loop keeps drawing (and animating the busy indicator) while the request
//! is in flight.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tokio::runtime::Handle;

use crate::application::PredictionController;
use crate::domain::PredictionResult;
use crate::ports::PredictionTransport;

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// Request sent, waiting for the service
    Requesting,
    /// Prediction complete
    Complete(PredictionResult),
    /// Validation or connection failure, already formatted for display
    Error(String),
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<PredictionProgress>,
    /// Thread handle (for joining)
    _handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<PredictionProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Worker that drives one prediction on the shared tokio runtime.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn a background prediction for the controller's current record.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<T>(
        controller: Arc<Mutex<PredictionController<T>>>,
        runtime: Handle,
    ) -> PredictionWorkerHandle
    where
        T: PredictionTransport + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_prediction(&controller, &runtime, &tx);
        });

        PredictionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_prediction<T>(
        controller: &Mutex<PredictionController<T>>,
        runtime: &Handle,
        tx: &Sender<PredictionProgress>,
    ) where
        T: PredictionTransport,
    {
        let _ = tx.send(PredictionProgress::Requesting);

        let outcome = match controller.lock() {
            Ok(ctrl) => runtime.block_on(ctrl.predict()).map_err(|e| e.to_string()),
            Err(_) => Err("Prediction controller lock poisoned".to_string()),
        };

        let _ = match outcome {
            Ok(result) => tx.send(PredictionProgress::Complete(result)),
            Err(message) => tx.send(PredictionProgress::Error(message)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PatientDraft, PatientField};
    use crate::ports::MockTransport;
    use std::time::{Duration, Instant};

    fn wait_for_outcome(handle: &PredictionWorkerHandle) -> PredictionProgress {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match handle.try_recv() {
                Some(PredictionProgress::Requesting) => {}
                Some(other) => return other,
                None if Instant::now() > deadline => panic!("worker did not finish"),
                None => thread::sleep(Duration::from_millis(5)),
            }
        }
    }

    #[test]
    fn test_worker_reports_validation_error() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let mut controller =
            PredictionController::with_transport("http://x/predict", MockTransport::replying(200, "{}"));
        controller.submit_update(PatientDraft::default().with(PatientField::Age, "30"));

        let handle = PredictionWorker::spawn(Arc::new(Mutex::new(controller)), runtime.handle().clone());

        match wait_for_outcome(&handle) {
            PredictionProgress::Error(message) => assert!(message.starts_with("Género es requerido")),
            other => panic!("unexpected progress: {other:?}"),
        }
    }

    #[test]
    fn test_worker_reports_result() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let mut controller = PredictionController::with_transport(
            "http://x/predict",
            MockTransport::replying(200, r#"{"riesgo_porcentaje": 12.0, "mensaje_accion": "Ok"}"#),
        );
        let mut draft = PatientDraft::default();
        for (field, value) in PatientField::ALL.iter().zip([
            "40", "Female", "22", "Never", "Never", "0", "0", "55", "3", "0", "0", "High", "0",
        ]) {
            draft.set(*field, value);
        }
        controller.submit_update(draft);

        let handle = PredictionWorker::spawn(Arc::new(Mutex::new(controller)), runtime.handle().clone());

        match wait_for_outcome(&handle) {
            PredictionProgress::Complete(result) => assert_eq!(result.risk_percentage, 12),
            other => panic!("unexpected progress: {other:?}"),
        }
    }
}
