//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Prediction via background worker

use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::runtime::Runtime;

use crate::adapters::HttpTransport;
use crate::application::PredictionController;
use crate::config::AppConfig;
use crate::ports::PredictionTransport;

use super::ui::{
    patient::{render_patient_form, PatientFormState},
    prediction::{render_prediction, PredictionState},
    render_disclaimer,
};
use super::worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    PatientForm,
    Prediction,
}

/// Main application state
pub struct App<T = HttpTransport>
where
    T: PredictionTransport,
{
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Runtime the worker drives requests on
    runtime: Runtime,

    /// Controller shared with the background worker
    controller: Arc<Mutex<PredictionController<T>>>,

    /// Patient form state
    patient_form_state: PatientFormState,

    /// Prediction state
    prediction_state: PredictionState,

    /// Pending prediction worker (if running)
    pending_worker: Option<PredictionWorkerHandle>,
}

impl App<HttpTransport> {
    /// Create a new application talking to the configured endpoint.
    ///
    /// # Errors
    /// Returns error if the runtime or HTTP client cannot be initialized.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let controller = PredictionController::new(config.endpoint.as_str())?;
        tracing::info!(endpoint = %controller.endpoint(), "Prediction controller ready");

        Ok(Self::with_dependencies(
            Arc::new(Mutex::new(controller)),
            runtime,
        ))
    }
}

impl<T> App<T>
where
    T: PredictionTransport + 'static,
{
    /// Create application with an injected controller and runtime.
    pub fn with_dependencies(
        controller: Arc<Mutex<PredictionController<T>>>,
        runtime: Runtime,
    ) -> Self {
        Self {
            screen: Screen::PatientForm,
            should_quit: false,
            runtime,
            controller,
            patient_form_state: PatientFormState::default(),
            prediction_state: PredictionState::default(),
            pending_worker: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(f.area());

                match self.screen {
                    Screen::PatientForm => {
                        render_patient_form(f, chunks[0], &self.patient_form_state)
                    }
                    Screen::Prediction => render_prediction(f, chunks[0], &self.prediction_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            // Short poll keeps the spinner moving
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        while let Some(progress) = self
            .pending_worker
            .as_ref()
            .and_then(PredictionWorkerHandle::try_recv)
        {
            match progress {
                PredictionProgress::Requesting => {}
                PredictionProgress::Complete(result) => {
                    self.prediction_state = PredictionState::Complete { result };
                    self.pending_worker = None;
                }
                PredictionProgress::Error(message) => {
                    self.prediction_state = PredictionState::Error { message };
                    self.pending_worker = None;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if (key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL))
            || key == KeyCode::Esc
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Prediction => self.handle_prediction_key(key),
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.patient_form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.patient_form_state.next_field(),
            KeyCode::Left => self.patient_form_state.prev_option(),
            KeyCode::Right => self.patient_form_state.next_option(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.patient_form_state.load_sample_data(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char(c) => self.patient_form_state.input_char(c),
            KeyCode::Backspace => self.patient_form_state.delete_char(),
            KeyCode::Delete => self.patient_form_state.clear_field(),
            KeyCode::Enter => self.submit_patient_form(),
            _ => {}
        }
    }

    fn handle_prediction_key(&mut self, key: KeyCode) {
        if self.prediction_state.is_pending() {
            return;
        }
        match key {
            KeyCode::Enter => self.return_to_form(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.reset(),
            _ => {}
        }
    }

    fn submit_patient_form(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }

        let draft = self.patient_form_state.to_draft();

        let report = match self.controller.lock() {
            Ok(mut ctrl) => {
                // The form always carries the whole record
                ctrl.reset_record();
                ctrl.submit_update(draft);
                ctrl.check_validity()
            }
            Err(_) => {
                self.patient_form_state.error_message =
                    Some("Prediction controller lock poisoned".to_string());
                return;
            }
        };

        if !report.is_valid {
            self.patient_form_state.error_message = Some(report.errors.join(", "));
            return;
        }

        self.screen = Screen::Prediction;
        self.prediction_state = PredictionState::Pending {
            started_at: Instant::now(),
        };
        self.pending_worker = Some(PredictionWorker::spawn(
            Arc::clone(&self.controller),
            self.runtime.handle().clone(),
        ));

        // Clear plaintext buffers from the UI immediately.
        self.patient_form_state.clear_sensitive();
    }

    /// Back to the form with the last submitted values.
    fn return_to_form(&mut self) {
        let snapshot = match self.controller.lock() {
            Ok(ctrl) => ctrl.current_record_snapshot(),
            Err(_) => {
                tracing::error!("Prediction controller lock poisoned; form starts empty");
                Default::default()
            }
        };
        let error_message = match &self.prediction_state {
            PredictionState::Error { message } => Some(message.clone()),
            _ => None,
        };

        self.patient_form_state = PatientFormState::from_draft(&snapshot);
        self.patient_form_state.error_message = error_message;
        self.screen = Screen::PatientForm;
    }

    fn reset(&mut self) {
        match self.controller.lock() {
            Ok(mut ctrl) => ctrl.reset_record(),
            Err(_) => tracing::error!("Prediction controller lock poisoned; cannot reset"),
        }
        self.patient_form_state = PatientFormState::default();
        self.prediction_state = PredictionState::Idle;
        self.screen = Screen::PatientForm;
    }

    #[cfg(test)]
    fn wait_for_worker(&mut self) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.pending_worker.is_some() {
            if Instant::now() > deadline {
                anyhow::bail!("worker did not finish");
            }
            std::thread::sleep(Duration::from_millis(5));
            self.poll_worker();
        }
        Ok(())
    }
}
