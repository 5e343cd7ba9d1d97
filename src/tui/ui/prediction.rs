//! Prediction result view.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::domain::{PredictionResult, RiskLevel};
use crate::tui::styles::MedicalTheme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Prediction state
#[derive(Debug, Clone, Default)]
pub enum PredictionState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Request in flight
    Pending { started_at: Instant },
    /// Service replied
    Complete { result: PredictionResult },
    /// Validation or connection failure
    Error { message: String },
}

impl PredictionState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Render the prediction view
pub fn render_prediction(f: &mut Frame, area: Rect, state: &PredictionState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_prediction_header(f, chunks[0]);
    match state {
        PredictionState::Idle => render_idle(f, chunks[1]),
        PredictionState::Pending { started_at } => render_pending(f, chunks[1], *started_at),
        PredictionState::Complete { result } => render_result(f, chunks[1], result),
        PredictionState::Error { message } => render_error(f, chunks[1], message),
    }
    render_prediction_footer(f, chunks[2], state);
}

fn render_prediction_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Evaluación de Riesgo", MedicalTheme::title()),
        Span::styled(" │ Servicio de predicción", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Sin evaluación en curso",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Complete el formulario del paciente para comenzar",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_pending(f: &mut Frame, area: Rect, started_at: Instant) {
    let elapsed = started_at.elapsed();
    let frame = (elapsed.as_millis() / 100) as usize % SPINNER.len();

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(SPINNER[frame], MedicalTheme::focused()),
            Span::styled(" Calculando riesgo...", MedicalTheme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("{:.1} s", elapsed.as_secs_f64()),
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_result(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let block = Block::default()
        .title(Span::styled(" Resultado ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tier
            Constraint::Length(3), // Percentage
            Constraint::Length(4), // Clinical message
            Constraint::Min(0),    // Recommendations
        ])
        .margin(1)
        .split(inner);

    let risk_style = MedicalTheme::risk_level(result.risk_level);
    let risk_icon = match result.risk_level {
        RiskLevel::Low => "OK",
        RiskLevel::Moderate => "!",
        RiskLevel::High | RiskLevel::VeryHigh => "!!",
    };

    let tier = Paragraph::new(Line::from(Span::styled(
        format!("{} {}", risk_icon, result.risk_level.description()),
        risk_style.add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(tier, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Riesgo estimado ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(risk_style)
        .percent(result.risk_percentage.clamp(0, 100) as u16)
        .label(format!("{}%", result.risk_percentage));
    f.render_widget(gauge, chunks[1]);

    let message = Paragraph::new(Line::from(Span::styled(
        result.clinical_message.as_str(),
        MedicalTheme::text(),
    )))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Mensaje clínico ", MedicalTheme::text_secondary()))
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(message, chunks[2]);

    let items: Vec<ListItem> = result
        .recommendations
        .iter()
        .map(|r| {
            ListItem::new(Line::from(vec![
                Span::styled("• ", risk_style),
                Span::styled(r.as_str(), MedicalTheme::text()),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(" Recomendaciones ", MedicalTheme::text_secondary()))
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(list, chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_prediction_footer(f: &mut Frame, area: Rect, state: &PredictionState) {
    let content = match state {
        PredictionState::Pending { .. } => Line::from(vec![Span::styled(
            "Esperando respuesta del servicio...",
            MedicalTheme::text_muted(),
        )]),
        PredictionState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Corregir datos ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Salir", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Editar datos ", MedicalTheme::key_desc()),
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("Nuevo paciente ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Salir", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
