//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    ActivityLevel, AlcoholConsumption, Categorical, FieldValue, Flag, Gender, PatientDraft,
    PatientField, SmokingStatus,
};
use crate::tui::styles::MedicalTheme;

/// Editable value behind one form field.
#[derive(Debug, Clone)]
pub enum FieldInput {
    /// Free numeric text
    Number { value: String, hint: &'static str },
    /// One of a fixed set of `(wire value, label)` options, or nothing yet
    Choice {
        options: Vec<(&'static str, &'static str)>,
        selected: Option<usize>,
    },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub field: PatientField,
    pub input: FieldInput,
}

impl FormField {
    fn number(field: PatientField, hint: &'static str) -> Self {
        Self {
            field,
            input: FieldInput::Number {
                value: String::new(),
                hint,
            },
        }
    }

    fn choice<C: Categorical>(field: PatientField) -> Self {
        Self {
            field,
            input: FieldInput::Choice {
                options: C::VARIANTS
                    .iter()
                    .map(|v| (v.wire_name(), v.label()))
                    .collect(),
                selected: None,
            },
        }
    }

    /// Raw value for the draft; `None` when nothing has been entered.
    fn raw_value(&self) -> Option<FieldValue> {
        match &self.input {
            FieldInput::Number { value, .. } if !value.is_empty() => {
                Some(FieldValue::Text(value.clone()))
            }
            FieldInput::Number { .. } => None,
            FieldInput::Choice { options, selected } => {
                selected.and_then(|i| options.get(i)).map(|(wire, _)| (*wire).into())
            }
        }
    }

    fn load(&mut self, raw: Option<&FieldValue>) {
        match &mut self.input {
            FieldInput::Number { value, .. } => {
                value.zeroize();
                match raw {
                    Some(FieldValue::Text(s)) => value.push_str(s),
                    Some(FieldValue::Number(n)) => value.push_str(&n.to_string()),
                    None => {}
                }
            }
            FieldInput::Choice { options, selected } => {
                let wire = match raw {
                    Some(FieldValue::Text(s)) => Some(s.trim().to_string()),
                    Some(FieldValue::Number(n)) => Some(n.to_string()),
                    None => None,
                };
                *selected = wire.and_then(|w| options.iter().position(|(o, _)| *o == w));
            }
        }
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::number(PatientField::Age, "años (0-120)"),
                FormField::choice::<Gender>(PatientField::Gender),
                FormField::number(PatientField::Bmi, "kg/m²"),
                FormField::choice::<AlcoholConsumption>(PatientField::AlcoholConsumption),
                FormField::choice::<SmokingStatus>(PatientField::SmokingStatus),
                FormField::choice::<Flag>(PatientField::HepatitisB),
                FormField::choice::<Flag>(PatientField::HepatitisC),
                FormField::number(PatientField::LiverFunctionScore, "puntaje"),
                FormField::number(PatientField::AlphaFetoproteinLevel, "ng/mL"),
                FormField::choice::<Flag>(PatientField::CirrhosisHistory),
                FormField::choice::<Flag>(PatientField::FamilyHistoryCancer),
                FormField::choice::<ActivityLevel>(PatientField::PhysicalActivityLevel),
                FormField::choice::<Flag>(PatientField::Diabetes),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl PatientFormState {
    /// Form pre-filled from a previously submitted draft.
    #[must_use]
    pub fn from_draft(draft: &PatientDraft) -> Self {
        let mut state = Self::default();
        for field in state.fields.iter_mut() {
            field.load(draft.get(field.field));
        }
        state
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current numeric field
    pub fn input_char(&mut self, c: char) {
        if let FieldInput::Number { value, .. } = &mut self.fields[self.selected_field].input {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let FieldInput::Number { value, .. } = &mut self.fields[self.selected_field].input {
            value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        match &mut self.fields[self.selected_field].input {
            FieldInput::Number { value, .. } => value.zeroize(),
            FieldInput::Choice { selected, .. } => *selected = None,
        }
    }

    /// Step the current choice forward, wrapping through "unselected".
    pub fn next_option(&mut self) {
        if let FieldInput::Choice { options, selected } = &mut self.fields[self.selected_field].input
        {
            *selected = match *selected {
                None => Some(0),
                Some(i) if i + 1 < options.len() => Some(i + 1),
                Some(_) => None,
            };
            self.error_message = None;
        }
    }

    /// Step the current choice backward, wrapping through "unselected".
    pub fn prev_option(&mut self) {
        if let FieldInput::Choice { options, selected } = &mut self.fields[self.selected_field].input
        {
            *selected = match *selected {
                None => options.len().checked_sub(1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            };
            self.error_message = None;
        }
    }

    /// Wipe all field buffers from memory and clear values.
    ///
    /// Called once a submission has been handed to the controller so
    /// plaintext inputs do not linger in the UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            match &mut field.input {
                FieldInput::Number { value, .. } => value.zeroize(),
                FieldInput::Choice { selected, .. } => *selected = None,
            }
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Raw form values; fields left empty are absent.
    #[must_use]
    pub fn to_draft(&self) -> PatientDraft {
        let mut draft = PatientDraft::default();
        for field in &self.fields {
            if let Some(value) = field.raw_value() {
                draft.set(field.field, value);
            }
        }
        draft
    }

    /// Load sample data for testing (elevated-risk profile)
    pub fn load_sample_data(&mut self) {
        let sample = PatientDraft::default()
            .with(PatientField::Age, "58")
            .with(PatientField::Gender, "Male")
            .with(PatientField::Bmi, "29.4")
            .with(PatientField::AlcoholConsumption, "Regular")
            .with(PatientField::SmokingStatus, "Former")
            .with(PatientField::HepatitisB, "1")
            .with(PatientField::HepatitisC, "0")
            .with(PatientField::LiverFunctionScore, "48.5")
            .with(PatientField::AlphaFetoproteinLevel, "35.2")
            .with(PatientField::CirrhosisHistory, "1")
            .with(PatientField::FamilyHistoryCancer, "0")
            .with(PatientField::PhysicalActivityLevel, "Low")
            .with(PatientField::Diabetes, "1");
        for field in self.fields.iter_mut() {
            field.load(sample.get(field.field));
        }
        self.error_message = None;
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Información del Paciente", MedicalTheme::title()),
        Span::styled(
            " │ Predicción de riesgo de cáncer hepático",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.input {
            FieldInput::Number { value, hint } => {
                if value.is_empty() {
                    spans.push(Span::styled(*hint, MedicalTheme::text_muted()));
                } else {
                    spans.push(Span::styled(value.as_str(), MedicalTheme::text()));
                }
                if is_selected {
                    spans.push(Span::styled("▌", MedicalTheme::cursor()));
                }
            }
            FieldInput::Choice { options, selected } => {
                let arrow_style = if is_selected {
                    MedicalTheme::cursor()
                } else {
                    MedicalTheme::text_muted()
                };
                spans.push(Span::styled("◀ ", arrow_style));
                match selected.and_then(|s| options.get(s)) {
                    Some((_, label)) => spans.push(Span::styled(*label, MedicalTheme::text())),
                    None => spans.push(Span::styled("Seleccione...", MedicalTheme::text_muted())),
                }
                spans.push(Span::styled(" ▶", arrow_style));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navegar ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Opción ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Calcular ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Ejemplo ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reiniciar ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Salir", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatientRecord;

    #[test]
    fn test_form_has_all_fields_in_order() {
        let state = PatientFormState::default();
        let order: Vec<PatientField> = state.fields.iter().map(|f| f.field).collect();
        assert_eq!(order, PatientField::ALL);
    }

    #[test]
    fn test_empty_form_yields_empty_draft() {
        assert!(PatientFormState::default().to_draft().is_empty());
    }

    #[test]
    fn test_numeric_input_filters_characters() {
        let mut state = PatientFormState::default();
        for c in "4a5.x".chars() {
            state.input_char(c);
        }
        let draft = state.to_draft();
        assert_eq!(draft.get(PatientField::Age), Some(&FieldValue::from("45.")));
    }

    #[test]
    fn test_choice_cycles_through_unselected() {
        let mut state = PatientFormState::default();
        state.next_field(); // gender
        state.next_option();
        assert_eq!(state.to_draft().get(PatientField::Gender), Some(&FieldValue::from("Male")));
        state.next_option();
        assert_eq!(state.to_draft().get(PatientField::Gender), Some(&FieldValue::from("Female")));
        state.next_option();
        assert_eq!(state.to_draft().get(PatientField::Gender), None);
        state.prev_option();
        assert_eq!(state.to_draft().get(PatientField::Gender), Some(&FieldValue::from("Female")));
    }

    #[test]
    fn test_typing_ignored_on_choice_field() {
        let mut state = PatientFormState::default();
        state.next_field();
        state.input_char('1');
        assert!(state.to_draft().is_empty());
    }

    #[test]
    fn test_sample_data_is_valid() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        let draft = state.to_draft();
        assert_eq!(draft.len(), 13);
        assert!(PatientRecord::try_from(&draft).is_ok());
    }

    #[test]
    fn test_from_draft_restores_values() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        let draft = state.to_draft();

        let restored = PatientFormState::from_draft(&draft);
        assert_eq!(restored.to_draft(), draft);
    }

    #[test]
    fn test_clear_sensitive_wipes_everything() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        state.selected_field = 4;
        state.clear_sensitive();
        assert!(state.to_draft().is_empty());
        assert_eq!(state.selected_field, 0);
    }
}
