//! Patient attribute types for liver cancer risk prediction.
//!
//! Input moves through two stages:
//! - [`PatientDraft`]: raw, possibly incomplete values as entered in the form
//! - [`PatientRecord`]: the complete, typed record the prediction service accepts
//!
//! The only path from one to the other is `PatientRecord::try_from(&draft)`,
//! which validates every field and coerces string-typed numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::ValidationErrors;

/// A closed set of wire values with a display label.
pub trait Categorical: Sized + Copy + 'static {
    /// All variants, in the order the form presents them.
    const VARIANTS: &'static [Self];

    /// Value as transmitted to the prediction service.
    fn wire_name(self) -> &'static str;

    /// Human-readable label.
    fn label(self) -> &'static str;

    /// Parse a wire value, ignoring surrounding whitespace.
    fn from_wire(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.wire_name() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Categorical for Gender {
    const VARIANTS: &'static [Self] = &[Self::Male, Self::Female];

    fn wire_name(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Male => "Masculino",
            Self::Female => "Femenino",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlcoholConsumption {
    Never,
    Occasional,
    Regular,
    Heavy,
}

impl Categorical for AlcoholConsumption {
    const VARIANTS: &'static [Self] = &[Self::Never, Self::Occasional, Self::Regular, Self::Heavy];

    fn wire_name(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Occasional => "Occasional",
            Self::Regular => "Regular",
            Self::Heavy => "Heavy",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Never => "Nunca",
            Self::Occasional => "Ocasional",
            Self::Regular => "Regular",
            Self::Heavy => "Excesivo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl Categorical for SmokingStatus {
    const VARIANTS: &'static [Self] = &[Self::Never, Self::Former, Self::Current];

    fn wire_name(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Former => "Former",
            Self::Current => "Current",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Never => "Nunca",
            Self::Former => "Exfumador",
            Self::Current => "Fumador actual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl Categorical for ActivityLevel {
    const VARIANTS: &'static [Self] = &[Self::Low, Self::Moderate, Self::High];

    fn wire_name(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Low => "Baja",
            Self::Moderate => "Moderada",
            Self::High => "Alta",
        }
    }
}

/// Binary clinical indicator, transmitted as `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Flag {
    No,
    Yes,
}

impl From<Flag> for u8 {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::No => 0,
            Flag::Yes => 1,
        }
    }
}

impl TryFrom<u8> for Flag {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::No),
            1 => Ok(Self::Yes),
            other => Err(format!("flag must be 0 or 1, got {other}")),
        }
    }
}

impl Categorical for Flag {
    const VARIANTS: &'static [Self] = &[Self::No, Self::Yes];

    fn wire_name(self) -> &'static str {
        match self {
            Self::No => "0",
            Self::Yes => "1",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Yes => "Sí",
        }
    }
}

/// The 13 attributes, in the order they are validated and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientField {
    Age,
    Gender,
    Bmi,
    AlcoholConsumption,
    SmokingStatus,
    HepatitisB,
    HepatitisC,
    LiverFunctionScore,
    AlphaFetoproteinLevel,
    CirrhosisHistory,
    FamilyHistoryCancer,
    PhysicalActivityLevel,
    Diabetes,
}

impl PatientField {
    pub const ALL: [Self; 13] = [
        Self::Age,
        Self::Gender,
        Self::Bmi,
        Self::AlcoholConsumption,
        Self::SmokingStatus,
        Self::HepatitisB,
        Self::HepatitisC,
        Self::LiverFunctionScore,
        Self::AlphaFetoproteinLevel,
        Self::CirrhosisHistory,
        Self::FamilyHistoryCancer,
        Self::PhysicalActivityLevel,
        Self::Diabetes,
    ];

    /// JSON key used on the wire.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Bmi => "bmi",
            Self::AlcoholConsumption => "alcohol_consumption",
            Self::SmokingStatus => "smoking_status",
            Self::HepatitisB => "hepatitis_b",
            Self::HepatitisC => "hepatitis_c",
            Self::LiverFunctionScore => "liver_function_score",
            Self::AlphaFetoproteinLevel => "alpha_fetoprotein_level",
            Self::CirrhosisHistory => "cirrhosis_history",
            Self::FamilyHistoryCancer => "family_history_cancer",
            Self::PhysicalActivityLevel => "physical_activity_level",
            Self::Diabetes => "diabetes",
        }
    }

    /// Form label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Edad (años)",
            Self::Gender => "Género",
            Self::Bmi => "IMC",
            Self::AlcoholConsumption => "Consumo de alcohol",
            Self::SmokingStatus => "Estado de fumador",
            Self::HepatitisB => "Hepatitis B",
            Self::HepatitisC => "Hepatitis C",
            Self::LiverFunctionScore => "Puntaje función hepática",
            Self::AlphaFetoproteinLevel => "Nivel alfa-fetoproteína",
            Self::CirrhosisHistory => "Historial de cirrosis",
            Self::FamilyHistoryCancer => "Historial familiar de cáncer",
            Self::PhysicalActivityLevel => "Actividad física",
            Self::Diabetes => "Diabetes",
        }
    }

    /// Reported when the value is absent, unparseable or out of range.
    #[must_use]
    pub fn required_message(self) -> &'static str {
        match self {
            Self::Age => "Edad es requerida",
            Self::Gender => "Género es requerido",
            Self::Bmi => "IMC es requerido",
            Self::AlcoholConsumption => "Consumo de alcohol es requerido",
            Self::SmokingStatus => "Estado de fumador es requerido",
            Self::HepatitisB => "Hepatitis B es requerido",
            Self::HepatitisC => "Hepatitis C es requerido",
            Self::LiverFunctionScore => "Puntaje hepático es requerido",
            Self::AlphaFetoproteinLevel => "Nivel Alfa-fetoproteína es requerido",
            Self::CirrhosisHistory => "Historial de cirrosis es requerido",
            Self::FamilyHistoryCancer => "Historial familiar es requerido",
            Self::PhysicalActivityLevel => "Actividad física es requerida",
            Self::Diabetes => "Diabetes es requerido",
        }
    }

    /// Reported when a categorical value is outside its enumeration.
    #[must_use]
    pub fn invalid_message(self) -> &'static str {
        match self {
            Self::Gender => "Género no es válido",
            Self::AlcoholConsumption => "Consumo de alcohol no es válido",
            Self::SmokingStatus => "Estado de fumador no es válido",
            Self::HepatitisB => "Hepatitis B no es válido",
            Self::HepatitisC => "Hepatitis C no es válido",
            Self::CirrhosisHistory => "Historial de cirrosis no es válido",
            Self::FamilyHistoryCancer => "Historial familiar no es válido",
            Self::PhysicalActivityLevel => "Actividad física no es válida",
            Self::Diabetes => "Diabetes no es válido",
            // Numeric fields only ever report the required message.
            Self::Age | Self::Bmi | Self::LiverFunctionScore | Self::AlphaFetoproteinLevel => {
                self.required_message()
            }
        }
    }
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A raw input value: either already numeric or text as typed in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Blank text counts as no value at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// Numeric interpretation; `None` for blank, unparseable or non-finite input.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Text interpretation; numbers have no text form here.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Patient attributes with any subset of the 13 fields present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol_consumption: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking_status: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hepatitis_b: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hepatitis_c: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liver_function_score: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_fetoprotein_level: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cirrhosis_history: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_history_cancer: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_activity_level: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diabetes: Option<FieldValue>,
}

impl PatientDraft {
    /// Current value of a field, if set.
    #[must_use]
    pub fn get(&self, field: PatientField) -> Option<&FieldValue> {
        self.slot(field).as_ref()
    }

    /// Set (or replace) a single field.
    pub fn set(&mut self, field: PatientField, value: impl Into<FieldValue>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: PatientField, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Copy every field present in `update` over this draft; absent fields are kept.
    pub fn merge(&mut self, mut update: PatientDraft) {
        for field in PatientField::ALL {
            if let Some(value) = update.slot_mut(field).take() {
                *self.slot_mut(field) = Some(value);
            }
        }
    }

    /// Number of fields currently set.
    #[must_use]
    pub fn len(&self) -> usize {
        PatientField::ALL
            .iter()
            .filter(|f| self.slot(**f).is_some())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, field: PatientField) -> &Option<FieldValue> {
        match field {
            PatientField::Age => &self.age,
            PatientField::Gender => &self.gender,
            PatientField::Bmi => &self.bmi,
            PatientField::AlcoholConsumption => &self.alcohol_consumption,
            PatientField::SmokingStatus => &self.smoking_status,
            PatientField::HepatitisB => &self.hepatitis_b,
            PatientField::HepatitisC => &self.hepatitis_c,
            PatientField::LiverFunctionScore => &self.liver_function_score,
            PatientField::AlphaFetoproteinLevel => &self.alpha_fetoprotein_level,
            PatientField::CirrhosisHistory => &self.cirrhosis_history,
            PatientField::FamilyHistoryCancer => &self.family_history_cancer,
            PatientField::PhysicalActivityLevel => &self.physical_activity_level,
            PatientField::Diabetes => &self.diabetes,
        }
    }

    fn slot_mut(&mut self, field: PatientField) -> &mut Option<FieldValue> {
        match field {
            PatientField::Age => &mut self.age,
            PatientField::Gender => &mut self.gender,
            PatientField::Bmi => &mut self.bmi,
            PatientField::AlcoholConsumption => &mut self.alcohol_consumption,
            PatientField::SmokingStatus => &mut self.smoking_status,
            PatientField::HepatitisB => &mut self.hepatitis_b,
            PatientField::HepatitisC => &mut self.hepatitis_c,
            PatientField::LiverFunctionScore => &mut self.liver_function_score,
            PatientField::AlphaFetoproteinLevel => &mut self.alpha_fetoprotein_level,
            PatientField::CirrhosisHistory => &mut self.cirrhosis_history,
            PatientField::FamilyHistoryCancer => &mut self.family_history_cancer,
            PatientField::PhysicalActivityLevel => &mut self.physical_activity_level,
            PatientField::Diabetes => &mut self.diabetes,
        }
    }
}

/// Complete, type-normalized patient record as sent to the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years (0-120)
    pub age: f64,
    pub gender: Gender,
    /// Body mass index (non-negative)
    pub bmi: f64,
    pub alcohol_consumption: AlcoholConsumption,
    pub smoking_status: SmokingStatus,
    pub hepatitis_b: Flag,
    pub hepatitis_c: Flag,
    /// Continuous liver function score
    pub liver_function_score: f64,
    /// Continuous alpha-fetoprotein level
    pub alpha_fetoprotein_level: f64,
    pub cirrhosis_history: Flag,
    pub family_history_cancer: Flag,
    pub physical_activity_level: ActivityLevel,
    pub diabetes: Flag,
}

impl TryFrom<&PatientDraft> for PatientRecord {
    type Error = ValidationErrors;

    /// Validate every field (no short-circuit) and build the typed record.
    ///
    /// # Errors
    /// Returns one message per missing or invalid field, in [`PatientField::ALL`] order.
    fn try_from(draft: &PatientDraft) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let age = numeric(draft, PatientField::Age, |v| (0.0..=120.0).contains(&v), &mut errors);
        let gender = categorical::<Gender>(draft, PatientField::Gender, &mut errors);
        let bmi = numeric(draft, PatientField::Bmi, |v| v >= 0.0, &mut errors);
        let alcohol_consumption =
            categorical::<AlcoholConsumption>(draft, PatientField::AlcoholConsumption, &mut errors);
        let smoking_status =
            categorical::<SmokingStatus>(draft, PatientField::SmokingStatus, &mut errors);
        let hepatitis_b = flag(draft, PatientField::HepatitisB, &mut errors);
        let hepatitis_c = flag(draft, PatientField::HepatitisC, &mut errors);
        let liver_function_score =
            numeric(draft, PatientField::LiverFunctionScore, |_| true, &mut errors);
        let alpha_fetoprotein_level =
            numeric(draft, PatientField::AlphaFetoproteinLevel, |_| true, &mut errors);
        let cirrhosis_history = flag(draft, PatientField::CirrhosisHistory, &mut errors);
        let family_history_cancer = flag(draft, PatientField::FamilyHistoryCancer, &mut errors);
        let physical_activity_level =
            categorical::<ActivityLevel>(draft, PatientField::PhysicalActivityLevel, &mut errors);
        let diabetes = flag(draft, PatientField::Diabetes, &mut errors);

        match (
            age,
            gender,
            bmi,
            alcohol_consumption,
            smoking_status,
            hepatitis_b,
            hepatitis_c,
            liver_function_score,
            alpha_fetoprotein_level,
            cirrhosis_history,
            family_history_cancer,
            physical_activity_level,
            diabetes,
        ) {
            (
                Some(age),
                Some(gender),
                Some(bmi),
                Some(alcohol_consumption),
                Some(smoking_status),
                Some(hepatitis_b),
                Some(hepatitis_c),
                Some(liver_function_score),
                Some(alpha_fetoprotein_level),
                Some(cirrhosis_history),
                Some(family_history_cancer),
                Some(physical_activity_level),
                Some(diabetes),
            ) => Ok(Self {
                age,
                gender,
                bmi,
                alcohol_consumption,
                smoking_status,
                hepatitis_b,
                hepatitis_c,
                liver_function_score,
                alpha_fetoprotein_level,
                cirrhosis_history,
                family_history_cancer,
                physical_activity_level,
                diabetes,
            }),
            _ => Err(ValidationErrors::new(errors)),
        }
    }
}

fn present(draft: &PatientDraft, field: PatientField) -> Option<&FieldValue> {
    draft.get(field).filter(|v| !v.is_blank())
}

fn numeric(
    draft: &PatientDraft,
    field: PatientField,
    in_range: impl Fn(f64) -> bool,
    errors: &mut Vec<String>,
) -> Option<f64> {
    let value = present(draft, field)
        .and_then(FieldValue::as_number)
        .filter(|v| in_range(*v));
    if value.is_none() {
        errors.push(field.required_message().to_string());
    }
    value
}

fn categorical<C: Categorical>(
    draft: &PatientDraft,
    field: PatientField,
    errors: &mut Vec<String>,
) -> Option<C> {
    let Some(raw) = present(draft, field) else {
        errors.push(field.required_message().to_string());
        return None;
    };
    let value = raw.as_text().and_then(C::from_wire);
    if value.is_none() {
        errors.push(field.invalid_message().to_string());
    }
    value
}

fn flag(draft: &PatientDraft, field: PatientField, errors: &mut Vec<String>) -> Option<Flag> {
    let Some(raw) = present(draft, field) else {
        errors.push(field.required_message().to_string());
        return None;
    };
    let value = match raw.as_number() {
        Some(n) if n == 0.0 => Some(Flag::No),
        Some(n) if n == 1.0 => Some(Flag::Yes),
        _ => None,
    };
    if value.is_none() {
        errors.push(field.invalid_message().to_string());
    }
    value
}
