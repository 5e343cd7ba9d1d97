//! Validation outcome types.

use serde::Serialize;

/// Ordered, human-readable validation failures; displays as a comma-joined list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.join(", "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        Self(messages)
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of checking a draft without converting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let errors = errors.into_messages();
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_with_comma() {
        let errors = ValidationErrors::new(vec![
            "Edad es requerida".to_string(),
            "IMC es requerido".to_string(),
        ]);
        assert_eq!(errors.to_string(), "Edad es requerida, IMC es requerido");
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let json = serde_json::to_value(ValidationReport::valid()).expect("Should serialize");
        assert_eq!(json["isValid"], true);
        assert!(json["errors"].as_array().is_some_and(Vec::is_empty));
    }
}
