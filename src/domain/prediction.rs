//! Prediction result types.
//!
//! The prediction service returns a bare percentage and a clinical message;
//! this module turns that into a tiered result with fixed recommendations.

use std::fmt;

use serde::{Deserialize, Serialize};

const LOW_RECOMMENDATIONS: &[&str] = &[
    "Mantenga una dieta equilibrada rica en frutas y verduras",
    "Realice ejercicio regularmente (150 minutos semanales)",
    "Realice chequeos médicos anuales",
];

const MODERATE_RECOMMENDATIONS: &[&str] = &[
    "Consulte con su médico sobre estrategias de prevención",
    "Realice exámenes de detección según su edad y factores de riesgo",
    "Mejore sus hábitos de vida: ejercicio, alimentación, evite tabaco y alcohol",
];

const HIGH_RECOMMENDATIONS: &[&str] = &[
    "Programe una consulta médica urgente",
    "Realice exámenes de detección completos",
    "Implemente cambios significativos en estilo de vida",
];

const VERY_HIGH_RECOMMENDATIONS: &[&str] = &[
    "URGENTE: Consulte con un especialista en las próximas 48 horas",
    "Realice exámenes diagnósticos completos de inmediato",
];

/// Risk tier derived from the predicted percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    /// Below 30%
    Low,
    /// 30% up to (not including) 50%
    Moderate,
    /// 50% up to (not including) 70%
    High,
    /// 70% and above
    VeryHigh,
}

impl RiskLevel {
    /// Classify a raw (unrounded) percentage on the 0-100 scale.
    ///
    /// Values that do not compare below a threshold (including NaN) land in
    /// [`RiskLevel::VeryHigh`].
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            Self::Low
        } else if score < 50.0 {
            Self::Moderate
        } else if score < 70.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Fixed recommendations for this tier.
    #[must_use]
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::Low => LOW_RECOMMENDATIONS,
            Self::Moderate => MODERATE_RECOMMENDATIONS,
            Self::High => HIGH_RECOMMENDATIONS,
            Self::VeryHigh => VERY_HIGH_RECOMMENDATIONS,
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Riesgo bajo",
            Self::Moderate => "Riesgo moderado",
            Self::High => "Riesgo alto",
            Self::VeryHigh => "Riesgo muy alto",
        }
    }

    /// Wire tag (`low`, `moderate`, `high`, `very-high`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering-ready outcome of one prediction round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Percentage rounded to the nearest integer (halves round up)
    pub risk_percentage: i32,

    pub risk_level: RiskLevel,

    /// Passed through verbatim from the prediction service
    pub clinical_message: String,

    pub recommendations: Vec<String>,
}

impl PredictionResult {
    /// Build a result from the service's raw score and message.
    #[must_use]
    pub fn from_score(score: f64, clinical_message: impl Into<String>) -> Self {
        let risk_level = RiskLevel::from_score(score);
        Self {
            risk_percentage: (score + 0.5).floor() as i32,
            risk_level,
            clinical_message: clinical_message.into(),
            recommendations: risk_level
                .recommendations()
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_ladder() {
        let cases = [
            (0.0, RiskLevel::Low),
            (29.9, RiskLevel::Low),
            (30.0, RiskLevel::Moderate),
            (49.9, RiskLevel::Moderate),
            (50.0, RiskLevel::High),
            (69.9, RiskLevel::High),
            (70.0, RiskLevel::VeryHigh),
            (100.0, RiskLevel::VeryHigh),
        ];
        for (score, expected) in cases {
            assert_eq!(RiskLevel::from_score(score), expected, "score {score}");
        }
    }

    #[test]
    fn test_recommendation_counts() {
        assert_eq!(RiskLevel::Low.recommendations().len(), 3);
        assert_eq!(RiskLevel::Moderate.recommendations().len(), 3);
        assert_eq!(RiskLevel::High.recommendations().len(), 3);
        assert_eq!(RiskLevel::VeryHigh.recommendations().len(), 2);
    }

    #[test]
    fn test_result_from_score() {
        let result = PredictionResult::from_score(82.4, "Consulte urgentemente");
        assert_eq!(result.risk_percentage, 82);
        assert_eq!(result.risk_level, RiskLevel::VeryHigh);
        assert_eq!(result.clinical_message, "Consulte urgentemente");
        assert_eq!(result.recommendations, VERY_HIGH_RECOMMENDATIONS);
    }

    #[test]
    fn test_rounding_halves_up_but_tier_uses_raw_score() {
        let result = PredictionResult::from_score(29.5, "");
        assert_eq!(result.risk_percentage, 30);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(PredictionResult::from_score(55.0, "Control"))
            .expect("Should serialize");
        assert_eq!(json["riskPercentage"], 55);
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["clinicalMessage"], "Control");
        assert_eq!(
            serde_json::to_value(RiskLevel::VeryHigh).expect("Should serialize"),
            "very-high"
        );
    }
}
