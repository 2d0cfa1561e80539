//! Explanation Generator
//!
//! Maps an anomalous reading to one human-readable reason. Rules are checked
//! in table order and the first match wins. Thresholds are on the normalized
//! [0, 1] scale produced by preprocessing. A null value never matches.

use serde::Serialize;

use crate::schema::{FEATURE_COUNT, HUMIDITY, SOIL_MOISTURE_1, SOIL_MOISTURE_2, TEMPERATURE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Above,
    Below,
}

/// One threshold rule
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExplanationRule {
    pub feature: usize,
    pub comparison: Comparison,
    pub threshold: f64,
    pub message: &'static str,
}

impl ExplanationRule {
    pub fn matches(&self, features: &[Option<f64>; FEATURE_COUNT]) -> bool {
        match (features[self.feature], self.comparison) {
            (Some(v), Comparison::Above) => v > self.threshold,
            (Some(v), Comparison::Below) => v < self.threshold,
            (None, _) => false,
        }
    }
}

/// Rules in priority order
pub static RULES: [ExplanationRule; 4] = [
    ExplanationRule {
        feature: SOIL_MOISTURE_1,
        comparison: Comparison::Above,
        threshold: 0.9,
        message: "Sudden spike in soil moisture detected.",
    },
    ExplanationRule {
        feature: SOIL_MOISTURE_2,
        comparison: Comparison::Below,
        threshold: 0.1,
        message: "Soil moisture critically low.",
    },
    ExplanationRule {
        feature: TEMPERATURE,
        comparison: Comparison::Above,
        threshold: 0.8,
        message: "High temperature detected.",
    },
    ExplanationRule {
        feature: HUMIDITY,
        comparison: Comparison::Below,
        threshold: 0.2,
        message: "Humidity levels too low.",
    },
];

pub const FALLBACK_EXPLANATION: &str = "Unexpected sensor behavior detected.";

/// Explain a single reading
pub fn explain(features: &[Option<f64>; FEATURE_COUNT]) -> &'static str {
    RULES
        .iter()
        .find(|rule| rule.matches(features))
        .map(|rule| rule.message)
        .unwrap_or(FALLBACK_EXPLANATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(humidity: f64, temperature: f64, soil_1: f64, soil_2: f64) -> [Option<f64>; FEATURE_COUNT] {
        [Some(humidity), Some(temperature), Some(soil_1), Some(soil_2)]
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(explain(&row(0.5, 0.5, 0.95, 0.5)), "Sudden spike in soil moisture detected.");
        assert_eq!(explain(&row(0.5, 0.5, 0.5, 0.05)), "Soil moisture critically low.");
        assert_eq!(explain(&row(0.5, 0.85, 0.5, 0.5)), "High temperature detected.");
        assert_eq!(explain(&row(0.1, 0.5, 0.5, 0.5)), "Humidity levels too low.");
    }

    #[test]
    fn test_priority_order() {
        // Soil spike and high temperature: soil spike wins
        assert_eq!(explain(&row(0.5, 0.85, 0.95, 0.5)), "Sudden spike in soil moisture detected.");
        // Every rule matches: first one wins
        assert_eq!(explain(&row(0.0, 1.0, 1.0, 0.0)), "Sudden spike in soil moisture detected.");
        // Low soil 2 beats high temperature and low humidity
        assert_eq!(explain(&row(0.1, 0.9, 0.5, 0.0)), "Soil moisture critically low.");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(explain(&row(0.2, 0.8, 0.8, 0.2)), FALLBACK_EXPLANATION);
        assert_eq!(explain(&row(0.5, 0.5, 0.5, 0.5)), FALLBACK_EXPLANATION);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(explain(&row(0.2, 0.8, 0.9, 0.1)), FALLBACK_EXPLANATION);
    }

    #[test]
    fn test_null_never_matches() {
        let features = [None, None, None, None];
        assert_eq!(explain(&features), FALLBACK_EXPLANATION);

        let features = [Some(0.5), Some(0.9), None, None];
        assert_eq!(explain(&features), "High temperature detected.");
    }
}
