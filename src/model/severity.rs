use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity bucket for a CVSS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Inclusive upper bound of each bucket, checked in order.
const SEVERITY_BANDS: [(f64, Severity); 3] = [
    (3.0, Severity::Low),
    (5.0, Severity::Medium),
    (7.0, Severity::High),
];

impl Severity {
    /// Classifies a score. Scores above 7, negative, NaN or missing are critical.
    pub fn from_cvss(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 0.0 => SEVERITY_BANDS
                .iter()
                .find(|(upper, _)| s <= *upper)
                .map(|(_, severity)| *severity)
                .unwrap_or(Severity::Critical),
            _ => Severity::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_band() {
        assert_eq!(Severity::from_cvss(Some(0.0)), Severity::Low);
        assert_eq!(Severity::from_cvss(Some(1.5)), Severity::Low);
        assert_eq!(Severity::from_cvss(Some(3.0)), Severity::Low);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Severity::from_cvss(Some(3.0001)), Severity::Medium);
        assert_eq!(Severity::from_cvss(Some(5.0)), Severity::Medium);
        assert_eq!(Severity::from_cvss(Some(5.0001)), Severity::High);
        assert_eq!(Severity::from_cvss(Some(7.0)), Severity::High);
        assert_eq!(Severity::from_cvss(Some(7.0001)), Severity::Critical);
        assert_eq!(Severity::from_cvss(Some(10.0)), Severity::Critical);
    }

    #[test]
    fn test_unclassified_scores_are_critical() {
        assert_eq!(Severity::from_cvss(Some(-1.0)), Severity::Critical);
        assert_eq!(Severity::from_cvss(Some(11.0)), Severity::Critical);
        assert_eq!(Severity::from_cvss(Some(f64::NAN)), Severity::Critical);
        assert_eq!(Severity::from_cvss(None), Severity::Critical);
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }
}
