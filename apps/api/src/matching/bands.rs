//! Score banding: maps a similarity percentage onto a qualitative match label.
//!
//! Thresholds are configuration carried in `RankingPolicy`.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLabel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Moderate,
    Limited,
    Minimal,
}

impl MatchLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::Excellent => "Excellent Match",
            MatchLabel::VeryGood => "Very Good Match",
            MatchLabel::Good => "Good Match",
            MatchLabel::Fair => "Fair Match",
            MatchLabel::Moderate => "Moderate Match",
            MatchLabel::Limited => "Limited Match",
            MatchLabel::Minimal => "Minimal Match",
        }
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Lower bounds (inclusive) of each band, on the 0–100 percentage scale.
/// Each band runs up to the next bound (exclusive); `excellent` runs up to
/// `ceiling` inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBands {
    pub excellent: f64,
    pub very_good: f64,
    pub good: f64,
    pub fair: f64,
    pub moderate: f64,
    pub limited: f64,
    pub ceiling: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            excellent: 85.0,
            very_good: 75.0,
            good: 65.0,
            fair: 45.0,
            moderate: 30.0,
            limited: 20.0,
            ceiling: 100.0,
        }
    }
}

impl ScoreBands {
    pub fn label(&self, percentage: f64) -> MatchLabel {
        let p = percentage;
        if self.excellent <= p && p <= self.ceiling {
            MatchLabel::Excellent
        } else if self.very_good <= p && p < self.excellent {
            MatchLabel::VeryGood
        } else if self.good <= p && p < self.very_good {
            MatchLabel::Good
        } else if self.fair <= p && p < self.good {
            MatchLabel::Fair
        } else if self.moderate <= p && p < self.fair {
            MatchLabel::Moderate
        } else if self.limited <= p && p < self.moderate {
            MatchLabel::Limited
        } else {
            MatchLabel::Minimal
        }
    }
}

/// Cutoff and banding applied to every match response.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingPolicy {
    /// Matches with similarity at or below this value are dropped.
    pub min_similarity: f64,
    pub bands: ScoreBands,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            min_similarity: 0.0,
            bands: ScoreBands::default(),
        }
    }
}

impl RankingPolicy {
    /// Returns the rounded percentage and its label for a raw cosine similarity.
    pub fn grade(&self, similarity: f64) -> (f64, MatchLabel) {
        let accuracy = to_percentage(similarity);
        (accuracy, self.bands.label(accuracy))
    }
}

/// Scales a similarity by 100 and rounds to two decimals.
///
/// Rounding works on the exact decimal expansion of the scaled value, so
/// 44.994999... rounds down to 44.99 even though it prints as 44.995.
pub fn to_percentage(similarity: f64) -> f64 {
    let scaled = similarity * 100.0;
    format!("{scaled:.2}").parse().unwrap_or(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_inclusive_at_lower_edge() {
        let bands = ScoreBands::default();
        assert_eq!(bands.label(85.0), MatchLabel::Excellent);
        assert_eq!(bands.label(75.0), MatchLabel::VeryGood);
        assert_eq!(bands.label(65.0), MatchLabel::Good);
        assert_eq!(bands.label(45.0), MatchLabel::Fair);
        assert_eq!(bands.label(30.0), MatchLabel::Moderate);
        assert_eq!(bands.label(20.0), MatchLabel::Limited);
    }

    #[test]
    fn test_values_just_below_edges_fall_into_lower_band() {
        let bands = ScoreBands::default();
        assert_eq!(bands.label(84.99), MatchLabel::VeryGood);
        assert_eq!(bands.label(74.99), MatchLabel::Good);
        assert_eq!(bands.label(64.99), MatchLabel::Fair);
        assert_eq!(bands.label(44.99), MatchLabel::Moderate);
        assert_eq!(bands.label(29.99), MatchLabel::Limited);
        assert_eq!(bands.label(19.99), MatchLabel::Minimal);
    }

    #[test]
    fn test_out_of_range_is_minimal() {
        let bands = ScoreBands::default();
        assert_eq!(bands.label(100.0), MatchLabel::Excellent);
        assert_eq!(bands.label(100.01), MatchLabel::Minimal);
        assert_eq!(bands.label(-3.0), MatchLabel::Minimal);
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        assert_eq!(to_percentage(0.123456), 12.35);
        assert_eq!(to_percentage(0.5), 50.0);
        assert_eq!(to_percentage(0.84996), 85.0);
        assert_eq!(to_percentage(0.44994999999999996), 44.99);
    }

    #[test]
    fn test_grade_uses_rounded_percentage() {
        // 0.84996 rounds up to 85.00, which is Excellent rather than Very Good.
        let (accuracy, label) = RankingPolicy::default().grade(0.84996);
        assert_eq!(accuracy, 85.0);
        assert_eq!(label, MatchLabel::Excellent);
    }

    #[test]
    fn test_grade_does_not_round_up_across_band_edge() {
        let (accuracy, label) = RankingPolicy::default().grade(0.44994999999999996);
        assert_eq!(accuracy, 44.99);
        assert_eq!(label, MatchLabel::Moderate);
    }

    #[test]
    fn test_label_serializes_as_display_text() {
        let json = serde_json::to_string(&MatchLabel::VeryGood).unwrap();
        assert_eq!(json, "\"Very Good Match\"");
    }
}
