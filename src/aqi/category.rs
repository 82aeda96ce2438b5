//! AQI severity bands

use serde::{Deserialize, Serialize};

/// Upper bounds (inclusive) of every band except the last
pub const BAND_UPPER_BOUNDS: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 300.0];

/// Severity category of an AQI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Unhealthy_Sensitive")]
    UnhealthySensitive,
    #[serde(rename = "Unhealthy")]
    Unhealthy,
    #[serde(rename = "Very_Unhealthy")]
    VeryUnhealthy,
    #[serde(rename = "Hazardous")]
    Hazardous,
}

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthySensitive,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    /// Band for an AQI value; NaN lands in the most severe band
    pub fn from_aqi(aqi: f64) -> Self {
        Self::ALL[Self::band_index(aqi)]
    }

    /// Bucket index `0..=5` shared with the comparison metrics
    pub fn band_index(aqi: f64) -> usize {
        BAND_UPPER_BOUNDS
            .iter()
            .position(|&upper| aqi <= upper)
            .unwrap_or(BAND_UPPER_BOUNDS.len())
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Label, which doubles as the output term name
    pub fn as_str(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy_Sensitive",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very_Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges_are_inclusive() {
        assert_eq!(AqiCategory::from_aqi(0.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50.5), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(150.0), AqiCategory::UnhealthySensitive);
        assert_eq!(AqiCategory::from_aqi(200.0), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(300.0), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(300.1), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::from_aqi(f64::NAN), AqiCategory::Hazardous);
    }

    #[test]
    fn test_index_matches_band() {
        for (i, category) in AqiCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(AqiCategory::band_index(120.0), 2);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AqiCategory::UnhealthySensitive.to_string(), "Unhealthy_Sensitive");
        assert_eq!(
            AqiCategory::from_str("very_unhealthy"),
            Some(AqiCategory::VeryUnhealthy)
        );
        assert_eq!(AqiCategory::from_str("Excellent"), None);
        assert_eq!(
            serde_json::to_string(&AqiCategory::Hazardous).unwrap(),
            "\"Hazardous\""
        );
    }
}
