use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilityKind {
    Water,
    Electricity,
}

impl UtilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electricity => "electricity",
        }
    }

    /// Capitalised name used in chart headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Electricity => "Electricity",
        }
    }
}

/// Normalized usage for one utility, one household and one day.
///
/// `active_score` and `corr_coef` use `0.0` to mean "no data". A household
/// that genuinely measured exactly zero is indistinguishable from a missing
/// document; classification maps both to `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageRecord {
    pub interval_series: Vec<f64>,
    pub norm_series: Vec<f64>,
    pub consumption_series: Vec<f64>,
    pub active_score: f64,
    pub corr_coef: f64,
    pub low_norm: f64,
    pub norm_score: f64,
    pub high_norm: f64,
}

/// Round to 3 decimal places from the exact binary value.
///
/// Decimal formatting rounds the exact expansion of `value`, so `0.2995`
/// (stored as 0.29949999...) becomes `0.299`, and large magnitudes never
/// overflow the way scaling by 1000 would.
pub fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaterDocument {
    usage: Vec<f64>,
    four_week_usage_norm: Vec<f64>,
    water_consumption: Vec<f64>,
    #[serde(flatten)]
    scores: ScoreFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ElectricityDocument {
    appliance_usage: Vec<f64>,
    four_week_active_score: Vec<f64>,
    power: Vec<f64>,
    #[serde(flatten)]
    scores: ScoreFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScoreFields {
    active_score: f64,
    correlation_coefficient: f64,
    low_norm: f64,
    norm_active_score: f64,
    high_norm: f64,
}

impl UsageRecord {
    /// Build a record from a stored document of the given utility.
    ///
    /// Absent fields fall back to empty series and `0.0`. Fields that are
    /// present with the wrong shape (including `null` scalars) are an error.
    pub fn from_document(
        kind: UtilityKind,
        doc: &serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let (interval_series, norm_series, consumption_series, scores) = match kind {
            UtilityKind::Water => {
                let d = WaterDocument::deserialize(doc)?;
                (d.usage, d.four_week_usage_norm, d.water_consumption, d.scores)
            }
            UtilityKind::Electricity => {
                let d = ElectricityDocument::deserialize(doc)?;
                (d.appliance_usage, d.four_week_active_score, d.power, d.scores)
            }
        };

        Ok(Self {
            interval_series,
            norm_series,
            consumption_series,
            active_score: round3(scores.active_score),
            corr_coef: round3(scores.correlation_coefficient),
            low_norm: round3(scores.low_norm),
            norm_score: round3(scores.norm_active_score),
            high_norm: round3(scores.high_norm),
        })
    }
}
