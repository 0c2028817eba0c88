//! Dashboard view assembly.
//!
//! Turns repository output into what the presentation layer draws: per-utility
//! classifications, the time axis, and chart-ready series for the selected
//! utility. Nothing here renders; payloads are plain serializable data.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};
use usage_client::domain::{
    ActivityLevel, ClassificationResult, Indicator, RegularityLevel, Status, UsageRecord,
    UtilityKind,
};

use crate::{
    classify::classify_record,
    repository::{format_calendar_date, parse_calendar_date, RepositoryError, UsageRepository},
};

/// Width of one series interval.
pub const INTERVAL_MINUTES: u32 = 15;
/// Number of intervals in a day; the time axis never has more ticks.
pub const MAX_TICKS: usize = 96;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityUsage {
    pub record: UsageRecord,
    pub classification: ClassificationResult,
}

impl UtilityUsage {
    fn new(record: UsageRecord) -> Self {
        let classification = classify_record(&record);
        Self {
            record,
            classification,
        }
    }
}

/// Records and classifications for both utilities of one household and day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSnapshot {
    pub date: String,
    pub home_id: String,
    pub water: UtilityUsage,
    pub electricity: UtilityUsage,
}

impl UsageSnapshot {
    pub fn utility(&self, kind: UtilityKind) -> &UtilityUsage {
        match kind {
            UtilityKind::Water => &self.water,
            UtilityKind::Electricity => &self.electricity,
        }
    }
}

/// Fetch both utilities for `date` (`YYYY-MM-DD`) and classify each.
pub async fn get_usage_and_classification(
    repo: &UsageRepository,
    date: &str,
    home_id: &str,
) -> Result<UsageSnapshot, RepositoryError> {
    let date = parse_calendar_date(date)?;
    let pair = repo.fetch(date, home_id).await?;

    let snapshot = UsageSnapshot {
        date: format_calendar_date(date)?,
        home_id: home_id.to_string(),
        water: UtilityUsage::new(pair.water),
        electricity: UtilityUsage::new(pair.electricity),
    };

    tracing::debug!(
        home_id,
        date = %snapshot.date,
        water_status = %snapshot.water.classification.status.level,
        electricity_status = %snapshot.electricity.classification.status.level,
        "classified usage"
    );

    Ok(snapshot)
}

/// `HH:MM` labels for `points` consecutive intervals starting at midnight,
/// capped at one day.
pub fn time_axis_labels(points: usize) -> Vec<String> {
    (0..points.min(MAX_TICKS))
        .map(|i| {
            let minutes = i as u32 * INTERVAL_MINUTES;
            format!("{:02}:{:02}", minutes / 60, minutes % 60)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStep {
    Previous,
    Next,
    #[default]
    Current,
}

/// The date shown when nothing has been picked yet: the day before `today`.
///
/// The HTTP layer passes the UTC calendar date as `today`, so near midnight
/// this can differ from the host's local "yesterday".
pub fn default_date(today: Date) -> Date {
    today.saturating_sub(Duration::days(1))
}

pub fn step_date(date: Date, step: DateStep) -> Date {
    match step {
        DateStep::Previous => date.saturating_sub(Duration::days(1)),
        DateStep::Next => date.saturating_add(Duration::days(1)),
        DateStep::Current => date,
    }
}

/// One bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub heading: String,
    pub title: String,
    pub y_axis_title: &'static str,
    pub y_range: [f64; 2],
    pub x_labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn new(
        heading: String,
        title: String,
        y_axis_title: &'static str,
        y_range: [f64; 2],
        values: &[f64],
    ) -> Self {
        Self {
            heading,
            title,
            y_axis_title,
            y_range,
            x_labels: time_axis_labels(values.len()),
            values: values.to_vec(),
        }
    }
}

/// A labelled indicator badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge<L> {
    pub title: &'static str,
    pub text: String,
    #[serde(flatten)]
    pub indicator: Indicator<L>,
}

/// Everything drawn for one selected utility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsagePanel {
    pub utility: UtilityKind,
    pub caption: String,
    pub status: Badge<Status>,
    pub activity: Badge<ActivityLevel>,
    pub regularity: Badge<RegularityLevel>,
    pub usage: ChartSeries,
    pub norm: ChartSeries,
    pub consumption: ChartSeries,
}

impl UsagePanel {
    pub fn build(snapshot: &UsageSnapshot, kind: UtilityKind) -> Self {
        let UtilityUsage {
            record: r,
            classification: c,
        } = snapshot.utility(kind);
        let name = kind.label();

        Self {
            utility: kind,
            caption: format!("{}     Date: {}", snapshot.home_id, snapshot.date),
            status: Badge {
                title: "Status",
                text: c.status.level.to_string(),
                indicator: c.status,
            },
            activity: Badge {
                title: "Activity Level",
                text: "AS".to_string(),
                indicator: c.activity,
            },
            regularity: Badge {
                title: "Regularity Level",
                text: "CC".to_string(),
                indicator: c.regularity,
            },
            usage: ChartSeries::new(
                format!("{name} Usage"),
                format!("Active Score: {} | Corr Coef: {}", r.active_score, r.corr_coef),
                "Usage",
                [0.0, 1.0],
                &r.interval_series,
            ),
            norm: ChartSeries::new(
                format!("{name} Usage Norm"),
                format!(
                    "Low: {} | Norm: {} | High: {}",
                    r.low_norm, r.norm_score, r.high_norm
                ),
                "Usage Norm",
                [0.0, 100.0],
                &r.norm_series,
            ),
            consumption: ChartSeries::new(
                format!("{name} consumption"),
                format!("{name} consumption for Date: {}", snapshot.date),
                "Consumption",
                [0.0, 6.0],
                &r.consumption_series,
            ),
        }
    }
}
