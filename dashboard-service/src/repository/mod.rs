use std::{sync::Arc, time::Instant};

use time::{format_description::BorrowedFormatItem, macros::format_description, Date};
use usage_client::{
    db::UsageCollection,
    domain::{UsageRecord, UtilityKind},
};

/// Household id the reference electricity collection is always queried with.
///
/// The caller's household is ignored for this lookup. Whether that is a
/// single-tenant shortcut or a latent bug is unresolved, so it is kept as is.
pub const REFERENCE_HOME_ID: &str = "home2127";

/// Calendar format accepted from callers; also the water collection's key format.
const CALENDAR_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
/// Date key format of the electricity collection.
const SLASHED_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]/[month]/[day]");

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("malformed date: {0}")]
    MalformedDate(String),
    #[error("Fetch failed")]
    FetchFailed(String),
}

/// The three collection handles the repository reads from.
#[derive(Clone)]
pub struct UsageCollections {
    pub water: Arc<dyn UsageCollection>,
    pub electricity: Arc<dyn UsageCollection>,
    pub electricity_reference: Arc<dyn UsageCollection>,
}

/// Normalized records for one household and day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsagePair {
    pub water: UsageRecord,
    pub electricity: UsageRecord,
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(input: &str) -> Result<Date, RepositoryError> {
    Date::parse(input, CALENDAR_DATE)
        .map_err(|e| RepositoryError::MalformedDate(format!("'{input}': {e}")))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_calendar_date(date: Date) -> Result<String, RepositoryError> {
    date.format(CALENDAR_DATE)
        .map_err(|e| RepositoryError::MalformedDate(format!("{date}: {e}")))
}

/// Date key used by the collection holding `kind` documents.
pub fn date_key(kind: UtilityKind, date: Date) -> Result<String, RepositoryError> {
    let format = match kind {
        UtilityKind::Water => CALENDAR_DATE,
        UtilityKind::Electricity => SLASHED_DATE,
    };
    date.format(format)
        .map_err(|e| RepositoryError::MalformedDate(format!("{date}: {e}")))
}

/// Point-lookup access to per-household usage documents.
pub struct UsageRepository {
    collections: UsageCollections,
}

impl UsageRepository {
    pub fn new(collections: UsageCollections) -> Self {
        Self { collections }
    }

    /// Like [`UsageRepository::fetch`], starting from a `YYYY-MM-DD` string.
    pub async fn fetch_str(&self, date: &str, home_id: &str) -> Result<UsagePair, RepositoryError> {
        let date = parse_calendar_date(date)?;
        self.fetch(date, home_id).await
    }

    /// Read and normalize the water and electricity records for one day.
    ///
    /// A missing document becomes the zeroed record for that utility only. Any
    /// store or decoding error fails the whole pair.
    pub async fn fetch(&self, date: Date, home_id: &str) -> Result<UsagePair, RepositoryError> {
        metrics::counter!("usage_fetch_requests_total").increment(1);
        let started = Instant::now();

        let water_date = date_key(UtilityKind::Water, date)?;
        let electricity_date = date_key(UtilityKind::Electricity, date)?;

        let res = self.read_pair(&water_date, &electricity_date, home_id).await;
        metrics::histogram!("usage_fetch_latency_seconds").record(started.elapsed().as_secs_f64());

        match res {
            Ok(pair) => Ok(pair),
            Err(e) => {
                tracing::error!(error = %e, home_id, date = %water_date, "error fetching usage data");
                metrics::counter!("usage_fetch_failures_total").increment(1);
                Err(RepositoryError::FetchFailed(e.to_string()))
            }
        }
    }

    async fn read_pair(
        &self,
        water_date: &str,
        electricity_date: &str,
        home_id: &str,
    ) -> anyhow::Result<UsagePair> {
        let c = &self.collections;
        let (water_doc, electricity_doc, reference_doc) = tokio::try_join!(
            c.water.find_one(water_date, home_id),
            c.electricity.find_one(electricity_date, home_id),
            c.electricity_reference.find_one(water_date, REFERENCE_HOME_ID),
        )?;

        tracing::debug!(
            collection = c.electricity_reference.name(),
            found = reference_doc.is_some(),
            "reference electricity lookup"
        );

        Ok(UsagePair {
            water: normalize(UtilityKind::Water, c.water.name(), water_doc)?,
            electricity: normalize(UtilityKind::Electricity, c.electricity.name(), electricity_doc)?,
        })
    }
}

fn normalize(
    kind: UtilityKind,
    collection: &str,
    doc: Option<serde_json::Value>,
) -> anyhow::Result<UsageRecord> {
    match doc {
        Some(doc) => UsageRecord::from_document(kind, &doc)
            .map_err(|e| anyhow::anyhow!("malformed document in {collection}: {e}")),
        None => {
            metrics::counter!("usage_documents_missing_total", "utility" => kind.as_str()).increment(1);
            Ok(UsageRecord::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;
    use usage_client::db::MemoryCollection;

    struct Fixture {
        water: Arc<MemoryCollection>,
        electricity: Arc<MemoryCollection>,
        reference: Arc<MemoryCollection>,
        repo: UsageRepository,
    }

    fn fixture() -> Fixture {
        let water = Arc::new(MemoryCollection::new("water_usage"));
        let electricity = Arc::new(MemoryCollection::new("electricity_usage"));
        let reference = Arc::new(MemoryCollection::new("electr_usage"));
        let repo = UsageRepository::new(UsageCollections {
            water: water.clone(),
            electricity: electricity.clone(),
            electricity_reference: reference.clone(),
        });
        Fixture {
            water,
            electricity,
            reference,
            repo,
        }
    }

    #[test]
    fn date_keys_differ_per_utility() {
        let d = date!(2024 - 07 - 03);
        assert_eq!(date_key(UtilityKind::Water, d).unwrap(), "2024-07-03");
        assert_eq!(date_key(UtilityKind::Electricity, d).unwrap(), "2024/07/03");
    }

    #[test]
    fn calendar_date_parsing_is_strict() {
        assert_eq!(parse_calendar_date("2024-07-28").unwrap(), date!(2024 - 07 - 28));
        for bad in [
            "2024/07/28",
            "28-07-2024",
            "2024-13-01",
            "2024-02-30",
            "yesterday",
            "",
            " 2024-07-28",
            "2024-07-28 ",
            "2024-07-28\n",
        ] {
            assert!(
                matches!(parse_calendar_date(bad), Err(RepositoryError::MalformedDate(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn missing_documents_yield_zeroed_records() {
        let f = fixture();
        let pair = f.repo.fetch(date!(2024 - 07 - 28), "Home_2127").await.unwrap();
        assert_eq!(pair, UsagePair::default());
    }

    #[tokio::test]
    async fn one_missing_utility_does_not_affect_the_other() {
        let f = fixture();
        f.water.insert(
            "2024-07-28",
            "Home_2127",
            json!({ "usage": [0.5, 0.25], "active_score": 0.61234, "correlation_coefficient": 0.7 }),
        );

        let pair = f.repo.fetch(date!(2024 - 07 - 28), "Home_2127").await.unwrap();
        assert_eq!(pair.water.interval_series, vec![0.5, 0.25]);
        assert_eq!(pair.water.active_score, 0.612);
        assert_eq!(pair.water.corr_coef, 0.7);
        assert_eq!(pair.electricity, UsageRecord::default());
    }

    #[tokio::test]
    async fn lookups_use_per_collection_date_formats_and_reference_household() {
        let f = fixture();
        f.electricity.insert(
            "2024/07/28",
            "Home_9000",
            json!({ "appliance_usage": [1.0], "power": [120.0], "active_score": 0.9 }),
        );

        let pair = f.repo.fetch(date!(2024 - 07 - 28), "Home_9000").await.unwrap();
        assert_eq!(pair.electricity.interval_series, vec![1.0]);
        assert_eq!(pair.electricity.consumption_series, vec![120.0]);

        assert_eq!(
            f.water.lookups(),
            vec![("2024-07-28".to_string(), "Home_9000".to_string())]
        );
        assert_eq!(
            f.electricity.lookups(),
            vec![("2024/07/28".to_string(), "Home_9000".to_string())]
        );
        assert_eq!(
            f.reference.lookups(),
            vec![("2024-07-28".to_string(), REFERENCE_HOME_ID.to_string())]
        );
    }

    #[tokio::test]
    async fn store_failure_fails_the_whole_pair() {
        let f = fixture();
        f.water.insert("2024-07-28", "Home_2127", json!({ "active_score": 0.4 }));
        f.electricity.fail_with("connection reset");

        let res = f.repo.fetch(date!(2024 - 07 - 28), "Home_2127").await;
        assert!(matches!(res, Err(RepositoryError::FetchFailed(msg)) if msg.contains("connection reset")));
    }

    #[tokio::test]
    async fn reference_collection_failure_also_fails_the_pair() {
        let f = fixture();
        f.reference.fail_with("timeout");

        let res = f.repo.fetch(date!(2024 - 07 - 28), "Home_2127").await;
        assert!(matches!(res, Err(RepositoryError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn malformed_document_is_a_fetch_failure() {
        let f = fixture();
        f.water.insert("2024-07-28", "Home_2127", json!({ "usage": "broken" }));
        f.electricity.insert("2024/07/28", "Home_2127", json!({ "active_score": 0.5 }));

        let res = f.repo.fetch(date!(2024 - 07 - 28), "Home_2127").await;
        assert!(matches!(res, Err(RepositoryError::FetchFailed(msg)) if msg.contains("water_usage")));
    }

    #[tokio::test]
    async fn malformed_date_string_never_reaches_the_store() {
        let f = fixture();
        let res = f.repo.fetch_str("07/28/2024", "Home_2127").await;
        assert!(matches!(res, Err(RepositoryError::MalformedDate(_))));
        assert!(f.water.lookups().is_empty());
    }
}
