use anyhow::{bail, Result};
use sqlx::{types::Json, PgPool};

use super::UsageCollection;

/// A usage collection stored as a PostgreSQL table of JSONB documents.
///
/// Expected table shape:
///
/// ```sql
/// CREATE TABLE <database>.<collection> (
///     date    TEXT  NOT NULL,
///     home_id TEXT  NOT NULL,
///     doc     JSONB NOT NULL
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PgUsageCollection {
    pool: PgPool,
    table: String,
}

impl PgUsageCollection {
    /// Bind a collection handle to `database.collection`.
    ///
    /// Both names are interpolated into SQL, so anything that is not a plain
    /// identifier is refused here instead of at query time.
    pub fn new(pool: PgPool, database: &str, collection: &str) -> Result<Self> {
        for name in [database, collection] {
            if !is_identifier(name) {
                bail!("invalid collection identifier '{name}'");
            }
        }

        Ok(Self {
            pool,
            table: format!("{database}.{collection}"),
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait::async_trait]
impl UsageCollection for PgUsageCollection {
    fn name(&self) -> &str {
        &self.table
    }

    async fn find_one(&self, date: &str, home_id: &str) -> Result<Option<serde_json::Value>> {
        let sql = format!(
            r#"
            SELECT doc
            FROM {}
            WHERE date = $1
              AND home_id = $2
            LIMIT 1
            "#,
            self.table
        );

        let row = sqlx::query_scalar::<_, Json<serde_json::Value>>(&sql)
            .bind(date)
            .bind(home_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|Json(doc)| doc))
    }
}
