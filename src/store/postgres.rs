use anyhow::Result;
use sqlx::PgPool;

use crate::Reading;

// ---

/// PostgreSQL-backed reading store over the `water_readings` table
/// (see `schema::create_schema`).
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub async fn readings_between(&self, start: i64, end: i64) -> Result<Vec<Reading>> {
        // ---
        let rows = sqlx::query_as::<_, Reading>(
            r#"
            SELECT timestamp, ph, temperature, tds, turbidity
            FROM water_readings
            WHERE timestamp BETWEEN $1 AND $2
            ORDER BY timestamp ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn latest(&self) -> Result<Option<Reading>> {
        // ---
        let row = sqlx::query_as::<_, Reading>(
            r#"
            SELECT timestamp, ph, temperature, tds, turbidity
            FROM water_readings
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
