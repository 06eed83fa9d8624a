//! Database schema management for the PostgreSQL reading store.
//!
//! Ensures the readings table and its index exist before serving requests.
//! Applied once on startup from `main.rs` when `READING_SOURCE=postgres`.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create the `water_readings` table if missing (idempotent).
///
/// Metric columns are nullable: a record may carry any subset of the four
/// metrics. Safe to call on every startup.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS water_readings (
            id          BIGSERIAL PRIMARY KEY,
            timestamp   BIGINT           NOT NULL,
            ph          DOUBLE PRECISION,
            temperature DOUBLE PRECISION,
            tds         DOUBLE PRECISION,
            turbidity   DOUBLE PRECISION
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Range and latest queries both order by timestamp
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_water_readings_timestamp
            ON water_readings (timestamp);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
