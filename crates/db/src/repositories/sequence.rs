//! Atomic sequence counters for invoice numbering.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

/// Repository for the shared sequence counter table.
pub struct SequenceRepository;

impl SequenceRepository {
    /// Atomically advances the counter for `key` and returns the new value.
    ///
    /// A single upsert statement does the read-increment-write, so two
    /// concurrent invoice creations can never observe the same value. Runs
    /// against whatever connection it is handed, normally the transaction
    /// that will also insert the invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails or returns no row.
    pub async fn next_value<C: ConnectionTrait>(conn: &C, key: &str) -> Result<i64, DbErr> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "INSERT INTO sequence_counters (key, value) VALUES ($1, 1) \
             ON CONFLICT (key) DO UPDATE SET value = sequence_counters.value + 1 \
             RETURNING value",
            [key.into()],
        );

        let row = conn
            .query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("sequence counter '{key}'")))?;

        row.try_get("", "value")
    }
}
