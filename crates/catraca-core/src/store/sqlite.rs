use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::info;

use super::MeasureStore;
use crate::error::ImportError;
use crate::model::{DailyLineCompanyRecord, MeasureKind, MeasureUpdate};

/// SQLite-backed record store. Owns the `bus_lines` table and nothing
/// else; schema lifecycle beyond this table is someone else's job.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) a store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by dry runs and tests.
    pub fn open_in_memory() -> Result<Self, ImportError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, ImportError> {
        init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Fetch one canonical record by its aggregation key.
    pub fn record(
        &self,
        date: &str,
        line_code: &str,
        company: &str,
    ) -> Result<Option<DailyLineCompanyRecord>, ImportError> {
        let record = self
            .conn
            .query_row(
                "SELECT date, line_code, line_name, company,
                        predicted_passengers, realized_passengers
                 FROM bus_lines
                 WHERE date = ?1 AND line_code = ?2 AND company = ?3",
                params![date, line_code, company],
                |row| {
                    Ok(DailyLineCompanyRecord {
                        date: row.get(0)?,
                        line_code: row.get(1)?,
                        line_name: row.get(2)?,
                        company: row.get(3)?,
                        predicted_passengers: decimal_from_stored(row.get(4)?),
                        realized_passengers: decimal_from_stored(row.get(5)?),
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Number of stored records.
    pub fn record_count(&self) -> Result<u64, ImportError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bus_lines", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl MeasureStore for SqliteStore {
    fn upsert_measures(
        &mut self,
        kind: MeasureKind,
        updates: &[MeasureUpdate],
    ) -> Result<usize, ImportError> {
        let tx = self.conn.transaction()?;
        {
            let sql = match kind {
                MeasureKind::Realized => {
                    "INSERT INTO bus_lines
                         (date, line_code, line_name, company, realized_passengers)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(date, line_code, company)
                     DO UPDATE SET realized_passengers = excluded.realized_passengers"
                }
                MeasureKind::Predicted => {
                    "INSERT INTO bus_lines
                         (date, line_code, line_name, company,
                          predicted_passengers, realized_passengers)
                     VALUES (?1, ?2, ?3, ?4, ?5, 0)
                     ON CONFLICT(date, line_code, company)
                     DO UPDATE SET predicted_passengers = excluded.predicted_passengers"
                }
            };
            let mut stmt = tx.prepare(sql)?;
            for update in updates {
                stmt.execute(params![
                    update.date,
                    update.line_code,
                    update.line_name,
                    update.company,
                    update.value.to_f64().unwrap_or(0.0),
                ])?;
            }
        }
        tx.commit()?;
        info!(kind = %kind, records = updates.len(), "bulk upsert committed");
        Ok(updates.len())
    }
}

fn init_schema(conn: &Connection) -> Result<(), ImportError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;

        CREATE TABLE IF NOT EXISTS bus_lines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            line_code TEXT NOT NULL,
            line_name TEXT,
            company TEXT NOT NULL,
            predicted_passengers REAL DEFAULT 0,
            realized_passengers REAL DEFAULT 0,
            UNIQUE(date, line_code, company)
        );
        "#,
    )?;
    Ok(())
}

fn decimal_from_stored(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn update(date: &str, line: &str, company: &str, value: Decimal) -> MeasureUpdate {
        MeasureUpdate {
            date: date.to_string(),
            line_code: line.to_string(),
            line_name: format!("Line {line}"),
            company: company.to_string(),
            value,
        }
    }

    #[test]
    fn test_insert_then_fetch() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert_measures(
                MeasureKind::Realized,
                &[update("2024-01-15", "501", "ABC", dec!(120.5))],
            )
            .unwrap();

        let record = store.record("2024-01-15", "501", "ABC").unwrap().unwrap();
        assert_eq!(record.realized_passengers, dec!(120.5));
        assert_eq!(record.predicted_passengers, Decimal::ZERO);
        assert_eq!(record.line_name, "Line 501");
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let batch = [update("2024-01-15", "501", "ABC", dec!(100))];
        store.upsert_measures(MeasureKind::Realized, &batch).unwrap();
        store.upsert_measures(MeasureKind::Realized, &batch).unwrap();

        assert_eq!(store.record_count().unwrap(), 1);
        let record = store.record("2024-01-15", "501", "ABC").unwrap().unwrap();
        assert_eq!(record.realized_passengers, dec!(100));
    }

    #[test]
    fn test_measures_update_independently() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert_measures(
                MeasureKind::Realized,
                &[update("2024-01-15", "501", "ABC", dec!(100))],
            )
            .unwrap();
        store
            .upsert_measures(
                MeasureKind::Predicted,
                &[update("2024-01-15", "501", "ABC", dec!(80))],
            )
            .unwrap();

        let record = store.record("2024-01-15", "501", "ABC").unwrap().unwrap();
        assert_eq!(record.realized_passengers, dec!(100));
        assert_eq!(record.predicted_passengers, dec!(80));

        // Updating predicted again must not touch realized.
        store
            .upsert_measures(
                MeasureKind::Predicted,
                &[update("2024-01-15", "501", "ABC", dec!(90))],
            )
            .unwrap();
        let record = store.record("2024-01-15", "501", "ABC").unwrap().unwrap();
        assert_eq!(record.realized_passengers, dec!(100));
        assert_eq!(record.predicted_passengers, dec!(90));
    }

    #[test]
    fn test_predicted_insert_zeroes_realized() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert_measures(
                MeasureKind::Predicted,
                &[update("2024-01-15", "501", "ABC", dec!(80))],
            )
            .unwrap();

        let record = store.record("2024-01-15", "501", "ABC").unwrap().unwrap();
        assert_eq!(record.realized_passengers, Decimal::ZERO);
    }

    #[test]
    fn test_missing_record_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.record("2024-01-15", "501", "ABC").unwrap().is_none());
    }

    #[test]
    fn test_failed_batch_leaves_no_partial_writes() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        // Poison the schema so the prepared upsert fails mid-import.
        store.conn.execute_batch("DROP TABLE bus_lines").unwrap();

        let result = store.upsert_measures(
            MeasureKind::Realized,
            &[update("2024-01-15", "501", "ABC", dec!(100))],
        );
        assert!(result.is_err());

        init_schema(&store.conn).unwrap();
        assert_eq!(store.record_count().unwrap(), 0);
    }
}
