//! SQLite persistence for the per-ticker feature table.
//!
//! The store holds one logical table keyed by (ticker, date). Appends are
//! idempotent: re-inserting a (ticker, date) that already exists is a no-op,
//! so re-running a synchronization over the same range leaves the table
//! unchanged.

use crate::error::Result;
use crate::types::FeatureRow;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Persistence collaborator for feature rows.
///
/// Constructed once at process start and passed by reference into each
/// pipeline stage. Range queries return rows ordered ascending by date.
pub trait FeatureStore {
    /// Latest stored date for a ticker, or None when the ticker has no rows.
    fn find_latest_date(&self, ticker: &str) -> Result<Option<NaiveDate>>;

    /// Rows for a ticker with date in [start, end], ascending by date.
    fn find_range(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<FeatureRow>>;

    /// The most recent `limit` rows for a ticker, ascending by date.
    fn find_recent(&self, ticker: &str, limit: usize) -> Result<Vec<FeatureRow>>;

    /// Insert rows, skipping any (ticker, date) already present. Returns the
    /// number of rows actually inserted.
    fn append(&self, rows: &[FeatureRow]) -> Result<usize>;

    /// Drop every stored row, for all tickers.
    fn clear_all(&self) -> Result<()>;
}

/// SQLite-backed feature store.
pub struct SqliteFeatureStore {
    conn: Mutex<Connection>,
}

const FEATURE_COLUMNS: &str = "ticker, date, open, high, low, close, volume, \
     rsi, macd_line, macd_signal, macd_hist, \
     bb_mid, bb_upper, bb_lower, bb_bandwidth, bb_percent_b, sma";

impl SqliteFeatureStore {
    /// Open (or create) a feature store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("Feature store initialized");
        Ok(store)
    }

    /// Create an in-memory feature store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory feature store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS features (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL,
                rsi REAL NOT NULL,
                macd_line REAL NOT NULL,
                macd_signal REAL NOT NULL,
                macd_hist REAL NOT NULL,
                bb_mid REAL NOT NULL,
                bb_upper REAL NOT NULL,
                bb_lower REAL NOT NULL,
                bb_bandwidth REAL NOT NULL,
                bb_percent_b REAL NOT NULL,
                sma REAL NOT NULL,
                PRIMARY KEY (ticker, date)
            )",
            [],
        )?;

        Ok(())
    }
}

/// Map a result row (selected with FEATURE_COLUMNS) to a FeatureRow.
fn feature_row_from_sql(row: &Row<'_>) -> rusqlite::Result<FeatureRow> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(FeatureRow {
        ticker: row.get(0)?,
        date,
        open: row.get(2)?,
        high: row.get(3)?,
        low: row.get(4)?,
        close: row.get(5)?,
        volume: row.get(6)?,
        rsi: row.get(7)?,
        macd_line: row.get(8)?,
        macd_signal: row.get(9)?,
        macd_hist: row.get(10)?,
        bb_mid: row.get(11)?,
        bb_upper: row.get(12)?,
        bb_lower: row.get(13)?,
        bb_bandwidth: row.get(14)?,
        bb_percent_b: row.get(15)?,
        sma: row.get(16)?,
    })
}

impl FeatureStore for SqliteFeatureStore {
    fn find_latest_date(&self, ticker: &str) -> Result<Option<NaiveDate>> {
        let conn = self.conn.lock().unwrap();

        let latest: Option<String> = conn
            .query_row(
                "SELECT MAX(date) FROM features WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(latest.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
    }

    fn find_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FeatureRow>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {FEATURE_COLUMNS} FROM features
             WHERE ticker = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC"
        ))?;

        let rows = stmt
            .query_map(
                params![
                    ticker,
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string(),
                ],
                feature_row_from_sql,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn find_recent(&self, ticker: &str, limit: usize) -> Result<Vec<FeatureRow>> {
        let conn = self.conn.lock().unwrap();

        // Take the trailing rows, then flip back to ascending.
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEATURE_COLUMNS} FROM (
                SELECT {FEATURE_COLUMNS} FROM features
                WHERE ticker = ?1
                ORDER BY date DESC
                LIMIT ?2
             ) ORDER BY date ASC"
        ))?;

        let rows = stmt
            .query_map(params![ticker, limit as i64], feature_row_from_sql)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn append(&self, rows: &[FeatureRow]) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR IGNORE INTO features ({FEATURE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
            ))?;

            for row in rows {
                inserted += stmt.execute(params![
                    row.ticker,
                    row.date.format("%Y-%m-%d").to_string(),
                    row.open,
                    row.high,
                    row.low,
                    row.close,
                    row.volume,
                    row.rsi,
                    row.macd_line,
                    row.macd_signal,
                    row.macd_hist,
                    row.bb_mid,
                    row.bb_upper,
                    row.bb_lower,
                    row.bb_bandwidth,
                    row.bb_percent_b,
                    row.sma,
                ])?;
            }
        }

        tx.commit()?;
        debug!("Appended {} of {} rows", inserted, rows.len());
        Ok(inserted)
    }

    fn clear_all(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM features", [])?;
        info!("Feature store cleared");
        Ok(())
    }
}
