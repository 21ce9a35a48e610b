//! Feature table synchronization.
//!
//! Keeps each ticker's feature table current with minimal recomputation. The
//! synchronizer is the only writer of the table: a first sync backfills from
//! the configured start date, later syncs append only the rows after the
//! stored latest date, and an already-current ticker is a no-op.

use crate::config::Config;
use crate::error::Result;
use crate::services::feature_store::FeatureStore;
use crate::services::features::{compute_features, MACD_SLOW};
use crate::sources::MarketDataSource;
use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

/// Outcome of synchronizing a single ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// First sync: the full table was created with this many rows.
    Created(usize),
    /// Incremental sync appended this many rows after the stored latest date.
    Appended(usize),
    /// The stored latest date is already today.
    AlreadyCurrent,
    /// The source returned no bars for the needed range.
    NoNewBars,
}

/// Result of a batch run over the configured ticker universe.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<(String, SyncOutcome)>,
    pub skipped: Vec<(String, String)>,
}

impl SyncReport {
    /// Total rows written across the batch.
    pub fn rows_written(&self) -> usize {
        self.synced
            .iter()
            .map(|(_, outcome)| match outcome {
                SyncOutcome::Created(n) | SyncOutcome::Appended(n) => *n,
                _ => 0,
            })
            .sum()
    }
}

/// Feature table synchronizer.
///
/// Holds the two collaborators it needs by reference; tickers are processed
/// sequentially and each ticker's failure is recoverable for the batch.
pub struct Synchronizer<'a> {
    source: &'a dyn MarketDataSource,
    store: &'a dyn FeatureStore,
    config: &'a Config,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        source: &'a dyn MarketDataSource,
        store: &'a dyn FeatureStore,
        config: &'a Config,
    ) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Synchronize every configured ticker as of `today`.
    ///
    /// Recoverable failures (a dead feed, too little history) skip the
    /// ticker and continue the batch; anything else, such as a store
    /// failure, aborts the whole run.
    pub fn sync_all(&self, today: NaiveDate) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for ticker in &self.config.tickers {
            match self.sync_ticker(ticker, today) {
                Ok(outcome) => {
                    info!("{}: {:?}", ticker, outcome);
                    report.synced.push((ticker.clone(), outcome));
                }
                Err(e) if e.is_recoverable() => {
                    warn!("{}: sync skipped: {}", ticker, e);
                    report.skipped.push((ticker.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Sync complete: {} tickers written ({} rows), {} skipped",
            report.synced.len(),
            report.rows_written(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Synchronize one ticker as of `today`.
    pub fn sync_ticker(&self, ticker: &str, today: NaiveDate) -> Result<SyncOutcome> {
        match self.store.find_latest_date(ticker)? {
            None => self.full_sync(ticker, today),
            Some(latest) if latest >= today => {
                debug!("{}: already current ({})", ticker, latest);
                Ok(SyncOutcome::AlreadyCurrent)
            }
            Some(latest) => self.incremental_sync(ticker, latest, today),
        }
    }

    /// Clear the full store. Never triggered implicitly.
    pub fn reset(&self) -> Result<()> {
        self.store.clear_all()
    }

    fn full_sync(&self, ticker: &str, today: NaiveDate) -> Result<SyncOutcome> {
        let bars = self
            .source
            .fetch_daily(ticker, self.config.history_start, today)?;
        if bars.is_empty() {
            return Ok(SyncOutcome::NoNewBars);
        }

        let rows = compute_features(ticker, &bars)?;
        let written = self.store.append(&rows)?;
        Ok(SyncOutcome::Created(written))
    }

    /// Append the rows for (latest, today]. Stored trailing rows are prepended
    /// as seam context before computing, so the first appended row's rolling
    /// statistics see a full window of antecedent points.
    fn incremental_sync(
        &self,
        ticker: &str,
        latest: NaiveDate,
        today: NaiveDate,
    ) -> Result<SyncOutcome> {
        let new_bars = self
            .source
            .fetch_daily(ticker, latest + Duration::days(1), today)?;
        let new_bars: Vec<_> = new_bars.into_iter().filter(|b| b.date > latest).collect();
        if new_bars.is_empty() {
            return Ok(SyncOutcome::NoNewBars);
        }

        // Floored at the longest indicator span so the first appended row
        // never sees fewer antecedent points than its window requires, even
        // under a small configured seam.
        let context_rows = self
            .config
            .seam_context_rows
            .max(MACD_SLOW + new_bars.len());
        let mut bars: Vec<_> = self
            .store
            .find_recent(ticker, context_rows)?
            .iter()
            .map(|row| row.price_bar())
            .collect();
        debug!(
            "{}: {} seam context bars, {} new bars",
            ticker,
            bars.len(),
            new_bars.len()
        );
        bars.extend(new_bars);

        let rows = compute_features(ticker, &bars)?;
        let appended: Vec<_> = rows.into_iter().filter(|r| r.date > latest).collect();
        let written = self.store.append(&appended)?;
        Ok(SyncOutcome::Appended(written))
    }
}
