use std::io::Write;

use tracing::{debug, info};

use crate::{
    error::{Error, RowError},
    parser::ParsedRow,
    report::OutcomeLog,
    store::TransactionStore,
    transaction::TransactionRow,
};

/// Per-outcome row counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub updated: usize,
    pub empty_id: usize,
    pub invalid_datetime: usize,
    pub not_found: usize,
    pub write_failure: usize,
    pub malformed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &Result<TransactionRow, RowError>) {
        self.rows += 1;
        let counter = match outcome {
            Ok(_) => &mut self.updated,
            Err(RowError::Malformed(_)) => &mut self.malformed,
            Err(RowError::EmptyId) => &mut self.empty_id,
            Err(RowError::InvalidDatetime { .. }) => &mut self.invalid_datetime,
            Err(RowError::NotFound { .. }) => &mut self.not_found,
            Err(RowError::WriteFailure { .. }) => &mut self.write_failure,
        };
        *counter += 1;
    }

    pub fn failures(&self) -> usize {
        self.rows - self.updated
    }
}

pub const EXIT_OK: u8 = 0;
pub const EXIT_FATAL: u8 = 1;
pub const EXIT_ROWS_FAILED: u8 = 2;

/// Process exit status for a finished (or aborted) run.
pub fn exit_status(result: &Result<RunSummary, Error>) -> u8 {
    match result {
        Ok(summary) if summary.failures() == 0 => EXIT_OK,
        Ok(_) => EXIT_ROWS_FAILED,
        Err(_) => EXIT_FATAL,
    }
}

/// Applies parsed rows to a [`TransactionStore`] one at a time and logs
/// every outcome.
pub struct Updater<S, W: Write> {
    store: S,
    log: OutcomeLog<W>,
    summary: RunSummary,
}

impl<S, W> Updater<S, W>
where
    S: TransactionStore,
    W: Write,
{
    pub fn new(store: S, log: OutcomeLog<W>) -> Self {
        Self {
            store,
            log,
            summary: RunSummary::default(),
        }
    }

    /// Process every row in order. Row failures are logged and counted;
    /// only a failure to write the logs themselves stops the run.
    pub async fn run<I>(&mut self, rows: I) -> Result<RunSummary, Error>
    where
        I: IntoIterator<Item = ParsedRow>,
    {
        for (row, parsed) in rows {
            self.apply(row, parsed).await?;
        }
        self.log.flush()?;

        info!(
            rows = self.summary.rows,
            updated = self.summary.updated,
            failed = self.summary.failures(),
            "run finished"
        );
        Ok(self.summary)
    }

    /// Apply a single parsed row.
    pub async fn apply(
        &mut self,
        row: usize,
        parsed: Result<TransactionRow, RowError>,
    ) -> Result<(), Error> {
        let outcome = match parsed {
            Ok(trans) => self.update(trans).await,
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(trans) => {
                debug!(row, id = %trans.id, "updated");
                self.log.success(row, trans)?;
            }
            Err(e) => {
                debug!(row, error = %e, "row failed");
                self.log.failure(row, e)?;
            }
        }
        self.summary.record(&outcome);
        Ok(())
    }

    async fn update(&mut self, trans: TransactionRow) -> Result<TransactionRow, RowError> {
        match self.store.update_datetime(&trans.id, trans.datetime).await {
            Ok(0) => Err(RowError::NotFound {
                id: trans.id,
                datetime: trans.datetime,
            }),
            Ok(_) => Ok(trans),
            Err(e) => Err(RowError::WriteFailure {
                id: trans.id,
                datetime: trans.datetime,
                reason: e.to_string(),
            }),
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn into_parts(self) -> (S, OutcomeLog<W>) {
        (self.store, self.log)
    }
}
