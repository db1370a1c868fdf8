use std::{
    fs::File,
    io::{LineWriter, Write},
    path::Path,
};

use crate::{
    error::{Error, RowError},
    transaction::TransactionRow,
};

pub const SUCCESS_LOG: &str = "success_logs.txt";
pub const ERROR_LOG: &str = "error_logs.txt";

/// The two append-only outcome streams, one line per processed row.
pub struct OutcomeLog<W: Write> {
    success: W,
    error: W,
}

impl OutcomeLog<LineWriter<File>> {
    /// Create (truncating) both log files inside `dir`.
    pub fn create(dir: &Path) -> Result<Self, Error> {
        let open = |name: &str| {
            let path = dir.join(name);
            File::create(&path)
                .map(LineWriter::new)
                .map_err(|source| Error::LogFile { path, source })
        };
        Ok(Self::new(open(SUCCESS_LOG)?, open(ERROR_LOG)?))
    }
}

impl<W: Write> OutcomeLog<W> {
    pub fn new(success: W, error: W) -> Self {
        Self { success, error }
    }

    pub fn success(&mut self, row: usize, trans: &TransactionRow) -> Result<(), Error> {
        writeln!(
            self.success,
            "Row {}: Updated transaction_id {} for transaction_datetime {}",
            row,
            trans.id,
            trans.formatted_datetime()
        )?;
        Ok(())
    }

    pub fn failure(&mut self, row: usize, error: &RowError) -> Result<(), Error> {
        writeln!(self.error, "Row {}: {}", row, error)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.success.flush()?;
        self.error.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> (W, W) {
        (self.success, self.error)
    }
}
