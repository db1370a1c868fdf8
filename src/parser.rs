use std::io::Read;

use crate::{
    error::{Error, RowError},
    transaction::TransactionRow,
};

/// A 1-based row number (header excluded) with the outcome of parsing that row.
pub type ParsedRow = (usize, Result<TransactionRow, RowError>);

/// CSV reader configured the way the export is written: a header line,
/// comma separated, surrounding whitespace ignored.
pub fn reader<R>(input: R) -> csv::Reader<R>
where
    R: Read,
{
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Read the header and return a lazy, single-pass sequence of rows.
///
/// The header only fixes the expected column count. Every later line yields
/// exactly one item; a line with the wrong number of fields is reported as
/// [`RowError::Malformed`] and the scan continues with the next line.
pub fn parse<R>(mut rdr: csv::Reader<R>) -> Result<impl Iterator<Item = ParsedRow>, Error>
where
    R: Read,
{
    let columns = rdr.headers().map_err(Error::Header)?.len();
    if columns < 2 {
        return Err(Error::HeaderTooShort(columns));
    }

    Ok(rdr
        .into_records()
        .enumerate()
        .map(|(index, record)| {
            let row = index + 1;
            let parsed = record
                .map_err(|e| RowError::Malformed(e.to_string()))
                .and_then(|record| TransactionRow::from_fields(&record[0], &record[1]));
            (row, parsed)
        }))
}
