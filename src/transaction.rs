use chrono::{NaiveDateTime, Timelike};

use crate::error::RowError;

/// The only datetime layout accepted in the input and written to the logs.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type TransactionId = String;

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub datetime: NaiveDateTime,
}

impl TransactionRow {
    /// Validate the first two columns of a record.
    pub fn from_fields(id: &str, datetime: &str) -> Result<Self, RowError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(RowError::EmptyId);
        }
        let raw = datetime.trim();
        let invalid = || RowError::InvalidDatetime {
            id: id.to_string(),
            raw: raw.to_string(),
        };
        if !has_fixed_shape(raw) {
            return Err(invalid());
        }
        let datetime = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map_err(|_| invalid())?;
        // chrono encodes second 60 as a leap second
        if datetime.nanosecond() >= 1_000_000_000 {
            return Err(invalid());
        }
        Ok(TransactionRow {
            id: id.to_string(),
            datetime,
        })
    }

    pub fn formatted_datetime(&self) -> String {
        self.datetime.format(DATETIME_FORMAT).to_string()
    }
}

/// `dddd-dd-dd dd:dd:dd`, zero padded, nothing else.
fn has_fixed_shape(raw: &str) -> bool {
    raw.len() == 19
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            10 => b == b' ',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        })
}
