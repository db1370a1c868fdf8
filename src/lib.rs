pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod storage;
pub mod store;
pub mod transaction;
pub mod updater;

pub use error::{Error, RowError};
