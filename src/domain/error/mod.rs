use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("found {} transactions not in {expected}", .rows.len())]
    CurrencyMismatch {
        expected: String,
        rows: Vec<CurrencyViolation>,
    },
    #[error("line {line}: could not parse date {value:?} with format {format:?}")]
    InvalidDate {
        line: u64,
        value: String,
        format: String,
    },
    #[error("line {line}: could not parse amount {value:?}")]
    InvalidAmount { line: u64, value: String },
    #[error("export has no {0:?} column")]
    MissingColumn(String),
    #[error("no transactions left to chart")]
    NoTransactions,
    #[error("running balance overflowed on {date}")]
    BalanceOverflow { date: chrono::NaiveDate },
}

/// A row whose currency differs from the expected one, kept verbatim for
/// reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyViolation {
    pub date: String,
    pub amount: String,
    pub currency: String,
}

impl fmt::Display for CurrencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {}, Amount: {} {}",
            self.date, self.amount, self.currency
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
