use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// One row of the export.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TransactionRecord {
    pub posting_date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub kind: String,
    pub counterparty: Option<String>,
    pub memo: Option<String>,
}

impl TransactionRecord {
    /// Counterparty, then memo, then `placeholder`. Blank text counts as
    /// missing.
    pub fn description(&self, placeholder: &str) -> String {
        [&self.counterparty, &self.memo]
            .into_iter()
            .flatten()
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .unwrap_or(placeholder)
            .to_string()
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProcessedTransaction {
    pub record: TransactionRecord,
    /// Posting date plus a synthetic offset. Only orders points on the chart.
    pub timestamp: NaiveDateTime,
    pub balance: Decimal,
    pub description: String,
}
