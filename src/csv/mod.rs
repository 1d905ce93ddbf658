use std::{fs::File, io::Read, path::Path, str::FromStr};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use itertools::Itertools;
use log::{debug, error, info};
use rust_decimal::Decimal;

use crate::{
    config::Columns,
    domain::{
        error::{CurrencyViolation, Error},
        transaction::TransactionRecord,
    },
    error::Result,
    sanitize::{strip_whitespace, SEPARATOR},
};

/// Positions of the logical columns in the export header.
#[derive(Debug, PartialEq, Eq)]
struct ColumnIndex {
    posting_date: usize,
    amount: usize,
    currency: usize,
    kind: usize,
    counterparty: usize,
    memo: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &Columns) -> Result<Self> {
        let find = |name: &str| {
            let wanted = strip_whitespace(name);
            headers
                .iter()
                .position(|header| strip_whitespace(header) == wanted)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            posting_date: find(&columns.posting_date)?,
            amount: find(&columns.amount)?,
            currency: find(&columns.currency)?,
            kind: find(&columns.kind)?,
            counterparty: find(&columns.counterparty)?,
            memo: find(&columns.memo)?,
        })
    }
}

/// Parse [`TransactionRecord`]s from a tab separated export.
///
/// Rows with no content at all are skipped. Every remaining row must be in
/// [`Columns::expected_currency`]: a single foreign row fails the whole load,
/// after each offending row has been logged.
pub fn read(reader: impl Read, columns: &Columns) -> Result<Vec<TransactionRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(SEPARATOR as u8)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    debug!("export columns: {:?}", headers.iter().collect_vec());
    let index = ColumnIndex::resolve(&headers, columns)?;

    let rows: Vec<StringRecord> = reader
        .records()
        .filter_ok(|row| row.iter().any(|field| !field.is_empty()))
        .collect::<csv::Result<_>>()?;
    info!("read {} rows", rows.len());

    check_currency(&rows, &index, &columns.expected_currency)?;

    rows.iter()
        .map(|row| parse_row(row, &index, columns))
        .collect()
}

pub fn read_path(path: &Path, columns: &Columns) -> Result<Vec<TransactionRecord>> {
    read(File::open(path)?, columns)
}

fn field<'r>(row: &'r StringRecord, idx: usize) -> &'r str {
    row.get(idx).unwrap_or_default()
}

fn check_currency(rows: &[StringRecord], index: &ColumnIndex, expected: &str) -> Result<()> {
    let violations = rows
        .iter()
        .filter(|row| field(row, index.currency) != expected)
        .map(|row| CurrencyViolation {
            date: field(row, index.posting_date).to_string(),
            amount: field(row, index.amount).to_string(),
            currency: field(row, index.currency).to_string(),
        })
        .collect_vec();

    if violations.is_empty() {
        return Ok(());
    }

    error!(
        "found {} transactions with non-{expected} currency:",
        violations.len()
    );
    for violation in &violations {
        error!("  {violation}");
    }

    Err(Error::CurrencyMismatch {
        expected: expected.to_string(),
        rows: violations,
    }
    .into())
}

fn parse_row(
    row: &StringRecord,
    index: &ColumnIndex,
    columns: &Columns,
) -> Result<TransactionRecord> {
    let line = row.position().map_or(0, |pos| pos.line());

    let date = field(row, index.posting_date);
    let posting_date =
        NaiveDate::parse_from_str(date, &columns.date_format).map_err(|_| Error::InvalidDate {
            line,
            value: date.to_string(),
            format: columns.date_format.clone(),
        })?;

    let amount = field(row, index.amount);
    let amount = parse_amount(amount).ok_or_else(|| Error::InvalidAmount {
        line,
        value: amount.to_string(),
    })?;

    Ok(TransactionRecord {
        posting_date,
        amount,
        currency: field(row, index.currency).to_string(),
        kind: field(row, index.kind).to_string(),
        counterparty: optional(field(row, index.counterparty)),
        memo: optional(field(row, index.memo)),
    })
}

/// Accepts grouping spaces and, when there is no decimal point, a decimal
/// comma.
fn parse_amount(value: &str) -> Option<Decimal> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = if compact.contains('.') {
        compact
    } else {
        compact.replace(',', ".")
    };

    Decimal::from_str(&normalized).ok()
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
