use std::cmp::Reverse;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use itertools::Itertools;
use log::info;
use rust_decimal::Decimal;

use super::{
    error::{Error, Result},
    transaction::{ProcessedTransaction, TransactionRecord},
};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const HOUR: i64 = 60 * 60;

/// Processed transactions in chart order, with running balances.
///
/// Never empty: [`Ledger::from_records`] is the only constructor and rejects
/// an empty result with [`Error::NoTransactions`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Ledger {
    transactions: Vec<ProcessedTransaction>,
}

impl Ledger {
    /// Drops `excluded_kind` records, orders the rest by posting date and
    /// accumulates the balance.
    ///
    /// Records sharing a posting date keep their export order and are spread
    /// an hour apart, so each one gets its own point on the chart. A day with
    /// more than 24 records is spread evenly across the day instead, which
    /// keeps timestamps strictly increasing.
    pub fn from_records(
        records: impl IntoIterator<Item = TransactionRecord>,
        excluded_kind: &str,
        placeholder: &str,
    ) -> Result<Self> {
        let mut records = records
            .into_iter()
            .filter(|record| record.kind != excluded_kind)
            .collect_vec();
        records.sort_by_key(|record| record.posting_date);

        if records.is_empty() {
            return Err(Error::NoTransactions);
        }

        let mut balance = Decimal::ZERO;
        let transactions = records
            .into_iter()
            .chunk_by(|record| record.posting_date)
            .into_iter()
            .flat_map(|(date, day)| {
                let day = day.collect_vec();
                let step = offset_step(day.len());
                day.into_iter()
                    .enumerate()
                    .map(move |(rank, record)| (start_of(date) + step * rank as i32, record))
            })
            .map(|(timestamp, record)| -> Result<_> {
                balance = balance
                    .checked_add(record.amount)
                    .ok_or(Error::BalanceOverflow {
                        date: record.posting_date,
                    })?;
                Ok(ProcessedTransaction {
                    description: record.description(placeholder),
                    timestamp,
                    balance,
                    record,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!("processed {} transactions", transactions.len());
        Ok(Self { transactions })
    }

    pub fn transactions(&self) -> &[ProcessedTransaction] {
        &self.transactions
    }

    pub fn summary(&self) -> Summary {
        let txns = &self.transactions;
        let lowest = txns.iter().position_min_by_key(|tx| tx.balance).unwrap_or(0);
        let peak = txns
            .iter()
            .position_min_by_key(|tx| Reverse(tx.balance))
            .unwrap_or(0);
        // non-empty, see the type docs
        let (first, last) = (&txns[0], &txns[txns.len() - 1]);

        Summary {
            count: txns.len(),
            first_date: first.record.posting_date,
            last_date: last.record.posting_date,
            final_balance: last.balance,
            min_balance: txns[lowest].balance,
            max_balance: txns[peak].balance,
            lowest,
            peak,
        }
    }
}

/// Headline figures of a [`Ledger`]. `lowest` and `peak` index the first
/// transaction reaching the minimum and maximum balance.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Summary {
    pub count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub final_balance: Decimal,
    pub min_balance: Decimal,
    pub max_balance: Decimal,
    pub lowest: usize,
    pub peak: usize,
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn offset_step(same_day: usize) -> TimeDelta {
    let seconds = match i64::try_from(same_day) {
        Ok(n) if n > 24 => (SECONDS_PER_DAY / n).max(1),
        _ => HOUR,
    };
    TimeDelta::seconds(seconds)
}
