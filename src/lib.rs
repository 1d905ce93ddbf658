//! Charts the balance history of a tab separated bank export.
//!
//! The pipeline runs once: [`sanitize`] fixes the export header, [`csv`]
//! loads and validates the rows, [`domain::ledger`] orders them and
//! accumulates the balance, [`chart`] builds the figure and [`output`]
//! writes it as HTML.

pub mod chart;
pub mod config;
pub mod csv;
pub mod domain;
pub mod error;
pub mod output;
pub mod sanitize;

use std::path::Path;

use config::Columns;
use domain::ledger::Ledger;
use error::Result;

/// Sanitizes, loads and processes the export at `path`.
pub fn load_ledger(path: &Path, columns: &Columns) -> Result<Ledger> {
    let fixed = sanitize::sanitize_file(path)?;
    let records = crate::csv::read_path(&fixed, columns)?;
    Ok(Ledger::from_records(
        records,
        &columns.excluded_kind,
        &columns.placeholder,
    )?)
}
