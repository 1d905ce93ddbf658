use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_OUTPUT: &str = "bank_balance_chart.html";

/// Render the balance history of a bank transaction export as an HTML chart.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Tab separated transaction export
    pub export: PathBuf,

    /// Where to write the chart
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// TOML file overriding column names and export conventions
    #[arg(long)]
    pub columns: Option<PathBuf>,

    /// Write the chart without launching a browser
    #[arg(long)]
    pub no_open: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Header names and conventions of the export.
///
/// Defaults describe the K&H Bank export, whose headers are Hungarian.
/// Names are compared after header sanitization, so `"könyvelés dátuma"`
/// and `"könyvelésdátuma"` are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub posting_date: String,
    pub amount: String,
    pub currency: String,
    pub kind: String,
    pub counterparty: String,
    pub memo: String,
    pub expected_currency: String,
    /// Account merge bookkeeping entries, not real money movement.
    pub excluded_kind: String,
    pub date_format: String,
    pub placeholder: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            posting_date: "könyvelésdátuma".to_string(),
            amount: "összeg".to_string(),
            currency: "összegdevizaneme".to_string(),
            kind: "típus".to_string(),
            counterparty: "partnerelnevezése".to_string(),
            memo: "közlemény".to_string(),
            expected_currency: "HUF".to_string(),
            excluded_kind: "Számlamegszüntetés átvezetéssel".to_string(),
            date_format: "%Y.%m.%d".to_string(),
            placeholder: "No Description".to_string(),
        }
    }
}

impl Columns {
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }
}
