use std::{error::Error as _, process};

use clap::Parser;
use env_logger::Env;
use log::info;

use balance_chart::{
    chart::{money, thousands, Figure},
    config::{Args, Columns},
    domain::error::Error as BusinessError,
    error::{Error, Result},
    load_ledger, output,
};

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_filter()))
        .format_timestamp(None)
        .init();

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        if let Error::BusinessError(BusinessError::CurrencyMismatch { rows, .. }) = &err {
            for row in rows {
                eprintln!("  {row}");
            }
        }
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let columns = Columns::load(args.columns.as_deref())?;
    let currency = columns.expected_currency.as_str();
    info!("loading {}", args.export.display());

    let ledger = load_ledger(&args.export, &columns)?;
    let summary = ledger.summary();

    println!("✅ Successfully processed {} transactions", summary.count);
    println!(
        "📅 Date range: {} to {}",
        summary.first_date.format("%Y-%m-%d"),
        summary.last_date.format("%Y-%m-%d")
    );
    println!("💰 Final balance: {}", money(summary.final_balance, currency));
    println!(
        "📊 Balance range: {} to {}",
        thousands(summary.min_balance),
        money(summary.max_balance, currency)
    );

    let figure = Figure::balance_history(&ledger, currency);
    let path = output::write_html(&figure, &args.output)?;
    println!("📊 Interactive chart saved as: {}", path.display());

    if !args.no_open && output::open_in_browser(&path) {
        println!("🌐 Opening chart in your default browser...");
    }

    Ok(())
}
