use itertools::Itertools;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{ledger::Ledger, transaction::ProcessedTransaction};

const BLUE: &str = "rgba(55, 128, 191, 1)";
const GREEN_FILL: &str = "rgba(72, 187, 120, 0.2)";
const RED_FILL: &str = "rgba(245, 101, 101, 0.2)";
const GRID: &str = "rgba(128, 128, 128, 0.2)";
const SPIKE: &str = "rgba(128, 128, 128, 0.5)";
const TEXT: &str = "#2D3748";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const CHART_NAME: &str = "bank_balance_chart";

/// A Plotly figure, ready to be handed to `Plotly.newPlot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
    pub config: Value,
}

impl Figure {
    pub fn balance_history(ledger: &Ledger, currency: &str) -> Self {
        let txns = ledger.transactions();
        let summary = ledger.summary();

        let mut data = vec![balance_trace(txns, currency)];
        let (positive, negative): (Vec<_>, Vec<_>) = txns
            .iter()
            .partition(|tx| tx.balance >= Decimal::ZERO);
        if !positive.is_empty() {
            data.push(shade_trace("Positive Balance", &positive, GREEN_FILL));
        }
        if !negative.is_empty() {
            data.push(shade_trace("Negative Balance", &negative, RED_FILL));
        }

        let mut annotations = vec![json!({
            "text": "Zero Balance",
            "xref": "paper",
            "yref": "y",
            "x": 1,
            "y": 0,
            "xanchor": "right",
            "yanchor": "top",
            "showarrow": false,
        })];
        annotations.push(marker(
            &txns[summary.peak],
            format!("Peak: {}", money(summary.max_balance, currency)),
            "green",
            "rgba(72, 187, 120, 0.8)",
        ));
        if summary.min_balance < Decimal::ZERO {
            annotations.push(marker(
                &txns[summary.lowest],
                format!("Lowest: {}", money(summary.min_balance, currency)),
                "red",
                "rgba(245, 101, 101, 0.8)",
            ));
        }

        let layout = json!({
            "title": {
                "text": format!(
                    "💰 Bank Account Balance - Current: {}",
                    money(summary.final_balance, currency)
                ),
                "font": { "size": 24, "color": TEXT },
                "x": 0.5,
                "xanchor": "center",
            },
            "xaxis": {
                "title": { "text": "Date" },
                "type": "date",
                "showgrid": true,
                "gridcolor": GRID,
                "showspikes": true,
                "spikecolor": SPIKE,
                "spikethickness": 1,
                "rangeselector": {
                    "buttons": [
                        { "count": 7, "label": "7d", "step": "day", "stepmode": "backward" },
                        { "count": 30, "label": "30d", "step": "day", "stepmode": "backward" },
                        { "count": 90, "label": "3m", "step": "day", "stepmode": "backward" },
                        { "count": 180, "label": "6m", "step": "day", "stepmode": "backward" },
                        { "step": "all", "label": "All" },
                    ],
                    "bgcolor": "rgba(55, 128, 191, 0.1)",
                    "bordercolor": "rgba(55, 128, 191, 0.3)",
                    "borderwidth": 1,
                },
                "rangeslider": { "visible": true, "bgcolor": "rgba(55, 128, 191, 0.05)" },
            },
            "yaxis": {
                "title": { "text": format!("Balance ({currency})") },
                "showgrid": true,
                "gridcolor": GRID,
                "tickformat": ",.0f",
                "showspikes": true,
                "spikecolor": SPIKE,
                "spikethickness": 1,
            },
            "shapes": [{
                "type": "line",
                "xref": "paper",
                "x0": 0,
                "x1": 1,
                "yref": "y",
                "y0": 0,
                "y1": 0,
                "line": { "dash": "dash", "color": "rgba(150, 150, 150, 0.8)" },
            }],
            "annotations": annotations,
            "hovermode": "x unified",
            "plot_bgcolor": "white",
            "paper_bgcolor": "white",
            "font": { "family": "Open Sans, sans-serif", "size": 12, "color": TEXT },
            "margin": { "l": 80, "r": 80, "t": 80, "b": 80 },
            "height": 600,
            "showlegend": false,
        });

        let config = json!({
            "responsive": true,
            "displayModeBar": true,
            "displaylogo": false,
            "modeBarButtonsToRemove": ["pan2d", "lasso2d", "select2d"],
            "toImageButtonOptions": {
                "format": "png",
                "filename": CHART_NAME,
                "height": 600,
                "width": 1200,
                "scale": 2,
            },
        });

        Self {
            data,
            layout,
            config,
        }
    }
}

fn balance_trace(txns: &[ProcessedTransaction], currency: &str) -> Value {
    json!({
        "type": "scatter",
        "x": txns.iter().map(x_value).collect_vec(),
        "y": txns.iter().map(y_value).collect_vec(),
        "mode": "lines+markers",
        "name": "Balance",
        "line": { "color": BLUE, "width": 3, "shape": "spline" },
        "marker": { "size": 6, "color": BLUE, "line": { "width": 2, "color": "white" } },
        "fill": "tozeroy",
        "fillcolor": "rgba(55, 128, 191, 0.1)",
        "hovertemplate": "%{customdata}<extra></extra>",
        "customdata": txns.iter().map(|tx| hover_text(tx, currency)).collect_vec(),
    })
}

fn shade_trace(name: &str, txns: &[&ProcessedTransaction], fill: &str) -> Value {
    json!({
        "type": "scatter",
        "x": txns.iter().map(|tx| x_value(tx)).collect_vec(),
        "y": txns.iter().map(|tx| y_value(tx)).collect_vec(),
        "mode": "none",
        "fill": "tozeroy",
        "fillcolor": fill,
        "name": name,
        "showlegend": false,
        "hoverinfo": "skip",
    })
}

fn marker(tx: &ProcessedTransaction, text: String, color: &str, background: &str) -> Value {
    json!({
        "x": x_value(tx),
        "y": y_value(tx),
        "text": text,
        "showarrow": true,
        "arrowhead": 2,
        "arrowcolor": color,
        "bgcolor": background,
        "bordercolor": color,
        "font": { "color": "white" },
    })
}

fn x_value(tx: &ProcessedTransaction) -> String {
    tx.timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn y_value(tx: &ProcessedTransaction) -> f64 {
    tx.balance.to_f64().unwrap_or_default()
}

pub fn hover_text(tx: &ProcessedTransaction, currency: &str) -> String {
    let amount = tx.record.amount;
    let (indicator, sign) = match amount.cmp(&Decimal::ZERO) {
        std::cmp::Ordering::Greater => ("🟢", "+"),
        std::cmp::Ordering::Less => ("🔴", ""),
        std::cmp::Ordering::Equal => ("⚪", ""),
    };

    format!(
        "<b>{}</b><br><b>Balance:</b> {}<br><b>Change:</b> {indicator} {sign}{}<br><b>Description:</b> {}",
        tx.record.posting_date.format("%Y-%m-%d"),
        money(tx.balance, currency),
        money(amount, currency),
        escape_html(&tx.description),
    )
}

/// Whole units with comma thousand separators, e.g. `-1,234,568 HUF`.
pub fn money(amount: Decimal, currency: &str) -> String {
    format!("{} {currency}", thousands(amount))
}

pub fn thousands(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .normalize();
    let digits = rounded.abs().trunc().to_string();

    let grouped: String = digits
        .chars()
        .rev()
        .chunks(3)
        .into_iter()
        .map(|chunk| chunk.collect::<String>())
        .join(",")
        .chars()
        .rev()
        .collect();

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::transaction::TransactionRecord;

    fn ledger(amounts: &[Decimal]) -> Ledger {
        let records = amounts.iter().enumerate().map(|(day, amount)| TransactionRecord {
            posting_date: NaiveDate::from_ymd_opt(2014, 8, day as u32 + 1).unwrap(),
            amount: *amount,
            currency: "HUF".to_string(),
            kind: "x".to_string(),
            counterparty: (day == 0).then(|| "Bolt <Kft> & Társa".to_string()),
            memo: None,
        });
        Ledger::from_records(records, "merge", "No Description").unwrap()
    }

    fn names(figure: &Figure) -> Vec<&str> {
        figure
            .data
            .iter()
            .filter_map(|trace| trace["name"].as_str())
            .collect()
    }

    fn annotation_texts(figure: &Figure) -> Vec<&str> {
        figure.layout["annotations"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|a| a["text"].as_str())
            .collect()
    }

    #[test]
    fn formats_money() {
        assert_eq!(money(dec!(1234567.5), "HUF"), "1,234,568 HUF");
        assert_eq!(money(dec!(-1234.5), "HUF"), "-1,234 HUF");
        assert_eq!(money(dec!(999), "HUF"), "999 HUF");
        assert_eq!(money(dec!(0), "HUF"), "0 HUF");
        assert_eq!(money(dec!(-1000), "EUR"), "-1,000 EUR");
    }

    #[test]
    fn positive_history_has_no_red_overlay_or_low_marker() {
        let figure = Figure::balance_history(&ledger(&[dec!(1000), dec!(-300), dec!(50)]), "HUF");

        assert_eq!(names(&figure), vec!["Balance", "Positive Balance"]);
        assert_eq!(annotation_texts(&figure), vec!["Zero Balance", "Peak: 1,000 HUF"]);
        assert_eq!(
            figure.layout["title"]["text"],
            "💰 Bank Account Balance - Current: 750 HUF"
        );
        assert_eq!(figure.data[0]["y"], json!([1000.0, 700.0, 750.0]));
        assert_eq!(
            figure.data[0]["x"],
            json!(["2014-08-01 00:00:00", "2014-08-02 00:00:00", "2014-08-03 00:00:00"])
        );
    }

    #[test]
    fn overdrawn_history_marks_lowest_point() {
        let figure = Figure::balance_history(&ledger(&[dec!(-100), dec!(300), dec!(-500)]), "HUF");

        assert_eq!(
            names(&figure),
            vec!["Balance", "Positive Balance", "Negative Balance"]
        );
        assert_eq!(
            annotation_texts(&figure),
            vec!["Zero Balance", "Peak: 200 HUF", "Lowest: -300 HUF"]
        );
        assert_eq!(figure.data[2]["y"], json!([-100.0, -300.0]));
        assert_eq!(figure.layout["annotations"][2]["x"], "2014-08-03 00:00:00");
    }

    #[test]
    fn only_negative_history_skips_green_overlay() {
        let figure = Figure::balance_history(&ledger(&[dec!(-1), dec!(-1)]), "HUF");

        assert_eq!(names(&figure), vec!["Balance", "Negative Balance"]);
    }

    #[test]
    fn hover_text_shows_change_and_escaped_description() {
        let ledger = ledger(&[dec!(1500), dec!(-300), dec!(0)]);
        let txns = ledger.transactions();

        assert_eq!(
            hover_text(&txns[0], "HUF"),
            "<b>2014-08-01</b><br><b>Balance:</b> 1,500 HUF<br><b>Change:</b> 🟢 +1,500 HUF\
             <br><b>Description:</b> Bolt &lt;Kft&gt; &amp; Társa"
        );
        assert!(hover_text(&txns[1], "HUF").contains("<b>Change:</b> 🔴 -300 HUF"));
        assert!(hover_text(&txns[2], "HUF").contains("<b>Change:</b> ⚪ 0 HUF"));
        assert!(hover_text(&txns[2], "HUF").ends_with("No Description"));
    }

    #[test]
    fn range_selector_presets() {
        let figure = Figure::balance_history(&ledger(&[dec!(1)]), "HUF");

        let labels = figure.layout["xaxis"]["rangeselector"]["buttons"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["label"].as_str().unwrap())
            .collect_vec();
        assert_eq!(labels, vec!["7d", "30d", "3m", "6m", "All"]);
        assert_eq!(figure.layout["xaxis"]["rangeslider"]["visible"], true);
    }
}
