//! Export — CSV and schema-versioned JSON for the two output row kinds.

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use leverlab_core::domain::OrderRecord;

use crate::summary::SummaryRow;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// JSON envelope for a sweep's summary rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryExport {
    pub schema_version: u32,
    pub rows: Vec<SummaryRow>,
}

/// Serialize summary rows to pretty JSON with the schema version.
pub fn export_summary_json(rows: &[SummaryRow]) -> Result<String> {
    let export = SummaryExport {
        schema_version: SCHEMA_VERSION,
        rows: rows.to_vec(),
    };
    serde_json::to_string_pretty(&export).context("failed to serialize summary rows to JSON")
}

/// Deserialize summary rows, rejecting unknown schema versions.
pub fn import_summary_json(json: &str) -> Result<Vec<SummaryRow>> {
    let export: SummaryExport =
        serde_json::from_str(json).context("failed to deserialize summary rows from JSON")?;
    if export.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            export.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(export.rows)
}

/// Export summary rows as CSV.
pub fn export_summary_csv(rows: &[SummaryRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "set_idx",
        "ind_set_idx",
        "dos_idx",
        "fingerprint",
        "trades",
        "wins",
        "losses",
        "win_rate",
        "gains_pct",
        "qf_score",
        "upside_score",
        "total_pnl",
        "fees_paid",
        "ending_equity",
    ])?;

    for row in rows {
        wtr.write_record([
            &row.set_idx.to_string(),
            &row.ind_set_idx.to_string(),
            &row.dos_idx.to_string(),
            &row.fingerprint,
            &row.trades.to_string(),
            &row.wins.to_string(),
            &row.losses.to_string(),
            &format!("{:.4}", row.win_rate),
            &format!("{:.4}", row.gains_pct),
            &format!("{:.6}", row.qf_score),
            &format!("{:.6}", row.upside_score),
            &format!("{:.2}", row.total_pnl),
            &format!("{:.2}", row.fees_paid),
            &format!("{:.2}", row.ending_equity),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export an order-record stream as CSV, timestamps rendered as UTC.
pub fn export_records_csv(records: &[OrderRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "set_idx",
        "bar_idx",
        "datetime",
        "status",
        "equity",
        "available_balance",
        "cash_used",
        "cash_borrowed",
        "realized_pnl",
        "fees_paid",
        "possible_loss",
        "total_trades",
        "average_entry",
        "entry_price",
        "entry_size_usd",
        "position_size_usd",
        "leverage",
        "liq_price",
        "sl_price",
        "tp_price",
        "exit_price",
    ])?;

    for record in records {
        let datetime = Utc
            .timestamp_millis_opt(record.timestamp)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        wtr.write_record([
            &record.set_idx.to_string(),
            &record.bar_idx.to_string(),
            &datetime,
            &format!("{:?}", record.status),
            &format!("{:.2}", record.equity),
            &format!("{:.2}", record.available_balance),
            &format!("{:.2}", record.cash_used),
            &format!("{:.2}", record.cash_borrowed),
            &format!("{:.2}", record.realized_pnl),
            &format!("{:.4}", record.fees_paid),
            &format!("{:.2}", record.possible_loss),
            &record.total_trades.to_string(),
            &format!("{:.4}", record.average_entry),
            &format!("{:.4}", record.entry_price),
            &format!("{:.2}", record.entry_size_usd),
            &format!("{:.2}", record.position_size_usd),
            &format!("{:.1}", record.leverage),
            &format!("{:.4}", record.liq_price),
            &format!("{:.4}", record.sl_price),
            &format!("{:.4}", record.tp_price),
            &format!("{:.4}", record.exit_price),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
