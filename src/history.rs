//! Export and summary of the loaded transaction history.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::types::TransactionRecord;
use crate::units;

#[derive(Serialize)]
struct HistoryRow<'a> {
    hash: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    function: &'a str,
    success: bool,
    gas_used: &'a str,
    timestamp: String,
}

/// Write `records` as CSV with a header row, in the order given
pub fn write_csv<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(HistoryRow {
            hash: &record.hash,
            kind: &record.kind,
            function: record.function().unwrap_or(""),
            success: record.success,
            gas_used: &record.gas_used,
            timestamp: units::format_timestamp(&record.timestamp),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_gas_used: u64,
}

impl HistorySummary {
    pub fn summary(&self) -> String {
        format!(
            "Total: {} | Succeeded: {} | Failed: {} | Gas used: {}",
            self.total, self.succeeded, self.failed, self.total_gas_used
        )
    }
}

pub fn summarize(records: &[TransactionRecord]) -> HistorySummary {
    let mut summary = HistorySummary::default();
    for record in records {
        summary.total += 1;
        if record.success {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
        summary.total_gas_used = summary.total_gas_used.saturating_add(record.gas_used_units());
    }
    summary
}
