//! Conversion between octas (base denomination) and APT (display denomination),
//! plus the small formatting helpers used when presenting addresses, hashes and
//! transaction timestamps.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

/// Number of decimal places in the display denomination
pub const APT_DECIMALS: usize = 8;

/// 1 APT = 10^8 octas
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// Format an octa amount as APT with exactly 8 decimal places
pub fn format_apt(octas: u64) -> String {
    format!(
        "{}.{:0width$}",
        octas / OCTAS_PER_APT,
        octas % OCTAS_PER_APT,
        width = APT_DECIMALS
    )
}

/// Parse a coin value string as returned by the REST API (integer octas)
/// and format it as APT.
pub fn format_coin_value(value: &str) -> Result<String> {
    let octas: u64 = value
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid coin value '{}': {}", value, e))?;
    Ok(format_apt(octas))
}

/// Parse a user-entered APT amount into octas.
///
/// The string is parsed as a decimal directly so no float precision is lost.
/// Digits beyond the 8th decimal place are truncated, matching the
/// "multiply by 10^8 and drop the remainder" rule used for transfers.
///
/// # Errors
/// Returns an error for empty input, signs, stray characters, more than one
/// decimal point, or amounts that overflow `u64` octas.
pub fn parse_apt(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("APT amount cannot be empty"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(anyhow!("Invalid APT amount '{}'", trimmed));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Invalid APT amount '{}'", trimmed));
    }

    let whole_octas = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(OCTAS_PER_APT))
            .ok_or_else(|| anyhow!("APT amount '{}' is too large", trimmed))?
    };

    let mut digits: String = fraction.chars().take(APT_DECIMALS).collect();
    while digits.len() < APT_DECIMALS {
        digits.push('0');
    }
    // digits is exactly 8 ascii digits here, always < OCTAS_PER_APT
    let fraction_octas: u64 = digits
        .parse()
        .map_err(|e| anyhow!("Invalid APT amount '{}': {}", trimmed, e))?;

    whole_octas
        .checked_add(fraction_octas)
        .ok_or_else(|| anyhow!("APT amount '{}' is too large", trimmed))
}

/// Shorten an address to `0x1234...abcd` form for display
pub fn truncate_address(address: &str) -> String {
    truncate_middle(address, 6, 4)
}

/// Shorten a transaction hash to `0x12345678...abcdef` form for display
pub fn truncate_hash(hash: &str) -> String {
    truncate_middle(hash, 10, 6)
}

fn truncate_middle(value: &str, head: usize, tail: usize) -> String {
    let len = value.chars().count();
    if len <= head + tail + 3 {
        return value.to_string();
    }
    let start: String = value.chars().take(head).collect();
    let end: String = value.chars().skip(len - tail).collect();
    format!("{}...{}", start, end)
}

/// Format an API timestamp (microseconds since the Unix epoch, as a string).
/// Unparsable input is returned unchanged.
pub fn format_timestamp(micros: &str) -> String {
    micros
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|us| {
            let nanos = (us.rem_euclid(1_000_000) * 1_000) as u32;
            DateTime::<Utc>::from_timestamp(us.div_euclid(1_000_000), nanos)
        })
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| micros.to_string())
}
