//! Number and date formatting for terminal output

use chrono::{DateTime, Utc};

const COMPACT_UNITS: [(u64, &str); 4] = [
    (1_000_000_000_000, "T"),
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

const BYTE_UNITS: [(u64, &str); 3] = [(1_000_000_000, "GB"), (1_000_000, "MB"), (1_000, "kB")];

/// Group digits in threes: `1234567` -> `"1,234,567"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Abbreviated count with a trailing `+`: `2_345_678` -> `"2.3M+"`
pub fn format_compact(n: u64) -> String {
    if n == 0 {
        return "0+".to_string();
    }

    for (unit, suffix) in COMPACT_UNITS {
        if n >= unit {
            return format!("{}{}+", one_decimal(n, unit), suffix);
        }
    }

    format!("{}+", format_thousands(n))
}

/// Human readable size in decimal units: `6500` -> `"6.5 kB"`
pub fn format_bytes(bytes: u64) -> String {
    for (unit, suffix) in BYTE_UNITS {
        if bytes >= unit {
            return format!("{} {}", one_decimal(bytes, unit), suffix);
        }
    }
    format!("{} B", bytes)
}

/// Long US-style date: `"March 14, 2014"`
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

/// `n / unit` rounded to one decimal, without a trailing `.0`
fn one_decimal(n: u64, unit: u64) -> String {
    let tenths = (n as f64 / (unit as f64 / 10.0)).round() as u64;
    match tenths % 10 {
        0 => (tenths / 10).to_string(),
        frac => format!("{}.{}", tenths / 10, frac),
    }
}
