//! Human-readable byte counts for display records

use serde::Serialize;

/// Decimal places kept for every unit above bytes.
const PRECISION: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeUnit {
    #[serde(rename = "B")]
    Bytes,
    #[serde(rename = "kB")]
    Kilobytes,
    #[serde(rename = "MB")]
    Megabytes,
    #[serde(rename = "GB")]
    Gigabytes,
    #[serde(rename = "TB")]
    Terabytes,
    #[serde(rename = "PB")]
    Petabytes,
    #[serde(rename = "EB")]
    Exabytes,
}

const UNITS: [SizeUnit; 7] = [
    SizeUnit::Bytes,
    SizeUnit::Kilobytes,
    SizeUnit::Megabytes,
    SizeUnit::Gigabytes,
    SizeUnit::Terabytes,
    SizeUnit::Petabytes,
    SizeUnit::Exabytes,
];

impl SizeUnit {
    pub fn multiplier(self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => 1_000,
            SizeUnit::Megabytes => 1_000_000,
            SizeUnit::Gigabytes => 1_000_000_000,
            SizeUnit::Terabytes => 1_000_000_000_000,
            SizeUnit::Petabytes => 1_000_000_000_000_000,
            SizeUnit::Exabytes => 1_000_000_000_000_000_000,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            SizeUnit::Bytes => "B",
            SizeUnit::Kilobytes => "kB",
            SizeUnit::Megabytes => "MB",
            SizeUnit::Gigabytes => "GB",
            SizeUnit::Terabytes => "TB",
            SizeUnit::Petabytes => "PB",
            SizeUnit::Exabytes => "EB",
        }
    }
}

impl std::fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A byte count as `{value, unit}`, e.g. `{ value: 1.5, unit: "MB" }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HumanSize {
    pub value: f64,
    pub unit: SizeUnit,
}

impl std::fmt::Display for HumanSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            SizeUnit::Bytes => write!(f, "{} {}", self.value, self.unit),
            _ => write!(f, "{:.*} {}", PRECISION as usize, self.value, self.unit),
        }
    }
}

/// Convert a raw byte count into decimal (SI) units.
pub fn format_bytes(bytes: u64) -> HumanSize {
    let mut index = UNITS
        .iter()
        .rposition(|unit| bytes >= unit.multiplier())
        .unwrap_or(0);

    if index == 0 {
        return HumanSize {
            value: bytes as f64,
            unit: SizeUnit::Bytes,
        };
    }

    let scale = 10f64.powi(PRECISION);
    loop {
        let unit = UNITS[index];
        let value = (bytes as f64 / unit.multiplier() as f64 * scale).round() / scale;
        // 999_950 bytes rounds to 1000.0 kB; report it as 1.0 MB instead.
        if value >= 1000.0 && index + 1 < UNITS.len() {
            index += 1;
            continue;
        }
        return HumanSize { value, unit };
    }
}
