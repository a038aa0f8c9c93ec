//! Value formatters for slider labels.
//!
//! Listing prices span several orders of magnitude, so labels are usually
//! abbreviated: `$1.2M`, or in lakh/crore notation `₹25L`, `₹1.5Cr`.

use serde::{Deserialize, Serialize};

const THOUSAND: f64 = 1_000.0;
const LAKH: f64 = 100_000.0;
const MILLION: f64 = 1_000_000.0;
const CRORE: f64 = 10_000_000.0;
const BILLION: f64 = 1_000_000_000.0;

/// How a numeric value is rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueFormat {
    /// Shortest round-trip representation, `42`, `2.5`.
    #[default]
    Plain,
    /// Fixed number of decimals, `42.50`.
    Fixed(usize),
    /// Thousands/millions/billions with one decimal, `$1.2M`.
    Compact {
        /// Prepended after the sign, e.g. `$`
        prefix: String,
    },
    /// Thousands/lakhs/crores with up to two decimals, `₹1.25Cr`.
    Lakh {
        /// Prepended after the sign, e.g. `₹`
        prefix: String,
    },
}

impl ValueFormat {
    /// Compact format with a currency prefix.
    #[must_use]
    pub fn compact(prefix: impl Into<String>) -> Self {
        Self::Compact {
            prefix: prefix.into(),
        }
    }

    /// Lakh/crore format with a currency prefix.
    #[must_use]
    pub fn lakh(prefix: impl Into<String>) -> Self {
        Self::Lakh {
            prefix: prefix.into(),
        }
    }

    /// Render `value`.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Plain => plain(value),
            Self::Fixed(decimals) => format!("{:.*}", decimals, normalize_zero(value)),
            Self::Compact { prefix } => scaled(
                value,
                prefix,
                &[(BILLION, "B"), (MILLION, "M"), (THOUSAND, "K")],
                1,
            ),
            Self::Lakh { prefix } => {
                scaled(value, prefix, &[(CRORE, "Cr"), (LAKH, "L"), (THOUSAND, "K")], 2)
            }
        }
    }
}

/// Shortest representation without a trailing `.0`.
#[must_use]
pub fn plain(value: f64) -> String {
    format!("{}", normalize_zero(value))
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn scaled(value: f64, prefix: &str, units: &[(f64, &str)], decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    for (unit, suffix) in units {
        if magnitude >= *unit {
            let body = trim_decimals(magnitude / unit, decimals);
            return format!("{sign}{prefix}{body}{suffix}");
        }
    }
    format!("{sign}{prefix}{}", trim_decimals(magnitude, decimals))
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain() {
        assert_eq!(ValueFormat::Plain.format(42.0), "42");
        assert_eq!(ValueFormat::Plain.format(2.5), "2.5");
        assert_eq!(ValueFormat::Plain.format(-0.0), "0");
        assert_eq!(ValueFormat::default(), ValueFormat::Plain);
    }

    #[test]
    fn test_fixed() {
        assert_eq!(ValueFormat::Fixed(2).format(42.5), "42.50");
        assert_eq!(ValueFormat::Fixed(0).format(7.4), "7");
    }

    #[test]
    fn test_compact() {
        let f = ValueFormat::compact("$");
        assert_eq!(f.format(950.0), "$950");
        assert_eq!(f.format(1_200.0), "$1.2K");
        assert_eq!(f.format(1_250_000.0), "$1.3M");
        assert_eq!(f.format(2_000_000_000.0), "$2B");
        assert_eq!(f.format(-1_500.0), "-$1.5K");
    }

    #[test]
    fn test_lakh() {
        let f = ValueFormat::lakh("₹");
        assert_eq!(f.format(2_500_000.0), "₹25L");
        assert_eq!(f.format(15_000_000.0), "₹1.5Cr");
        assert_eq!(f.format(125_000.0), "₹1.25L");
        assert_eq!(f.format(50_000.0), "₹50K");
        assert_eq!(f.format(0.0), "₹0");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&ValueFormat::lakh("₹")).unwrap();
        let back: ValueFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ValueFormat::lakh("₹"));
    }
}
