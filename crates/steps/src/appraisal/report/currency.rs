use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display currency. Amounts are always computed in INR and converted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyMode {
    #[default]
    Inr,
    Usd,
}

impl CurrencyMode {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for CurrencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCurrency(pub String);

impl fmt::Display for UnknownCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown currency '{}', expected INR or USD", self.0)
    }
}

impl std::error::Error for UnknownCurrency {}

impl FromStr for CurrencyMode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inr" | "native" => Ok(Self::Inr),
            "usd" | "converted" => Ok(Self::Usd),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }
}

/// Formats native amounts for display in the selected currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyFormatter {
    mode: CurrencyMode,
    exchange_rate: f64,
}

impl MoneyFormatter {
    pub fn new(mode: CurrencyMode, exchange_rate: f64) -> Self {
        Self {
            mode,
            exchange_rate,
        }
    }

    pub fn mode(&self) -> CurrencyMode {
        self.mode
    }

    /// Converts a native amount to the display unit. A non-positive exchange
    /// rate yields `None` rather than an infinite amount.
    pub fn convert(&self, native: f64) -> Option<f64> {
        match self.mode {
            CurrencyMode::Inr => Some(native),
            CurrencyMode::Usd if self.exchange_rate > 0.0 && self.exchange_rate.is_finite() => {
                Some(native / self.exchange_rate)
            }
            CurrencyMode::Usd => None,
        }
    }

    pub fn format(&self, native: f64) -> String {
        match self.convert(native) {
            Some(amount) if amount.is_finite() => match self.mode {
                CurrencyMode::Inr => with_sign(amount, "₹", group_indian),
                CurrencyMode::Usd => with_sign(amount, "$", group_western),
            },
            _ => "-".to_string(),
        }
    }
}

fn with_sign(amount: f64, symbol: &str, group: fn(&str) -> String) -> String {
    let digits = format!("{:.0}", amount.abs());
    let sign = if amount.round() < 0.0 { "-" } else { "" };
    format!("{sign}{symbol}{}", group(&digits))
}

fn group_western(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Indian grouping: the last three digits, then pairs ("12,34,567").
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
    for (index, ch) in head.chars().enumerate() {
        if index > 0 && (head.len() - index) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push(',');
    grouped.push_str(tail);
    grouped
}

/// Whole counts with Indian grouping, as used for graduate totals.
pub fn format_count(count: u64) -> String {
    group_indian(&count.to_string())
}

pub fn format_percent(probability: f64) -> String {
    if probability.is_finite() {
        format!("{:.1} %", probability * 100.0)
    } else {
        "-".to_string()
    }
}

pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) if value.is_finite() => format!("{value:.2}"),
        _ => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inr_uses_indian_grouping() {
        let formatter = MoneyFormatter::new(CurrencyMode::Inr, 83.0);
        assert_eq!(formatter.format(18_000_000.0), "₹1,80,00,000");
        assert_eq!(formatter.format(999.4), "₹999");
        assert_eq!(formatter.format(-1_234_567.0), "-₹12,34,567");
        assert_eq!(formatter.format(f64::NAN), "-");
    }

    #[test]
    fn usd_converts_at_display_time() {
        let formatter = MoneyFormatter::new(CurrencyMode::Usd, 83.0);
        assert_eq!(formatter.format(8_300_000.0), "$100,000");
        assert_eq!(
            MoneyFormatter::new(CurrencyMode::Usd, 0.0).format(1.0),
            "-"
        );
    }

    #[test]
    fn parses_currency_modes() {
        assert_eq!("usd".parse::<CurrencyMode>(), Ok(CurrencyMode::Usd));
        assert_eq!(" INR ".parse::<CurrencyMode>(), Ok(CurrencyMode::Inr));
        assert!("eur".parse::<CurrencyMode>().is_err());
    }

    #[test]
    fn percent_ratio_and_count_helpers() {
        assert_eq!(format_percent(0.38201), "38.2 %");
        assert_eq!(format_ratio(Some(1.234)), "1.23");
        assert_eq!(format_ratio(None), "n/a");
        assert_eq!(format_count(1_234_567), "12,34,567");
        assert_eq!(format_count(76), "76");
    }
}
