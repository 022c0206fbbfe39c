//! Cross-rate arithmetic over base-denominated mids

use crate::core::rate::CurrencyRate;

/// Parses user-entered amount text.
///
/// Accepts finite, non-negative decimals only. `-0` comes back as `0.0`.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v + 0.0)
}

/// Rate of one unit of `from` expressed in `to`.
pub fn unit_rate(from: &CurrencyRate, to: &CurrencyRate) -> f64 {
    from.mid() / to.mid()
}

/// Converts `amount_text` of `from` into `to`. Unparseable text counts as zero.
pub fn convert(from: &CurrencyRate, to: &CurrencyRate, amount_text: &str) -> f64 {
    parse_amount(amount_text).unwrap_or(0.0) * unit_rate(from, to)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from_code: String,
    pub to_code: String,
    pub amount: f64,
    pub converted: f64,
    pub unit_rate: f64,
}

impl Conversion {
    pub fn compute(from: &CurrencyRate, to: &CurrencyRate, amount: f64) -> Self {
        let rate = unit_rate(from, to);
        Conversion {
            from_code: from.code().to_string(),
            to_code: to.code().to_string(),
            amount,
            converted: amount * rate,
            unit_rate: rate,
        }
    }

    /// e.g. `9.30 EUR`
    pub fn converted_label(&self) -> String {
        format!("{:.2} {}", self.converted, self.to_code)
    }

    /// e.g. `1 USD = 0.9302 EUR`
    pub fn unit_rate_label(&self) -> String {
        rate_label(&self.from_code, self.unit_rate, &self.to_code)
    }
}

pub fn rate_label(from_code: &str, rate: f64, to_code: &str) -> String {
    format!("1 {from_code} = {rate:.4} {to_code}")
}
