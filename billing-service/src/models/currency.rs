//! Display currencies for billing documents.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Lookup failure for a currency code outside the supported set. Surfaced
/// to the caller rather than defaulted: formatting with an unsupported
/// code is a data error, not an entry mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

/// Currencies the formatter knows how to render. A currency is a display
/// choice over one stored numeric amount; switching it never converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Thb,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Thb => "THB",
            Currency::Usd => "USD",
        }
    }

    /// Codes accepted by [`Currency::lookup`].
    pub fn supported_codes() -> &'static [&'static str] {
        &["THB", "USD"]
    }

    pub fn lookup(code: &str) -> Result<Self, UnknownCurrency> {
        match code {
            "THB" => Ok(Currency::Thb),
            "USD" => Ok(Currency::Usd),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }

    /// Render an amount with the currency code displayed, e.g.
    /// `THB 400,800.00`. Pure function of (currency, amount).
    pub fn format(&self, amount: Decimal) -> String {
        format!("{} {}", self.as_str(), group_digits(amount))
    }
}

/// Two decimal places, halves rounded away from zero, integer digits
/// grouped by three. Both supported locales group the same way, so one
/// routine covers the map.
fn group_digits(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = rounded.to_string();
    let unsigned = text.trim_start_matches('-');
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (offset, digit) in int_part.chars().enumerate() {
        if offset > 0 && (int_part.len() - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if text.starts_with('-') { "-" } else { "" };
    format!("{}{}.{:0<2}", sign, grouped, frac_part)
}
