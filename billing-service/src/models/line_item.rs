//! Line items: user-entered priced rows and the derived aggregate rows.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::UnknownCurrency;
use super::document::DocumentBody;

/// Statutory VAT applied to every document total.
pub static VAT_RATE: Lazy<Decimal> = Lazy::new(|| Decimal::new(7, 2));

/// A user-entered row. Price and amount keep the entered text verbatim;
/// they parse to numbers only when a total is computed, and text that does
/// not parse counts as zero (entry stays free-form while editing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricedLineItem {
    pub name: String,
    pub price: String,
    pub amount: String,
}

impl PricedLineItem {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            amount: amount.into(),
        }
    }

    /// Raw numeric total: `price * amount`.
    pub fn total(&self) -> Decimal {
        parse_decimal(&self.price) * parse_decimal(&self.amount)
    }
}

/// Lenient numeric parse: empty or malformed text is zero.
pub(crate) fn parse_decimal(text: &str) -> Decimal {
    text.trim().parse().unwrap_or(Decimal::ZERO)
}

/// Persisted shape of a priced row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItemEntry {
    pub name: String,
    pub price: String,
    pub amount: String,
}

impl From<&PricedLineItem> for LineItemEntry {
    fn from(item: &PricedLineItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price.clone(),
            amount: item.amount.clone(),
        }
    }
}

impl From<LineItemEntry> for PricedLineItem {
    fn from(entry: LineItemEntry) -> Self {
        Self {
            name: entry.name,
            price: entry.price,
            amount: entry.amount,
        }
    }
}

/// One display row of a document. Priced rows borrow their stored item;
/// the three aggregate rows carry only the owner handle and recompute
/// from it on every read, so they can never go stale. The handle is a
/// plain borrow and none of these rows serialize; persistence goes
/// through [`LineItemEntry`].
#[derive(Debug, Clone, Copy)]
pub enum LineItem<'a> {
    Priced {
        owner: &'a DocumentBody,
        item: &'a PricedLineItem,
    },
    Total {
        owner: &'a DocumentBody,
    },
    Tax {
        owner: &'a DocumentBody,
    },
    GrandTotal {
        owner: &'a DocumentBody,
    },
}

impl<'a> LineItem<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            LineItem::Priced { item, .. } => &item.name,
            LineItem::Total { .. } => "Total",
            LineItem::Tax { .. } => "VAT 7%",
            LineItem::GrandTotal { .. } => "Grand Total",
        }
    }

    /// Entered price text; aggregate rows have none.
    pub fn price(&self) -> &'a str {
        match *self {
            LineItem::Priced { item, .. } => &item.price,
            _ => "",
        }
    }

    /// Entered amount text; aggregate rows have none.
    pub fn amount(&self) -> &'a str {
        match *self {
            LineItem::Priced { item, .. } => &item.amount,
            _ => "",
        }
    }

    pub fn owner(&self) -> &'a DocumentBody {
        match *self {
            LineItem::Priced { owner, .. }
            | LineItem::Total { owner }
            | LineItem::Tax { owner }
            | LineItem::GrandTotal { owner } => owner,
        }
    }

    /// Raw numeric value of the row, read from the owner's current state.
    pub fn total(&self) -> Decimal {
        match *self {
            LineItem::Priced { item, .. } => item.total(),
            LineItem::Total { owner } => owner.total(),
            LineItem::Tax { owner } => owner.total() * *VAT_RATE,
            LineItem::GrandTotal { owner } => owner.total() * (Decimal::ONE + *VAT_RATE),
        }
    }

    /// Unit price in the owner's currency. Empty for aggregate rows and
    /// for priced rows whose price has not been entered yet; presentation
    /// relies on this to hide the price column for aggregates.
    pub fn formatted_price(&self) -> Result<String, UnknownCurrency> {
        match *self {
            LineItem::Priced { owner, item } if !item.price.is_empty() => {
                owner.format_amount(parse_decimal(&item.price))
            }
            _ => Ok(String::new()),
        }
    }

    /// Row total in the owner's currency.
    pub fn formatted_total(&self) -> Result<String, UnknownCurrency> {
        self.owner().format_amount(self.total())
    }
}
