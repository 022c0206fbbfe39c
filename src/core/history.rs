//! Pairwise history reconstructed from one currency's base-relative series

use crate::core::rate::CurrencyRate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of published business days requested per history fetch.
pub const HISTORY_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub date: NaiveDate,
    pub mid: f64,
}

/// Upstream history of a single code against the base currency, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub code: String,
    pub points: Vec<RawPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    points: Vec<HistoricalPoint>,
}

impl HistoricalSeries {
    pub fn new(points: Vec<HistoricalPoint>) -> Self {
        HistoricalSeries { points }
    }

    pub fn points(&self) -> &[HistoricalPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&HistoricalPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest value, for chart scaling.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.value, p.value)),
            Some((lo, hi)) => Some((lo.min(p.value), hi.max(p.value))),
        })
    }
}

/// Code whose history has to be fetched for the `from`/`to` pair.
///
/// Upstream only publishes series against the base currency, so the
/// non-base leg is queried. `None` for a same-currency pair.
pub fn history_query(from: &CurrencyRate, to: &CurrencyRate) -> Option<String> {
    if from.same_currency(to) {
        None
    } else if from.is_base() {
        Some(to.code().to_string())
    } else {
        Some(from.code().to_string())
    }
}

/// Derives the `from`→`to` series from the raw series of the queried leg.
///
/// When neither side is the base currency, the non-queried leg is scaled
/// with today's mids rather than its own historical values.
pub fn derive_series(raw: &RawSeries, from: &CurrencyRate, to: &CurrencyRate) -> HistoricalSeries {
    let against_base = from.is_base() || to.is_base();

    HistoricalSeries::new(
        raw.points
            .iter()
            .map(|p| HistoricalPoint {
                date: p.date,
                value: if against_base {
                    1.0 / p.mid
                } else {
                    from.mid() / (p.mid * to.mid())
                },
            })
            .collect(),
    )
}
