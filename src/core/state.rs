//! Application state and the reducer that advances it
//!
//! Every front-end event, including the shake gesture and async fetch
//! completions, goes through [`AppState::reduce`]. The reducer returns a new
//! state plus the side effects the driver has to run; it never performs I/O.

use crate::core::conversion::{Conversion, parse_amount, unit_rate};
use crate::core::error::FetchError;
use crate::core::history::{HistoricalPoint, HistoricalSeries, RawSeries, derive_series, history_query};
use crate::core::random::pick_random_pair;
use crate::core::rate::{CurrencyRate, RateTable};
use rand::Rng;
use tracing::{debug, warn};

pub const DEFAULT_AMOUNT: &str = "1.0";

#[derive(Debug, Clone, PartialEq)]
pub enum TableStatus {
    Loading,
    Ready(RateTable),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TableLoaded(Result<RateTable, FetchError>),
    FromSelected(String),
    ToSelected(String),
    AmountChanged(String),
    ShakeDetected,
    HistoryLoaded {
        seq: u64,
        result: Result<RawSeries, FetchError>,
    },
    PointSelected(usize),
}

/// A history fetch tagged with the sequence number of the pair it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    pub seq: u64,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchHistory(HistoryRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub table: TableStatus,
    pub from: Option<CurrencyRate>,
    pub to: Option<CurrencyRate>,
    pub amount: String,
    pub history: HistoricalSeries,
    pub loading_history: bool,
    pub history_error: Option<String>,
    pub selected_point: Option<HistoricalPoint>,
    pub history_seq: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_amount(DEFAULT_AMOUNT)
    }
}

impl AppState {
    pub fn with_amount(amount: &str) -> Self {
        AppState {
            table: TableStatus::Loading,
            from: None,
            to: None,
            amount: amount.to_string(),
            history: HistoricalSeries::default(),
            loading_history: false,
            history_error: None,
            selected_point: None,
            history_seq: 0,
        }
    }

    pub fn rate_table(&self) -> Option<&RateTable> {
        match &self.table {
            TableStatus::Ready(table) => Some(table),
            _ => None,
        }
    }

    /// Converted amount and unit rate, when both currencies are chosen and
    /// the amount text parses.
    pub fn conversion(&self) -> Option<Conversion> {
        let from = self.from.as_ref()?;
        let to = self.to.as_ref()?;
        let amount = parse_amount(&self.amount)?;
        Some(Conversion::compute(from, to, amount))
    }

    /// `from.mid / to.mid` once both currencies are chosen, whatever the
    /// amount text says.
    pub fn unit_rate(&self) -> Option<f64> {
        Some(unit_rate(self.from.as_ref()?, self.to.as_ref()?))
    }

    pub fn reduce<R: Rng + ?Sized>(mut self, event: Event, rng: &mut R) -> Transition {
        let effects = match event {
            Event::TableLoaded(Ok(table)) => {
                debug!(currencies = table.len(), "Rate table loaded");
                self.table = TableStatus::Ready(table);
                Vec::new()
            }
            Event::TableLoaded(Err(e)) => {
                warn!("Rate table fetch failed: {e}");
                self.table = TableStatus::Failed(e.to_string());
                Vec::new()
            }
            Event::FromSelected(code) => match self.lookup(&code) {
                Some(rate) => {
                    self.from = Some(rate);
                    self.pair_changed()
                }
                None => Vec::new(),
            },
            Event::ToSelected(code) => match self.lookup(&code) {
                Some(rate) => {
                    self.to = Some(rate);
                    self.pair_changed()
                }
                None => Vec::new(),
            },
            Event::AmountChanged(text) => {
                self.amount = text;
                Vec::new()
            }
            Event::ShakeDetected => {
                let picked = self.rate_table().and_then(|t| pick_random_pair(t, rng));
                match picked {
                    Some((from, to)) => {
                        debug!(from = from.code(), to = to.code(), "Random pair picked");
                        self.from = Some(from);
                        self.to = Some(to);
                        self.pair_changed()
                    }
                    None => Vec::new(),
                }
            }
            Event::HistoryLoaded { seq, result } => {
                self.history_loaded(seq, result);
                Vec::new()
            }
            Event::PointSelected(index) => {
                if let Some(point) = self.history.point(index) {
                    self.selected_point = Some(*point);
                }
                Vec::new()
            }
        };

        Transition {
            state: self,
            effects,
        }
    }

    fn lookup(&self, code: &str) -> Option<CurrencyRate> {
        let Some(table) = self.rate_table() else {
            warn!(code, "Ignoring selection before the rate table is loaded");
            return None;
        };
        let rate = table.get(code).cloned();
        if rate.is_none() {
            warn!(code, "Ignoring selection of unknown currency");
        }
        rate
    }

    /// Invalidates any in-flight history and requests the series for the new pair.
    fn pair_changed(&mut self) -> Vec<Effect> {
        self.history_seq += 1;
        self.history = HistoricalSeries::default();
        self.selected_point = None;
        self.history_error = None;
        self.loading_history = false;

        let (Some(from), Some(to)) = (&self.from, &self.to) else {
            return Vec::new();
        };
        match history_query(from, to) {
            Some(code) => {
                self.loading_history = true;
                vec![Effect::FetchHistory(HistoryRequest {
                    seq: self.history_seq,
                    code,
                })]
            }
            None => Vec::new(),
        }
    }

    fn history_loaded(&mut self, seq: u64, result: Result<RawSeries, FetchError>) {
        if seq != self.history_seq {
            debug!(seq, current = self.history_seq, "Discarding stale history");
            return;
        }
        self.loading_history = false;

        match result {
            Ok(raw) => {
                if let (Some(from), Some(to)) = (&self.from, &self.to) {
                    self.history = derive_series(&raw, from, to);
                }
            }
            Err(e) => {
                warn!("History fetch failed: {e}");
                self.history = HistoricalSeries::default();
                self.history_error = Some(e.to_string());
            }
        }
    }
}
