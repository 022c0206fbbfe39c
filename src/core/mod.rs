//! Core business logic: rates, conversion, history and the state reducer

pub mod config;
pub mod conversion;
pub mod error;
pub mod history;
pub mod log;
pub mod random;
pub mod rate;
pub mod session;
pub mod source;
pub mod state;

// Re-export main types for cleaner imports
pub use conversion::{Conversion, convert, parse_amount, unit_rate};
pub use error::{FetchError, RateError};
pub use history::{HistoricalPoint, HistoricalSeries, RawPoint, RawSeries, derive_series};
pub use rate::{CurrencyRate, RateTable};
pub use session::Session;
pub use source::RateSource;
pub use state::{AppState, Event, TableStatus};
