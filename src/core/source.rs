//! Upstream exchange-rate source abstraction

use crate::core::error::FetchError;
use crate::core::history::RawSeries;
use crate::core::rate::RateTable;
use async_trait::async_trait;

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Latest published table, base entry included.
    async fn fetch_table(&self) -> Result<RateTable, FetchError>;

    /// Recent base-relative history of `code`, ascending by date.
    async fn fetch_history(&self, code: &str) -> Result<RawSeries, FetchError>;
}
