use crate::core::config::NbpProviderConfig;
use crate::core::error::FetchError;
use crate::core::history::{HISTORY_WINDOW, RawPoint, RawSeries};
use crate::core::rate::RateTable;
use crate::core::source::RateSource;
use crate::providers::util::with_retry;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

const RETRY_DELAY_MS: u64 = 500;

// NBP table "A" publishes average (mid) rates of the major currencies.
#[derive(Debug, Deserialize)]
struct TableResponse {
    #[serde(rename = "effectiveDate")]
    effective_date: Option<NaiveDate>,
    rates: Vec<TableRate>,
}

#[derive(Debug, Deserialize)]
struct TableRate {
    currency: String,
    code: String,
    mid: f64,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    code: String,
    rates: Vec<HistoryRate>,
}

#[derive(Debug, Deserialize)]
struct HistoryRate {
    #[serde(rename = "effectiveDate")]
    effective_date: NaiveDate,
    mid: f64,
}

pub struct NbpProvider {
    base_url: String,
    retries: usize,
    client: reqwest::Client,
}

impl NbpProvider {
    pub fn new(config: &NbpProviderConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("kantor/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(NbpProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let text = with_retry(
            || async {
                let response = self
                    .client
                    .get(url)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Ok::<_, FetchError>(response.text().await?)
            },
            self.retries,
            RETRY_DELAY_MS,
        )
        .await?;

        serde_json::from_str(&text).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RateSource for NbpProvider {
    #[instrument(name = "NbpTableFetch", skip(self))]
    async fn fetch_table(&self) -> Result<RateTable, FetchError> {
        let url = format!("{}/api/exchangerates/tables/A/", self.base_url);
        debug!("Requesting rate table from {}", url);

        let tables: Vec<TableResponse> = self.get_json(&url).await?;
        let table = tables
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::EmptyTable(url.clone()))?;

        debug!(
            effective_date = ?table.effective_date,
            currencies = table.rates.len(),
            "Received rate table"
        );
        Ok(RateTable::from_published(
            table.effective_date,
            table
                .rates
                .into_iter()
                .map(|r| (r.currency, r.code, r.mid)),
        ))
    }

    #[instrument(name = "NbpHistoryFetch", skip(self), fields(code = %code))]
    async fn fetch_history(&self, code: &str) -> Result<RawSeries, FetchError> {
        let url = format!(
            "{}/api/exchangerates/rates/A/{}/last/{}/",
            self.base_url,
            code.to_lowercase(),
            HISTORY_WINDOW
        );
        debug!("Requesting history from {}", url);

        let history: HistoryResponse = self.get_json(&url).await?;

        if let Some(bad) = history.rates.iter().find(|r| !r.mid.is_finite() || r.mid <= 0.0) {
            return Err(FetchError::InvalidData(format!(
                "mid {} for {} on {}",
                bad.mid, history.code, bad.effective_date
            )));
        }

        let mut points: Vec<RawPoint> = history
            .rates
            .into_iter()
            .map(|r| RawPoint {
                date: r.effective_date,
                mid: r.mid,
            })
            .collect();
        points.sort_by_key(|p| p.date);

        Ok(RawSeries {
            code: history.code.to_uppercase(),
            points,
        })
    }
}
