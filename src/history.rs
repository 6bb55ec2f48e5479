//! Price history fetching: the cryptocompare API client and the bounded
//! concurrent loader that turns a [`CoinList`] into a [`PriceDataSet`].

use crate::coin_list::CoinList;
use crate::timeframe::Granularity;
use chrono::Utc;
use futures::StreamExt;
use reqwest::Client;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const PRICE_URL: &str = "https://min-api.cryptocompare.com/data/histo";

/// Cap on simultaneous in-flight requests, use with caution, more may
/// trigger API limits.
pub const MAX_IN_FLIGHT: usize = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One time bucket of one coin's history, as returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Unix timestamp (seconds) of the bucket.
    pub time: i64,
    pub close: f64,
    /// Volume traded from the asset (base volume).
    pub volumefrom: f64,
    /// Volume traded to the asset (quote volume).
    pub volumeto: f64,
}

/// Ordered samples for one coin, oldest first. The API returns
/// `limit + 1` buckets, the last one being the current, incomplete bucket.
pub type PriceSeries = Vec<PriceSample>;

/// The joined result of one fetch cycle: one series per coin, keyed by
/// ticker and ordered like the [`CoinList`] that was requested. A coin
/// whose fetch failed is present with an empty series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceDataSet {
    entries: Vec<(String, PriceSeries)>,
}

impl PriceDataSet {
    pub fn from_entries(entries: Vec<(String, PriceSeries)>) -> Self {
        PriceDataSet { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn series(&self, ticker: &str) -> Option<&PriceSeries> {
        self.entries
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriceSeries)> {
        self.entries.iter().map(|(t, s)| (t.as_str(), s))
    }
}

impl Serialize for PriceDataSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (ticker, series) in &self.entries {
            map.serialize_entry(ticker, series)?;
        }
        map.end()
    }
}

/// Why a single coin's fetch produced no data. The loader logs this and
/// degrades the coin to an empty series; it never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The HTTP request failed (connect, timeout, non-2xx status).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response parsed but carried no usable "Data" array, e.g. an
    /// API-level error body for an unknown ticker.
    #[error("no price data for {ticker}: {message}")]
    NoData { ticker: String, message: String },
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(rename = "Data")]
    data: Option<Vec<PriceSample>>,
    #[serde(rename = "Message")]
    message: Option<String>,
}

/// A source of per-coin price history. The real implementation is
/// [`CryptoCompareClient`]; tests inject fakes.
pub trait HistorySource {
    async fn fetch(
        &self,
        ticker: &str,
        currency: &str,
        granularity: Granularity,
        limit: u32,
    ) -> Result<PriceSeries, HistoryError>;
}

/// Cryptocompare API wrapper for the `histominute` / `histohour` /
/// `histoday` endpoints.
pub struct CryptoCompareClient {
    client: Client,
    base_url: String,
}

impl CryptoCompareClient {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(PRICE_URL)
    }

    /// Points the client at a different endpoint prefix (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(CryptoCompareClient {
            client,
            base_url: base_url.into(),
        })
    }
}

impl HistorySource for CryptoCompareClient {
    async fn fetch(
        &self,
        ticker: &str,
        currency: &str,
        granularity: Granularity,
        limit: u32,
    ) -> Result<PriceSeries, HistoryError> {
        let url = format!("{}{}", self.base_url, granularity.path_segment());
        let response = self
            .client
            .get(&url)
            .query(&[
                ("fsym", ticker),
                ("tsym", currency),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: HistoryResponse = response.json().await?;
        match payload.data {
            Some(data) => Ok(data),
            None => Err(HistoryError::NoData {
                ticker: ticker.to_string(),
                message: payload
                    .message
                    .unwrap_or_else(|| "missing \"Data\" field".to_string()),
            }),
        }
    }
}

/// Flat series standing in for the settlement currency itself: the API has
/// no TICKER/TICKER history, so price and volume are pinned at 1.0 across
/// `limit + 1` buckets spaced backward from now.
pub fn synthetic_unit_series(granularity: Granularity, limit: u32) -> PriceSeries {
    let step = granularity.bucket();
    let end = Utc::now();
    (0..=limit)
        .map(|i| {
            let at = end - step * (limit - i) as i32;
            PriceSample {
                time: at.timestamp(),
                close: 1.0,
                volumefrom: 1.0,
                volumeto: 0.0,
            }
        })
        .collect()
}

/// Fans one fetch per coin out over at most [`MAX_IN_FLIGHT`] concurrent
/// requests and joins the answers back in coin-list order. Responses
/// arrive in arbitrary order on the wire; `buffered` re-aligns them with
/// the issuing coin, so callers can rely on the data set matching the
/// list positionally.
pub struct PriceLoader<S> {
    source: S,
    max_in_flight: usize,
}

impl<S: HistorySource> PriceLoader<S> {
    pub fn new(source: S) -> Self {
        PriceLoader {
            source,
            max_in_flight: MAX_IN_FLIGHT,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn source_ref(&self) -> &S {
        &self.source
    }

    /// Fetches every coin of `coin_list` against `currency`. Completes
    /// only once every coin has resolved; a failed coin resolves to an
    /// empty series (logged), a coin equal to the settlement currency
    /// resolves to a synthetic flat series without touching the network.
    pub async fn load(
        &self,
        coin_list: &CoinList,
        currency: &str,
        granularity: Granularity,
        limit: u32,
    ) -> PriceDataSet {
        let entries = futures::stream::iter(coin_list.tickers())
            .map(|ticker| async move {
                if ticker == currency {
                    debug!(ticker, "coin is the settlement currency, synthesizing flat series");
                    return (ticker.to_string(), synthetic_unit_series(granularity, limit));
                }
                match self.source.fetch(ticker, currency, granularity, limit).await {
                    Ok(series) => {
                        debug!(ticker, samples = series.len(), "fetched");
                        (ticker.to_string(), series)
                    }
                    Err(err) => {
                        warn!(ticker, %err, "fetch failed, degrading to empty series");
                        (ticker.to_string(), PriceSeries::new())
                    }
                }
            })
            .buffered(self.max_in_flight)
            .collect::<Vec<_>>()
            .await;

        PriceDataSet::from_entries(entries)
    }
}
