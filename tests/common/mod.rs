//! Shared test utilities: sample series builders and a scriptable fake
//! history source for exercising the loader without a network.

use crypto_browser::history::{HistoryError, HistorySource, PriceSample, PriceSeries};
use crypto_browser::timeframe::Granularity;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Builds a series from closing prices, hourly spaced, zero volumes.
pub fn sample_series(closes: &[f64]) -> PriceSeries {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceSample {
            time: 1_700_000_000 + i as i64 * 3600,
            close,
            volumefrom: 1.0,
            volumeto: 1.0,
        })
        .collect()
}

/// A linear closing-price ramp of `limit + 1` samples starting at `start`.
pub fn ramp_series(start: f64, step: f64, limit: u32) -> PriceSeries {
    let closes: Vec<f64> = (0..=limit).map(|i| start + step * i as f64).collect();
    sample_series(&closes)
}

/// Scripted per-ticker responses: `Some(series)` succeeds, `None` fails
/// with a simulated API error. Every request is recorded, and the peak
/// number of concurrently served requests is tracked.
pub struct FakeSource {
    responses: HashMap<String, Option<PriceSeries>>,
    delay: Duration,
    pub requests: Mutex<Vec<(String, String)>>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new(responses: HashMap<String, Option<PriceSeries>>) -> Self {
        FakeSource {
            responses,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requested_tickers(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(ticker, _)| ticker.clone())
            .collect()
    }
}

impl HistorySource for FakeSource {
    async fn fetch(
        &self,
        ticker: &str,
        currency: &str,
        _granularity: Granularity,
        _limit: u32,
    ) -> Result<PriceSeries, HistoryError> {
        self.requests
            .lock()
            .unwrap()
            .push((ticker.to_string(), currency.to_string()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.get(ticker) {
            Some(Some(series)) => Ok(series.clone()),
            _ => Err(HistoryError::NoData {
                ticker: ticker.to_string(),
                message: "simulated failure".to_string(),
            }),
        }
    }
}
