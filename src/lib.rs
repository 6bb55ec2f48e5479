//! Cryptocompare price history browser.
//!
//! Fetches price history for a curated list of coins concurrently and
//! derives the data the charts need: per-coin growth rates, series
//! rebased to 100, aggregated trading volumes and a pairwise correlation
//! matrix. The console binary is one consumer; the analytics take and
//! return plain data, so any front end can sit on top.

pub mod analytics;
pub mod coin_list;
pub mod history;
pub mod table;
pub mod timeframe;

pub use analytics::{
    aggregate_volumes, correlation_matrix, growth_rate, growth_rates, index_series,
    CorrelationMatrix,
};
pub use coin_list::{CoinEntry, CoinList, NamedCoinList};
pub use history::{
    CryptoCompareClient, HistoryError, HistorySource, PriceDataSet, PriceLoader, PriceSample,
    PriceSeries,
};
pub use timeframe::{Granularity, Timeframe, CURRENCIES, TIMEFRAMES};
