//! Pure transformations over a [`PriceDataSet`]: growth rates, indexed
//! (rebased) series, aggregated volumes and the pairwise correlation
//! matrix. Nothing here touches the network or panics on bad numeric
//! input; degenerate cases normalize to 0 / empty, so a coin whose fetch
//! failed shows up as a flat zero rather than taking the dashboard down.

use crate::coin_list::CoinList;
use crate::history::{PriceDataSet, PriceSample, PriceSeries};

/// Percentage change between the first and last close of a series.
/// Empty series and series starting at a close of 0 yield 0.
pub fn growth_rate(prices: &[PriceSample]) -> f64 {
    let (Some(first), Some(last)) = (prices.first(), prices.last()) else {
        return 0.0;
    };
    if first.close == 0.0 {
        return 0.0;
    }
    (last.close / first.close - 1.0) * 100.0
}

/// One growth rate per coin, in coin-list order. Coins missing from the
/// data set count as empty series.
pub fn growth_rates(coin_list: &CoinList, data: &PriceDataSet) -> Vec<f64> {
    coin_list
        .tickers()
        .map(|ticker| growth_rate(data.series(ticker).map_or(&[][..], |s| s.as_slice())))
        .collect()
}

/// Rebases a series so its first close equals 100, for cross-asset
/// comparison. Returns `None` when the series starts at 0 (or is empty):
/// such a series cannot be indexed and must not be drawn. Timestamps and
/// volumes are carried over untouched.
pub fn index_series(prices: &[PriceSample]) -> Option<PriceSeries> {
    let base = prices.first()?.close;
    if base == 0.0 {
        return None;
    }
    let scale = 100.0 / base;
    Some(
        prices
            .iter()
            .map(|sample| PriceSample {
                close: sample.close * scale,
                ..*sample
            })
            .collect(),
    )
}

/// Per-bucket sum of `volumefrom + volumeto` across all coins, for the
/// secondary volume axis. Series shortened by a failed fetch contribute 0
/// past their end; the output is as long as the longest series.
pub fn aggregate_volumes(data: &PriceDataSet) -> Vec<f64> {
    let len = data.iter().map(|(_, series)| series.len()).max().unwrap_or(0);
    let mut totals = vec![0.0; len];
    for (_, series) in data.iter() {
        for (i, sample) in series.iter().enumerate() {
            totals[i] += sample.volumefrom + sample.volumeto;
        }
    }
    totals
}

/// Pairwise Pearson correlations of closing prices, with the axis labels
/// in coin-list order. Only the lower triangle (including the diagonal,
/// which is 1.0) is computed; the upper triangle is zero-filled, matching
/// the heatmap that only renders one side.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }
}

pub fn correlation_matrix(coin_list: &CoinList, data: &PriceDataSet) -> CorrelationMatrix {
    let labels: Vec<String> = coin_list.tickers().map(String::from).collect();

    let closes: Vec<Vec<f64>> = labels
        .iter()
        .map(|ticker| {
            data.series(ticker)
                .map(|series| series.iter().map(|s| s.close).collect())
                .unwrap_or_default()
        })
        .collect();

    let n = labels.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            values[i][j] = if i == j {
                1.0
            } else {
                pearson_r(&closes[i], &closes[j])
            };
        }
    }

    CorrelationMatrix { labels, values }
}

/// Pearson correlation coefficient (the linear-regression r-value) of two
/// sequences, truncated to the shorter length. Degenerate fits (constant
/// or empty input) yield 0.
fn pearson_r(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    cov / denom
}
