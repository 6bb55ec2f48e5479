use chrono::Duration;

/// Sampling interval of the cryptocompare history endpoints. Selects the
/// endpoint path segment (`histominute`, `histohour`, `histoday`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Minute,
    Hour,
    Day,
}

impl Granularity {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        }
    }

    /// Width of one time bucket at this granularity.
    pub fn bucket(&self) -> Duration {
        match self {
            Granularity::Minute => Duration::minutes(1),
            Granularity::Hour => Duration::hours(1),
            Granularity::Day => Duration::days(1),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A named time window: how far back to look and at which granularity.
/// `limit` is the sample count passed to the API (which returns limit + 1
/// buckets, the last one being the current, incomplete bucket).
#[derive(Debug, Clone, Copy)]
pub struct Timeframe {
    pub label: &'static str,
    pub granularity: Granularity,
    pub limit: u32,
}

/// The selectable time windows, e.g. "1-week" = 168 hourly buckets.
pub const TIMEFRAMES: [Timeframe; 7] = [
    Timeframe { label: "1-hour", granularity: Granularity::Minute, limit: 60 },
    Timeframe { label: "1-day", granularity: Granularity::Minute, limit: 1440 },
    Timeframe { label: "1-week", granularity: Granularity::Hour, limit: 168 },
    Timeframe { label: "1-month", granularity: Granularity::Hour, limit: 720 },
    Timeframe { label: "3-months", granularity: Granularity::Day, limit: 90 },
    Timeframe { label: "6-months", granularity: Granularity::Day, limit: 180 },
    Timeframe { label: "1-year", granularity: Granularity::Day, limit: 365 },
];

/// Settlement currencies offered by the browser.
pub const CURRENCIES: [&str; 5] = ["EUR", "USD", "BTC", "ETH", "BNB"];

impl Timeframe {
    pub fn from_label(label: &str) -> Option<Timeframe> {
        TIMEFRAMES.iter().find(|t| t.label == label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lookup() {
        let tf = Timeframe::from_label("1-week").unwrap();
        assert_eq!(tf.granularity, Granularity::Hour);
        assert_eq!(tf.limit, 168);

        assert!(Timeframe::from_label("2-weeks").is_none());
    }

    #[test]
    fn bucket_widths() {
        assert_eq!(Granularity::Minute.bucket(), Duration::minutes(1));
        assert_eq!(Granularity::Day.bucket(), Duration::days(1));
    }
}
