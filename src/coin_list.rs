use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;

// The editor caps lists at 12 coins; the pipeline itself accepts any size.
pub const MAX_LIST_LEN: usize = 12;

const DEFAULT_COLOR: &str = "gray";

/// One entry of a coin list: a ticker and the display color the charts use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinEntry {
    pub ticker: String,
    pub color: String,
}

/// An ordered ticker -> display-color mapping, as curated by the list
/// editor. Iteration order is insertion order of the underlying JSON
/// object and defines the ordering of every derived output (growth rates,
/// correlation labels, table rows).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinList {
    entries: Vec<CoinEntry>,
}

impl CoinList {
    pub fn new(entries: Vec<CoinEntry>) -> Self {
        CoinList { entries }
    }

    /// Convenience constructor for (ticker, color) pairs.
    pub fn from_pairs<I, S, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<String>,
    {
        CoinList {
            entries: pairs
                .into_iter()
                .map(|(t, c)| CoinEntry { ticker: t.into(), color: c.into() })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoinEntry> {
        self.entries.iter()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.ticker.as_str())
    }

    pub fn color_of(&self, ticker: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.ticker == ticker)
            .map(|e| e.color.as_str())
    }

    fn from_json_object(obj: &Map<String, Value>) -> Self {
        let entries = obj
            .iter()
            .map(|(ticker, color)| CoinEntry {
                ticker: ticker.clone(),
                // coins never assigned a color in the editor fall back to gray
                color: color.as_str().unwrap_or(DEFAULT_COLOR).to_string(),
            })
            .collect();
        CoinList { entries }
    }
}

impl<'de> Deserialize<'de> for CoinList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // serde_json's Map keeps insertion order (preserve_order feature),
        // which is what makes the list ordering deterministic.
        let obj = Map::<String, Value>::deserialize(deserializer)?;
        Ok(CoinList::from_json_object(&obj))
    }
}

/// A coin list together with the name it is stored under in
/// `coin_lists.txt`.
#[derive(Debug, Clone)]
pub struct NamedCoinList {
    pub name: String,
    pub coins: CoinList,
}

/// Reads all named coin lists from a `coin_lists.txt`-style JSON file:
/// `{ "list name": { "TICKER": "color", ... }, ... }`.
pub async fn read_coin_lists<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NamedCoinList>> {
    let path = path.as_ref();
    let content = fs::read(path)
        .await
        .with_context(|| format!("could not read coin lists from {:?}", path))?;

    let data: Map<String, Value> =
        serde_json::from_slice(&content).with_context(|| format!("bad JSON in {:?}", path))?;

    let lists = data
        .iter()
        .map(|(name, value)| {
            let obj = value
                .as_object()
                .with_context(|| format!("list {:?} is not an object", name))?;
            Ok(NamedCoinList {
                name: name.clone(),
                coins: CoinList::from_json_object(obj),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(lists)
}

/// Reads the master ticker -> color mapping (`all_coins_colors.txt`).
pub async fn read_master_colors<P: AsRef<Path>>(path: P) -> anyhow::Result<CoinList> {
    let path = path.as_ref();
    let content = fs::read(path)
        .await
        .with_context(|| format!("could not read master coin colors from {:?}", path))?;
    let list = serde_json::from_slice(&content).with_context(|| format!("bad JSON in {:?}", path))?;
    Ok(list)
}
