use anyhow::Result;
use crypto_browser::coin_list::{self, CoinList};
use crypto_browser::history::{CryptoCompareClient, PriceLoader};
use crypto_browser::timeframe::{Timeframe, CURRENCIES, TIMEFRAMES};
use crypto_browser::{analytics, table};
use std::time::Duration;
use tracing::error;

const COIN_LISTS_FILE: &str = "coin_lists.txt";

// auto refresh interval in --watch mode
const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

struct Options {
    list_name: Option<String>,
    currency: String,
    timeframe: Timeframe,
    watch: bool,
}

fn parse_args() -> Options {
    let mut options = Options {
        list_name: None,
        currency: "EUR".to_string(),
        timeframe: Timeframe::from_label("1-day").unwrap(),
        watch: false,
    };

    for arg in std::env::args().skip(1) {
        if arg == "--watch" {
            options.watch = true;
        } else if arg == "--help" || arg == "-h" {
            let labels: Vec<&str> = TIMEFRAMES.iter().map(|t| t.label).collect();
            println!("usage: crypto-browser [LIST] [CURRENCY] [TIMEFRAME] [--watch]");
            println!("  currencies: {}", CURRENCIES.join(" "));
            println!("  timeframes: {}", labels.join(" "));
            std::process::exit(0);
        } else if let Some(tf) = Timeframe::from_label(&arg) {
            options.timeframe = tf;
        } else if CURRENCIES.contains(&arg.to_uppercase().as_str()) {
            options.currency = arg.to_uppercase();
        } else {
            options.list_name = Some(arg);
        }
    }

    options
}

async fn select_coin_list(options: &Options) -> CoinList {
    let lists = match coin_list::read_coin_lists(COIN_LISTS_FILE).await {
        Ok(lists) => lists,
        Err(err) => {
            error!("could not load config files: {err:#}");
            return CoinList::default();
        }
    };

    match &options.list_name {
        Some(name) => match lists.iter().find(|l| &l.name == name) {
            Some(list) => list.coins.clone(),
            None => {
                let known: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
                error!("no coin list named {:?} (known: {})", name, known.join(", "));
                CoinList::default()
            }
        },
        None => lists.into_iter().next().map(|l| l.coins).unwrap_or_default(),
    }
}

async fn fetch_and_display(
    loader: &PriceLoader<CryptoCompareClient>,
    coins: &CoinList,
    options: &Options,
) {
    let tf = options.timeframe;
    let data = loader
        .load(coins, &options.currency, tf.granularity, tf.limit)
        .await;

    let growth_rates = analytics::growth_rates(coins, &data);
    let volumes = analytics::aggregate_volumes(&data);
    let correlations = analytics::correlation_matrix(coins, &data);

    println!("\n{}", table::fetched_header(tf.label, &options.currency));
    println!("{}", table::summary_table(coins, &data, &growth_rates));
    if let Some(last) = volumes.last() {
        println!("Combined volume, last bucket: {:.2}", last);
    }
    if correlations.size() > 1 {
        println!("\nPrice correlations:\n{}", table::correlation_table(&correlations));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let options = parse_args();

    // Step 1: load the coin list selection from the config file
    let coins = select_coin_list(&options).await;
    if coins.is_empty() {
        println!("No coins to show.");
        return Ok(());
    }

    // Step 2: set up the API client and the bounded concurrent loader
    let loader = PriceLoader::new(CryptoCompareClient::new()?);

    // Step 3: fetch, analyze, display; keep refreshing in watch mode
    loop {
        fetch_and_display(&loader, &coins, &options).await;
        if !options.watch {
            break;
        }
        tokio::time::sleep(REFRESH_INTERVAL).await;
    }

    Ok(())
}
