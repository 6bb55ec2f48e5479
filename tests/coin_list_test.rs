use crypto_browser::coin_list::{read_coin_lists, read_master_colors};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes()).expect("failed to write temp file");
    file
}

#[tokio::test]
async fn reads_named_lists_in_file_order() {
    let file = write_file(
        r#"{
            "Majors": {"BTC": "orange", "ETH": "blue"},
            "Privacy": {"XMR": "darkgrey", "ZEC": "gold", "DASH": "navy"}
        }"#,
    );

    let lists = read_coin_lists(file.path()).await.unwrap();
    assert_eq!(lists.len(), 2);

    assert_eq!(lists[0].name, "Majors");
    let tickers: Vec<&str> = lists[0].coins.tickers().collect();
    assert_eq!(tickers, ["BTC", "ETH"]);
    assert_eq!(lists[0].coins.color_of("BTC"), Some("orange"));

    assert_eq!(lists[1].name, "Privacy");
    assert_eq!(lists[1].coins.len(), 3);
}

#[tokio::test]
async fn empty_list_is_allowed() {
    let file = write_file(r#"{"Fresh": {}}"#);
    let lists = read_coin_lists(file.path()).await.unwrap();
    assert_eq!(lists.len(), 1);
    assert!(lists[0].coins.is_empty());
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let result = read_coin_lists("does/not/exist/coin_lists.txt").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn broken_json_is_an_error() {
    let file = write_file("{ not json");
    assert!(read_coin_lists(file.path()).await.is_err());
}

#[tokio::test]
async fn non_object_list_is_an_error() {
    let file = write_file(r#"{"Majors": ["BTC", "ETH"]}"#);
    assert!(read_coin_lists(file.path()).await.is_err());
}

#[tokio::test]
async fn reads_master_color_map() {
    let file = write_file(r#"{"BTC": "orange", "ETH": "blue", "ADA": null}"#);
    let master = read_master_colors(file.path()).await.unwrap();
    assert_eq!(master.len(), 3);
    assert_eq!(master.color_of("ADA"), Some("gray"));
}
