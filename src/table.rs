use crate::analytics::{self, CorrelationMatrix};
use crate::coin_list::CoinList;
use crate::history::PriceDataSet;
use chrono::Local;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_BORDERS_ONLY, Attribute, Cell, CellAlignment,
    Color, ContentArrangement, Table,
};

fn change_cell(pct: f64) -> Cell {
    let color = if pct > 0.0 {
        Color::Green
    } else if pct < 0.0 {
        Color::Red
    } else {
        Color::DarkGrey
    };
    Cell::new(format!("{:.1}%", pct))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Header line printed above the summary table, e.g.
/// `New data fetched (21-08-2026 14:03:11), timeframe: 1-day, currency: EUR`.
pub fn fetched_header(timeframe_label: &str, currency: &str) -> String {
    format!(
        "New data fetched ({}), timeframe: {}, currency: {}",
        Local::now().format("%d-%m-%Y %H:%M:%S"),
        timeframe_label,
        currency
    )
}

/// The COIN / PRICE / % CHANGE / INDEXED summary, one row per coin in
/// list order. A coin with no data shows "-" for its prices; an
/// unindexable series (first close 0) shows "-" in the indexed column.
pub fn summary_table(coin_list: &CoinList, data: &PriceDataSet, growth_rates: &[f64]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Coin").add_attribute(Attribute::Bold),
            Cell::new("Price")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new("Change (%)")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new("Indexed")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
        ]);

    for (i, entry) in coin_list.iter().enumerate() {
        let series = data.series(&entry.ticker);

        let price_cell = match series.and_then(|s| s.last()) {
            Some(sample) => Cell::new(format!("{}", sample.close)),
            None => Cell::new("-").fg(Color::DarkGrey),
        };

        let indexed_cell = match series.and_then(|s| analytics::index_series(s)) {
            Some(indexed) => Cell::new(format!("{:.1}", indexed.last().map_or(100.0, |s| s.close))),
            None => Cell::new("-").fg(Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(&entry.ticker).add_attribute(Attribute::Bold),
            price_cell.set_alignment(CellAlignment::Right),
            change_cell(growth_rates.get(i).copied().unwrap_or(0.0)),
            indexed_cell.set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// The lower-triangular correlation heatmap as a table. Upper-triangle
/// cells are rendered empty, mirroring the zero-filled matrix.
pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = Table::new();
    let mut header = vec![Cell::new("")];
    header.extend(
        matrix
            .labels
            .iter()
            .map(|label| Cell::new(label).add_attribute(Attribute::Bold)),
    );
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (i, label) in matrix.labels.iter().enumerate() {
        let mut row = vec![Cell::new(label).add_attribute(Attribute::Bold)];
        for j in 0..matrix.size() {
            if j > i {
                row.push(Cell::new(""));
                continue;
            }
            let r = matrix.values[i][j];
            let color = if r.abs() > 0.7 {
                Color::Cyan
            } else {
                Color::Grey
            };
            row.push(
                Cell::new(format!("{:.2}", r))
                    .fg(color)
                    .set_alignment(CellAlignment::Right),
            );
        }
        table.add_row(row);
    }

    table
}
