use prettytable::{format, Cell, Row, Table};

use super::format::{format_share, format_thousands};
use crate::process::rank::Ranking;

/// Ranked top countries followed by the "all other" and period totals.
pub fn ranking_table(ranking: &Ranking) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.add_row(Row::new(vec![
        Cell::new("Rank").style_spec("bFg"),
        Cell::new("Country of asylum (ISO)").style_spec("bFg"),
        Cell::new("Applications").style_spec("bFg"),
        Cell::new("Share").style_spec("bFg"),
    ]));

    let period = ranking.period_total();
    for (i, entry) in ranking.top().iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()).style_spec("r"),
            Cell::new(&entry.asylum),
            Cell::new(&format_thousands(entry.applied)).style_spec("r"),
            Cell::new(&format_share(entry.applied, period)).style_spec("r"),
        ]));
    }

    table.add_row(Row::new(vec![
        Cell::new(""),
        Cell::new(&format!("All other countries ({})", ranking.rest().len())),
        Cell::new(&format_thousands(ranking.other_total())).style_spec("r"),
        Cell::new(&format_share(ranking.other_total(), period)).style_spec("r"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new(""),
        Cell::new("Total").style_spec("b"),
        Cell::new(&format_thousands(period)).style_spec("br"),
        Cell::new(&format_share(period, period)).style_spec("r"),
    ]));
    table
}

/// Print the ranking to stdout.
pub fn print_ranking(ranking: &Ranking) {
    println!(
        "\n--- Asylum applications by receiving country, {}–{} ---",
        ranking.window.start,
        ranking.window.end()
    );
    ranking_table(ranking).printstd();
}
