//! Pipe-table parsing

use serde::{Deserialize, Serialize};

/// A parsed pipe table
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    /// Header cells
    pub header: Vec<String>,
    /// Body rows
    pub rows: Vec<Vec<String>>,
}

/// Parse a pipe table
///
/// Lines whose trimmed form starts with `|` make up the table. The first is
/// the header, the second is taken to be the separator and skipped, the rest
/// are body rows. Fewer than two such lines is not a table.
#[must_use]
pub fn parse_table(text: &str) -> Option<TableView> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .collect();

    if lines.len() < 2 {
        return None;
    }

    let rows = lines[2..]
        .iter()
        .map(|line| split_cells(line))
        .filter(|cells| !cells.is_empty())
        .collect();

    Some(TableView {
        header: split_cells(lines[0]),
        rows,
    })
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect()
}
