// src/results/table.rs

//! Small in-memory table used as the seed payload.

use rand::Rng;
use rand::seq::SliceRandom;

/// Column names plus rows of already-stringified cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Parse delimited text: first line is the header, blank lines are
    /// ignored. Cells are trimmed; quoting is not interpreted.
    pub fn from_delimited(text: &str, delimiter: char) -> Self {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let split = |line: &str| -> Vec<String> {
            line.split(delimiter).map(|c| c.trim().to_string()).collect()
        };

        let columns = lines.next().map(split).unwrap_or_default();
        let rows = lines.map(split).collect();
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Serialize back to delimited text (header first).
    pub fn to_delimited(&self, delimiter: char) -> String {
        let sep = delimiter.to_string();
        let mut out = self.columns.join(&sep);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join(&sep));
            out.push('\n');
        }
        out
    }

    /// Up to `max_rows` rows in random order; all columns are kept.
    pub fn sample<R: Rng + ?Sized>(&self, max_rows: usize, rng: &mut R) -> Table {
        let mut rows = self.rows.clone();
        rows.shuffle(rng);
        rows.truncate(max_rows);
        Table::new(self.columns.clone(), rows)
    }

    /// Render as a markdown-style grid:
    ///
    /// ```text
    /// | id | name  |
    /// | -- | ----- |
    /// | 1  | alice |
    /// ```
    pub fn render(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.columns.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![1usize; width];
        for line in std::iter::once(&self.columns).chain(self.rows.iter()) {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let fmt_line = |cells: &[String]| -> String {
            let mut s = String::from("|");
            for (i, &w) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                s.push_str(&format!(" {cell:<w$} |"));
            }
            s
        };

        let mut out = Vec::with_capacity(self.rows.len() + 2);
        out.push(fmt_line(&self.columns));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push(fmt_line(&rule));
        for row in &self.rows {
            out.push(fmt_line(row));
        }
        out.join("\n")
    }
}
