//! Column alignment for the long listing format.
//!
//! [ColumnAligner] buffers rows of cells and writes them right-aligned in one go,
//! so that all rows of one output block line up. The last cell of a row is trailing
//! text and is never padded.

use unicode_width::UnicodeWidthStr;

use std::io::{self, Write};

/// Minimum width of an aligned cell, padding included.
pub const MIN_CELL_WIDTH: usize = 3;
/// Extra spaces added to every aligned cell.
pub const CELL_PADDING: usize = 0;

#[derive(Debug)]
pub struct ColumnAligner {
    rows: Vec<Vec<String>>,
    min_width: usize,
    padding: usize,
}

impl Default for ColumnAligner {
    fn default() -> Self {
        Self::new(MIN_CELL_WIDTH, CELL_PADDING)
    }
}

impl ColumnAligner {
    pub fn new(min_width: usize, padding: usize) -> Self {
        Self {
            rows: Vec::new(),
            min_width,
            padding,
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes every buffered row to `out` and empties the buffer.
    pub fn flush_to<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        let widths = self.column_widths();
        let rows = std::mem::take(&mut self.rows);

        let mut line = String::with_capacity(128);
        for row in &rows {
            line.clear();
            let last = row.len().saturating_sub(1);
            for (i, cell) in row.iter().enumerate() {
                if i < last {
                    let pad = widths[i].saturating_sub(cell.width());
                    line.extend(std::iter::repeat_n(' ', pad));
                }
                line.push_str(cell);
            }
            line.push('\n');
            out.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(|r| r.len().saturating_sub(1))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in &self.rows {
            for (i, cell) in row.iter().take(row.len().saturating_sub(1)).enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }
        widths
            .into_iter()
            .map(|w| (w + self.padding).max(self.min_width))
            .collect()
    }
}
