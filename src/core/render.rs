//! Output framing for one listing invocation.
//!
//! [Renderer] owns the output writer and the per-invocation [RenderState]: the JSON
//! first-element flag, the number of directory sections written and the column aligner
//! of the current tabular block. It applies one encoding (short, long or JSON) to every
//! record.
//!
//! Dropping a renderer that was not [finished](Renderer::finish) still flushes the
//! buffered rows and closes the JSON array, so a fatal error never swallows output
//! that was already produced.

use crate::core::EntryRecord;
use crate::core::align::ColumnAligner;
use crate::core::formatter::{LongJson, ShortJson, long_row, write_json_inline};

use chrono::{DateTime, Local};

use std::io::{self, Write};

/// Which encoding the renderer applies, selected once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub long: bool,
    pub human_readable: bool,
    pub json: bool,
}

/// Mutable state threaded through one invocation.
#[derive(Debug, Default)]
pub struct RenderState {
    first_record: bool,
    json_open: bool,
    sections: usize,
    table: Option<ColumnAligner>,
}

pub struct Renderer<W: Write> {
    out: W,
    options: RenderOptions,
    now: DateTime<Local>,
    state: RenderState,
    finished: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, options: RenderOptions, now: DateTime<Local>) -> Self {
        Self {
            out,
            options,
            now,
            state: RenderState {
                first_record: true,
                ..RenderState::default()
            },
            finished: false,
        }
    }

    /// Opens the JSON array. No-op for plain output.
    pub fn begin(&mut self) -> io::Result<()> {
        if self.options.json && !self.state.json_open {
            self.out.write_all(b"[")?;
            self.state.json_open = true;
        }
        Ok(())
    }

    /// Renders one record.
    ///
    /// `label` is the text shown in plain and tabular output, `location` the
    /// self-locating path used by JSON elements.
    pub fn entry(&mut self, label: &str, location: &str, entry: &EntryRecord) -> io::Result<()> {
        if self.options.json {
            self.json_separator()?;
            if self.options.long {
                let element = LongJson::new(location, entry, &Local);
                write_json_inline(&mut self.out, &element)?;
            } else {
                write_json_inline(&mut self.out, &ShortJson { name: location })?;
            }
            return Ok(());
        }

        if self.options.long {
            let row = long_row(label, entry, self.options.human_readable, &self.now);
            self.state
                .table
                .get_or_insert_with(ColumnAligner::default)
                .push_row(row);
        } else {
            writeln!(self.out, "{}", label)?;
        }
        Ok(())
    }

    /// Starts a `<dir>/:` section; the blank separator goes before every section but the first.
    /// JSON output has no sections.
    pub fn section_header(&mut self, dir: &str) -> io::Result<()> {
        self.end_block()?;
        if self.options.json {
            return Ok(());
        }
        if self.state.sections > 0 {
            self.out.write_all(b"\n")?;
        }
        writeln!(self.out, "{}/:", dir.strip_suffix('/').unwrap_or(dir))?;
        self.state.sections += 1;
        Ok(())
    }

    /// Writes out the rows of the current tabular block. Alignment restarts afterwards.
    pub fn end_block(&mut self) -> io::Result<()> {
        if let Some(table) = self.state.table.as_mut() {
            table.flush_to(&mut self.out)?;
        }
        self.state.table = None;
        Ok(())
    }

    /// Flushes everything and closes the JSON array.
    pub fn finish(mut self) -> io::Result<()> {
        self.close()
    }

    fn json_separator(&mut self) -> io::Result<()> {
        if !self.state.first_record {
            self.out.write_all(b",")?;
        }
        self.state.first_record = false;
        self.out.write_all(b"\n    ")
    }

    fn close(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.end_block()?;
        if self.state.json_open {
            self.out.write_all(b"\n]\n")?;
            self.state.json_open = false;
        }
        self.out.flush()
    }
}

impl<W: Write> Drop for Renderer<W> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str) -> EntryRecord {
        let when = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        EntryRecord::new(name, false, "-rw-r--r--", "alice", "staff", 10, when)
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn json_commas_span_sections() -> Result<(), Box<dyn std::error::Error>> {
        let opts = RenderOptions {
            json: true,
            ..Default::default()
        };
        let mut sink = Vec::new();
        let mut r = Renderer::new(&mut sink, opts, now());
        r.begin()?;
        r.entry("a", "/x/a", &record("a"))?;
        r.section_header("/y")?;
        r.entry("b", "/y/b", &record("b"))?;
        r.finish()?;
        let out = String::from_utf8(sink)?;
        assert_eq!(
            out,
            "[\n    { \"name\": \"/x/a\" },\n    { \"name\": \"/y/b\" }\n]\n"
        );
        Ok(())
    }

    #[test]
    fn empty_json_array() -> Result<(), Box<dyn std::error::Error>> {
        let opts = RenderOptions {
            json: true,
            long: true,
            ..Default::default()
        };
        let mut sink = Vec::new();
        let mut r = Renderer::new(&mut sink, opts, now());
        r.begin()?;
        r.finish()?;
        let out = String::from_utf8(sink)?;
        assert_eq!(out, "[\n]\n");
        let parsed: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(0));
        Ok(())
    }

    #[test]
    fn headers_get_separators_after_first() -> Result<(), Box<dyn std::error::Error>> {
        let mut sink = Vec::new();
        let mut r = Renderer::new(&mut sink, RenderOptions::default(), now());
        r.section_header("/x")?;
        r.entry("a", "/x/a", &record("a"))?;
        r.section_header("/")?;
        r.finish()?;
        let out = String::from_utf8(sink)?;
        assert_eq!(out, "/x/:\na\n\n/:\n");
        Ok(())
    }

    #[test]
    fn drop_flushes_pending_rows() {
        let mut sink = Vec::new();
        {
            let opts = RenderOptions {
                long: true,
                ..Default::default()
            };
            let mut r = Renderer::new(&mut sink, opts, now());
            let _ = r.entry("a", "/x/a", &record("a"));
        }
        let out = String::from_utf8_lossy(&sink);
        assert!(out.ends_with(" 2020 a\n"), "unexpected output: {:?}", out);
    }
}
