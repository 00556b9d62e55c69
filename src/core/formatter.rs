//! Filtering and display formatting for remote entries in hdls.
//!
//! The [EntryFilter] holds the hidden-entry policy for one invocation.
//! The free functions format sizes, modification times and long rows, and encode the
//! JSON elements. They are pure and shared by every output encoding so that plain,
//! tabular and JSON output agree on each value.

use crate::core::EntryRecord;

use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;
use serde_json::ser::Formatter;

use std::fmt;
use std::io::{self, Write};

/// Magnitude prefixes for human-readable sizes, 1024-based.
const SIZE_UNITS: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// EntryFilter decides which directory children are shown.
#[derive(Debug, Clone, Copy)]
pub struct EntryFilter {
    show_all: bool,
}

impl EntryFilter {
    pub fn new(show_all: bool) -> Self {
        Self { show_all }
    }

    /// A child is shown unless it is hidden and show-all is off.
    /// The predicate looks only at the entry itself, never at the batch it arrived in.
    #[inline]
    pub fn should_show(&self, entry: &EntryRecord) -> bool {
        self.show_all || !entry.is_hidden()
    }

    /// Filters the given batch in place, keeping the stream order.
    pub fn filter_entries(&self, entries: &mut Vec<EntryRecord>) {
        entries.retain(|e| self.should_show(e));
    }

    /// Whether "." and ".." are synthesized. JSON output never carries them.
    #[inline]
    pub fn show_synthetic(&self, json: bool) -> bool {
        self.show_all && !json
    }
}

/// Formats a byte count, either raw or with binary magnitude prefixes and one decimal.
///
/// # Examples
/// 0 => "0B", 1536 => "1.5K", 1048576 => "1.0M"
pub fn format_file_size(size: u64, human_readable: bool) -> String {
    if !human_readable {
        return size.to_string();
    }
    if size < 1024 {
        return format!("{}B", size);
    }

    let mut value = size as f64 / 1024.0;
    let mut unit = 0;
    // Round first: 1048575 is 1.0M, never 1024.0K.
    while (value * 10.0).round() >= 10240.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, SIZE_UNITS[unit])
}

/// Formats the modification time as the two date columns of the long format.
/// # Returns
/// `("Mon _D", "HH:MM")` when the entry is from `current_year`, otherwise `("Mon _D", "YYYY")`.
pub fn format_file_time<Tz>(modified: &DateTime<Tz>, current_year: i32) -> (String, String)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let date = modified.format("%b %e").to_string();
    let time_or_year = if modified.year() == current_year {
        modified.format("%H:%M").to_string()
    } else {
        modified.format("%Y").to_string()
    };
    (date, time_or_year)
}

/// Builds the seven cells of a long-format row.
///
/// The first six cells carry the spacing of the aligned layout; the name is the trailing,
/// unaligned cell.
pub fn long_row<Tz>(
    label: &str,
    entry: &EntryRecord,
    human_readable: bool,
    now: &DateTime<Tz>,
) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let modified = entry.modified().with_timezone(&now.timezone());
    let (date, time_or_year) = format_file_time(&modified, now.year());
    vec![
        format!("{} ", entry.mode()),
        format!("{} ", entry.owner()),
        format!(" {} ", entry.group()),
        format!(" {} ", format_file_size(entry.size(), human_readable)),
        format!("{} ", date),
        format!("{} ", time_or_year),
        label.to_string(),
    ]
}

/// JSON element of the short encoding.
#[derive(Debug, Serialize)]
pub struct ShortJson<'a> {
    pub name: &'a str,
}

/// JSON element of the long encoding. Field order is part of the output format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongJson<'a> {
    pub mode: &'a str,
    pub owner: &'a str,
    pub group: &'a str,
    pub size: u64,
    pub mod_time: String,
    pub name: &'a str,
}

impl<'a> LongJson<'a> {
    pub fn new<Tz>(location: &'a str, entry: &'a EntryRecord, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            mode: entry.mode(),
            owner: entry.owner(),
            group: entry.group(),
            size: entry.size(),
            mod_time: entry.modified().with_timezone(tz).to_rfc3339(),
            name: location,
        }
    }
}

/// serde_json formatter writing objects on one line: `{ "key": value, "key": value }`.
struct InlineFormatter;

impl Formatter for InlineFormatter {
    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b"{ ")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b" }")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Encodes one JSON element on a single line into `out`.
pub fn write_json_inline<W, T>(out: &mut W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize,
{
    let mut ser = serde_json::Serializer::with_formatter(out, InlineFormatter);
    value.serialize(&mut ser).map_err(io::Error::from)
}
