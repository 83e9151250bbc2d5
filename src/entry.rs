//! EDL record parsing.
//!
//! Input lines look like `<address>#<comment>#<date>`. Trailing fields may be
//! missing, and a date that cannot be read degrades to "no date" rather than
//! failing the line.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::fmt;

/// UTF-8 byte-order mark.
const BOM: &[u8] = b"\xef\xbb\xbf";

/// Field delimiter shared by input and output files.
pub const DELIMITER: char = '#';

/// Date-only layouts tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y.%m.%d",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Date-and-time layouts; only the calendar date is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// One EDL record. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    address: String,
    comment: String,
    date: Option<NaiveDate>,
}

impl Entry {
    pub fn new(address: impl Into<String>, comment: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            address: address.into(),
            comment: comment.into(),
            date,
        }
    }

    /// Parse one raw line.
    ///
    /// Missing comment becomes an empty string; a missing or unreadable date
    /// becomes `None`. Fields past the third are ignored.
    ///
    /// # Examples
    /// ```
    /// use edlman::entry::Entry;
    /// let entry = Entry::parse_line("10.0.0.1 # web # 2024-01-01");
    /// assert_eq!(entry.address(), "10.0.0.1");
    /// assert_eq!(entry.comment(), "web");
    /// assert!(entry.date().is_some());
    ///
    /// let bare = Entry::parse_line("10.0.0.2");
    /// assert_eq!(bare.comment(), "");
    /// assert!(bare.date().is_none());
    /// ```
    pub fn parse_line(line: &str) -> Self {
        let mut fields = line.split(DELIMITER);
        let address = fields.next().unwrap_or_default().trim();
        let comment = fields.next().unwrap_or_default().trim();
        let date = fields.next().and_then(parse_entry_date);

        Self::new(address, comment, date)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Entry date, `None` when absent or unparseable.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "address={:?} comment={:?} date=", self.address, self.comment)?;
        match self.date {
            Some(date) => write!(f, "{}", date),
            None => f.write_str("none"),
        }
    }
}

/// Parse the whole content of an EDL file.
///
/// Blank lines are skipped and a leading byte-order mark is ignored, so a file
/// with nothing but whitespace yields no entries.
pub fn parse_entries(content: &str) -> Vec<Entry> {
    decode_entries(content.as_bytes()).entries
}

/// Entries decoded from raw file bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodedEntries {
    pub entries: Vec<Entry>,
    /// Positions (into `entries`) of lines that were not valid UTF-8 and were
    /// decoded with replacement characters.
    pub lossy_rows: Vec<usize>,
}

/// Parse raw file bytes line by line.
///
/// A line that is not valid UTF-8 is decoded lossily and still parsed, so one
/// badly encoded comment never costs the rest of the file.
pub fn decode_entries(content: &[u8]) -> DecodedEntries {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut decoded = DecodedEntries::default();

    for raw in content.split(|b| *b == b'\n') {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let (line, lossy) = match std::str::from_utf8(raw) {
            Ok(line) => (Cow::Borrowed(line), false),
            Err(_) => (String::from_utf8_lossy(raw), true),
        };
        if line.trim().is_empty() {
            continue;
        }
        if lossy {
            decoded.lossy_rows.push(decoded.entries.len());
        }
        decoded.entries.push(Entry::parse_line(&line));
    }

    decoded
}

/// Permissive calendar-date parser for the date column.
///
/// Returns `None` instead of an error for anything it cannot read; callers
/// treat that as an undated entry that never expires.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use edlman::entry::parse_entry_date;
/// let expected = NaiveDate::from_ymd_opt(2024, 1, 31);
/// assert_eq!(parse_entry_date("2024-01-31"), expected);
/// assert_eq!(parse_entry_date(" 01/31/2024 "), expected);
/// assert_eq!(parse_entry_date("2024-01-31T08:15:00"), expected);
/// assert_eq!(parse_entry_date("soon"), None);
/// ```
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_compact_date(text) {
        return Some(date);
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(datetime.date());
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}

/// `YYYYMMDD`. Handled by hand since `%Y` is greedy when parsing.
fn parse_compact_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = text[..4].parse().ok()?;
    let month = text[4..6].parse().ok()?;
    let day = text[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_full_line() {
        let entry = Entry::parse_line("192.168.1.5 # test host # 2000-01-01");
        assert_eq!(entry.address(), "192.168.1.5");
        assert_eq!(entry.comment(), "test host");
        assert_eq!(entry.date(), Some(ymd(2000, 1, 1)));
    }

    #[test]
    fn test_parse_missing_date() {
        let entry = Entry::parse_line("10.0.0.0/24 # subnet #");
        assert_eq!(entry.address(), "10.0.0.0/24");
        assert_eq!(entry.comment(), "subnet");
        assert_eq!(entry.date(), None);
    }

    #[test]
    fn test_parse_address_only() {
        let entry = Entry::parse_line("  10.0.0.1  ");
        assert_eq!(entry.address(), "10.0.0.1");
        assert_eq!(entry.comment(), "");
        assert_eq!(entry.date(), None);
    }

    #[test]
    fn test_parse_empty_comment_with_date() {
        let entry = Entry::parse_line("10.0.0.1##2024-03-01");
        assert_eq!(entry.comment(), "");
        assert_eq!(entry.date(), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_parse_bad_date_degrades() {
        let entry = Entry::parse_line("10.0.0.1 # ok # someday");
        assert_eq!(entry.date(), None);
        let entry = Entry::parse_line("10.0.0.1 # ok # 2024-13-45");
        assert_eq!(entry.date(), None);
    }

    #[test]
    fn test_parse_extra_fields_ignored() {
        let entry = Entry::parse_line("10.0.0.1 # ok # 2024-01-01 # extra");
        assert_eq!(entry.address(), "10.0.0.1");
        assert_eq!(entry.comment(), "ok");
        assert_eq!(entry.date(), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_parse_entries_skips_blank_lines() {
        let content = "10.0.0.1 # a #\n\n   \n10.0.0.2 # b #\n";
        let entries = parse_entries(content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].address(), "10.0.0.2");
    }

    #[test]
    fn test_parse_entries_empty() {
        assert!(parse_entries("").is_empty());
        assert!(parse_entries("\n\n \t\n").is_empty());
    }

    #[test]
    fn test_parse_entries_bom_and_crlf() {
        let content = "\u{feff}10.0.0.1 # a # 2024-01-01\r\n10.0.0.2 # b #\r\n";
        let entries = parse_entries(content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].address(), "10.0.0.1");
        assert_eq!(entries[0].date(), Some(ymd(2024, 1, 1)));
        assert_eq!(entries[1].comment(), "b");
    }

    #[test]
    fn test_decode_entries_latin1_comment() {
        let content = b"10.0.0.1 # caf\xe9 #\nold # x # 2000-01-01\n";
        let decoded = decode_entries(content);
        assert_eq!(decoded.entries.len(), 2);
        assert_eq!(decoded.lossy_rows, vec![0]);
        assert_eq!(decoded.entries[0].address(), "10.0.0.1");
        assert_eq!(decoded.entries[0].comment(), "caf\u{fffd}");
        assert_eq!(decoded.entries[1].date(), Some(ymd(2000, 1, 1)));
    }

    #[test]
    fn test_decode_entries_lossy_rows_skip_blanks() {
        let decoded = decode_entries(b"\xef\xbb\xbf\n10.0.0.1\r\n\n\xff\xfe\n");
        assert_eq!(decoded.entries.len(), 2);
        assert_eq!(decoded.lossy_rows, vec![1]);
    }

    #[test]
    fn test_parse_entries_keeps_order() {
        let content = "c\nb\na\n";
        let addresses: Vec<_> = parse_entries(content)
            .iter()
            .map(|e| e.address().to_string())
            .collect();
        assert_eq!(addresses, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_date_formats() {
        let expected = Some(ymd(2024, 1, 31));
        assert_eq!(parse_entry_date("2024-01-31"), expected);
        assert_eq!(parse_entry_date("2024/01/31"), expected);
        assert_eq!(parse_entry_date("01/31/2024"), expected);
        assert_eq!(parse_entry_date("20240131"), expected);
        assert_eq!(parse_entry_date("Jan 31 2024"), expected);
        assert_eq!(parse_entry_date("January 31, 2024"), expected);
        assert_eq!(parse_entry_date("31 Jan 2024"), expected);
        assert_eq!(parse_entry_date("2024-01-31 23:59:59"), expected);
        assert_eq!(parse_entry_date("2024-01-31T10:00"), expected);
        assert_eq!(parse_entry_date("2024-01-31T10:00:00+02:00"), expected);
    }

    #[test]
    fn test_date_rejects_garbage() {
        assert_eq!(parse_entry_date(""), None);
        assert_eq!(parse_entry_date("   "), None);
        assert_eq!(parse_entry_date("yesterday"), None);
        assert_eq!(parse_entry_date("2024-02-30"), None);
    }

    #[test]
    fn test_display() {
        let entry = Entry::new("10.0.0.1", "ok", None);
        assert_eq!(entry.to_string(), "address=\"10.0.0.1\" comment=\"ok\" date=none");
        let dated = Entry::new("10.0.0.1", "", Some(ymd(2024, 5, 6)));
        assert!(dated.to_string().ends_with("date=2024-05-06"));
    }
}
