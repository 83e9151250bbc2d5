//! Serialization of the active set back to EDL text.
//!
//! Output lines are `<address> #<space><comment><space># `: the address gets a
//! trailing space, the comment is wrapped in single spaces (an empty comment
//! becomes two spaces) and the date column is dropped.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::entry::{Entry, DELIMITER};
use crate::error::EdlError;
use crate::fs_abstraction::FileSystem;

/// Suffix appended to the list name when the original is left untouched.
pub const DERIVED_SUFFIX: &str = "-X.txt";

/// Where the rewritten list goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// `source` + list name.
    Original,
    /// `source` + list name + [`DERIVED_SUFFIX`].
    Derived,
}

/// An active entry padded for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub address: String,
    pub comment: String,
}

impl OutputLine {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            address: format!("{} ", entry.address()),
            comment: format!(" {} ", entry.comment()),
        }
    }

    /// Render as one line, without the line terminator.
    ///
    /// # Examples
    /// ```
    /// use edlman::entry::Entry;
    /// use edlman::writer::OutputLine;
    /// let line = OutputLine::from_entry(&Entry::parse_line("10.0.0.0/24 # subnet #"));
    /// assert_eq!(line.render(), "10.0.0.0/24 # subnet # ");
    /// ```
    pub fn render(&self) -> String {
        format!(
            "{}{}{}{} ",
            self.address, DELIMITER, self.comment, DELIMITER
        )
    }
}

/// Render the whole active set, one record per line, no header.
pub fn render_active(lines: &[OutputLine]) -> String {
    lines.iter().fold(String::new(), |mut out, line| {
        out.push_str(&line.render());
        out.push('\n');
        out
    })
}

/// Compute the output path for a list.
///
/// `source` is a plain prefix, concatenated rather than joined, so both
/// `"/srv/edl/"` and `"edl-"` work as expected.
pub fn output_path(source: &str, list_name: &str, target: OutputTarget) -> PathBuf {
    let mut path = OsString::from(source);
    path.push(list_name);
    if target == OutputTarget::Derived {
        path.push(DERIVED_SUFFIX);
    }
    PathBuf::from(path)
}

/// Write the active set to `path`, replacing any existing file.
pub fn write_active<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    lines: &[OutputLine],
) -> Result<(), EdlError> {
    fs.write(path, render_active(lines).as_bytes())
        .map_err(|source| EdlError::Write {
            path: path.to_path_buf(),
            source,
        })
}
