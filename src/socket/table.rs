//! Access to the raw socket-table files under `/proc/net`.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Protocol;
use crate::PROC_ROOT;

/// The table file for a selector, relative to the /proc root.
pub(crate) fn table_file(proto: Protocol) -> &'static str {
    match proto {
        Protocol::Tcp => "net/tcp",
        Protocol::Udp => "net/udp",
        Protocol::Tcp6 => "net/tcp6",
        Protocol::Udp6 => "net/udp6",
    }
}

/// Reads one kernel socket table and returns its data lines.
///
/// The first line (column header) is dropped; `str::lines` absorbs the
/// trailing terminator, so a header-only table yields an empty vector
/// rather than an error.
///
/// # Errors
///
/// Returns [`Error::ResourceUnavailable`] when the table cannot be read,
/// a failure that aborts the requesting call.
pub(crate) fn read_table(proto: Protocol) -> Result<Vec<String>> {
    read_table_at(Path::new(PROC_ROOT), proto)
}

pub(crate) fn read_table_at(root: &Path, proto: Protocol) -> Result<Vec<String>> {
    let path = root.join(table_file(proto));
    let content = fs::read_to_string(&path)
        .map_err(|err| Error::resource_unavailable(path.display().to_string(), err))?;
    Ok(data_lines(&content).map(str::to_owned).collect())
}

/// Data lines of a table dump: everything after the column header.
pub(crate) fn data_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().skip(1)
}
