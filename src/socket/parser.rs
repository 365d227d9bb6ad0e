//! Parsing of individual socket-table rows.
//!
//! Row layout (0-indexed whitespace fields): field 1 is the local
//! `addrhex:porthex` pair, field 2 the remote pair, field 3 the two-character
//! state code, field 7 the decimal uid, field 9 the decimal socket inode.
//! The remaining fields are kernel queue and timer counters and are ignored.

use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::socket::hex;
use crate::socket::SocketEntry;
use crate::types::{Protocol, SocketState};

/// The whitespace-split fields a row must provide.
#[derive(Debug)]
pub(crate) struct RawFields<'a> {
    local: &'a str,
    remote: &'a str,
    state: &'a str,
    uid: Option<&'a str>,
    inode: Option<&'a str>,
}

/// Splits a row into its fields.
///
/// This is the skippable stage: a structurally short line is reported as
/// malformed so the caller can drop that one row and keep the rest of the
/// snapshot.
pub(crate) fn split_fields(line: &str) -> Result<RawFields<'_>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(Error::malformed_entry(format!(
            "expected at least 4 fields, found {}: '{}'",
            fields.len(),
            line.trim()
        )));
    }
    Ok(RawFields {
        local: fields[1],
        remote: fields[2],
        state: fields[3],
        uid: fields.get(7).copied(),
        inode: fields.get(9).copied(),
    })
}

/// Decodes split fields into an entry.
///
/// This is the fatal stage: the kernel always writes well-formed address and
/// port hex, so a decode failure here means the input is not a socket table
/// and the whole call should fail. The state code and the uid/inode columns
/// degrade instead (`Unknown` and 0).
pub(crate) fn decode_fields(proto: Protocol, fields: &RawFields<'_>) -> Result<SocketEntry> {
    let local = decode_endpoint(fields.local)?;
    let remote = decode_endpoint(fields.remote)?;
    if local.is_ipv4() != remote.is_ipv4() {
        return Err(Error::malformed_entry(format!(
            "mixed address families in '{}' and '{}'",
            fields.local, fields.remote
        )));
    }

    Ok(SocketEntry {
        protocol: proto,
        local,
        remote,
        state: SocketState::from_code(fields.state),
        uid: fields.uid.and_then(|f| f.parse().ok()).unwrap_or(0),
        inode: fields.inode.and_then(|f| f.parse().ok()).unwrap_or(0),
        owner: None,
    })
}

/// Decodes one `addrhex:porthex` token into a socket address.
fn decode_endpoint(token: &str) -> Result<SocketAddr> {
    let (addr_hex, port_hex) = token.split_once(':').ok_or_else(|| {
        Error::malformed_entry(format!("endpoint token '{token}' lacks a ':' separator"))
    })?;
    Ok(SocketAddr::new(
        hex::decode_address(addr_hex)?,
        hex::decode_port(port_hex)?,
    ))
}

/// Parses one data line of a kernel socket table.
///
/// # Errors
///
/// Returns [`Error::MalformedEntry`] when the line has fewer than 4 fields or
/// when an address/port token fails to decode. Unknown state codes and
/// missing or unparseable uid/inode columns degrade to
/// [`SocketState::Unknown`] and 0 instead of failing.
pub fn parse_line(proto: Protocol, line: &str) -> Result<SocketEntry> {
    decode_fields(proto, &split_fields(line)?)
}
