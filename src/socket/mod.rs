//! Socket-table snapshots.
//!
//! Each snapshot call reads one kernel table under `/proc/net`, decodes every
//! row into a [`SocketEntry`], and returns the entries in table order. Rows
//! that are structurally too short are skipped with a warning; decode
//! failures on tokens the kernel always writes well-formed abort the call.

pub mod hex;
pub mod parser;
pub(crate) mod table;

use std::net::SocketAddr;

use log::warn;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::process::{OwnerIndex, SocketOwner};
use crate::types::{Protocol, SocketState};

/// One row of a kernel socket table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct SocketEntry {
    /// Table the row came from
    pub protocol: Protocol,
    /// Local endpoint
    pub local: SocketAddr,
    /// Remote endpoint (unspecified address, port 0 when not connected)
    pub remote: SocketAddr,
    /// Connection state; UDP rows report the kernel's fixed placeholder
    pub state: SocketState,
    /// Numeric owner id from the table row (0 when the column is absent)
    pub uid: u32,
    /// Kernel socket inode (0 for ownerless rows such as TIME_WAIT)
    pub inode: u64,
    /// Owning-process identity; `None` until an enrichment pass runs
    pub owner: Option<SocketOwner>,
}

impl SocketEntry {
    /// Check if this entry is listening for connections
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state == SocketState::Listen
    }

    /// Check if this entry has an established connection
    #[must_use]
    pub fn is_established(&self) -> bool {
        self.state == SocketState::Established
    }

    /// Get the port number of the local endpoint
    #[must_use]
    pub fn local_port(&self) -> u16 {
        self.local.port()
    }

    /// Get the port number of the remote endpoint
    #[must_use]
    pub fn remote_port(&self) -> u16 {
        self.remote.port()
    }

    /// Attaches the owning-process identity resolved through `index`.
    ///
    /// Resolution is best-effort: fields that cannot be resolved stay at
    /// their placeholders inside the attached [`SocketOwner`].
    pub fn attach_owner(&mut self, index: &OwnerIndex) {
        self.owner = Some(index.owner(self.inode, self.uid));
    }
}

impl std::fmt::Display for SocketEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} -> {} {}",
            self.protocol, self.local, self.remote, self.state
        )?;
        if let Some(owner) = &self.owner {
            write!(f, " {owner}")?;
        }
        Ok(())
    }
}

/// Takes a snapshot of one socket table.
///
/// Entries come back in the order the kernel presented them; no re-sorting.
/// Each call re-reads the table, nothing is cached between calls.
///
/// # Errors
///
/// Fails when the table resource cannot be read or when an address/port
/// token fails to decode. Structurally short rows are skipped (with a
/// `log` warning), not fatal.
pub fn snapshot(proto: Protocol) -> Result<Vec<SocketEntry>> {
    let lines = table::read_table(proto)?;
    collect_entries(proto, &lines)
}

/// Takes a snapshot and correlates every entry to its owning process.
///
/// Equivalent to [`snapshot`] followed by [`enrich_owners`].
///
/// # Errors
///
/// Same failure modes as [`snapshot`]; correlation itself never fails the
/// call.
pub fn snapshot_with_owners(proto: Protocol) -> Result<Vec<SocketEntry>> {
    let mut entries = snapshot(proto)?;
    enrich_owners(&mut entries);
    Ok(entries)
}

/// Attaches owning-process identity to every entry, in place.
///
/// Builds one descriptor-namespace index and reuses it across all entries,
/// so the /proc walk happens once per call rather than once per record.
pub fn enrich_owners(entries: &mut [SocketEntry]) {
    let index = OwnerIndex::scan();
    for entry in entries.iter_mut() {
        entry.attach_owner(&index);
    }
}

/// Snapshots `/proc/net/tcp`.
///
/// # Errors
///
/// See [`snapshot`].
pub fn tcp() -> Result<Vec<SocketEntry>> {
    snapshot(Protocol::Tcp)
}

/// Snapshots `/proc/net/udp`.
///
/// # Errors
///
/// See [`snapshot`].
pub fn udp() -> Result<Vec<SocketEntry>> {
    snapshot(Protocol::Udp)
}

/// Snapshots `/proc/net/tcp6`.
///
/// # Errors
///
/// See [`snapshot`].
pub fn tcp6() -> Result<Vec<SocketEntry>> {
    snapshot(Protocol::Tcp6)
}

/// Snapshots `/proc/net/udp6`.
///
/// # Errors
///
/// See [`snapshot`].
pub fn udp6() -> Result<Vec<SocketEntry>> {
    snapshot(Protocol::Udp6)
}

fn collect_entries(proto: Protocol, lines: &[String]) -> Result<Vec<SocketEntry>> {
    let mut entries = Vec::with_capacity(lines.len());
    for line in lines {
        let fields = match parser::split_fields(line) {
            Ok(fields) => fields,
            Err(err) => {
                warn!("skipping malformed {proto} entry: {err}");
                continue;
            }
        };
        entries.push(parser::decode_fields(proto, &fields)?);
    }
    Ok(entries)
}
