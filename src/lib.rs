#![cfg_attr(docsrs, feature(doc_cfg))]

//! # socktab
//!
//! Kernel socket-table snapshots with process correlation for Linux hosts.
//!
//! The crate parses the four tables under `/proc/net` into typed connection
//! records, a programmatic `netstat`:
//! - Snapshot enumeration of TCP/UDP sockets over IPv4 and IPv6
//! - Little-endian hex address decoding, consistent across all four tables
//! - Kernel state codes mapped to canonical names
//! - Best-effort correlation of each socket to its owning process via the
//!   `/proc/<pid>/fd` descriptor namespace
//!
//! ## Quick Start
//!
//! ```rust
//! // List all TCP connections over IPv4
//! let sockets = socktab::tcp()?;
//! println!("Active TCP sockets: {}", sockets.len());
//! # Ok::<(), socktab::Error>(())
//! ```
//!
//! Correlating entries to processes is an explicit second step, since the
//! /proc walk it needs is far more expensive than reading one table:
//!
//! ```rust,no_run
//! use socktab::Protocol;
//!
//! let sockets = socktab::snapshot_with_owners(Protocol::Tcp)?;
//! for entry in sockets.iter().filter(|e| e.is_listening()) {
//!     println!("{entry}");
//! }
//! # Ok::<(), socktab::Error>(())
//! ```
//!
//! ## Features
//!
//! - `serde-support` - Enable serialization for all public data structures

mod error;
mod types;

pub mod process;
pub mod socket;

// Re-export core types
pub use error::{Error, Result};
pub use types::{Protocol, SocketState};

// Snapshot pipeline
pub use socket::parser::parse_line;
pub use socket::{enrich_owners, snapshot, snapshot_with_owners, SocketEntry};
pub use socket::{tcp, tcp6, udp, udp6};

// Process correlation
pub use process::{resolve_owner, OwnerIndex, SocketOwner};

/// Root of the kernel's process information filesystem.
pub(crate) const PROC_ROOT: &str = "/proc";
