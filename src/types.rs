use std::str::FromStr;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Protocol/family selector for the four kernel socket tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Protocol {
    /// TCP over IPv4 (`/proc/net/tcp`)
    Tcp,
    /// UDP over IPv4 (`/proc/net/udp`)
    Udp,
    /// TCP over IPv6 (`/proc/net/tcp6`)
    Tcp6,
    /// UDP over IPv6 (`/proc/net/udp6`)
    Udp6,
}

impl Protocol {
    /// All four selectors, in table order.
    pub const ALL: [Self; 4] = [Self::Tcp, Self::Udp, Self::Tcp6, Self::Udp6];

    /// The selector name as spelled under `/proc/net`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Tcp6 => "tcp6",
            Self::Udp6 => "udp6",
        }
    }

    /// Returns true for the IPv6 tables
    #[must_use]
    pub const fn is_ipv6(self) -> bool {
        matches!(self, Self::Tcp6 | Self::Udp6)
    }

    /// Returns true for the UDP tables, whose state column is a fixed
    /// placeholder since UDP is connectionless
    #[must_use]
    pub const fn is_udp(self) -> bool {
        matches!(self, Self::Udp | Self::Udp6)
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "tcp6" => Ok(Self::Tcp6),
            "udp6" => Ok(Self::Udp6),
            other => Err(Error::unsupported_protocol(other)),
        }
    }
}

/// Socket states as encoded in the `st` column of the kernel tables.
///
/// The mapping from two-character hex code to canonical name is compiled in
/// and immutable; codes outside the known set resolve to
/// [`SocketState::Unknown`] rather than failing, so one undocumented code
/// cannot abort a snapshot. UDP rows always carry code `07` and therefore
/// report [`SocketState::Close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum SocketState {
    /// Connection established (code 01)
    Established,
    /// Actively attempting connection (code 02)
    SynSent,
    /// Connection request received (code 03)
    SynRecv,
    /// Socket closed, shutting down (code 04)
    FinWait1,
    /// Waiting for remote shutdown (code 05)
    FinWait2,
    /// Waiting after close for stray packets (code 06)
    TimeWait,
    /// Socket not in use (code 07)
    Close,
    /// Remote end has shut down (code 08)
    CloseWait,
    /// Waiting for final acknowledgement (code 09)
    LastAck,
    /// Listening for connections (code 0A)
    Listen,
    /// Both sides shutting down (code 0B)
    Closing,
    /// Unrecognized state code
    Unknown,
}

impl SocketState {
    /// Looks up the two-character hex state code from a table row.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match u8::from_str_radix(code, 16) {
            Ok(0x01) => Self::Established,
            Ok(0x02) => Self::SynSent,
            Ok(0x03) => Self::SynRecv,
            Ok(0x04) => Self::FinWait1,
            Ok(0x05) => Self::FinWait2,
            Ok(0x06) => Self::TimeWait,
            Ok(0x07) => Self::Close,
            Ok(0x08) => Self::CloseWait,
            Ok(0x09) => Self::LastAck,
            Ok(0x0A) => Self::Listen,
            Ok(0x0B) => Self::Closing,
            _ => Self::Unknown,
        }
    }

    /// The canonical state name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Established => "ESTABLISHED",
            Self::SynSent => "SYN_SENT",
            Self::SynRecv => "SYN_RECV",
            Self::FinWait1 => "FIN_WAIT1",
            Self::FinWait2 => "FIN_WAIT2",
            Self::TimeWait => "TIME_WAIT",
            Self::Close => "CLOSE",
            Self::CloseWait => "CLOSE_WAIT",
            Self::LastAck => "LAST_ACK",
            Self::Listen => "LISTEN",
            Self::Closing => "CLOSING",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true if the socket is accepting or exchanging data
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Established | Self::Listen)
    }
}

impl std::fmt::Display for SocketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
