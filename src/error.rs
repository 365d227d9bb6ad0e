use std::io;

/// The error type for socket-table snapshot operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to read a kernel-exposed resource
    #[error("Failed to read {resource}: {source}")]
    ResourceUnavailable {
        resource: String,
        #[source]
        source: io::Error,
    },

    /// Protocol selector outside the supported set
    #[error("Unsupported protocol '{0}', expected one of tcp, udp, tcp6, udp6")]
    UnsupportedProtocol(String),

    /// Table text that does not match the kernel layout
    #[error("Malformed socket table entry: {details}")]
    MalformedEntry { details: String },
}

impl Error {
    /// Create a new resource unavailable error
    pub fn resource_unavailable(resource: impl Into<String>, source: io::Error) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            source,
        }
    }

    /// Create a new unsupported protocol error
    pub fn unsupported_protocol(selector: impl Into<String>) -> Self {
        Self::UnsupportedProtocol(selector.into())
    }

    /// Create a new malformed entry error
    pub fn malformed_entry(details: impl Into<String>) -> Self {
        Self::MalformedEntry {
            details: details.into(),
        }
    }
}

/// A specialized `Result` type for socket-table operations.
pub type Result<T> = std::result::Result<T, Error>;
