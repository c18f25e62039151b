use std::net::SocketAddr;
use thiserror::Error;

/// Failures of the relay server itself
///
/// Payload problems are never errors; see [`crate::DumpRecord::from_body`].
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Failed to bind dump relay to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Dump relay stopped with an error: {0}")]
    Serve(#[source] std::io::Error),
}
