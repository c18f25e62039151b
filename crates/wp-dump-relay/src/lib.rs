//! Dump Relay
//!
//! Receives variable dumps that PHP code posts over HTTP (`POST /dump`),
//! normalizes them into [`DumpRecord`]s, keeps the most recent ones and pushes
//! each new one to websocket viewers and in-process subscribers.
//!
//! # Example
//!
//! ```no_run
//! use wp_dump_relay::{DumpServer, RelayConfig};
//!
//! # async fn example() -> Result<(), wp_dump_relay::RelayError> {
//! let mut server = DumpServer::new(RelayConfig::default());
//! let mut dumps = server.subscribe();
//! server.start().await?;
//!
//! while let Ok(dump) = dumps.recv().await {
//!     println!("[{}] {}", dump.time, dump.content);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod history;
mod laravel;
mod record;
mod server;

pub use error::RelayError;
pub use history::{DumpHistory, DEFAULT_HISTORY_CAPACITY};
pub use laravel::format_laravel_dump;
pub use record::{DumpPayload, DumpRecord, DumpSource};
pub use server::{
    DumpServer, RelayConfig, RelayHub, RelayStatus, StartOutcome, StopOutcome,
    DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
};
