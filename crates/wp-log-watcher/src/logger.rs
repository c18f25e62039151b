//! Console logging using env_logger
//!
//! Log records go to stderr so that stdout only carries log content and dumps.
//! The default level is `info`; `RUST_LOG` (also picked up from `.env`)
//! overrides it, e.g. `RUST_LOG=wp_log_tail=debug`.

use env_logger::{Builder, Env, Target};

pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(Target::Stderr)
        .init();
}
