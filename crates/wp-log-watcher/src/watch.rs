//! Long-running commands: `watch` and `relay`
//!
//! Both print to stdout until Ctrl+C, then shut the tracker and relay down.

use crate::render::{render_dump, render_tail_event};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::sync::broadcast;
use wp_dump_relay::{DumpRecord, DumpServer, RelayConfig, StartOutcome};
use wp_log_tail::{TailConfig, TailTracker, WatchMode};
use wp_watcher_config::AppConfig;

pub fn tail_config(config: &AppConfig) -> TailConfig {
    TailConfig {
        stability_window: config.stability_window(),
        poll_interval: config.poll_interval(),
        force_polling: config.force_polling,
    }
}

pub fn relay_config(config: &AppConfig) -> RelayConfig {
    RelayConfig {
        host: config.relay_host,
        port: config.relay_port,
        max_body_bytes: config.max_body_bytes,
        history_capacity: config.history_capacity,
    }
}

/// Tail `files` (and run the relay unless disabled) until Ctrl+C
pub async fn run_watch(config: &AppConfig, files: Vec<PathBuf>) -> Result<()> {
    let (mut tracker, mut events) = TailTracker::new(tail_config(config));

    for file in &files {
        let mode = tracker
            .register(file)
            .await
            .with_context(|| format!("Failed to watch {}", file.display()))?;
        if mode == WatchMode::Degraded {
            log::warn!(
                "{} is polled; changes are reported without their content",
                file.display()
            );
        }
    }

    let mut relay = if config.relay_enabled {
        Some(start_relay(config).await?)
    } else {
        None
    };
    let mut dumps = relay.as_ref().map(DumpServer::subscribe);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Received Ctrl+C, shutting down");
                break;
            }
            Some(event) = events.recv() => println!("{}\n", render_tail_event(&event)),
            dump = next_dump(&mut dumps) => match dump {
                Some(record) => println!("{}\n", render_dump(&record)),
                None => dumps = None,
            },
        }
    }

    tracker.shutdown().await;
    if let Some(relay) = relay.as_mut() {
        relay.stop().await?;
    }
    Ok(())
}

/// Run only the dump relay until Ctrl+C
pub async fn run_relay(config: &AppConfig) -> Result<()> {
    let mut relay = start_relay(config).await?;
    let mut dumps = Some(relay.subscribe());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Received Ctrl+C, shutting down");
                break;
            }
            dump = next_dump(&mut dumps) => match dump {
                Some(record) => println!("{}\n", render_dump(&record)),
                None => break,
            },
        }
    }

    relay.stop().await?;
    Ok(())
}

async fn start_relay(config: &AppConfig) -> Result<DumpServer> {
    let mut server = DumpServer::new(relay_config(config));
    match server.start().await.context("Failed to start dump relay")? {
        StartOutcome::Started(addr) | StartOutcome::AlreadyRunning(addr) => {
            log::info!("Send dumps to http://{}/dump", addr);
        }
    }
    Ok(server)
}

/// Next dump from an optional subscription; pends forever without one
async fn next_dump(dumps: &mut Option<broadcast::Receiver<DumpRecord>>) -> Option<DumpRecord> {
    let Some(receiver) = dumps else {
        return std::future::pending().await;
    };

    loop {
        match receiver.recv().await {
            Ok(record) => return Some(record),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Terminal fell behind, {} dumps not printed", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
