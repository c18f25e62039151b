//! Dump relay HTTP + websocket server
//!
//! Routes:
//! - `POST /dump` accept a dump, always answers `200 OK`
//! - `GET /ws` websocket; pushes `{"event":"new-dump","data":<record>}`
//! - `GET /dumps` history, newest first
//! - `DELETE /dumps` clear history
//! - `GET /status` `{"running":true,"port":<port>}`

use crate::error::RelayError;
use crate::history::{DumpHistory, DEFAULT_HISTORY_CAPACITY};
use crate::record::DumpRecord;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

pub const DEFAULT_PORT: u16 = 9913;
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Dumps buffered per subscriber before it starts missing some
const BROADCAST_CAPACITY: usize = 256;

const NEW_DUMP_EVENT: &str = "new-dump";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_bytes: usize,
    pub history_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// History and fan-out shared by the HTTP handlers and in-process listeners
#[derive(Debug, Clone)]
pub struct RelayHub {
    history: Arc<RwLock<DumpHistory>>,
    dumps: broadcast::Sender<DumpRecord>,
}

impl RelayHub {
    pub fn new(history_capacity: usize) -> Self {
        let (dumps, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            history: Arc::new(RwLock::new(DumpHistory::new(history_capacity))),
            dumps,
        }
    }

    /// Receive every dump published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DumpRecord> {
        self.dumps.subscribe()
    }

    /// Store a record and hand it to all current subscribers
    pub async fn publish(&self, record: DumpRecord) {
        self.history.write().await.push(record.clone());
        // No subscribers is fine; the record is still in history
        let _ = self.dumps.send(record);
    }

    /// Stored records, newest first
    pub async fn history(&self) -> Vec<DumpRecord> {
        self.history.read().await.records().cloned().collect()
    }

    pub async fn clear(&self) {
        self.history.write().await.clear();
        log::info!("Dump history cleared");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelayStatus {
    pub running: bool,
    pub port: u16,
}

/// Result of [`DumpServer::start`]; both variants mean the relay is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(SocketAddr),
    AlreadyRunning(SocketAddr),
}

/// Result of [`DumpServer::stop`]; both variants mean the relay is down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

#[derive(Clone)]
struct RouterState {
    hub: RelayHub,
    port: u16,
    shutdown: watch::Receiver<bool>,
}

#[derive(Serialize)]
struct WsEvent<'a> {
    event: &'static str,
    data: &'a DumpRecord,
}

pub(crate) fn router(
    hub: RelayHub,
    port: u16,
    max_body_bytes: usize,
    shutdown: watch::Receiver<bool>,
) -> Router {
    Router::new()
        .route("/dump", post(receive_dump))
        .route("/dumps", get(list_dumps).delete(clear_dumps))
        .route("/status", get(status))
        .route("/ws", get(subscribe_ws))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(RouterState {
            hub,
            port,
            shutdown,
        })
}

async fn receive_dump(State(state): State<RouterState>, body: Bytes) -> (StatusCode, &'static str) {
    let record = DumpRecord::from_body(&body, Utc::now());
    log::info!("Received dump at {} ({} bytes)", record.time, body.len());
    state.hub.publish(record).await;
    (StatusCode::OK, "OK")
}

async fn list_dumps(State(state): State<RouterState>) -> Json<Vec<DumpRecord>> {
    Json(state.hub.history().await)
}

async fn clear_dumps(State(state): State<RouterState>) -> (StatusCode, &'static str) {
    state.hub.clear().await;
    (StatusCode::OK, "OK")
}

async fn status(State(state): State<RouterState>) -> Json<RelayStatus> {
    Json(RelayStatus {
        running: true,
        port: state.port,
    })
}

async fn subscribe_ws(ws: WebSocketUpgrade, State(state): State<RouterState>) -> Response {
    // Subscribe before the upgrade so nothing published in between is lost
    let dumps = state.hub.subscribe();
    ws.on_upgrade(move |socket| stream_dumps(socket, dumps, state.shutdown))
}

async fn stream_dumps(
    mut socket: WebSocket,
    mut dumps: broadcast::Receiver<DumpRecord>,
    mut shutdown: watch::Receiver<bool>,
) {
    log::info!("Dump viewer connected");

    loop {
        tokio::select! {
            // Only the unit result leaves this branch; the watch guard stays inside
            _ = async { let _ = shutdown.wait_for(|stop| *stop).await; } => break,
            received = dumps.recv() => match received {
                Ok(record) => {
                    let event = WsEvent {
                        event: NEW_DUMP_EVENT,
                        data: &record,
                    };
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            log::error!("Failed to encode dump event: {}", e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Dump viewer fell behind, {} dumps skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Viewers have nothing to say
                Some(Ok(_)) => {}
            },
        }
    }

    log::info!("Dump viewer disconnected");
}

struct Running {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<(), RelayError>>,
}

impl Running {
    fn is_alive(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Start/stop wrapper around the relay router
///
/// History and subscriptions live in the [`RelayHub`] and survive restarts.
pub struct DumpServer {
    config: RelayConfig,
    hub: RelayHub,
    running: Option<Running>,
}

impl DumpServer {
    pub fn new(config: RelayConfig) -> Self {
        let hub = RelayHub::new(config.history_capacity);
        Self {
            config,
            hub,
            running: None,
        }
    }

    pub fn hub(&self) -> &RelayHub {
        &self.hub
    }

    /// Shorthand for `hub().subscribe()`
    pub fn subscribe(&self) -> broadcast::Receiver<DumpRecord> {
        self.hub.subscribe()
    }

    /// Bind and start serving
    ///
    /// Starting a running server is not an error. Port 0 binds an ephemeral
    /// port; the returned address carries the real one.
    pub async fn start(&mut self) -> Result<StartOutcome, RelayError> {
        if let Some(running) = self.running.as_ref().filter(|r| r.is_alive()) {
            log::info!("Dump relay is already running on {}", running.addr);
            return Ok(StartOutcome::AlreadyRunning(running.addr));
        }

        // A previous run that died on its own
        if let Some(dead) = self.running.take() {
            if let Ok(Err(e)) = dead.task.await {
                log::warn!("Previous dump relay run failed: {}", e);
            }
        }

        let addr = SocketAddr::new(self.config.host, self.config.port);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| RelayError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| RelayError::Bind { addr, source })?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let app = router(
            self.hub.clone(),
            local_addr.port(),
            self.config.max_body_bytes,
            shutdown_rx.clone(),
        );

        let task = tokio::spawn(async move {
            let mut shutdown_rx = shutdown_rx;
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.wait_for(|stop| *stop).await;
                })
                .await
                .map_err(RelayError::Serve)
        });

        log::info!("Dump relay listening on http://{}", local_addr);

        self.running = Some(Running {
            addr: local_addr,
            shutdown: shutdown_tx,
            task,
        });

        Ok(StartOutcome::Started(local_addr))
    }

    /// Stop serving and close all websocket viewers
    pub async fn stop(&mut self) -> Result<StopOutcome, RelayError> {
        let Some(running) = self.running.take() else {
            log::info!("Dump relay is not running");
            return Ok(StopOutcome::NotRunning);
        };

        let _ = running.shutdown.send(true);
        match running.task.await {
            Ok(result) => result?,
            Err(e) => log::error!("Dump relay task ended abnormally: {}", e),
        }

        log::info!("Dump relay stopped");
        Ok(StopOutcome::Stopped)
    }

    pub fn status(&self) -> RelayStatus {
        match self.running.as_ref().filter(|r| r.is_alive()) {
            Some(running) => RelayStatus {
                running: true,
                port: running.addr.port(),
            },
            None => RelayStatus {
                running: false,
                port: self.config.port,
            },
        }
    }
}
