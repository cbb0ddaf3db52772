//! WebSocket channel to the demo server.
//!
//! [`StreamHandle::spawn`] acquires the channel: a background task connects,
//! forwards inbound text frames as [`StreamEvent`]s, writes outbound frames
//! while connected and reconnects with capped backoff after a drop.
//! [`StreamHandle::shutdown`] releases it; dropping the handle aborts the task.

mod client;

use crate::core::config::{Config, ReconnectConfig};
use crate::core::{LiveboardError, Result};
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

const EVENT_BUFFER: usize = 1024;
const OUTBOUND_BUFFER: usize = 64;

/// Something that happened on the channel
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A connection was established
    Connected,
    /// A text frame arrived
    Message(String),
    /// The connection attempt failed or an open connection dropped
    Disconnected { reason: String },
    /// A reconnect is scheduled after `delay`
    Reconnecting { attempt: u32, delay: Duration },
    /// No further attempts will be made; `attempts` counts failed connects
    GaveUp { attempts: u32 },
}

/// Channel state as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected(String),
    Reconnecting { attempt: u32, delay: Duration },
    Offline,
}

impl ConnectionStatus {
    /// Follow a channel event. Message events leave the status unchanged.
    pub fn observe(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Connected => *self = Self::Connected,
            StreamEvent::Message(_) => {},
            StreamEvent::Disconnected { reason } => *self = Self::Disconnected(reason.clone()),
            StreamEvent::Reconnecting { attempt, delay } => {
                *self = Self::Reconnecting {
                    attempt: *attempt,
                    delay: *delay,
                };
            },
            StreamEvent::GaveUp { .. } => *self = Self::Offline,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Short text for status bars
    pub fn label(&self) -> String {
        match self {
            Self::Connecting => "Connecting".to_string(),
            Self::Connected => "Connected".to_string(),
            Self::Disconnected(reason) => format!("Disconnected: {}", reason),
            Self::Reconnecting { attempt, delay } => {
                format!("Reconnecting #{} in {:.1}s", attempt, delay.as_secs_f64())
            },
            Self::Offline => "Offline".to_string(),
        }
    }
}

/// Where and how to connect
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// ws:// or wss:// URL
    pub url: String,
    /// Timeout for one connect attempt
    pub connect_timeout: Duration,
    /// Reconnect policy
    pub reconnect: ReconnectConfig,
}

impl StreamConfig {
    /// Stream settings for `path` on the configured server.
    pub fn from_config(config: &Config, path: &str) -> Result<Self> {
        Ok(Self {
            url: websocket_url(&config.server.base_url, path)?,
            connect_timeout: config.server.connect_timeout,
            reconnect: config.reconnect.clone(),
        })
    }
}

/// Turn an http(s) base URL into the ws(s) URL of `path`.
pub fn websocket_url(base: &str, path: &str) -> Result<String> {
    let base = base.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(LiveboardError::config(format!("Unsupported server URL '{}'", base)));
    };
    Ok(format!("{}{}", ws_base, path))
}

/// Owner of a running channel
pub struct StreamHandle {
    events: mpsc::Receiver<StreamEvent>,
    outbound: mpsc::Sender<String>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<Result<()>>>,
}

impl StreamHandle {
    /// Start the background connection task.
    pub fn spawn(config: StreamConfig) -> Self {
        // wss:// needs a process-wide crypto provider; later installs are ignored
        let _ = rustls::crypto::ring::default_provider().install_default();

        let (event_tx, events) = mpsc::channel(EVENT_BUFFER);
        let (outbound, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let result = client::run(config, event_tx, outbound_rx, shutdown_rx).await;
            if let Err(e) = &result {
                tracing::debug!("Stream task ended: {}", e);
            }
            result
        });

        Self {
            events,
            outbound,
            shutdown,
            task: Some(task),
        }
    }

    /// Next channel event; `None` once the task has ended.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Queue a text frame. Frames are dropped when the queue is full or the
    /// channel is down.
    pub fn send(&self, frame: String) -> Result<()> {
        match self.outbound.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Outbound queue full, dropping frame");
                Ok(())
            },
            Err(TrySendError::Closed(_)) => Err(LiveboardError::ChannelClosed),
        }
    }

    /// Close the socket and wait for the task to finish.
    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.shutdown.send(true);
        // Unblocks a task waiting on a full event queue
        self.events.close();
        match self.task.take() {
            Some(task) => match task.await? {
                Ok(()) | Err(LiveboardError::ChannelClosed) => Ok(()),
                Err(e) => Err(e),
            },
            None => Ok(()),
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
