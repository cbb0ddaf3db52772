//! Background task owning the WebSocket connection.

use super::{StreamConfig, StreamEvent};
use crate::core::{Backoff, LiveboardError, Result};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a connected session ended
enum Exit {
    Shutdown,
    Closed(String),
}

pub(super) async fn run(
    config: StreamConfig,
    events: mpsc::Sender<StreamEvent>,
    mut outbound: mpsc::Receiver<String>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let mut backoff = Backoff::new(&config.reconnect);

    loop {
        if *shutdown.borrow() {
            return Ok(());
        }

        tracing::info!("Connecting to {}", config.url);
        let connected = tokio::select! {
            result = connect(&config) => result,
            _ = shutdown.changed() => return Ok(()),
        };

        match connected {
            Ok(socket) => {
                backoff.reset();
                // Frames queued while disconnected are stale
                while outbound.try_recv().is_ok() {}
                tracing::info!("Connected to {}", config.url);
                emit(&events, StreamEvent::Connected).await?;

                match pump(socket, &events, &mut outbound, &mut shutdown).await? {
                    Exit::Shutdown => return Ok(()),
                    Exit::Closed(reason) => {
                        tracing::warn!("Stream {} disconnected: {}", config.url, reason);
                        emit(&events, StreamEvent::Disconnected { reason }).await?;
                    },
                }
            },
            Err(e) => {
                backoff.record_failure();
                tracing::warn!("Failed to connect to {}: {}", config.url, e);
                emit(&events, StreamEvent::Disconnected { reason: e.to_string() }).await?;
                if !e.is_recoverable() {
                    emit(&events, StreamEvent::GaveUp { attempts: backoff.attempts() }).await?;
                    return Err(e);
                }
            },
        }

        if !config.reconnect.enabled || backoff.exhausted() {
            tracing::error!("Giving up on {} after {} failed attempts", config.url, backoff.attempts());
            emit(&events, StreamEvent::GaveUp { attempts: backoff.attempts() }).await?;
            return Ok(());
        }

        let delay = backoff.next_delay();
        tracing::info!("Reconnecting in {:?} (attempt {})", delay, backoff.retries());
        emit(&events, StreamEvent::Reconnecting { attempt: backoff.retries(), delay }).await?;

        tokio::select! {
            _ = tokio::time::sleep(delay) => {},
            _ = shutdown.changed() => return Ok(()),
        }
    }
}

async fn connect(config: &StreamConfig) -> Result<Socket> {
    let timeout_ms = u64::try_from(config.connect_timeout.as_millis()).unwrap_or(u64::MAX);
    let (socket, _response) =
        tokio::time::timeout(config.connect_timeout, tokio_tungstenite::connect_async(config.url.as_str()))
            .await
            .map_err(|_| LiveboardError::Timeout { timeout_ms })??;
    Ok(socket)
}

async fn emit(events: &mpsc::Sender<StreamEvent>, event: StreamEvent) -> Result<()> {
    events.send(event).await.map_err(|_| LiveboardError::ChannelClosed)
}

async fn pump(
    socket: Socket,
    events: &mpsc::Sender<StreamEvent>,
    outbound: &mut mpsc::Receiver<String>,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<Exit> {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
                return Ok(Exit::Shutdown);
            }
            frame = outbound.recv() => match frame {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        return Ok(Exit::Closed(e.to_string()));
                    }
                }
                None => {
                    let _ = sink.close().await;
                    return Ok(Exit::Shutdown);
                }
            },
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => emit(events, StreamEvent::Message(text)).await?,
                Some(Ok(Message::Binary(bytes))) => {
                    tracing::debug!("Ignoring binary frame of {} bytes", bytes.len());
                }
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| format!("closed by server: {} {}", f.code, f.reason))
                        .unwrap_or_else(|| "closed by server".to_string());
                    return Ok(Exit::Closed(reason));
                }
                // Ping/Pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => return Ok(Exit::Closed(e.to_string())),
                None => return Ok(Exit::Closed("stream ended".to_string())),
            },
        }
    }
}
