//! Error type shared by every liveboard module.

use thiserror::Error;

/// Errors raised anywhere in liveboard
#[derive(Error, Debug)]
pub enum LiveboardError {
    /// An inbound message or seed file did not have the expected shape
    #[error("Malformed {what}: {message}")]
    Decode {
        /// Kind of message being decoded
        what: &'static str,
        /// Decoder error text
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A chart has no surface to draw into
    #[error("Missing mount point: {0}")]
    MissingMount(String),

    /// Drawing a frame failed
    #[error("UI rendering error: {0}")]
    Render(String),

    /// The terminal could not be set up or read
    #[error("Terminal UI error: {0}")]
    Terminal(String),

    /// WebSocket handshake or transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP request to the demo server failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An operation exceeded its deadline
    #[error("Timeout error: operation took longer than {timeout_ms}ms")]
    Timeout {
        /// The deadline that was exceeded
        timeout_ms: u64,
    },

    /// File or socket I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A background task panicked or was cancelled
    #[error("Async task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The other end of an internal channel is gone
    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type alias for liveboard operations
pub type Result<T> = std::result::Result<T, LiveboardError>;

impl LiveboardError {
    /// Creates a new decode error for the named message kind
    pub fn decode<S: Into<String>>(what: &'static str, msg: S) -> Self {
        Self::Decode {
            what,
            message: msg.into(),
        }
    }

    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new missing mount point error
    pub fn missing_mount<S: Into<String>>(name: S) -> Self {
        Self::MissingMount(name.into())
    }

    /// Creates a new render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }

    /// Creates a new terminal error
    pub fn terminal<S: Into<String>>(msg: S) -> Self {
        Self::Terminal(msg.into())
    }

    /// Returns true if the stream should try again after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::WebSocket(err) => {
                !matches!(err, tokio_tungstenite::tungstenite::Error::Url(_))
            },
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            Self::Timeout { .. } => true,
            Self::Io(err) => !matches!(err.kind(), std::io::ErrorKind::PermissionDenied),
            _ => false,
        }
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Decode { .. } | Self::Serialization(_) => "decode",
            Self::Config(_) => "config",
            Self::MissingMount(_) => "mount",
            Self::Render(_) | Self::Terminal(_) => "ui",
            Self::WebSocket(_) | Self::Http(_) => "network",
            Self::Timeout { .. } => "timeout",
            Self::Io(_) => "io",
            Self::Join(_) => "async",
            Self::ChannelClosed => "channel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LiveboardError::decode("stats sample", "missing field `cpu`");
        assert_eq!(err.to_string(), "Malformed stats sample: missing field `cpu`");
        assert_eq!(err.category(), "decode");
    }

    #[test]
    fn test_error_recoverability() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(LiveboardError::from(refused).is_recoverable());
        assert!(LiveboardError::Timeout { timeout_ms: 5000 }.is_recoverable());
        assert!(!LiveboardError::config("invalid config").is_recoverable());
        assert!(!LiveboardError::missing_mount("cpu").is_recoverable());
    }

    #[test]
    fn test_mount_error() {
        let err = LiveboardError::missing_mount("mem");
        assert_eq!(err.to_string(), "Missing mount point: mem");
        assert_eq!(err.category(), "mount");
    }
}
