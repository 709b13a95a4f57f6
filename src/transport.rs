//! Outbound link to the session authority

use crate::protocol::{ClientMessage, JoinRequest};
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Connection closed")]
    Closed,
}

/// Anything that can carry frames to the session authority
#[async_trait]
pub trait Transport: Send + Sync {
    async fn join(&self, request: &JoinRequest) -> TransportResult<()>;

    async fn send(&self, command: &ClientMessage) -> TransportResult<()>;
}

/// Writes each frame as one JSON line, e.g. into a websocket bridge's stdin
pub struct LineTransport<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> LineTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    async fn write_line(&self, line: String) -> TransportResult<()> {
        let mut writer = self.writer.lock().await;
        let written = async {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;

        match written {
            Ok(()) => Ok(()),
            // Reader on the other end of the pipe went away
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Err(TransportError::Closed),
            Err(e) => Err(e.into()),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl LineTransport<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + 'static> Transport for LineTransport<W> {
    async fn join(&self, request: &JoinRequest) -> TransportResult<()> {
        self.write_line(serde_json::to_string(request)?).await
    }

    async fn send(&self, command: &ClientMessage) -> TransportResult<()> {
        tracing::debug!(?command, "Sending command");
        self.write_line(serde_json::to_string(command)?).await
    }
}
