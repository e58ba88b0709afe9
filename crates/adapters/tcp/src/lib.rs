//! # minibridge-adapter-tcp
//!
//! Line transport between the bridge and the controller over a single TCP
//! connection.
//!
//! ## Responsibilities
//! - Provide [`ChannelSender`], a [`CommandSender`] that queues outbound
//!   messages without ever blocking the caller
//! - Drain that queue onto the socket, one encoded frame per line
//! - Split the inbound byte stream into lines and hand each one to the
//!   bridge
//!
//! Reconnection is not handled: [`TcpTransport::run`] returns when the
//! connection ends and the caller decides what to do.
//!
//! ## Dependency rule
//! Depends on `minibridge-app` (port traits) and `minibridge-domain` only.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use minibridge_app::ports::CommandSender;
use minibridge_domain::message::Message;

/// Controller endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for the connection to be established.
    pub connect_timeout_secs: u64,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 41794,
            connect_timeout_secs: 5,
        }
    }
}

impl TcpConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Errors raised by the TCP transport.
#[derive(Debug, thiserror::Error)]
pub enum TcpError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[error("timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error("controller link i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// [`CommandSender`] backed by an unbounded queue.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelSender {
    /// Create a sender and the queue the transport drains.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CommandSender for ChannelSender {
    fn send(&self, message: &Message) {
        tracing::debug!(%message, "queueing outbound message");
        if self.tx.send(message.clone()).is_err() {
            tracing::warn!(%message, "transport is gone, dropping outbound message");
        }
    }
}

/// Drives one controller connection.
pub struct TcpTransport;

impl TcpTransport {
    /// Connect to the controller and pump messages until either side closes.
    ///
    /// # Errors
    ///
    /// Returns [`TcpError::Connect`] or [`TcpError::ConnectTimeout`] when the
    /// connection cannot be established and [`TcpError::Io`] when it fails
    /// afterwards.
    pub async fn run<F>(
        config: &TcpConfig,
        outbound: mpsc::UnboundedReceiver<Message>,
        on_line: F,
    ) -> Result<(), TcpError>
    where
        F: Fn(&str),
    {
        let address = config.address();
        tracing::info!(%address, "connecting to controller");
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let stream = match tokio::time::timeout(timeout, TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(TcpError::Connect { address, source }),
            Err(_) => return Err(TcpError::ConnectTimeout(address)),
        };
        tracing::info!(%address, "connected to controller");
        Self::serve(stream, outbound, on_line).await
    }

    /// Pump messages over an already established stream.
    ///
    /// Returns `Ok(())` when the peer closes the stream or every
    /// [`ChannelSender`] has been dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TcpError::Io`] on a read or write failure.
    pub async fn serve<S, F>(
        stream: S,
        mut outbound: mpsc::UnboundedReceiver<Message>,
        on_line: F,
    ) -> Result<(), TcpError>
    where
        S: AsyncRead + AsyncWrite,
        F: Fn(&str),
    {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut lines = LinesStream::new(BufReader::new(reader).lines());

        loop {
            tokio::select! {
                message = outbound.recv() => {
                    let Some(message) = message else {
                        tracing::info!("outbound queue closed, stopping transport");
                        return Ok(());
                    };
                    let mut frame = message.encode();
                    frame.push('\n');
                    writer.write_all(frame.as_bytes()).await?;
                    writer.flush().await?;
                }
                line = lines.next() => match line {
                    Some(Ok(line)) if line.trim().is_empty() => {}
                    Some(Ok(line)) => on_line(line.trim_end()),
                    Some(Err(err)) => return Err(err.into()),
                    None => {
                        tracing::info!("controller closed the connection");
                        return Ok(());
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn should_default_to_local_controller_port() {
        let config: TcpConfig = toml::from_str("").unwrap();
        assert_eq!(config.address(), "127.0.0.1:41794");
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn should_override_host_only() {
        let config: TcpConfig = toml::from_str(r#"host = "10.0.0.5""#).unwrap();
        assert_eq!(config.address(), "10.0.0.5:41794");
    }

    #[test]
    fn should_not_panic_when_transport_is_gone() {
        let (sender, rx) = ChannelSender::channel();
        drop(rx);
        sender.send(&Message::query("Television", 3, "getPowerState"));
    }

    #[tokio::test]
    async fn should_write_one_frame_per_line() {
        let (client, server) = tokio::io::duplex(1024);
        let (sender, rx) = ChannelSender::channel();
        sender.send(&Message::command("Television", 3, "setPowerState", "1"));
        sender.send(&Message::query("Television", 3, "getVolumeState"));
        drop(sender);

        TcpTransport::serve(client, rx, |_| {}).await.unwrap();

        let mut received = Vec::new();
        let mut lines = BufReader::new(server).lines();
        while let Some(line) = lines.next_line().await.unwrap() {
            received.push(line);
        }
        assert_eq!(
            received,
            ["Television:3:setPowerState:1:*", "Television:3:getVolumeState:*"]
        );
    }

    #[tokio::test]
    async fn should_feed_each_inbound_line_and_skip_blank_ones() {
        let (client, mut server) = tokio::io::duplex(1024);
        let (_sender, rx) = ChannelSender::channel();
        server
            .write_all(b"Television:3:eventMuteState:1:*\r\n\r\nDimLightBulb:1:eventLightBrightness:5:*\n")
            .await
            .unwrap();
        drop(server);

        let seen = Mutex::new(Vec::new());
        TcpTransport::serve(client, rx, |line| seen.lock().unwrap().push(line.to_string()))
            .await
            .unwrap();

        assert_eq!(
            seen.into_inner().unwrap(),
            [
                "Television:3:eventMuteState:1:*",
                "DimLightBulb:1:eventLightBrightness:5:*"
            ]
        );
    }

    #[tokio::test]
    async fn should_fail_to_connect_when_nothing_listens() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = TcpConfig {
            port,
            ..TcpConfig::default()
        };
        let (_sender, rx) = ChannelSender::channel();
        let result = TcpTransport::run(&config, rx, |_| {}).await;

        assert!(matches!(result, Err(TcpError::Connect { .. })));
    }
}
