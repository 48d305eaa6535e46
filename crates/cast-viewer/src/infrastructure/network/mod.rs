//! Network infrastructure for the viewer application.
//!
//! [`ViewerConnectionManager`] owns the two client sockets — the frame
//! stream and the command channel — as one unit.  Its state machine is
//! `Disconnected → Connecting → Streaming`; re-homing to a different host
//! tears the current pair down before dialing, so at most one live socket
//! pair exists at any time.
//!
//! Channel failures stay independent: the stream read task ending does not
//! touch the command writer, and a command write failure does not stop the
//! frame stream.  Either way the viewer freezes/goes quiet until an
//! explicit `connect_to` re-homes the pair.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use cast_core::protocol::commands::encode_line;
use cast_core::InputCommand;

use crate::application::reassemble_frames::{FrameReassembler, FrameSink, SharedDimensions};

/// Default frame stream port on the host.
pub const DEFAULT_STREAM_PORT: u16 = 5051;

/// Default command channel port on the host.
pub const DEFAULT_COMMAND_PORT: u16 = 5050;

/// URL scheme accepted by [`ViewerTarget::parse`] for protocol-handler
/// style invocations (`deskcast://192.168.1.20`).
pub const ADDRESS_SCHEME: &str = "deskcast://";

/// Errors produced by the viewer network layer.
#[derive(Debug, Error)]
pub enum ViewerNetworkError {
    /// The target address string could not be understood.
    #[error("invalid target address {input:?}")]
    InvalidTarget { input: String },

    /// TCP connect to one of the host's channels failed.
    #[error("failed to connect {channel} channel to {addr}: {source}")]
    ConnectFailed {
        channel: &'static str,
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A command was sent while no command channel is live.
    #[error("no live command channel")]
    NotConnected,

    /// Writing a command line failed; the command channel is dropped.
    #[error("command channel write failed: {0}")]
    Write(#[source] std::io::Error),

    /// A command batch could not be serialized.
    #[error("command serialization failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Connection lifecycle of the socket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Disconnected,
    Connecting,
    Streaming,
}

/// Where to find the host's two channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerTarget {
    pub host: String,
    pub stream_port: u16,
    pub command_port: u16,
}

impl ViewerTarget {
    /// A target at the default ports.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            stream_port: DEFAULT_STREAM_PORT,
            command_port: DEFAULT_COMMAND_PORT,
        }
    }

    /// Parses a user-supplied address: either a bare host
    /// (`192.168.1.20`) or a protocol-handler URL
    /// (`deskcast://192.168.1.20/`).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerNetworkError::InvalidTarget`] when no host remains
    /// after stripping the scheme.
    pub fn parse(input: &str) -> Result<Self, ViewerNetworkError> {
        let trimmed = input.trim();
        let without_scheme = trimmed.strip_prefix(ADDRESS_SCHEME).unwrap_or(trimmed);
        // A protocol-handler URL may carry a trailing slash or path; the
        // host is everything before the first one.
        let host = without_scheme.split('/').next().unwrap_or("");

        if host.is_empty() {
            return Err(ViewerNetworkError::InvalidTarget {
                input: input.to_string(),
            });
        }
        Ok(Self::new(host))
    }
}

/// Owns the viewer's socket pair and its lifecycle.
pub struct ViewerConnectionManager {
    state: ViewerState,
    sink: Arc<dyn FrameSink>,
    dims: SharedDimensions,
    command_writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
    stream_task: Option<JoinHandle<()>>,
}

impl ViewerConnectionManager {
    /// Creates a manager in `Disconnected`; frames will flow into `sink`
    /// and observed capture dimensions into `dims`.
    pub fn new(sink: Arc<dyn FrameSink>, dims: SharedDimensions) -> Self {
        Self {
            state: ViewerState::Disconnected,
            sink,
            dims,
            command_writer: Arc::new(Mutex::new(None)),
            stream_task: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Re-homes to `target`: tears down any live socket pair, then dials
    /// both channels of the new host.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerNetworkError::ConnectFailed`] when either dial
    /// fails; the manager is left cleanly `Disconnected`.
    pub async fn connect_to(&mut self, target: &ViewerTarget) -> Result<(), ViewerNetworkError> {
        self.disconnect().await;
        self.state = ViewerState::Connecting;
        info!("connecting to {}", target.host);

        let stream_addr = format!("{}:{}", target.host, target.stream_port);
        let stream_socket = match TcpStream::connect(&stream_addr).await {
            Ok(socket) => socket,
            Err(source) => {
                self.state = ViewerState::Disconnected;
                return Err(ViewerNetworkError::ConnectFailed {
                    channel: "stream",
                    addr: stream_addr,
                    source,
                });
            }
        };

        let command_addr = format!("{}:{}", target.host, target.command_port);
        let command_socket = match TcpStream::connect(&command_addr).await {
            Ok(socket) => socket,
            Err(source) => {
                // The stream socket dies with this scope; no half-open pair.
                self.state = ViewerState::Disconnected;
                return Err(ViewerNetworkError::ConnectFailed {
                    channel: "command",
                    addr: command_addr,
                    source,
                });
            }
        };

        for (socket, name) in [(&stream_socket, "stream"), (&command_socket, "command")] {
            if let Err(e) = socket.set_nodelay(true) {
                debug!("could not set TCP_NODELAY on {name} socket: {e}");
            }
        }

        // Input commands only flow viewer → host; the read half is unused.
        let (_, command_writer) = command_socket.into_split();
        *self.command_writer.lock().await = Some(command_writer);

        self.stream_task = Some(tokio::spawn(run_stream_reader(
            stream_socket,
            self.sink.clone(),
            self.dims.clone(),
        )));

        self.state = ViewerState::Streaming;
        info!("streaming from {}", target.host);
        Ok(())
    }

    /// Tears down both sockets (if any) and returns to `Disconnected`.
    pub async fn disconnect(&mut self) {
        if let Some(task) = self.stream_task.take() {
            task.abort();
        }
        if self.command_writer.lock().await.take().is_some() {
            debug!("command channel closed");
        }
        self.state = ViewerState::Disconnected;
    }

    /// Sends one command batch as a single wire line.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerNetworkError::NotConnected`] without a live command
    /// channel, or [`ViewerNetworkError::Write`] when the write fails — in
    /// which case the dead writer is dropped and later sends report
    /// `NotConnected` until a re-home.
    pub async fn send_commands(
        &self,
        commands: &[InputCommand],
    ) -> Result<(), ViewerNetworkError> {
        if commands.is_empty() {
            return Ok(());
        }
        let line = encode_line(commands)?;

        let mut guard = self.command_writer.lock().await;
        let Some(writer) = guard.as_mut() else {
            return Err(ViewerNetworkError::NotConnected);
        };
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!("command write failed, dropping command channel: {e}");
            *guard = None;
            return Err(ViewerNetworkError::Write(e));
        }
        Ok(())
    }
}

/// Drains the stream socket into a fresh reassembler until the host goes
/// away or framing sync is lost.
///
/// Runs as its own task; a slow render never blocks these reads because
/// the sink decouples them.
async fn run_stream_reader(
    mut socket: TcpStream,
    sink: Arc<dyn FrameSink>,
    dims: SharedDimensions,
) {
    let mut reassembler = FrameReassembler::new(dims);
    let mut chunk = [0u8; 16 * 1024];

    loop {
        match socket.read(&mut chunk).await {
            Ok(0) => {
                info!("stream channel closed by host");
                break;
            }
            Ok(n) => {
                if let Err(e) = reassembler.ingest(&chunk[..n], sink.as_ref()).await {
                    warn!("stream channel corrupt, dropping it: {e}");
                    break;
                }
            }
            Err(e) => {
                warn!("stream channel read failed: {e}");
                break;
            }
        }
    }
    // The viewer keeps its last rendered frame; recovery is an explicit
    // re-home via connect_to.
}

// ── Tests ─────────────────────────────────────────────────────────────────────
