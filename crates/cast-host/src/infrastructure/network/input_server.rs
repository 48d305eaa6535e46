//! Command endpoint: receives newline-delimited JSON command lines and
//! applies them to the input injector.
//!
//! Per-session state machine: `Reading` until EOF or a read error, then the
//! session ends and the endpoint returns to waiting for the next peer.
//! A malformed line never terminates the connection — it is dropped and
//! logged, and parsing continues with the rest of the buffer.
//!
//! The read loop and command application share one task, so commands reach
//! the injector strictly in arrival order with no interleaving between
//! batches.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use cast_core::{parse_line, LineAssembler};

use crate::application::inject_input::ApplyInputUseCase;
use crate::infrastructure::network::ConnectionListener;

/// Read buffer size for the command socket; lines are tiny, so one page is
/// generous.
const READ_CHUNK: usize = 1024;

/// The command endpoint.
pub struct InputServer {
    addr: SocketAddr,
    apply: Arc<ApplyInputUseCase>,
}

impl InputServer {
    pub fn new(addr: SocketAddr, apply: Arc<ApplyInputUseCase>) -> Self {
        Self { addr, apply }
    }

    /// Runs the endpoint forever: bind, accept one controller at a time,
    /// read until EOF/error, repeat.
    pub async fn run(self) {
        let apply = self.apply;
        ConnectionListener::new("command", self.addr)
            .run(move |stream, peer| {
                let apply = Arc::clone(&apply);
                tokio::spawn(run_input_session(stream, peer, apply))
            })
            .await;
    }
}

/// Drives one command session until the peer goes away.
///
/// Public so integration tests can run a session against a socket they
/// accepted themselves.  Each session starts with a fresh line buffer, so a
/// predecessor's partial line can never leak into a new connection.
pub async fn run_input_session(
    mut stream: TcpStream,
    peer: SocketAddr,
    apply: Arc<ApplyInputUseCase>,
) {
    let mut lines = LineAssembler::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => {
                info!("command session for {peer} ended: peer closed");
                break;
            }
            Ok(n) => {
                lines.push(&chunk[..n]);
                while let Some(line) = lines.next_line() {
                    match parse_line(&line) {
                        Ok(commands) => {
                            debug!("applying {} command(s) from {peer}", commands.len());
                            apply.apply_all(&commands);
                        }
                        Err(e) => warn!("dropping line from {peer}: {e}"),
                    }
                }
            }
            Err(e) => {
                warn!("command session for {peer} ended: {e}");
                break;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
