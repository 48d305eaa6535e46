//! Network infrastructure for the host application.
//!
//! Both host endpoints are built on [`ConnectionListener`], a generic
//! accept loop with the lifecycle the protocol requires:
//!
//! - One TCP port, bound for the process lifetime.  Bind and accept
//!   failures are logged and retried after a fixed backoff; the endpoint
//!   never terminates.
//! - Exactly one active peer.  Accepting a new connection supersedes the
//!   previous session: its task is cancelled and the new session owns the
//!   endpoint's connection slot.  (The superseded session would otherwise
//!   discover its death on its next I/O anyway; explicit cancellation just
//!   removes the wait.)
//! - Failures are local to the endpoint — the stream and command channels
//!   never share state.

pub mod input_server;
pub mod stream_server;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

pub use input_server::InputServer;
pub use stream_server::StreamServer;

/// Fixed delay before retrying a failed bind or accept.
pub const BIND_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Generic single-peer accept loop for one endpoint.
pub struct ConnectionListener {
    name: &'static str,
    addr: SocketAddr,
    retry_backoff: Duration,
}

impl ConnectionListener {
    /// Creates a listener for `addr`; `name` labels log lines ("stream" or
    /// "command").
    pub fn new(name: &'static str, addr: SocketAddr) -> Self {
        Self {
            name,
            addr,
            retry_backoff: BIND_RETRY_BACKOFF,
        }
    }

    /// Binds and accepts forever.  Never returns except on process
    /// shutdown.
    ///
    /// `spawn_session` is invoked once per accepted connection and must
    /// hand back the session task's handle; the listener aborts it when a
    /// newer peer supersedes the session.
    pub async fn run<F>(&self, mut spawn_session: F)
    where
        F: FnMut(TcpStream, SocketAddr) -> JoinHandle<()>,
    {
        loop {
            let listener = match TcpListener::bind(self.addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    warn!(
                        "{} endpoint failed to bind {}: {e}; retrying in {:?}",
                        self.name, self.addr, self.retry_backoff
                    );
                    sleep(self.retry_backoff).await;
                    continue;
                }
            };
            info!("{} endpoint listening on {}", self.name, self.addr);
            accept_loop(self.name, listener, self.retry_backoff, &mut spawn_session).await;
        }
    }
}

/// Accepts peers on an already-bound listener forever.
///
/// Split out from [`ConnectionListener::run`] so tests can drive the accept
/// lifecycle on an ephemeral port.  Accept failures are logged and retried
/// after `retry_backoff`; the listener is never dropped.
pub async fn accept_loop<F>(
    name: &str,
    listener: TcpListener,
    retry_backoff: Duration,
    spawn_session: &mut F,
) where
    F: FnMut(TcpStream, SocketAddr) -> JoinHandle<()>,
{
    let mut active: Option<(Uuid, JoinHandle<()>)> = None;

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                if let Some((old_id, old_task)) = active.take() {
                    info!("{name} session {old_id} superseded by new peer {peer}");
                    old_task.abort();
                }
                let session_id = Uuid::new_v4();
                info!("{name} session {session_id} accepted from {peer}");
                active = Some((session_id, spawn_session(stream, peer)));
            }
            Err(e) => {
                warn!("{name} accept failed: {e}; retrying in {retry_backoff:?}");
                sleep(retry_backoff).await;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
