//! Integration tests for the command endpoint over real loopback TCP.
//!
//! These tests exercise the same path production uses: the accept loop
//! hands each connection to `run_input_session`, which reassembles lines
//! from raw socket chunks and applies decoded commands to the injector.
//! They verify:
//!
//! - Commands arrive at the injector in exact arrival/array order across
//!   multiple writes on one connection.
//! - A malformed line is dropped without disturbing its neighbours or the
//!   connection.
//! - A new session after a disconnect starts with a fresh line buffer — a
//!   predecessor's partial line never bleeds into the next session.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};

use cast_host::application::inject_input::ApplyInputUseCase;
use cast_host::infrastructure::injection::mock::{InjectedEvent, MockInputInjector};
use cast_host::infrastructure::network::{accept_loop, input_server::run_input_session};

/// Starts a command endpoint on an ephemeral port and returns its address,
/// the shared injector, and the endpoint task.
async fn start_endpoint() -> (
    std::net::SocketAddr,
    Arc<MockInputInjector>,
    tokio::task::JoinHandle<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let injector = Arc::new(MockInputInjector::new());
    let apply = Arc::new(ApplyInputUseCase::new(injector.clone() as _));

    let endpoint = tokio::spawn(async move {
        let mut spawn_session = move |stream: TcpStream, peer| {
            let apply = Arc::clone(&apply);
            tokio::spawn(run_input_session(stream, peer, apply))
        };
        accept_loop("command", listener, Duration::from_millis(20), &mut spawn_session).await;
    });

    (addr, injector, endpoint)
}

/// Polls the injector until it holds `count` events or the timeout hits.
async fn wait_for_events(injector: &MockInputInjector, count: usize) -> Vec<InjectedEvent> {
    timeout(Duration::from_secs(5), async {
        loop {
            let events = injector.events();
            if events.len() >= count {
                return events;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("expected events did not arrive in time")
}

#[tokio::test]
async fn test_order_preserved_across_objects_and_arrays() {
    let (addr, injector, endpoint) = start_endpoint().await;

    let mut controller = TcpStream::connect(addr).await.expect("connect");
    controller
        .write_all(b"{\"type\":\"mouseMove\",\"x\":1,\"y\":1}\n")
        .await
        .unwrap();
    controller
        .write_all(
            b"[{\"type\":\"mouseMove\",\"x\":2,\"y\":2},{\"type\":\"mouseDown\",\"x\":2,\"y\":2}]\n",
        )
        .await
        .unwrap();
    controller
        .write_all(b"{\"type\":\"mouseUp\",\"x\":3,\"y\":3}\n")
        .await
        .unwrap();

    let events = wait_for_events(&injector, 4).await;

    assert_eq!(events.len(), 4);
    assert_eq!(events[0], InjectedEvent::Move { x: 1.0, y: 1.0 });
    assert_eq!(events[1], InjectedEvent::Move { x: 2.0, y: 2.0 });
    assert!(matches!(events[2], InjectedEvent::Button { down: true, .. }));
    assert!(matches!(events[3], InjectedEvent::Button { down: false, .. }));

    endpoint.abort();
}

#[tokio::test]
async fn test_malformed_line_between_valid_lines_is_dropped() {
    let (addr, injector, endpoint) = start_endpoint().await;

    let mut controller = TcpStream::connect(addr).await.expect("connect");
    // All three lines land in one write; only the garbage line is lost.
    controller
        .write_all(
            b"{\"type\":\"keyDown\",\"keyCode\":36}\n{oops\n{\"type\":\"keyUp\",\"keyCode\":36}\n",
        )
        .await
        .unwrap();

    let events = wait_for_events(&injector, 2).await;

    assert_eq!(
        events,
        vec![
            InjectedEvent::Key {
                code: 36,
                down: true
            },
            InjectedEvent::Key {
                code: 36,
                down: false
            },
        ]
    );

    endpoint.abort();
}

#[tokio::test]
async fn test_new_session_starts_with_fresh_line_buffer() {
    let (addr, injector, endpoint) = start_endpoint().await;

    // First controller sends one whole line plus a dangling half line, then
    // disconnects.  The half line dies with the session.
    let mut first = TcpStream::connect(addr).await.expect("connect first");
    first
        .write_all(b"{\"type\":\"mouseScroll\",\"deltaY\":120}\n{\"type\":\"keyDown\"")
        .await
        .unwrap();
    drop(first);

    wait_for_events(&injector, 1).await;

    // Second controller sends a clean line.  If the predecessor's partial
    // line had leaked, this would parse as garbage instead.
    let mut second = TcpStream::connect(addr).await.expect("connect second");
    second
        .write_all(b"{\"type\":\"forceModifierReset\"}\n")
        .await
        .unwrap();

    let events = wait_for_events(&injector, 2).await;

    assert_eq!(
        events,
        vec![
            InjectedEvent::Scroll { delta_y: 120 },
            InjectedEvent::ModifierReset,
        ]
    );

    endpoint.abort();
}
