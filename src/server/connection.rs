// Connection handling module
// Accepts a single TCP connection and serves it with the request handler

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::signal::wait_for_close;
use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection unless the connection limit is reached.
///
/// The counter is incremented before the limit check so concurrent accepts
/// cannot both slip under `performance.max_connections`.
///
/// # Arguments
///
/// * `stream` - The TCP stream to serve
/// * `peer_addr` - The peer's socket address, used for logging
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter, released when the task ends
/// * `closing` - Flips to `true` when the server starts shutting down
///
/// # Returns
///
/// `false` when the connection was rejected because of the limit.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    closing: watch::Receiver<bool>,
) -> bool {
    // Increment counter first, then check limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return false;
        }
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        closing,
    );
    true
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive and the header read timeout
/// 3. Serves requests until the client leaves or shutdown begins
/// 4. Decrements the connection counter when done
///
/// Only reading request headers is timed. A request whose database command
/// is running waits for it however long it takes. On shutdown the connection
/// finishes the response in flight, then closes.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    closing: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let header_timeout =
            (performance.read_timeout > 0).then(|| Duration::from_secs(performance.read_timeout));

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(performance.keep_alive_timeout > 0)
            .header_read_timeout(header_timeout);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );
        tokio::pin!(conn);

        let result = tokio::select! {
            res = conn.as_mut() => res,
            () = wait_for_close(closing) => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        };

        if let Err(err) = result {
            if err.is_timeout() {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} sent no request headers within {} seconds",
                    performance.read_timeout
                ));
            } else {
                logger::log_connection_error(&err);
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
