// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept loop for the gateway
///
/// # Process
///
/// 1. Accept connections and hand each one to its own task
/// 2. On shutdown, close the listener so no new connections arrive
/// 3. Wait for open connections to finish their current request, bounded by
///    `performance.shutdown_timeout`
///
/// # Arguments
///
/// * `listener` - Bound listener, see `create_listener`
/// * `state` - Shared application state
/// * `signals` - Shutdown coordination; the loop ends when it fires
///
/// # Returns
///
/// `Ok(())` once shutdown is complete. Connections still open after the
/// deadline are logged and left to the runtime.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let closing = signals.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            closing.clone(),
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = signals.shutdown.notified() => {
                if signals.is_shutdown_requested() {
                    break;
                }
            }
        }
    }

    drop(listener);
    let in_flight = active_connections.load(Ordering::SeqCst);
    if in_flight > 0 {
        logger::log_info(&format!(
            "Listener closed, waiting for {in_flight} connection(s) to finish"
        ));
    }

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    let remaining = drain_connections(&active_connections, grace).await;
    if remaining > 0 {
        logger::log_warning(&format!(
            "{remaining} connection(s) still open after {}s, abandoning them",
            grace.as_secs()
        ));
    } else {
        logger::log_info("All connections closed");
    }
    Ok(())
}

/// Wait until `counter` reaches zero or `grace` elapses
///
/// Returns the number of connections still open.
async fn drain_connections(counter: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = counter.load(Ordering::SeqCst);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let counter = AtomicUsize::new(0);
        assert_eq!(drain_connections(&counter, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_waits_for_release() {
        let counter = Arc::new(AtomicUsize::new(1));
        let releaser = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            releaser.fetch_sub(1, Ordering::SeqCst);
        });

        assert_eq!(drain_connections(&counter, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_at_deadline() {
        let counter = AtomicUsize::new(2);
        assert_eq!(
            drain_connections(&counter, Duration::from_millis(100)).await,
            2
        );
    }
}
