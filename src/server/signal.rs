// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

use crate::logger;

/// Shutdown coordination shared by the signal task, the accept loop and
/// every open connection
pub struct SignalHandler {
    pub shutdown: Arc<Notify>,
    pub shutdown_requested: Arc<AtomicBool>,
    closing: watch::Sender<bool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        let (closing, _) = watch::channel(false);
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            closing,
        }
    }

    /// Mark shutdown, wake the accept loop and tell connections to close
    /// once their current request is answered
    pub fn request_shutdown(&self, reason: &str) {
        logger::log_shutdown(reason);
        self.shutdown_requested.store(true, Ordering::SeqCst);
        // notify_one stores a permit if the loop is not waiting yet
        self.shutdown.notify_one();
        self.closing.send_replace(true);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Receiver that flips to `true` when shutdown is requested
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.closing.subscribe()
    }
}

/// Resolve once `closing` turns `true` or its sender is gone
pub async fn wait_for_close(mut closing: watch::Receiver<bool>) {
    while !*closing.borrow_and_update() {
        if closing.changed().await.is_err() {
            return;
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => handler.request_shutdown("SIGTERM received"),
            _ = sigint.recv() => handler.request_shutdown("SIGINT received"),
        }
    });
    Ok(())
}

/// Fallback for other platforms - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            handler.request_shutdown("Ctrl+C received");
        }
    });
    Ok(())
}
