//! Graceful shutdown handling for the API server
//!
//! Listens for SIGTERM and SIGINT and lets any component request a
//! coordinated shutdown, either on request or because something failed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::broadcast;

/// Why the server is going down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// OS signal or explicit request
    Requested,
    /// A server task failed; the process should exit non-zero
    Fatal(String),
}

/// Shutdown signal that can be cloned and shared across tasks
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
    reason: Arc<Mutex<Option<ShutdownReason>>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            triggered: Arc::new(AtomicBool::new(false)),
            reason: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Request a normal shutdown
    pub fn trigger(&self) {
        self.trigger_with(ShutdownReason::Requested);
    }

    /// Shut down because of an unrecoverable runtime error
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        error!("💥 Fatal server error: {}", message);
        self.trigger_with(ShutdownReason::Fatal(message));
    }

    fn trigger_with(&self, reason: ShutdownReason) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            if let Ok(mut slot) = self.reason.lock() {
                *slot = Some(reason);
            }
            info!("🛑 Shutdown signal triggered");
            let _ = self.sender.send(());
        }
    }

    /// The first reason given, once triggered
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.lock().ok().and_then(|slot| slot.clone())
    }

    /// Resolves once shutdown has been triggered, including before the call
    pub async fn wait(&self) {
        let mut rx = self.sender.subscribe();
        if self.is_triggered() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Listen for SIGTERM / SIGINT and trigger the shutdown signal
pub async fn listen_for_shutdown_signals(shutdown: ShutdownSignal) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("📡 Received SIGTERM signal"),
                    _ = sigint.recv() => info!("📡 Received SIGINT signal (Ctrl+C)"),
                    _ = shutdown.wait() => return,
                }
                shutdown.trigger();
                return;
            }
            _ => warn!("Failed to install unix signal handlers, falling back to Ctrl+C"),
        }
    }

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("📡 Received Ctrl+C signal"),
                Err(e) => {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
            }
            shutdown.trigger();
        }
        _ = shutdown.wait() => {}
    }
}

/// Graceful shutdown coordinator
pub struct ShutdownCoordinator {
    signal: ShutdownSignal,
    timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            signal: ShutdownSignal::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Get the shutdown signal for sharing with components
    pub fn signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start listening for OS signals in the background
    pub fn start_signal_listener(&self) {
        let signal = self.signal.clone();
        tokio::spawn(async move {
            listen_for_shutdown_signals(signal).await;
        });
    }

    /// Run `cleanup` bounded by the configured timeout.
    /// Returns false if the timeout elapsed first.
    pub async fn run_cleanup<Fut>(&self, cleanup: Fut) -> bool
    where
        Fut: std::future::Future<Output = ()>,
    {
        info!("⏳ Starting graceful shutdown (timeout: {}s)...", self.timeout.as_secs());
        match tokio::time::timeout(self.timeout, cleanup).await {
            Ok(()) => {
                info!("✅ Graceful shutdown completed");
                true
            }
            Err(_) => {
                warn!("⚠️ Graceful shutdown timed out after {}s", self.timeout.as_secs());
                false
            }
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_returns_when_already_triggered() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("wait should resolve");
        assert_eq!(signal.reason(), Some(ShutdownReason::Requested));
    }

    #[tokio::test]
    async fn first_reason_wins() {
        let signal = ShutdownSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };
        signal.fail("listener died");
        signal.trigger();
        waiter.await.unwrap();
        assert_eq!(
            signal.reason(),
            Some(ShutdownReason::Fatal("listener died".into()))
        );
    }

    #[tokio::test]
    async fn cleanup_is_bounded_by_the_timeout() {
        let coordinator = ShutdownCoordinator::new(0);
        let finished = coordinator
            .run_cleanup(tokio::time::sleep(Duration::from_millis(200)))
            .await;
        assert!(!finished);
        assert!(coordinator.run_cleanup(async {}).await);
    }
}
