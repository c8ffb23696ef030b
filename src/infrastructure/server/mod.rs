//! Server runtime support

mod shutdown;

pub use shutdown::{listen_for_shutdown_signals, ShutdownCoordinator, ShutdownReason, ShutdownSignal};
