//! Logger capability for client diagnostics.
//!
//! The client logs every request URL before fetching it, and those URLs
//! contain the session token and escaped credentials in plaintext. The
//! default `NopLogger` discards everything; installing a real logger is the
//! explicit opt-in to that exposure.

/// Receives the client's diagnostic messages.
pub trait SisLogger: Send + Sync {
    fn debug(&self, message: &str);
}

/// Default logger; discards everything.
pub struct NopLogger;

impl SisLogger for NopLogger {
    fn debug(&self, _message: &str) {}
}

/// Forwards client diagnostics to the `tracing` facade at debug level, so a
/// host application collects them with its normal subscriber.
pub struct TracingLogger;

impl SisLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "sis_client", "{message}");
    }
}
