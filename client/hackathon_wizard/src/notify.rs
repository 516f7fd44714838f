//! User-facing notifications (the toast layer of a UI host).

use tracing::{error, info};

/// Receives the success and error messages produced at each operation
/// boundary of the wizard.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default notifier: writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "notification", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "notification", "{message}");
    }
}
