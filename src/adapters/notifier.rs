use crate::domain::ports::Notifier;

/// Prints blocking notifications to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_blocking(&self, message: &str) {
        tracing::error!("❌ {}", message);
        eprintln!("❌ {}", message);
    }
}
