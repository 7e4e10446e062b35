// Adapters layer: concrete implementations of the domain ports (snapshot source, user notification)

pub mod notifier;
pub mod snapshot;

pub use notifier::ConsoleNotifier;
pub use snapshot::JsonSnapshotFile;
