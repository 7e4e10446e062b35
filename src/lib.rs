pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleNotifier, JsonSnapshotFile};
pub use config::{Thresholds, TomlConfig};
pub use core::{
    aggregator::aggregate, engine::RuleEngine, objectives::resolve_objectives,
    objectives::ObjectivePipeline, resolver::resolve, template_loader::TemplateLoader,
};
pub use utils::error::{PlanCheckError, Result};
