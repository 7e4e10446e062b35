pub mod aggregator;
pub mod engine;
pub mod objectives;
pub mod resolver;
pub mod rules;
pub mod template_loader;

pub use crate::domain::model::{Finding, ObjectiveTemplate, PlanSnapshot, ResolvedObjective, Status};
pub use crate::domain::ports::{Notifier, Rule, RulePolicy, RuleScope, SnapshotProvider};
pub use crate::utils::error::Result;
