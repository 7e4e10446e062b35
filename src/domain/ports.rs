use crate::domain::model::{Finding, PlanSnapshot};
use crate::utils::error::Result;

/// How the engine treats a rule that returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePolicy {
    /// Errors propagate to the caller.
    Mandatory,
    /// Errors drop every finding of this rule for the plan.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Plan,
    StructureSet,
}

pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn scope(&self) -> RuleScope;
    fn policy(&self) -> RulePolicy {
        RulePolicy::Mandatory
    }
    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>>;
}

/// Blocking user notification supplied by the host.
pub trait Notifier {
    fn notify_blocking(&self, message: &str);
}

pub trait SnapshotProvider {
    fn plans(&self) -> Result<Vec<PlanSnapshot>>;
    fn plan(&self, course_id: &str, plan_id: &str) -> Result<PlanSnapshot>;
}
