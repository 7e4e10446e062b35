use crate::config::toml_config::Thresholds;
use crate::core::aggregator;
use crate::core::rules;
use crate::domain::model::{Finding, PlanSnapshot};
use crate::domain::ports::{Rule, RulePolicy, RuleScope};
use crate::utils::error::Result;

pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self::with_rules(rules::default_rules(thresholds))
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Runs every rule against `plan` and returns the findings ordered
    /// Warning, Variation, OK.
    pub fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        tracing::debug!("Evaluating plan {} ({} rules)", plan.id, self.rules.len());

        let mut plan_findings = Vec::new();
        let mut structure_set_findings = Vec::new();

        for rule in &self.rules {
            let findings = match rule.evaluate(plan) {
                Ok(findings) => findings,
                Err(e) => match rule.policy() {
                    RulePolicy::Mandatory => {
                        tracing::error!("❌ Rule {} failed for plan {}: {}", rule.name(), plan.id, e);
                        return Err(e);
                    }
                    RulePolicy::BestEffort => {
                        tracing::debug!("Rule {} skipped for plan {}: {}", rule.name(), plan.id, e);
                        continue;
                    }
                },
            };

            tracing::debug!("Rule {} produced {} findings", rule.name(), findings.len());
            match rule.scope() {
                RuleScope::Plan => plan_findings.extend(findings),
                RuleScope::StructureSet => structure_set_findings.extend(findings),
            }
        }

        let findings = aggregator::aggregate(plan_findings, structure_set_findings);
        tracing::info!("📋 Plan {}: {} findings", plan.id, findings.len());
        Ok(findings)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(&Thresholds::default())
    }
}
