use super::DEFAULT_SEVERITY;
use crate::core::aggregator::FindingList;
use crate::domain::model::{Finding, PlanSnapshot, Status};
use crate::domain::ports::{Rule, RuleScope};
use crate::utils::error::Result;

const NORMAL_TISSUE_CODE: &str = "NormalTissue";
const COUCH_SURFACE_ID: &str = "CouchSurface";

/// Normal-tissue structures must carry an assigned CT value.
pub struct NormalTissueHuRule;

impl Rule for NormalTissueHuRule {
    fn name(&self) -> &'static str {
        "normal_tissue_hu"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::StructureSet
    }

    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        let mut findings = FindingList::new();
        let Some(structure_set) = &plan.structure_set else {
            return Ok(findings.into_vec());
        };

        for structure in structure_set
            .structures
            .iter()
            .filter(|s| s.code == NORMAL_TISSUE_CODE)
        {
            if structure.assigned_hu != 0.0 {
                findings.append(
                    format!(
                        "Structure {} has an assigned CT value of {}.",
                        structure.id, structure.assigned_hu
                    ),
                    Status::Ok,
                    DEFAULT_SEVERITY,
                );
            } else {
                findings.append(
                    format!("Structure {} does not have an assigned CT value.", structure.id),
                    Status::Warning,
                    DEFAULT_SEVERITY,
                );
            }
        }

        Ok(findings.into_vec())
    }
}

/// Checks the first couch-surface structure only.
///
/// The pass condition is `hu <= upper || hu >= lower`, which holds for
/// nearly every value. It is kept as-is so results stay comparable with
/// reports produced before this tool.
pub struct CouchHuRule {
    upper: f64,
    lower: f64,
}

impl CouchHuRule {
    pub fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }
}

impl Rule for CouchHuRule {
    fn name(&self) -> &'static str {
        "couch_hu"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::StructureSet
    }

    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        let mut findings = FindingList::new();
        let Some(couch) = plan.structure_set.as_ref().and_then(|ss| {
            ss.structures
                .iter()
                .find(|s| s.id.contains(COUCH_SURFACE_ID))
        }) else {
            return Ok(findings.into_vec());
        };

        if couch.assigned_hu <= self.upper || couch.assigned_hu >= self.lower {
            findings.append(
                format!(
                    "Structure {} has assigned HU of {} and is within limit of {} to {}.",
                    couch.id, couch.assigned_hu, self.upper, self.lower
                ),
                Status::Ok,
                DEFAULT_SEVERITY,
            );
        } else {
            findings.append(
                format!(
                    "Structure {} has assigned HU of {} and is outside limit of {} to {}.",
                    couch.id, couch.assigned_hu, self.upper, self.lower
                ),
                Status::Warning,
                DEFAULT_SEVERITY,
            );
        }

        Ok(findings.into_vec())
    }
}
