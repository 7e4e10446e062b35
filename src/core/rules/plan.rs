use super::{DATE_FORMAT, DEFAULT_SEVERITY};
use crate::core::aggregator::FindingList;
use crate::domain::model::{Finding, PlanSnapshot, Status};
use crate::domain::ports::{Rule, RuleScope};
use crate::utils::error::{PlanCheckError, Result};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// CT/structure data must not be much older than the plan.
pub struct ImageAgeRule {
    max_days: f64,
}

impl ImageAgeRule {
    pub fn new(max_days: f64) -> Self {
        Self { max_days }
    }
}

impl Rule for ImageAgeRule {
    fn name(&self) -> &'static str {
        "image_age"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Plan
    }

    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        let mut findings = FindingList::new();
        let Some(structure_set) = &plan.structure_set else {
            return Ok(findings.into_vec());
        };

        let image_time = structure_set.image_creation_date_time;
        let age = plan.creation_date_time - image_time;
        let days = age.num_milliseconds() as f64 / MILLIS_PER_DAY;
        let rounded = days.round() as i64;

        if days > self.max_days {
            findings.append(
                format!(
                    "CT and structure data ({}) is {} days older than plan creation date ({}) and outside of {} days.",
                    image_time.format(DATE_FORMAT),
                    rounded,
                    plan.creation_date_time.format(DATE_FORMAT),
                    self.max_days
                ),
                Status::Warning,
                DEFAULT_SEVERITY,
            );
        } else {
            findings.append(
                format!(
                    "CT and structure data ({}) is {} days older than plan creation date ({}) and within {} days.",
                    image_time.format(DATE_FORMAT),
                    rounded,
                    plan.creation_date_time.format(DATE_FORMAT),
                    self.max_days
                ),
                Status::Ok,
                DEFAULT_SEVERITY,
            );
        }

        Ok(findings.into_vec())
    }
}

/// Classifies the 3D dose maximum. Below the OK floor nothing is reported.
pub struct DoseMaxRule {
    warning: f64,
    variation: f64,
    ok_floor: f64,
}

impl DoseMaxRule {
    pub fn new(warning: f64, variation: f64, ok_floor: f64) -> Self {
        Self {
            warning,
            variation,
            ok_floor,
        }
    }
}

impl Rule for DoseMaxRule {
    fn name(&self) -> &'static str {
        "dose_max"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Plan
    }

    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        let mut findings = FindingList::new();
        if !plan.is_dose_valid {
            return Ok(findings.into_vec());
        }

        let dose = plan.dose_max_3d;
        if dose >= self.warning {
            findings.append(
                format!("Dose maximum is {:.1} %.", dose),
                Status::Warning,
                DEFAULT_SEVERITY,
            );
        } else if dose >= self.variation {
            findings.append(
                format!("Dose maximum is {:.1} %.", dose),
                Status::Variation,
                DEFAULT_SEVERITY,
            );
        } else if dose >= self.ok_floor {
            findings.append(
                format!("Dose maximum {:.1} %.", dose),
                Status::Ok,
                DEFAULT_SEVERITY,
            );
        }

        Ok(findings.into_vec())
    }
}

pub struct TargetVolumeRule;

impl Rule for TargetVolumeRule {
    fn name(&self) -> &'static str {
        "target_volume"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Plan
    }

    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        let finding = if plan.target_volume_id.is_empty() {
            Finding::new(
                format!("Plan {} does not have a target volume assigned.", plan.id),
                Status::Warning,
                DEFAULT_SEVERITY,
            )
        } else {
            Finding::new(
                format!("Plan {} has a target volume assigned.", plan.id),
                Status::Ok,
                DEFAULT_SEVERITY,
            )
        };
        Ok(vec![finding])
    }
}

/// The target volume id is expected to name the primary reference point.
pub struct TargetReferencePointRule;

impl Rule for TargetReferencePointRule {
    fn name(&self) -> &'static str {
        "target_reference_point"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Plan
    }

    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        let reference_point_id =
            plan.primary_reference_point_id
                .as_deref()
                .ok_or_else(|| PlanCheckError::RuleFault {
                    rule: self.name().to_string(),
                    message: format!("plan {} has no primary reference point", plan.id),
                })?;

        let finding = if plan.target_volume_id == reference_point_id {
            Finding::new(
                format!(
                    "Target Volume {} matches Primary Reference Point Id {}.",
                    plan.target_volume_id, reference_point_id
                ),
                Status::Ok,
                DEFAULT_SEVERITY,
            )
        } else {
            Finding::new(
                format!(
                    "Target Volume {} does not match Primary Reference Point Id {}.",
                    plan.target_volume_id, reference_point_id
                ),
                Status::Warning,
                DEFAULT_SEVERITY,
            )
        };
        Ok(vec![finding])
    }
}
