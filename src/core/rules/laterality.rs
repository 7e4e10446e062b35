use super::DEFAULT_SEVERITY;
use crate::core::aggregator::FindingList;
use crate::domain::model::{Finding, PatientOrientation, PlanSnapshot, Status};
use crate::domain::ports::{Rule, RulePolicy, RuleScope};
use crate::utils::error::{PlanCheckError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Right,
    Left,
}

impl Side {
    fn matches(self, plan: &PlanSnapshot) -> bool {
        let id = plan.id.as_str();
        match self {
            // "RUL" 比對的是計畫名稱而非 Id
            Side::Right => {
                id.starts_with("R ")
                    || id.contains("_R")
                    || plan.name.contains("RUL")
                    || id.contains("RML")
                    || id.contains("RLL")
                    || id.contains("RT")
            }
            Side::Left => {
                id.starts_with("L ")
                    || id.contains("_L")
                    || id.contains("LUL")
                    || id.contains("LML")
                    || id.contains("LLL")
                    || id.contains("LT")
            }
        }
    }

    /// `Some(true)` when the isocenter x should be positive for this side.
    fn expects_positive_x(self, orientation: PatientOrientation) -> Option<bool> {
        // 仰臥頭先時右側位移為負 x，俯臥或腳先時符號相反
        let right_positive = match orientation {
            PatientOrientation::HeadFirstSupine => false,
            PatientOrientation::HeadFirstProne | PatientOrientation::FeetFirstSupine => true,
            _ => return None,
        };
        Some(match self {
            Side::Right => right_positive,
            Side::Left => !right_positive,
        })
    }

    fn word(self) -> (&'static str, &'static str) {
        match self {
            Side::Right => ("right", "Right"),
            Side::Left => ("left", "Left"),
        }
    }
}

/// Cross-checks left/right naming of the plan against the isocenter shift
/// of its first beam.
pub struct LateralityRule;

impl LateralityRule {
    fn first_isocenter_x(&self, plan: &PlanSnapshot) -> Result<f64> {
        plan.beams
            .first()
            .map(|beam| beam.isocenter_position.x)
            .ok_or_else(|| PlanCheckError::RuleFault {
                rule: self.name().to_string(),
                message: format!("plan {} has no beams", plan.id),
            })
    }
}

impl Rule for LateralityRule {
    fn name(&self) -> &'static str {
        "laterality"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Plan
    }

    fn policy(&self) -> RulePolicy {
        RulePolicy::BestEffort
    }

    fn evaluate(&self, plan: &PlanSnapshot) -> Result<Vec<Finding>> {
        let mut findings = FindingList::new();

        for side in [Side::Right, Side::Left] {
            if !side.matches(plan) {
                continue;
            }
            let Some(positive) = side.expects_positive_x(plan.treatment_orientation) else {
                continue;
            };

            let x = self.first_isocenter_x(plan)?;
            let consistent = if positive { x > 0.0 } else { x < 0.0 };
            let (shift, label) = side.word();

            if consistent {
                findings.append(
                    format!(
                        "Plan {} has a {} shift of {:.1} mm and the plan name is labeled {}.",
                        plan.id, shift, x, label
                    ),
                    Status::Ok,
                    DEFAULT_SEVERITY,
                );
            } else {
                findings.append(
                    format!(
                        "Plan {} has a {} shift of {:.1} mm but the plan name is not labeled {}.",
                        plan.id, shift, x, label
                    ),
                    Status::Warning,
                    DEFAULT_SEVERITY,
                );
            }
        }

        Ok(findings.into_vec())
    }
}
