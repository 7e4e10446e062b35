//! Plan quality checks.
//!
//! Every rule is a pure function of the [`PlanSnapshot`] it is given and
//! returns its own findings. Rules never see each other's output; the
//! [`RuleEngine`](crate::core::engine::RuleEngine) collects and orders them.

pub mod laterality;
pub mod plan;
pub mod structure;

use crate::config::toml_config::Thresholds;
use crate::domain::ports::Rule;

pub use laterality::LateralityRule;
pub use plan::{DoseMaxRule, ImageAgeRule, TargetReferencePointRule, TargetVolumeRule};
pub use structure::{CouchHuRule, NormalTissueHuRule};

/// Weight attached to every finding. Reserved for future prioritisation.
pub const DEFAULT_SEVERITY: i32 = 1;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The fixed rule catalogue, in evaluation order.
pub fn default_rules(thresholds: &Thresholds) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ImageAgeRule::new(thresholds.image_age_days)),
        Box::new(DoseMaxRule::new(
            thresholds.dose_warning_percent,
            thresholds.dose_variation_percent,
            thresholds.dose_ok_floor_percent,
        )),
        Box::new(TargetVolumeRule),
        Box::new(TargetReferencePointRule),
        Box::new(LateralityRule),
        Box::new(NormalTissueHuRule),
        Box::new(CouchHuRule::new(thresholds.couch_hu_upper, thresholds.couch_hu_lower)),
    ]
}
