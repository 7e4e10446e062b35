use crate::domain::model::{Finding, Status};

/// Builder used by rules to collect their findings.
#[derive(Debug, Default)]
pub struct FindingList {
    findings: Vec<Finding>,
}

impl FindingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, description: impl Into<String>, status: Status, severity: i32) -> &mut Self {
        self.findings.push(Finding::new(description, status, severity));
        self
    }

    pub fn into_vec(self) -> Vec<Finding> {
        self.findings
    }
}

/// Concatenates plan-level and structure-set-level findings and orders them
/// Warning, Variation, OK. Equal statuses keep their input order.
pub fn aggregate(plan_findings: Vec<Finding>, structure_set_findings: Vec<Finding>) -> Vec<Finding> {
    let mut all = plan_findings;
    all.extend(structure_set_findings);
    // sort_by_key 是穩定排序
    all.sort_by_key(Finding::status);
    all
}
