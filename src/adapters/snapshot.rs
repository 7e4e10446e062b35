use crate::domain::model::PlanSnapshot;
use crate::domain::ports::SnapshotProvider;
use crate::utils::error::{PlanCheckError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Plans exported by the planning system as one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub active_plan_id: Option<String>,
    pub plans: Vec<PlanSnapshot>,
}

#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    document: SnapshotDocument,
}

impl JsonSnapshotFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(content)?;
        tracing::debug!("Loaded {} plan snapshots", document.plans.len());
        Ok(Self { document })
    }

    pub fn active_plan_id(&self) -> Option<&str> {
        self.document.active_plan_id.as_deref()
    }

    /// Plans to check when no course and plan are named: the active plan
    /// alone, or every plan when there is no active plan in the document.
    pub fn default_selection(&self) -> Result<Vec<PlanSnapshot>> {
        let plans = self.plans()?;
        let Some(active) = self.active_plan_id() else {
            return Ok(plans);
        };

        if let Some(plan) = plans.iter().find(|p| p.id == active) {
            return Ok(vec![plan.clone()]);
        }
        tracing::warn!(
            "⚠️ Active plan {} is not in the snapshot; checking all {} plans",
            active,
            plans.len()
        );
        Ok(plans)
    }
}

impl SnapshotProvider for JsonSnapshotFile {
    /// 目前開啟的計畫排第一，其餘依 Id 排序
    fn plans(&self) -> Result<Vec<PlanSnapshot>> {
        let mut plans = self.document.plans.clone();
        if let Some(active) = self.active_plan_id() {
            plans.sort_by(|a, b| {
                (b.id == active)
                    .cmp(&(a.id == active))
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        Ok(plans)
    }

    fn plan(&self, course_id: &str, plan_id: &str) -> Result<PlanSnapshot> {
        self.document
            .plans
            .iter()
            .find(|p| p.course_id == course_id && p.id == plan_id)
            .cloned()
            .ok_or_else(|| PlanCheckError::PlanNotFound {
                course_id: course_id.to_string(),
                plan_id: plan_id.to_string(),
            })
    }
}
