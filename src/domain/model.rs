use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientOrientation {
    HeadFirstSupine,
    HeadFirstProne,
    FeetFirstSupine,
    FeetFirstProne,
    HeadFirstDecubitusLeft,
    HeadFirstDecubitusRight,
    FeetFirstDecubitusLeft,
    FeetFirstDecubitusRight,
    NoOrientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub id: String,
    pub isocenter_position: Vector3,
    #[serde(default)]
    pub is_setup_field: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: String,
    /// 分類標籤，例如 "NormalTissue"
    #[serde(default)]
    pub code: String,
    /// 0 代表未指定 CT 值
    #[serde(default)]
    pub assigned_hu: f64,
    #[serde(default)]
    pub dicom_type: String,
    #[serde(default)]
    pub is_empty: bool,
    /// 外部結構代碼，比對時只看第一個
    #[serde(default)]
    pub structure_codes: Vec<String>,
}

impl Structure {
    pub fn primary_code(&self) -> Option<&str> {
        self.structure_codes.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureSet {
    pub id: String,
    pub image_creation_date_time: NaiveDateTime,
    #[serde(default)]
    pub structures: Vec<Structure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub course_id: String,
    pub creation_date_time: NaiveDateTime,
    /// 百分比；只有 `is_dose_valid` 為真時才有意義
    #[serde(default)]
    pub dose_max_3d: f64,
    #[serde(default)]
    pub is_dose_valid: bool,
    #[serde(default)]
    pub target_volume_id: String,
    #[serde(default)]
    pub primary_reference_point_id: Option<String>,
    pub treatment_orientation: PatientOrientation,
    #[serde(default)]
    pub beams: Vec<Beam>,
    #[serde(default)]
    pub structure_set: Option<StructureSet>,
}

impl PlanSnapshot {
    pub fn treatment_beam_ids(&self) -> Vec<&str> {
        self.beams
            .iter()
            .filter(|beam| !beam.is_setup_field)
            .map(|beam| beam.id.as_str())
            .collect()
    }
}

/// Finding classification. Declaration order is the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "1 - Warning")]
    Warning,
    #[serde(rename = "2 - Variation")]
    Variation,
    #[serde(rename = "3 - OK")]
    Ok,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Warning => "1 - Warning",
            Status::Variation => "2 - Variation",
            Status::Ok => "3 - OK",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    description: String,
    status: Status,
    severity: i32,
}

impl Finding {
    pub fn new(description: impl Into<String>, status: Status, severity: i32) -> Self {
        Self {
            description: description.into(),
            status,
            severity,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn severity(&self) -> i32 {
        self.severity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTemplate {
    pub template_id: String,
    pub template_codes: Vec<String>,
    pub template_aliases: Vec<String>,
    pub dvh_objective: String,
    pub goal: String,
    pub variation: String,
    pub priority: String,
    /// 由後續的劑量評估步驟填入
    pub achieved: String,
    pub met: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedObjective {
    pub template: ObjectiveTemplate,
    pub structure: Option<Structure>,
}
