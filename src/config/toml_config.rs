use crate::utils::error::{PlanCheckError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    pub output: Option<OutputConfig>,
}

/// Limits used by the plan checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub image_age_days: f64,
    pub dose_warning_percent: f64,
    pub dose_variation_percent: f64,
    pub dose_ok_floor_percent: f64,
    pub couch_hu_upper: f64,
    pub couch_hu_lower: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            image_age_days: 21.0,
            dose_warning_percent: 115.0,
            dose_variation_percent: 110.0,
            dose_ok_floor_percent: 100.0,
            couch_hu_upper: -425.0,
            couch_hu_lower: -650.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
}

pub const OUTPUT_FORMATS: [&str; 2] = ["table", "json"];

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlanCheckError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COUCH_HU_UPPER})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlanCheckError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_format(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .unwrap_or("table")
    }
}

impl Validate for Thresholds {
    fn validate(&self) -> Result<()> {
        validation::validate_positive("thresholds.image_age_days", self.image_age_days)?;
        validation::validate_ordered(
            "thresholds.dose_ok_floor_percent",
            self.dose_ok_floor_percent,
            self.dose_variation_percent,
        )?;
        validation::validate_ordered(
            "thresholds.dose_variation_percent",
            self.dose_variation_percent,
            self.dose_warning_percent,
        )?;
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        validation::validate_one_of("output.format", self.output_format(), &OUTPUT_FORMATS)
    }
}
