use anyhow::Result;
use plan_check::core::{Finding, SnapshotProvider, Status};
use plan_check::{JsonSnapshotFile, RuleEngine, Thresholds, TomlConfig};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn descriptions(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(Finding::description).collect()
}

#[test]
fn test_lung_plan_findings_are_classified_and_sorted() -> Result<()> {
    let provider = JsonSnapshotFile::from_file(fixture("plans.json"))?;
    let plan = provider.plan("C1", "R Lung")?;

    let findings = RuleEngine::default().evaluate(&plan)?;

    let statuses: Vec<Status> = findings.iter().map(Finding::status).collect();
    assert_eq!(
        statuses,
        vec![
            Status::Warning,
            Status::Warning,
            Status::Variation,
            Status::Ok,
            Status::Ok,
            Status::Ok,
            Status::Ok,
        ]
    );

    assert_eq!(
        descriptions(&findings),
        vec![
            "CT and structure data (2024-03-18 08:00:00) is 28 days older than plan creation date (2024-04-15 10:30:00) and outside of 21 days.",
            "Structure Bolus does not have an assigned CT value.",
            "Dose maximum is 112.4 %.",
            "Plan R Lung has a target volume assigned.",
            "Target Volume PTV_6000 matches Primary Reference Point Id PTV_6000.",
            "Plan R Lung has a right shift of -61.2 mm and the plan name is labeled Right.",
            "Structure CouchSurface has assigned HU of -550 and is within limit of -425 to -650.",
        ]
    );
    assert!(findings.iter().all(|f| f.severity() == 1));
    Ok(())
}

#[test]
fn test_plan_without_structure_set() -> Result<()> {
    let provider = JsonSnapshotFile::from_file(fixture("plans.json"))?;
    let plan = provider.plan("C1", "Prostate")?;

    let findings = RuleEngine::default().evaluate(&plan)?;

    assert_eq!(
        descriptions(&findings),
        vec![
            "Plan Prostate does not have a target volume assigned.",
            "Target Volume  does not match Primary Reference Point Id Prostate.",
            "Dose maximum 104.9 %.",
        ]
    );
    assert!(findings
        .iter()
        .all(|f| !f.description().starts_with("CT and structure data")
            && !f.description().starts_with("Structure ")));
    Ok(())
}

#[test]
fn test_status_labels_are_non_decreasing() -> Result<()> {
    let provider = JsonSnapshotFile::from_file(fixture("plans.json"))?;
    let engine = RuleEngine::default();

    for plan in provider.plans()? {
        let findings = engine.evaluate(&plan)?;
        let labels: Vec<&str> = findings.iter().map(|f| f.status().label()).collect();
        assert!(labels.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", labels);
    }
    Ok(())
}

#[test]
fn test_evaluation_is_idempotent() -> Result<()> {
    let provider = JsonSnapshotFile::from_file(fixture("plans.json"))?;
    let plan = provider.plan("C1", "R Lung")?;
    let engine = RuleEngine::default();

    let first = engine.evaluate(&plan)?;
    let second = engine.evaluate(&plan)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_dose_thresholds_from_config() -> Result<()> {
    let config = TomlConfig::from_toml_str(
        r#"
[thresholds]
dose_warning_percent = 112.0
image_age_days = 30
"#,
    )?;
    let provider = JsonSnapshotFile::from_file(fixture("plans.json"))?;
    let plan = provider.plan("C1", "R Lung")?;

    let findings = RuleEngine::new(&config.thresholds).evaluate(&plan)?;

    let dose = findings
        .iter()
        .find(|f| f.description().starts_with("Dose maximum"))
        .expect("dose finding");
    assert_eq!(dose.status(), Status::Warning);

    let image = findings
        .iter()
        .find(|f| f.description().starts_with("CT and structure data"))
        .expect("image age finding");
    assert_eq!(image.status(), Status::Ok);
    assert!(image.description().ends_with("within 30 days."));
    Ok(())
}

#[test]
fn test_default_thresholds_match_documented_limits() {
    let thresholds = Thresholds::default();
    assert_eq!(thresholds.image_age_days, 21.0);
    assert_eq!(thresholds.dose_warning_percent, 115.0);
    assert_eq!(thresholds.dose_variation_percent, 110.0);
    assert_eq!(thresholds.dose_ok_floor_percent, 100.0);
    assert_eq!(thresholds.couch_hu_upper, -425.0);
    assert_eq!(thresholds.couch_hu_lower, -650.0);
}
