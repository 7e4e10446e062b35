use anyhow::Result;
use plan_check::core::{Notifier, SnapshotProvider};
use plan_check::{JsonSnapshotFile, ObjectivePipeline, PlanCheckError, TemplateLoader};
use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[derive(Default)]
struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify_blocking(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_template(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_load_template_file_in_order() -> Result<()> {
    let file = write_template(
        "\nStructure IDs,,,,,,,\nPTV,,,,D95%[%],>=95,>=93,1\nRectum,Rectum,Rectum_PRV|RECTUM,,V70Gy[%],<=20,<=25,2\n",
    )?;
    let notifier = RecordingNotifier::default();

    let templates = TemplateLoader::new(&notifier).load(file.path())?;

    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].template_id, "PTV");
    assert_eq!(templates[0].template_codes, vec!["PTV"]);
    assert_eq!(templates[0].template_aliases, vec!["PTV"]);
    assert_eq!(templates[1].template_id, "Rectum");
    assert_eq!(templates[1].template_aliases, vec!["Rectum_PRV", "RECTUM"]);
    assert!(notifier.messages.borrow().is_empty());
    Ok(())
}

#[test]
fn test_short_row_in_file_is_malformed() -> Result<()> {
    let file = write_template("PTV,,,,D95%[%],>=95,>=93,1\nBladder,,\n")?;
    let notifier = RecordingNotifier::default();

    let err = TemplateLoader::new(&notifier).load(file.path()).unwrap_err();

    assert!(matches!(
        err,
        PlanCheckError::MalformedRow {
            line: 2,
            found: 3,
            expected: 8
        }
    ));
    Ok(())
}

#[test]
fn test_lung_template_resolves_against_structure_set() -> Result<()> {
    let provider = JsonSnapshotFile::from_file(fixture("plans.json"))?;
    let plan = provider.plan("C1", "R Lung")?;
    let notifier = RecordingNotifier::default();

    let resolved = ObjectivePipeline::new(&notifier)
        .run(fixture("lung_template.csv"), plan.structure_set.as_ref())?;

    let pairs: Vec<(&str, Option<&str>)> = resolved
        .iter()
        .map(|r| {
            (
                r.template.template_id.as_str(),
                r.structure.as_ref().map(|s| s.id.as_str()),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("PTV_6000", Some("PTV_6000")),
            ("SpinalCord", Some("SpinalCord")),
            // 別名都找不到，改用代碼比對
            ("Lungs", Some("Lung_L")),
            // 結構存在但沒有輪廓
            ("Heart", None),
            ("Esophagus", Some("Esophagus")),
        ]
    );

    let lungs = &resolved[2].template;
    assert_eq!(lungs.template_codes, vec!["7310", "7309"]);
    assert_eq!(lungs.dvh_objective, "V20Gy[%]");
    assert_eq!(lungs.priority, "2");
    assert!(notifier.messages.borrow().is_empty());
    Ok(())
}

#[test]
fn test_plan_without_structure_set_resolves_nothing() -> Result<()> {
    let provider = JsonSnapshotFile::from_file(fixture("plans.json"))?;
    let plan = provider.plan("C1", "Prostate")?;
    let notifier = RecordingNotifier::default();

    let resolved = ObjectivePipeline::new(&notifier)
        .run(fixture("lung_template.csv"), plan.structure_set.as_ref())?;

    assert_eq!(resolved.len(), 5);
    assert!(resolved.iter().all(|r| r.structure.is_none()));
    Ok(())
}

#[test]
fn test_missing_template_notifies_user() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let notifier = RecordingNotifier::default();

    let resolved = ObjectivePipeline::new(&notifier).run(dir.path().join("missing.csv"), None)?;

    assert!(resolved.is_empty());
    assert_eq!(notifier.messages.borrow().len(), 1);
    Ok(())
}
