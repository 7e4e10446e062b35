use crate::domain::model::ObjectiveTemplate;
use crate::domain::ports::Notifier;
use crate::utils::error::{PlanCheckError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header sentinel found in the first column of the header row.
pub const HEADER_SENTINEL: &str = "Structure IDs";

/// Positional columns of a constraint template row.
pub mod columns {
    pub const TEMPLATE_ID: usize = 0;
    pub const CODES: usize = 1;
    pub const ALIASES: usize = 2;
    // 第 3 欄在此流程中不使用
    pub const DVH_OBJECTIVE: usize = 4;
    pub const GOAL: usize = 5;
    pub const VARIATION: usize = 6;
    pub const PRIORITY: usize = 7;

    pub const REQUIRED: usize = 8;
}

const ALTERNATIVE_SEPARATOR: char = '|';

/// Reads dose-objective templates from a flat comma-separated file.
///
/// Fields are split on every comma; there is no quoting or escaping.
/// Blank lines and the header row are skipped. Bytes that are not valid
/// UTF-8 are replaced, not rejected. A read fault is reported through the
/// [`Notifier`] and the rows read so far are returned; a row with fewer
/// than eight columns is an error.
pub struct TemplateLoader<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> TemplateLoader<'a> {
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ObjectiveTemplate>> {
        let path = path.as_ref();
        tracing::debug!("Loading constraint template from {}", path.display());

        match File::open(path) {
            Ok(file) => self.parse_reader(file),
            Err(e) => {
                tracing::error!("❌ Cannot open template {}: {}", path.display(), e);
                self.notifier.notify_blocking(&e.to_string());
                Ok(Vec::new())
            }
        }
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<ObjectiveTemplate>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut templates = Vec::new();
        for record in csv_reader.byte_records() {
            let record = match record {
                Ok(record) => record,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    tracing::error!(
                        "❌ Template read failed after {} rows: {}",
                        templates.len(),
                        e
                    );
                    self.notifier.notify_blocking(&e.to_string());
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let line = record.position().map(|p| p.line()).unwrap_or_default();
            // 非 UTF-8 位元組以替代字元取代，繼續讀取後面的列
            let record = StringRecord::from_byte_record_lossy(record);
            if let Some(template) = parse_row(&record, line)? {
                templates.push(template);
            }
        }

        tracing::debug!("Loaded {} objective templates", templates.len());
        Ok(templates)
    }
}

/// `Ok(None)` for rows that carry no template (blank id or header).
fn parse_row(record: &StringRecord, line: u64) -> Result<Option<ObjectiveTemplate>> {
    let template_id = record.get(columns::TEMPLATE_ID).unwrap_or_default();
    if template_id.is_empty() || template_id == HEADER_SENTINEL {
        return Ok(None);
    }

    if record.len() < columns::REQUIRED {
        return Err(PlanCheckError::MalformedRow {
            line,
            found: record.len(),
            expected: columns::REQUIRED,
        });
    }

    let field = |index: usize| record.get(index).unwrap_or_default().to_string();
    let template_id = template_id.to_string();

    let codes: String = record[columns::CODES].split_whitespace().collect();
    let template_codes = split_alternatives(&codes, &template_id);
    let template_aliases = split_alternatives(&record[columns::ALIASES], &template_id);

    Ok(Some(ObjectiveTemplate {
        template_codes,
        template_aliases,
        dvh_objective: field(columns::DVH_OBJECTIVE),
        goal: field(columns::GOAL),
        variation: field(columns::VARIATION),
        priority: field(columns::PRIORITY),
        achieved: String::new(),
        met: String::new(),
        template_id,
    }))
}

fn split_alternatives(value: &str, template_id: &str) -> Vec<String> {
    if value.is_empty() {
        return vec![template_id.to_string()];
    }
    value.split(ALTERNATIVE_SEPARATOR).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify_blocking(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    fn parse(input: &str) -> Result<Vec<ObjectiveTemplate>> {
        let notifier = RecordingNotifier::default();
        TemplateLoader::new(&notifier).parse_reader(input.as_bytes())
    }

    #[test]
    fn test_skips_blank_and_header_rows() {
        let input = "\nStructure IDs,,,,,,,\nPTV,,,,D95%[%],>=95,>=93,1\nRectum,Rectum,Rectum_PRV|RECTUM,,V70Gy[%],<=20,<=25,2\n";
        let templates = parse(input).unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].template_id, "PTV");
        assert_eq!(templates[1].template_id, "Rectum");
    }

    #[test]
    fn test_blank_first_field_row_is_skipped() {
        let templates = parse(",a,b,c,d,e,f,g\nPTV,,,,D95,95,93,1\n").unwrap();
        assert_eq!(templates.len(), 1);
    }

    #[test]
    fn test_columns_map_to_fields() {
        let templates = parse("Rectum,SRT 1|SRT 2,Rectum_PRV|RECTUM,ignored,V70Gy[%],<=20,<=25,2\n").unwrap();
        let t = &templates[0];
        assert_eq!(t.template_codes, vec!["SRT1", "SRT2"]);
        assert_eq!(t.template_aliases, vec!["Rectum_PRV", "RECTUM"]);
        assert_eq!(t.dvh_objective, "V70Gy[%]");
        assert_eq!(t.goal, "<=20");
        assert_eq!(t.variation, "<=25");
        assert_eq!(t.priority, "2");
        assert!(t.achieved.is_empty());
        assert!(t.met.is_empty());
    }

    #[test]
    fn test_blank_codes_and_aliases_default_to_id() {
        let templates = parse("Bladder,   ,,,V65Gy[%],<=25,<=30,2\n").unwrap();
        assert_eq!(templates[0].template_codes, vec!["Bladder"]);
        assert_eq!(templates[0].template_aliases, vec!["Bladder"]);
    }

    #[test]
    fn test_aliases_keep_whitespace() {
        let templates = parse("Cord,,Spinal Cord| Cord,,Max[Gy],<=45,<=48,1\n").unwrap();
        assert_eq!(templates[0].template_aliases, vec!["Spinal Cord", " Cord"]);
    }

    #[test]
    fn test_quotes_are_not_special() {
        let templates = parse("\"PTV\",,,,D95,95,93,1\n").unwrap();
        assert_eq!(templates[0].template_id, "\"PTV\"");
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = parse("PTV,,,,D95,95,93,1\nRectum,,,V70\n").unwrap_err();
        match err {
            PlanCheckError::MalformedRow {
                line,
                found,
                expected,
            } => {
                assert_eq!(line, 2);
                assert_eq!(found, 4);
                assert_eq!(expected, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_replaced_and_reading_continues() {
        let notifier = RecordingNotifier::default();
        let input: &[u8] =
            b"PTV,,,,D95%[%],>=95,>=93,1\nRectum,,,,V70Gy\xB3,<=20,<=25,2\nBladder,,,,V65Gy[%],<=25,<=30,2\n";
        let templates = TemplateLoader::new(&notifier).parse_reader(input).unwrap();

        let ids: Vec<&str> = templates.iter().map(|t| t.template_id.as_str()).collect();
        assert_eq!(ids, vec!["PTV", "Rectum", "Bladder"]);
        assert_eq!(templates[1].dvh_objective, "V70Gy\u{FFFD}");
        assert_eq!(templates[1].goal, "<=20");
        assert!(notifier.messages.borrow().is_empty());
    }

    #[test]
    fn test_short_row_after_invalid_utf8_reports_its_line() {
        let input: &[u8] = b"Rectum\xB3,,,,V70,20,25,2\nBladder,,\n";
        let notifier = RecordingNotifier::default();
        let err = TemplateLoader::new(&notifier).parse_reader(input).unwrap_err();
        assert!(matches!(
            err,
            PlanCheckError::MalformedRow {
                line: 2,
                found: 3,
                expected: 8
            }
        ));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let templates = parse("PTV,,,,D95,95,93,1,extra,more\n").unwrap();
        assert_eq!(templates[0].priority, "1");
    }

    #[test]
    fn test_missing_file_notifies_and_returns_empty() {
        let notifier = RecordingNotifier::default();
        let templates = TemplateLoader::new(&notifier)
            .load("/definitely/not/here/template.csv")
            .unwrap();
        assert!(templates.is_empty());
        assert_eq!(notifier.messages.borrow().len(), 1);
    }

    #[test]
    fn test_read_fault_keeps_rows_parsed_so_far() {
        struct FailingReader {
            data: &'static [u8],
            served: bool,
        }

        impl Read for FailingReader {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.served {
                    return Err(std::io::Error::other("disk went away"));
                }
                self.served = true;
                buf[..self.data.len()].copy_from_slice(self.data);
                Ok(self.data.len())
            }
        }

        let notifier = RecordingNotifier::default();
        let reader = FailingReader {
            data: b"PTV,,,,D95,95,93,1\nRectum,,,,V70,20,25,2\n",
            served: false,
        };
        let templates = TemplateLoader::new(&notifier).parse_reader(reader).unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(notifier.messages.borrow().len(), 1);
        assert!(notifier.messages.borrow()[0].contains("disk went away"));
    }
}
