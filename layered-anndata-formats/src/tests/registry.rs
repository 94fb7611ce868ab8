use std::fs;
use std::path::Path;

use layered_anndata::{Annotation, Interval, Label, MetaObject, Tier, Transcription};

use crate::{
    Capabilities, FormatError, FormatPlugin, FormatRegistry, FormatResult, TrsClass,
};

fn sample() -> Transcription {
    let mut tier = Tier::new("words");
    tier.append(Annotation::with_labels(
        Interval::from_secs(0., 1.).unwrap(),
        vec![Label::from("hello")],
    ))
    .unwrap();
    let mut trs = Transcription::new("sample");
    trs.append_tier(tier).unwrap();
    trs
}

/// One tier per line, read only.
struct ListFormat;

impl FormatPlugin for ListFormat {
    fn name(&self) -> &'static str {
        "list"
    }

    fn default_extension(&self) -> &'static str {
        "lst"
    }

    fn trs_class(&self) -> TrsClass {
        TrsClass::Table
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            read: true,
            ..Default::default()
        }
    }

    fn detect(&self, _path: &Path) -> bool {
        false
    }

    fn read(&self, path: &Path) -> FormatResult<Transcription> {
        let mut trs = Transcription::new("list");
        for line in fs::read_to_string(path)?.lines() {
            trs.append_tier(Tier::new(line))?;
        }
        Ok(trs)
    }

    fn write(&self, _trs: &Transcription, _path: &Path) -> FormatResult<()> {
        Err(FormatError::Unsupported("list files are read only".to_string()))
    }
}

#[test]
fn defaults() {
    let registry = FormatRegistry::with_defaults();
    assert_eq!(registry.read_extensions(), vec!["json", "csv"]);
    assert_eq!(registry.write_extensions(), vec!["json", "csv"]);
    let classes: Vec<TrsClass> = registry.plugins().map(|p| p.trs_class()).collect();
    assert_eq!(classes, vec![TrsClass::Annot, TrsClass::Table]);
}

#[test]
fn write_and_read_record_file_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Sample.JSON");
    let registry = FormatRegistry::with_defaults();

    let mut trs = sample();
    registry.write(&mut trs, &path).unwrap();
    assert_eq!(trs.get_meta("file_writer"), Some("json"));
    assert_eq!(trs.get_meta("file_version"), Some("1"));
    let date = trs.get_meta("file_write_date").unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok());

    registry.write(&mut trs, &path).unwrap();
    assert_eq!(trs.get_meta("file_version"), Some("2"));

    let back = registry.read(&path).unwrap();
    assert_eq!(back.get_meta("file_reader"), Some("json"));
    assert_eq!(back.get_meta("file_name"), Some("Sample.JSON"));
    assert_eq!(back.get_meta("file_ext"), Some("json"));
    assert_eq!(
        back.get_meta("file_path"),
        Some(dir.path().display().to_string().as_str())
    );
    assert!(chrono::DateTime::parse_from_rfc3339(back.get_meta("file_read_date").unwrap()).is_ok());
    // written before the second version was recorded
    assert_eq!(back.get_meta("file_version"), Some("1"));
    assert_eq!(back[0].to_string(), trs[0].to_string());
}

#[test]
fn unknown_extensions_are_sniffed() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FormatRegistry::with_defaults();
    let mut trs = sample();

    let json = dir.path().join("sample.json");
    registry.write(&mut trs, &json).unwrap();
    let renamed = dir.path().join("sample.annot");
    fs::rename(&json, &renamed).unwrap();
    let back = registry.read(&renamed).unwrap();
    assert_eq!(back.get_meta("file_reader"), Some("json"));
    assert_eq!(back.get_meta("file_ext"), Some("annot"));

    let csv = dir.path().join("sample.csv");
    registry.write(&mut trs, &csv).unwrap();
    let renamed = dir.path().join("sample.txt");
    fs::rename(&csv, &renamed).unwrap();
    assert_eq!(registry.read(&renamed).unwrap().get_meta("file_reader"), Some("csv"));

    let other = dir.path().join("notes.txt");
    fs::write(&other, "nothing to see").unwrap();
    assert!(matches!(registry.read(&other), Err(FormatError::Unsupported(_))));
}

#[test]
fn custom_plugins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiers.lst");
    fs::write(&path, "words\nphones\n").unwrap();

    let mut registry = FormatRegistry::with_defaults();
    assert!(registry.read(&path).is_err());

    registry.register(Box::new(ListFormat));
    let trs = registry.read(&path).unwrap();
    assert_eq!(trs.len(), 2);
    assert_eq!(trs.get_meta("file_reader"), Some("list"));

    let mut trs = trs;
    let err = registry.write(&mut trs, &path).unwrap_err();
    assert!(matches!(err, FormatError::Unsupported(_)));
    assert_eq!(trs.get_meta("file_writer"), None);
}
