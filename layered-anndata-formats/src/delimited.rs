//! Annotations as rows of a CSV table.
//!
//! One row per annotation: `tier,begin,end,label`. Point annotations have
//! an empty `end`; several labels are joined with `;`. Only the best
//! alternatives are kept, tags are read back as strings, empty tiers are
//! lost and disjoint tiers can't be written.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use layered_anndata::{Annotation, Interval, Label, Localization, Point, Tier, Transcription};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Capabilities, FormatError, FormatPlugin, FormatResult, TrsClass};

const HEADER: &str = "tier,begin,end,label";
const LABEL_SEPARATOR: char = ';';

/// Reader and writer of `.csv` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    tier: String,
    begin: f64,
    end: Option<f64>,
    #[serde(default)]
    label: String,
}

impl Row {
    fn new(tier: &Tier, annotation: &Annotation) -> FormatResult<Self> {
        let (begin, end) = match annotation.location().best() {
            Localization::Point(p) => (p.midpoint(), None),
            Localization::Interval(i) => (i.begin().midpoint(), Some(i.end().midpoint())),
            Localization::Disjoint(_) => {
                return Err(FormatError::Unsupported(format!(
                    "disjoint annotations of tier {:?} can't be written as csv",
                    tier.name()
                )))
            }
        };
        let label = annotation
            .labels()
            .iter()
            .map(|l| l.serialize("", false))
            .collect::<Vec<_>>()
            .join(&LABEL_SEPARATOR.to_string());
        Ok(Row {
            tier: tier.name().to_string(),
            begin,
            end,
            label,
        })
    }

    fn into_annotation(self) -> FormatResult<Annotation> {
        let labels: Vec<Label> = self
            .label
            .split(LABEL_SEPARATOR)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(Label::from)
            .collect();
        Ok(match self.end {
            None => Annotation::with_labels(Point::new(self.begin), labels),
            Some(end) => Annotation::with_labels(Interval::from_secs(self.begin, end)?, labels),
        })
    }
}

impl FormatPlugin for CsvFormat {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn default_extension(&self) -> &'static str {
        "csv"
    }

    fn trs_class(&self) -> TrsClass {
        TrsClass::Table
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            read: true,
            write: true,
            media: false,
            ctrl_vocab: false,
        }
    }

    fn detect(&self, path: &Path) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        let mut first = String::new();
        match BufReader::new(file).read_line(&mut first) {
            Ok(_) => first.trim_end() == HEADER,
            Err(_) => false,
        }
    }

    fn read(&self, path: &Path) -> FormatResult<Transcription> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| FormatError::parse(path, e))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut tiers: Vec<Tier> = Vec::new();
        for row in reader.deserialize() {
            let row: Row = row.map_err(|e| FormatError::parse(path, e))?;
            let index = match tiers.iter().position(|t| t.name() == row.tier) {
                Some(index) => index,
                None => {
                    tiers.push(Tier::new(row.tier.as_str()));
                    tiers.len() - 1
                }
            };
            tiers[index].add(row.into_annotation()?)?;
        }

        let mut trs = Transcription::new(name);
        for tier in tiers {
            trs.append_tier(tier)?;
        }
        debug!(path = %path.display(), tiers = trs.len(), "parsed csv");
        Ok(trs)
    }

    fn write(&self, trs: &Transcription, path: &Path) -> FormatResult<()> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| FormatError::parse(path, e))?;
        let mut rows = 0;
        for tier in trs {
            for annotation in tier {
                writer
                    .serialize(Row::new(tier, annotation)?)
                    .map_err(|e| FormatError::parse(path, e))?;
                rows += 1;
            }
        }
        if rows == 0 {
            writer
                .write_record(HEADER.split(','))
                .map_err(|e| FormatError::parse(path, e))?;
        }
        writer.flush()?;
        Ok(())
    }
}
