use std::fmt;
use std::path::Path;

use layered_anndata::Transcription;

use crate::FormatResult;

/// Kind of content a file format holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrsClass {
    /// Time-aligned annotations.
    Annot,
    /// Measures sampled in time (pitch, intensity...).
    Measure,
    /// Rows of values.
    Table,
}

impl TrsClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrsClass::Annot => "ANNOT",
            TrsClass::Measure => "MEASURE",
            TrsClass::Table => "TABLE",
        }
    }
}

impl fmt::Display for TrsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a plugin can do and which parts of a transcription it keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub read: bool,
    pub write: bool,
    pub media: bool,
    pub ctrl_vocab: bool,
}

/// A reader and/or writer of one file format.
pub trait FormatPlugin: Send + Sync {
    /// Name recorded in the `file_reader`/`file_writer` metadata.
    fn name(&self) -> &'static str;

    /// Lowercase extension, without the dot.
    fn default_extension(&self) -> &'static str;

    fn trs_class(&self) -> TrsClass;

    fn capabilities(&self) -> Capabilities;

    /// Whether the file looks like one of this format, whatever its
    /// extension.
    fn detect(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> FormatResult<Transcription>;

    fn write(&self, trs: &Transcription, path: &Path) -> FormatResult<()>;
}
