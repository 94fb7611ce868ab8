#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Readers and writers of `layered-anndata` transcriptions.
//!
//! Each file format is a [`FormatPlugin`]; a [`FormatRegistry`] picks the
//! plugin from the file extension, or asks every reader to recognise the
//! file, and records where the transcription came from in its metadata.
//!
//! Built-in plugins:
//!
//! - [`JsonFormat`] - everything the data model holds
//! - [`CsvFormat`] - one row per annotation
//!
//! ```no_run
//! use std::path::Path;
//! use layered_anndata::MetaObject;
//! use layered_anndata_formats::FormatRegistry;
//!
//! let registry = FormatRegistry::with_defaults();
//! let mut trs = registry.read(Path::new("sample.json")).unwrap();
//! assert_eq!(trs.get_meta("file_reader"), Some("json"));
//! registry.write(&mut trs, Path::new("sample.csv")).unwrap();
//! ```

mod delimited;
mod errors;
mod json;
mod plugin;
mod registry;

pub use delimited::CsvFormat;
pub use errors::{FormatError, FormatResult};
pub use json::JsonFormat;
pub use plugin::{Capabilities, FormatPlugin, TrsClass};
pub use registry::FormatRegistry;
