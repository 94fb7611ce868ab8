//! Dispatch of file operations to the format plugins.

use std::path::Path;

use layered_anndata::{MetaObject, Transcription};
use tracing::debug;

use crate::{CsvFormat, FormatError, FormatPlugin, FormatResult, JsonFormat};

/// The known format plugins.
pub struct FormatRegistry {
    plugins: Vec<Box<dyn FormatPlugin>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FormatRegistry {
    /// A registry without any plugin.
    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// A registry with the built-in plugins.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(JsonFormat));
        registry.register(Box::new(CsvFormat));
        registry
    }

    /// Add a plugin. Plugins registered first win on shared extensions.
    pub fn register(&mut self, plugin: Box<dyn FormatPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> impl Iterator<Item = &dyn FormatPlugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }

    /// Extensions the registry can read.
    pub fn read_extensions(&self) -> Vec<&'static str> {
        self.plugins()
            .filter(|p| p.capabilities().read)
            .map(|p| p.default_extension())
            .collect()
    }

    /// Extensions the registry can write.
    pub fn write_extensions(&self) -> Vec<&'static str> {
        self.plugins()
            .filter(|p| p.capabilities().write)
            .map(|p| p.default_extension())
            .collect()
    }

    fn by_extension(&self, path: &Path) -> Option<&dyn FormatPlugin> {
        let ext = extension(path)?;
        self.plugins().find(|p| p.default_extension() == ext)
    }

    /// Read a file with the plugin of its extension, or with the first
    /// plugin recognising its content.
    pub fn read(&self, path: &Path) -> FormatResult<Transcription> {
        let plugin = match self.by_extension(path) {
            Some(plugin) if plugin.capabilities().read => plugin,
            _ => self
                .plugins()
                .filter(|p| p.capabilities().read)
                .find(|p| p.detect(path))
                .ok_or_else(|| {
                    FormatError::Unsupported(format!("no reader for {}", path.display()))
                })?,
        };

        let mut trs = plugin.read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_path = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        trs.set_meta("file_reader", plugin.name())?;
        trs.set_meta("file_name", &file_name)?;
        trs.set_meta("file_path", &file_path)?;
        trs.set_meta("file_ext", &extension(path).unwrap_or_default())?;
        trs.set_meta("file_read_date", &chrono::Utc::now().to_rfc3339())?;
        debug!(path = %path.display(), reader = plugin.name(), tiers = trs.len(), "read transcription");
        Ok(trs)
    }

    /// Write `trs` with the plugin of the file's extension, then record the
    /// writer, the date and a new version number in its metadata.
    pub fn write(&self, trs: &mut Transcription, path: &Path) -> FormatResult<()> {
        let plugin = self
            .by_extension(path)
            .filter(|p| p.capabilities().write)
            .ok_or_else(|| FormatError::Unsupported(format!("no writer for {}", path.display())))?;

        plugin.write(trs, path)?;

        let version = trs
            .get_meta("file_version")
            .and_then(|v| v.parse::<u32>().ok())
            .map_or(1, |v| v + 1);
        trs.set_meta("file_writer", plugin.name())?;
        trs.set_meta("file_write_date", &chrono::Utc::now().to_rfc3339())?;
        trs.set_meta("file_version", &version.to_string())?;
        debug!(path = %path.display(), writer = plugin.name(), version, "wrote transcription");
        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}
