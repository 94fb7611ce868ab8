//! Explicit configuration records for tier exports and silence detection.

use serde::{Deserialize, Serialize};

/// Tags recognised as silences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilenceConfig {
    /// Tag contents marking a silence
    pub markers: Vec<String>,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            markers: vec!["#".to_string(), "sil".to_string()],
        }
    }
}

impl SilenceConfig {
    pub fn is_silence(&self, content: &str) -> bool {
        self.markers.iter().any(|m| m == content)
    }
}

/// Configuration for [`Tier::export_to_intervals`](crate::Tier::export_to_intervals).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Annotations whose best tag is one of these close the current run
    #[serde(default)]
    pub separators: Vec<String>,
}

impl ExportConfig {
    pub fn with_separators<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators.into_iter().map(Into::into).collect(),
        }
    }

    /// Use the silence markers as separators.
    pub fn with_silences(silences: &SilenceConfig) -> Self {
        Self::with_separators(silences.markers.iter().cloned())
    }

    pub fn is_separator(&self, content: &str) -> bool {
        self.separators.iter().any(|s| s == content)
    }
}
