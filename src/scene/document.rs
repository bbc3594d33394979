use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::scene::model::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` selects YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// On-disk project document: `{ "video": { ...project... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub video: Project,
}

impl Document {
    pub fn new(video: Project) -> Self {
        Self { video }
    }

    pub fn from_reader<R: Read>(r: R, format: DocumentFormat) -> TimelineResult<Self> {
        let parsed: Result<Self, String> = match format {
            DocumentFormat::Json => serde_json::from_reader(r).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::from_reader(r).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| TimelineError::serde(format!("parse {} document: {e}", format.label())))
    }

    pub fn parse_str(s: &str, format: DocumentFormat) -> TimelineResult<Self> {
        Self::from_reader(s.as_bytes(), format)
    }

    /// Load a document from disk, picking the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> TimelineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TimelineError::validation(format!("open project document '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f), DocumentFormat::from_path(path))
    }

    pub fn to_json_string(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TimelineError::serde(format!("serialize project document: {e}")))
    }

    pub fn write_json(&self, w: impl Write) -> TimelineResult<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| TimelineError::serde(format!("serialize project document: {e}")))
    }

    pub fn write_json_path(&self, path: impl AsRef<Path>) -> TimelineResult<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| {
            TimelineError::validation(format!("create output '{}': {e}", path.display()))
        })?;
        let mut w = BufWriter::new(f);
        self.write_json(&mut w)?;
        w.write_all(b"\n")
            .and_then(|()| w.flush())
            .map_err(|e| TimelineError::validation(format!("write output '{}': {e}", path.display())))
    }

    pub fn into_project(self) -> Project {
        self.video
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
