use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use rust_embed::Embed;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

/// Where raw catalog documents come from.
pub trait LessonSource: Send + Sync {
    /// The catalog document for `course`, or `NotFound` when this source
    /// does not know the course.
    fn read(&self, course: &str) -> Result<String>;
}

/// Catalogs stored as `<dir>/<course>.json`.
pub struct DirSource {
    base_dir: PathBuf,
}

impl DirSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn file_path(&self, course: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", Self::sanitize_key(course)))
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl LessonSource for DirSource {
    fn read(&self, course: &str) -> Result<String> {
        let path = self.file_path(course);
        if !path.is_file() {
            return Err(EngineError::NotFound(course.to_string()));
        }
        debug!(path = %path.display(), "reading lesson catalog");
        // A catalog that exists but cannot be read is reported, not skipped.
        fs::read_to_string(&path).map_err(|err| {
            warn!(path = %path.display(), %err, "failed to read lesson catalog");
            EngineError::malformed(course, format!("cannot read {}: {err}", path.display()))
        })
    }
}

/// Catalogs bundled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    pub fn courses() -> Vec<String> {
        LessonAssets::iter()
            .filter_map(|name| name.strip_suffix(".json").map(str::to_string))
            .collect()
    }
}

impl LessonSource for EmbeddedSource {
    fn read(&self, course: &str) -> Result<String> {
        let file = LessonAssets::get(&format!("{course}.json"))
            .ok_or_else(|| EngineError::NotFound(course.to_string()))?;
        std::str::from_utf8(file.data.as_ref())
            .map(str::to_string)
            .map_err(|e| EngineError::malformed(course, e.to_string()))
    }
}

/// Tries each source in order; the first one that knows the course wins.
#[derive(Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn LessonSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl LessonSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }
}

impl LessonSource for LayeredSource {
    fn read(&self, course: &str) -> Result<String> {
        for layer in &self.layers {
            match layer.read(course) {
                Err(EngineError::NotFound(_)) => continue,
                other => return other,
            }
        }
        Err(EngineError::NotFound(course.to_string()))
    }
}

/// In-memory catalogs keyed by course identity.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, course: &str, json: &str) {
        self.documents.insert(course.to_string(), json.to_string());
    }

    pub fn with(mut self, course: &str, json: &str) -> Self {
        self.insert(course, json);
        self
    }
}

impl LessonSource for MemorySource {
    fn read(&self, course: &str) -> Result<String> {
        self.documents
            .get(course)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(course.to_string()))
    }
}
