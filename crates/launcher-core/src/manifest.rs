use crate::error::Result;
use crate::io::atomic_write;
use crate::resolver::SkillMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Record of which skills a run embedded, read by the skill-activation hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub persona: String,
    pub skills: Vec<SkillMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Manifest {
    pub fn new(persona: impl Into<String>, skills: Vec<SkillMeta>) -> Self {
        Self {
            persona: persona.into(),
            skills,
            generated_at: Some(Utc::now()),
        }
    }

    /// Overwrite `path` with this manifest as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        atomic_write(path, data.as_bytes())
    }

    /// Missing or malformed manifests read as `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring malformed manifest");
                None
            }
        }
    }
}
