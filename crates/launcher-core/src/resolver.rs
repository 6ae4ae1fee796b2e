//! `@path` reference expansion.
//!
//! A reference is a body line holding nothing but an `@`-prefixed path,
//! optionally written as a list item (`- @skills/tdd/SKILL.md`). Each one is
//! replaced by the raw content of its target. Expansion is one level deep:
//! references inside inlined content are emitted literally.

use crate::error::{LauncherError, Result};
use crate::frontmatter::{split_document, unquote};
use crate::paths;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Namespace prefix of every skill identifier.
pub const SKILL_NAMESPACE: &str = "development-skills";

const SEPARATOR: &str = "\n\n";

/// A reference that resolved; listed in the prompt header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSkill {
    pub id: String,
    pub display_name: String,
}

/// A loaded skill whose target declares a description. Published in the
/// manifest, so the identifier serializes as `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMeta {
    #[serde(rename = "name")]
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub body: String,
    pub loaded: Vec<LoadedSkill>,
    pub skills: Vec<SkillMeta>,
}

static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();

fn reference_re() -> &'static Regex {
    REFERENCE_RE.get_or_init(|| Regex::new(r"^\s*-?\s*@(\S+)\s*$").unwrap())
}

/// Return the raw path of a reference line, or `None` for ordinary text.
pub fn match_reference(line: &str) -> Option<&str> {
    reference_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `SKILL.md` entries are named after their directory, anything else after
/// its file stem.
pub fn skill_name(target: &Path) -> String {
    let is_entry = target
        .file_name()
        .is_some_and(|n| n == paths::SKILL_ENTRY_FILE);
    let name = if is_entry {
        target.parent().and_then(|p| p.file_name())
    } else {
        target.file_stem()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn skill_id(skill_name: &str) -> String {
    format!("{SKILL_NAMESPACE}:{skill_name}")
}

/// Expand every reference in the document at `path`.
pub fn resolve_references(path: &Path) -> Result<Resolution> {
    let content = std::fs::read_to_string(path)?;
    expand_content(path, &content)
}

/// Expand references in `content`, resolving relative paths against the
/// directory of `document`.
///
/// Every bad target is collected before failing, so one error reports all
/// of them.
pub fn expand_content(document: &Path, content: &str) -> Result<Resolution> {
    expand_with_home(document, content, home::home_dir().as_deref())
}

/// [`expand_content`] with `~` resolved against `home`.
pub fn expand_with_home(document: &Path, content: &str, home: Option<&Path>) -> Result<Resolution> {
    let (_, body) = split_document(content);
    let base = document.parent().unwrap_or(Path::new("."));

    let mut resolution = Resolution::default();
    let mut missing = Vec::new();

    for line in body.split_inclusive('\n') {
        let Some(raw) = match_reference(line) else {
            resolution.body.push_str(line);
            continue;
        };

        let target = match resolve_target(base, raw, home) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(reference = raw, error = %e, "cannot resolve import path");
                missing.push(format!("{raw} ({e})"));
                continue;
            }
        };
        let text = match read_target(&target) {
            Ok(text) => text,
            Err(reason) => {
                tracing::warn!(path = %target.display(), error = %reason, "failed to load import");
                missing.push(reason.describe(&target));
                continue;
            }
        };

        let name = skill_name(&target);
        tracing::debug!(skill = %name, path = %target.display(), "resolved reference");

        let (meta, _) = split_document(&text);
        let id = skill_id(&name);
        resolution.loaded.push(LoadedSkill {
            id: id.clone(),
            display_name: meta.name().unwrap_or(&name).to_string(),
        });
        if let Some(description) = meta.description() {
            resolution.skills.push(SkillMeta {
                id,
                description: unquote(description).to_string(),
            });
        }

        resolution.body.push_str(&text);
        resolution.body.push_str(SEPARATOR);
    }

    if !missing.is_empty() {
        return Err(LauncherError::UnresolvedReferences {
            document: document.to_path_buf(),
            missing,
        });
    }
    Ok(resolution)
}

fn resolve_target(base: &Path, raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let expanded = paths::expand_home_with(raw, home)?;
    Ok(if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    })
}

/// Why a reference target could not be inlined.
#[derive(Debug)]
enum LoadFailure {
    NotFound,
    Unreadable(std::io::Error),
}

impl LoadFailure {
    /// Entry for the missing-imports list. Targets that exist but could not be
    /// read keep the underlying error.
    fn describe(&self, target: &Path) -> String {
        match self {
            LoadFailure::NotFound => target.display().to_string(),
            LoadFailure::Unreadable(e) => format!("{} ({e})", target.display()),
        }
    }
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadFailure::NotFound => write!(f, "not found"),
            LoadFailure::Unreadable(e) => write!(f, "{e}"),
        }
    }
}

fn read_target(target: &Path) -> std::result::Result<String, LoadFailure> {
    if !target.is_file() {
        return Err(LoadFailure::NotFound);
    }
    std::fs::read_to_string(target).map_err(LoadFailure::Unreadable)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
