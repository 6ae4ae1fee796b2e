use crate::error::{LauncherError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const SYSTEM_PROMPTS_DIR: &str = ".claude/system-prompts";
pub const CONFIG_FILE: &str = ".claude/launcher.yaml";
pub const LOCAL_BINARY: &str = ".claude/local/claude";

/// Team directories hold exactly one of these.
pub const TEAM_FILE: &str = "team.yaml";
/// A reference to this filename takes its skill name from the parent directory.
pub const SKILL_ENTRY_FILE: &str = "SKILL.md";
pub const PROMPT_EXTENSION: &str = "md";

pub const ARTIFACT_DIR: &str = "/tmp";
pub const MANIFEST_FILE: &str = "claude-skill-manifest.json";
pub const DEBUG_PROMPT_FILE: &str = "claude-launcher-debug.md";
pub const DEBUG_AGENTS_FILE: &str = "claude-launcher-agents.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or(LauncherError::HomeNotFound)
}

pub fn local_prompts_dir(root: &Path) -> PathBuf {
    root.join(SYSTEM_PROMPTS_DIR)
}

pub fn global_prompts_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(SYSTEM_PROMPTS_DIR))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn local_binary_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(LOCAL_BINARY))
}

pub fn default_manifest_path() -> PathBuf {
    Path::new(ARTIFACT_DIR).join(MANIFEST_FILE)
}

pub fn default_debug_prompt_path() -> PathBuf {
    Path::new(ARTIFACT_DIR).join(DEBUG_PROMPT_FILE)
}

pub fn default_debug_agents_path() -> PathBuf {
    Path::new(ARTIFACT_DIR).join(DEBUG_AGENTS_FILE)
}

/// Replace a leading `~` with the user's home directory.
///
/// Only `~` on its own or followed by `/` is expanded; `~user` forms are left
/// untouched.
pub fn expand_home(raw: &str) -> Result<PathBuf> {
    expand_home_with(raw, home::home_dir().as_deref())
}

/// [`expand_home`] against an explicit home directory. `None` fails only when
/// `raw` actually needs expanding.
pub fn expand_home_with(raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let rest = match raw.strip_prefix('~') {
        Some("") => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => rest,
            None => return Ok(PathBuf::from(raw)),
        },
        None => return Ok(PathBuf::from(raw)),
    };
    let home = home.ok_or(LauncherError::HomeNotFound)?;
    Ok(if rest.is_empty() {
        home.to_path_buf()
    } else {
        home.join(rest)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
