use crate::error::Result;
use crate::paths;
use crate::selection::Defaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const MANIFEST_ENV: &str = "CLAUDE_SKILL_MANIFEST";

/// Where one run writes its manifest and debug artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub manifest: PathBuf,
    pub prompt: PathBuf,
    /// Written only when a team was composed.
    pub agents: PathBuf,
}

/// Optional `.claude/launcher.yaml`. Every field has a default, so a missing
/// file and an empty file behave the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default = "default_persona")]
    pub default_persona: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Model shortcut → model name passed to the host.
    #[serde(default = "default_models")]
    pub models: BTreeMap<String, String>,
    /// Searched after the local and global prompt directories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_prompt_dirs: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_prompt_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_agents_path: Option<PathBuf>,
}

fn default_persona() -> String {
    "gen".to_string()
}

fn default_model() -> String {
    "opus".to_string()
}

fn default_models() -> BTreeMap<String, String> {
    [("opus", "opus"), ("sonn", "sonnet"), ("haik", "haiku")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            default_persona: default_persona(),
            default_model: default_model(),
            models: default_models(),
            extra_prompt_dirs: Vec::new(),
            manifest_path: None,
            debug_prompt_path: None,
            debug_agents_path: None,
        }
    }
}

impl LauncherConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        let Some(data) = crate::io::read_optional(&path)? else {
            return Ok(Self::default());
        };
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: LauncherConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Prompt directories in precedence order: project, user, extras.
    /// Relative extras resolve against `root`; a leading `~` is expanded.
    pub fn search_dirs(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut dirs = vec![paths::local_prompts_dir(root), paths::global_prompts_dir()?];
        for extra in &self.extra_prompt_dirs {
            let dir = paths::expand_home(&extra.to_string_lossy())?;
            dirs.push(if dir.is_absolute() { dir } else { root.join(dir) });
        }
        Ok(dirs)
    }

    pub fn defaults(&self) -> Defaults<'_> {
        Defaults {
            persona: &self.default_persona,
            model: &self.default_model,
        }
    }

    /// Model name for a shortcut; unknown shortcuts pass through unchanged.
    pub fn model_name<'a>(&'a self, shortcut: &'a str) -> &'a str {
        self.models
            .get(shortcut)
            .map(String::as_str)
            .unwrap_or(shortcut)
    }

    /// `$CLAUDE_SKILL_MANIFEST`, else the configured path, else the default.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path_from(std::env::var_os(MANIFEST_ENV))
    }

    fn manifest_path_from(&self, env: Option<OsString>) -> PathBuf {
        env.filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.manifest_path.clone())
            .unwrap_or_else(paths::default_manifest_path)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            manifest: self.manifest_path(),
            prompt: self.debug_prompt_path(),
            agents: self.debug_agents_path(),
        }
    }

    pub fn debug_prompt_path(&self) -> PathBuf {
        self.debug_prompt_path
            .clone()
            .unwrap_or_else(paths::default_debug_prompt_path)
    }

    pub fn debug_agents_path(&self) -> PathBuf {
        self.debug_agents_path
            .clone()
            .unwrap_or_else(paths::default_debug_agents_path)
    }
}
