//! Persona and team lookup tables.
//!
//! Search directories are given local first, global last. They are scanned
//! in reverse so that on a shortcut or name collision the last write, which
//! is the most local directory, wins.

use crate::frontmatter::{parse_frontmatter, Metadata};
use crate::paths;
use crate::team::TeamDefinition;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Persona { path: PathBuf, meta: Metadata },
    Team(TeamDefinition),
}

impl CatalogEntry {
    /// `name` metadata, falling back to the file stem (or team directory).
    pub fn display_name(&self) -> String {
        match self {
            CatalogEntry::Persona { path, meta } => meta
                .name()
                .map(str::to_string)
                .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .unwrap_or_default(),
            CatalogEntry::Team(team) => team.display_name(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            CatalogEntry::Persona { path, .. } => path,
            CatalogEntry::Team(team) => &team.path,
        }
    }

    pub fn is_team(&self) -> bool {
        matches!(self, CatalogEntry::Team(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    shortcuts: BTreeMap<String, CatalogEntry>,
    names: BTreeMap<String, CatalogEntry>,
    search_dirs: Vec<PathBuf>,
}

impl Catalog {
    pub fn build(search_dirs: Vec<PathBuf>) -> Self {
        let mut catalog = Catalog {
            search_dirs,
            ..Default::default()
        };
        let dirs = catalog.search_dirs.clone();
        for dir in dirs.iter().rev() {
            catalog.scan_dir(dir);
        }
        tracing::debug!(
            shortcuts = catalog.shortcuts.len(),
            names = catalog.names.len(),
            "catalog built"
        );
        catalog
    }

    fn scan_dir(&mut self, dir: &Path) {
        if !dir.is_dir() {
            return;
        }
        let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot scan prompt directory");
                return;
            }
        };
        entries.sort();

        for path in entries.iter().filter(|p| is_prompt_file(p)) {
            let meta = parse_frontmatter(path);
            let entry = CatalogEntry::Persona {
                path: path.clone(),
                meta: meta.clone(),
            };
            if let Some(name) = meta.name() {
                self.names.insert(name.to_string(), entry.clone());
            }
            if let Some(shortcut) = meta.shortcut() {
                self.shortcuts.insert(shortcut.to_string(), entry);
            }
        }

        for team_file in entries
            .iter()
            .filter(|p| p.is_dir())
            .map(|d| d.join(paths::TEAM_FILE))
            .filter(|f| f.is_file())
        {
            let team = match TeamDefinition::load(&team_file) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(path = %team_file.display(), error = %e, "skipping team definition");
                    continue;
                }
            };
            if let Some(name) = &team.name {
                self.names
                    .insert(name.clone(), CatalogEntry::Team(team.clone()));
            }
            if let Some(shortcut) = &team.shortcut {
                self.shortcuts
                    .insert(shortcut.clone(), CatalogEntry::Team(team.clone()));
            }
        }
    }

    pub fn get(&self, shortcut: &str) -> Option<&CatalogEntry> {
        self.shortcuts.get(shortcut)
    }

    pub fn by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.names.get(name)
    }

    pub fn contains(&self, shortcut: &str) -> bool {
        self.shortcuts.contains_key(shortcut)
    }

    /// Shortcuts in sorted order.
    pub fn shortcuts(&self) -> impl Iterator<Item = &str> {
        self.shortcuts.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.shortcuts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Named entries that no shortcut points at, sorted by name. These cannot
    /// be selected from the command line.
    pub fn unlisted(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.names
            .iter()
            .filter(|(_, e)| !self.shortcuts.values().any(|s| s.path() == e.path()))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Directories in precedence order, local first.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }
}

fn is_prompt_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|e| e == paths::PROMPT_EXTENSION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
