//! End-to-end composition of a catalog entry into a launchable prompt.

use crate::assembler::assemble;
use crate::catalog::CatalogEntry;
use crate::config::{ArtifactPaths, LauncherConfig};
use crate::error::Result;
use crate::frontmatter::parse_frontmatter;
use crate::io::atomic_write;
use crate::manifest::Manifest;
use crate::resolver::{resolve_references, LoadedSkill, SkillMeta};
use crate::selection::Selection;
use crate::team::{decompose, AgentMap};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Composition {
    pub persona_name: String,
    pub system_prompt: String,
    pub loaded: Vec<LoadedSkill>,
    /// Skills of the lead prompt only; agent skills stay in their prompts.
    pub skills: Vec<SkillMeta>,
    /// Present when a team was composed.
    pub agents: Option<AgentMap>,
    /// The team lead's model override.
    pub lead_model: Option<String>,
}

/// Where the run's artifacts were written.
#[derive(Debug, Clone, Serialize)]
pub struct Artifacts {
    pub manifest: PathBuf,
    pub prompt: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<PathBuf>,
}

/// Compose a solo persona document.
pub fn compose_persona(path: &Path) -> Result<Composition> {
    let meta = parse_frontmatter(path);
    let persona_name = meta
        .name()
        .map(str::to_string)
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let resolution = resolve_references(path)?;
    let system_prompt = assemble(&resolution.body, &resolution.loaded, &resolution.skills);

    Ok(Composition {
        persona_name,
        system_prompt,
        loaded: resolution.loaded,
        skills: resolution.skills,
        agents: None,
        lead_model: None,
    })
}

/// Compose a persona or a team. Teams are named after the team, not the lead.
pub fn compose_entry(entry: &CatalogEntry, search_dirs: &[PathBuf]) -> Result<Composition> {
    match entry {
        CatalogEntry::Persona { path, .. } => compose_persona(path),
        CatalogEntry::Team(team) => {
            let decomposition = decompose(team, search_dirs)?;
            let mut composition = compose_persona(&decomposition.lead)?;
            composition.persona_name = team.display_name();
            composition.agents = Some(decomposition.agents);
            composition.lead_model = decomposition.lead_model;
            Ok(composition)
        }
    }
}

impl Composition {
    pub fn manifest(&self) -> Manifest {
        Manifest::new(&self.persona_name, self.skills.clone())
    }

    /// Agents record as passed to the host, if this is a team.
    pub fn agents_json(&self) -> Result<Option<String>> {
        self.agents
            .as_ref()
            .map(|a| serde_json::to_string(a).map_err(Into::into))
            .transpose()
    }

    /// Model name to launch with. An explicit model token beats the team
    /// lead's override, which beats the default.
    pub fn model_name(&self, selection: &Selection, config: &LauncherConfig) -> String {
        let shortcut = match (&self.lead_model, selection.model_explicit) {
            (Some(lead), false) => lead.as_str(),
            _ => selection.model.as_str(),
        };
        config.model_name(shortcut).to_string()
    }

    /// Write the manifest, the assembled prompt and, for teams, the agents
    /// record. Each file is fully overwritten.
    pub fn write_artifacts(&self, targets: &ArtifactPaths) -> Result<Artifacts> {
        let manifest = targets.manifest.clone();
        self.manifest().save(&manifest)?;
        tracing::info!(path = %manifest.display(), "skill manifest written");

        let prompt = targets.prompt.clone();
        atomic_write(&prompt, self.system_prompt.as_bytes())?;
        tracing::info!(path = %prompt.display(), "processed system prompt saved");

        let agents = match &self.agents {
            Some(agents) => {
                let path = targets.agents.clone();
                atomic_write(&path, serde_json::to_string_pretty(agents)?.as_bytes())?;
                tracing::info!(path = %path.display(), count = agents.len(), "agents record saved");
                Some(path)
            }
            None => None,
        };

        Ok(Artifacts {
            manifest,
            prompt,
            agents,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
