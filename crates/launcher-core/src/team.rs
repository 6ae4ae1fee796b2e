//! Declarative teams: one lead persona plus agent personas.
//!
//! A team lives in its own directory as `team.yaml`:
//!
//! ```yaml
//! name: Review Squad
//! shortcut: rev
//! team:
//!   - name: architect
//!     model: opus
//!   - name: tester
//! ```
//!
//! The first member leads the session; every other member is compiled into an
//! agent definition handed to the host alongside the lead's prompt.

use crate::assembler::assemble;
use crate::error::{LauncherError, Result};
use crate::frontmatter::{parse_frontmatter, unquote};
use crate::paths;
use crate::resolver::resolve_references;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub name: String,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDefinition {
    /// Location of the `team.yaml` this was parsed from.
    pub path: PathBuf,
    pub name: Option<String>,
    pub shortcut: Option<String>,
    pub description: Option<String>,
    /// Never empty; the first entry is the lead.
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub description: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

/// Agent definitions keyed by member name.
pub type AgentMap = BTreeMap<String, AgentDefinition>;

#[derive(Debug, Clone)]
pub struct Decomposition {
    /// The lead's document, not yet expanded.
    pub lead: PathBuf,
    pub lead_model: Option<String>,
    pub agents: AgentMap,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl TeamDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Parse a definition. Strict YAML is tried first; anything YAML rejects
    /// (`description: reviews code: carefully`, values starting with `@`) is
    /// read with the line grammar instead.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        match serde_yaml::from_str::<Value>(content) {
            Ok(doc) => Self::from_yaml(path, doc),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "reading team definition line by line");
                Self::from_lines(path, content)
            }
        }
    }

    fn from_yaml(path: &Path, doc: Value) -> Result<Self> {
        let Value::Mapping(top) = doc else {
            return Err(invalid(path, "expected a mapping of team fields"));
        };

        let entries = match top.get("team") {
            Some(Value::Sequence(seq)) => seq.as_slice(),
            Some(Value::Null) | None => &[],
            Some(_) => return Err(invalid(path, "'team' must be a list of members")),
        };

        let mut members = Vec::with_capacity(entries.len());
        for entry in entries {
            let Value::Mapping(m) = entry else {
                return Err(invalid(path, "each team entry must be '- name: <member>'"));
            };
            let name = scalar(m, "name").ok_or_else(|| invalid(path, "team entry without a name"))?;
            members.push(TeamMember {
                name,
                model: scalar(m, "model"),
            });
        }

        Self::build(
            path,
            scalar(&top, "name"),
            scalar(&top, "shortcut"),
            scalar(&top, "description"),
            members,
        )
    }

    /// `key: value` lines split on the first `:` until `team:`, then
    /// `- name: <member>` entries each optionally followed by an indented
    /// `model: <value>`.
    fn from_lines(path: &Path, content: &str) -> Result<Self> {
        let mut fields: BTreeMap<&str, Option<String>> = BTreeMap::new();
        let mut members: Vec<TeamMember> = Vec::new();
        let mut in_team = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if !in_team {
                let Some((key, value)) = trimmed.split_once(':') else {
                    continue;
                };
                let key = key.trim();
                if key == "team" {
                    in_team = true;
                } else {
                    fields.entry(key).or_insert_with(|| line_value(value));
                }
                continue;
            }

            let (is_entry, item) = match trimmed.strip_prefix('-') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, trimmed),
            };
            let Some((key, value)) = item.split_once(':') else {
                continue;
            };
            match (is_entry, key.trim()) {
                (true, "name") => members.push(TeamMember {
                    name: line_value(value)
                        .ok_or_else(|| invalid(path, "team entry without a name"))?,
                    model: None,
                }),
                (true, _) => {
                    return Err(invalid(path, "each team entry must be '- name: <member>'"))
                }
                (false, "model") => {
                    if let Some(member) = members.last_mut() {
                        member.model = line_value(value);
                    }
                }
                _ => {}
            }
        }

        let mut field = |key: &str| fields.remove(key).flatten();
        let (name, shortcut, description) = (field("name"), field("shortcut"), field("description"));
        Self::build(path, name, shortcut, description, members)
    }

    fn build(
        path: &Path,
        name: Option<String>,
        shortcut: Option<String>,
        description: Option<String>,
        members: Vec<TeamMember>,
    ) -> Result<Self> {
        if members.is_empty() {
            return Err(invalid(path, "a team needs at least one member"));
        }
        Ok(Self {
            path: path.to_path_buf(),
            name,
            shortcut,
            description,
            members,
        })
    }

    /// Directory holding the definition; member documents may live beside it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Declared name, else the team directory's name.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.dir()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "team".to_string())
    }

    pub fn lead(&self) -> &TeamMember {
        &self.members[0]
    }
}

fn invalid(path: &Path, reason: &str) -> LauncherError {
    LauncherError::InvalidTeam {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Trimmed, unquoted value of a grammar line; blank reads as absent.
fn line_value(raw: &str) -> Option<String> {
    let v = unquote(raw);
    (!v.is_empty()).then(|| v.to_string())
}

/// Read a scalar field as a string. Numbers and booleans are accepted so
/// that `shortcut: 42` behaves like `shortcut: "42"`.
fn scalar(map: &Mapping, key: &str) -> Option<String> {
    let s = match map.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

// ---------------------------------------------------------------------------
// Decomposition
// ---------------------------------------------------------------------------

/// Locate `<member>.md`: beside the team definition first, then in each
/// search directory in order.
pub fn find_member(team: &TeamDefinition, member: &str, search_dirs: &[PathBuf]) -> Result<PathBuf> {
    let filename = format!("{member}.{}", paths::PROMPT_EXTENSION);
    let mut searched = Vec::with_capacity(search_dirs.len() + 1);
    for dir in std::iter::once(team.dir()).chain(search_dirs.iter().map(PathBuf::as_path)) {
        let candidate = dir.join(&filename);
        if candidate.is_file() {
            return Ok(candidate);
        }
        searched.push(dir.to_path_buf());
    }
    Err(LauncherError::UnresolvedTeamMember {
        member: member.to_string(),
        searched,
    })
}

/// Resolve every member. The lead is returned as a path for the caller to
/// compose like a solo persona; the others are fully expanded agents.
pub fn decompose(team: &TeamDefinition, search_dirs: &[PathBuf]) -> Result<Decomposition> {
    let lead = team.lead();
    let lead_path = find_member(team, &lead.name, search_dirs)?;

    let mut agents = AgentMap::new();
    for member in &team.members[1..] {
        let path = find_member(team, &member.name, search_dirs)?;
        let agent = build_agent(member, &path)?;
        tracing::debug!(member = %member.name, path = %path.display(), "built agent");
        agents.insert(member.name.clone(), agent);
    }

    Ok(Decomposition {
        lead: lead_path,
        lead_model: lead.model.clone(),
        agents,
    })
}

fn build_agent(member: &TeamMember, path: &Path) -> Result<AgentDefinition> {
    let meta = parse_frontmatter(path);
    let resolution = resolve_references(path)?;
    let prompt = assemble(&resolution.body, &resolution.loaded, &resolution.skills);

    let description = meta
        .description()
        .map(unquote)
        .or(meta.name())
        .unwrap_or(member.name.as_str())
        .to_string();
    let model = member
        .model
        .clone()
        .or_else(|| meta.model().map(str::to_string));

    Ok(AgentDefinition {
        description,
        prompt,
        model,
        tools: meta.tools().map(parse_tools),
    })
}

/// Parse `[Read, Grep, Bash]` (brackets optional) into tool names.
pub fn parse_tools(raw: &str) -> Vec<String> {
    let inner = raw.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    inner
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
