use crate::output::{conflict_banner, print_json};
use anyhow::{Context, Result};
use launcher_core::{
    catalog::Catalog,
    compose::{compose_entry, Artifacts, Composition},
    config::LauncherConfig,
    launch::{build_command, find_claude_binary, LaunchPlan},
    resolver::SkillMeta,
    selection::{resolve_selection, Selection, SelectionConflict},
    LauncherError,
};
use serde::Serialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, Copy)]
pub struct Mode {
    pub dry_run: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    persona: &'a str,
    shortcut: &'a str,
    model: &'a str,
    team: bool,
    skills: &'a [SkillMeta],
    agents: Vec<&'a str>,
    conflicts: &'a [SelectionConflict],
    artifacts: &'a Artifacts,
    lines: usize,
    bytes: usize,
}

pub fn run(root: &Path, tokens: &[String], mode: Mode) -> Result<()> {
    let config = LauncherConfig::load(root).context("failed to load launcher config")?;
    let catalog = Catalog::build(config.search_dirs(root)?);
    if catalog.is_empty() {
        return Err(LauncherError::NoPrompts(catalog.search_dirs().to_vec()).into());
    }

    let shortcuts: Vec<String> = catalog.shortcuts().map(str::to_string).collect();
    let selection = resolve_selection(
        tokens,
        |t| catalog.contains(t),
        &shortcuts,
        &config.models,
        &config.defaults(),
    )?;
    for c in &selection.conflicts {
        let banner = conflict_banner(&c.kind.to_string(), &c.kept, &c.ignored);
        if mode.json {
            eprintln!("{banner}");
        } else {
            println!("{banner}");
        }
    }

    let entry = catalog
        .get(&selection.persona)
        .with_context(|| format!("persona '{}' vanished from catalog", selection.persona))?;
    tracing::info!(shortcut = %selection.persona, path = %entry.path().display(), "processing system prompt");
    let composition = compose_entry(entry, catalog.search_dirs())
        .with_context(|| format!("failed to compose '{}'", selection.persona))?;
    let model = composition.model_name(&selection, &config);

    let artifacts = composition
        .write_artifacts(&config.artifact_paths())
        .context("failed to write launch artifacts")?;

    if mode.json {
        print_summary(&selection, &composition, &model, &artifacts)?;
    } else {
        println!("\nSelected: {}", composition.persona_name);
        println!("Model: {model}");
        if let Some(agents) = &composition.agents {
            let names: Vec<&str> = agents.keys().map(String::as_str).collect();
            println!("Agents: {}", names.join(", "));
        }
        if !composition.loaded.is_empty() {
            eprintln!("Loaded {} skill(s) successfully", composition.loaded.len());
        }
        eprintln!(
            "Processed system prompt saved to {} ({} lines, {} bytes)",
            artifacts.prompt.display(),
            composition.system_prompt.matches('\n').count(),
            composition.system_prompt.len()
        );
    }

    if mode.dry_run {
        if !mode.json {
            println!("Dry run: not launching Claude Code");
        }
        return Ok(());
    }

    let plan = LaunchPlan {
        binary: find_claude_binary()?,
        system_prompt: composition.system_prompt.clone(),
        model,
        persona_name: composition.persona_name.clone(),
        agents_json: composition.agents_json()?,
    };
    println!("Persona: {}\n", plan.persona_name);
    println!("Launching Claude Code...\n");
    exec(build_command(&plan))
}

fn print_summary(
    selection: &Selection,
    composition: &Composition,
    model: &str,
    artifacts: &Artifacts,
) -> Result<()> {
    let agents = composition
        .agents
        .as_ref()
        .map(|a| a.keys().map(String::as_str).collect())
        .unwrap_or_default();
    print_json(&Summary {
        persona: &composition.persona_name,
        shortcut: &selection.persona,
        model,
        team: composition.agents.is_some(),
        skills: &composition.skills,
        agents,
        conflicts: &selection.conflicts,
        artifacts,
        lines: composition.system_prompt.matches('\n').count(),
        bytes: composition.system_prompt.len(),
    })
}

#[cfg(unix)]
fn exec(mut cmd: Command) -> Result<()> {
    use std::os::unix::process::CommandExt;
    // Only returns on failure.
    let err = cmd.exec();
    Err(err).context("failed to launch Claude Code")
}

#[cfg(not(unix))]
fn exec(mut cmd: Command) -> Result<()> {
    let status = cmd.status().context("failed to launch Claude Code")?;
    if !status.success() {
        anyhow::bail!("Claude Code exited with {status}");
    }
    Ok(())
}
