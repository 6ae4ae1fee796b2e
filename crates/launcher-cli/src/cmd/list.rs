use crate::output::{print_json, print_table};
use anyhow::{Context, Result};
use launcher_core::{
    catalog::{Catalog, CatalogEntry},
    config::LauncherConfig,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct PersonaRow {
    shortcut: String,
    kind: &'static str,
    name: String,
    path: PathBuf,
}

#[derive(Serialize)]
struct Listing<'a> {
    personas: Vec<PersonaRow>,
    models: &'a BTreeMap<String, String>,
    default_persona: &'a str,
    default_model: &'a str,
    search_dirs: &'a [PathBuf],
}

pub fn run(root: &Path, json: bool) -> Result<()> {
    let config = LauncherConfig::load(root).context("failed to load launcher config")?;
    let catalog = Catalog::build(config.search_dirs(root)?);

    let mut personas: Vec<PersonaRow> = catalog
        .entries()
        .map(|(shortcut, entry)| PersonaRow {
            shortcut: shortcut.to_string(),
            kind: kind(entry),
            name: entry.display_name(),
            path: entry.path().to_path_buf(),
        })
        .collect();
    personas.extend(catalog.unlisted().map(|(name, entry)| PersonaRow {
        shortcut: "-".to_string(),
        kind: kind(entry),
        name: name.to_string(),
        path: entry.path().to_path_buf(),
    }));

    if json {
        return print_json(&Listing {
            personas,
            models: &config.models,
            default_persona: &config.default_persona,
            default_model: &config.default_model,
            search_dirs: catalog.search_dirs(),
        });
    }

    if personas.is_empty() {
        println!("No system prompts found. Searched:");
        for dir in catalog.search_dirs() {
            println!("  {}", dir.display());
        }
    } else {
        let rows: Vec<Vec<String>> = personas
            .iter()
            .map(|p| {
                vec![
                    p.shortcut.clone(),
                    p.kind.to_string(),
                    p.name.clone(),
                    p.path.display().to_string(),
                ]
            })
            .collect();
        print_table(&["SHORTCUT", "KIND", "NAME", "PATH"], &rows);
    }

    println!();
    let rows: Vec<Vec<String>> = config
        .models
        .iter()
        .map(|(shortcut, model)| {
            let default = if *shortcut == config.default_model { "*" } else { "" };
            vec![shortcut.clone(), model.clone(), default.to_string()]
        })
        .collect();
    print_table(&["MODEL", "NAME", "DEFAULT"], &rows);
    Ok(())
}

fn kind(entry: &CatalogEntry) -> &'static str {
    match entry {
        CatalogEntry::Persona { .. } => "persona",
        CatalogEntry::Team(_) => "team",
    }
}
