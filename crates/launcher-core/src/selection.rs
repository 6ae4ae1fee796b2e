use crate::error::{LauncherError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    Persona,
    Model,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Persona => write!(f, "personas"),
            ConflictKind::Model => write!(f, "models"),
        }
    }
}

/// A second token of a category that already has a value. The first one is
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionConflict {
    pub kind: ConflictKind,
    pub kept: String,
    pub ignored: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Persona or team shortcut.
    pub persona: String,
    /// Model shortcut (a key of the model table).
    pub model: String,
    /// False when `model` is the default rather than a token.
    pub model_explicit: bool,
    pub conflicts: Vec<SelectionConflict>,
}

pub struct Defaults<'a> {
    pub persona: &'a str,
    pub model: &'a str,
}

/// Classify order-independent CLI tokens into a persona and a model.
///
/// `is_persona` answers whether a token is a known persona or team shortcut.
pub fn resolve_selection<F>(
    tokens: &[String],
    is_persona: F,
    persona_shortcuts: &[String],
    models: &BTreeMap<String, String>,
    defaults: &Defaults<'_>,
) -> Result<Selection>
where
    F: Fn(&str) -> bool,
{
    let mut persona: Option<&str> = None;
    let mut model: Option<&str> = None;
    let mut conflicts = Vec::new();

    for token in tokens {
        let (slot, kind) = if is_persona(token.as_str()) {
            (&mut persona, ConflictKind::Persona)
        } else if models.contains_key(token.as_str()) {
            (&mut model, ConflictKind::Model)
        } else {
            let mut personas = persona_shortcuts.to_vec();
            personas.sort();
            return Err(LauncherError::UnknownToken {
                token: token.clone(),
                personas,
                models: models.keys().cloned().collect(),
            });
        };

        if let Some(kept) = *slot {
            tracing::debug!(%kind, kept = %kept, ignored = %token, "shortcut conflict");
            conflicts.push(SelectionConflict {
                kind,
                kept: kept.to_string(),
                ignored: token.clone(),
            });
        } else {
            *slot = Some(token.as_str());
        }
    }

    let persona = match (persona, model) {
        (Some(p), _) => p.to_string(),
        (None, Some(_)) => {
            if !is_persona(defaults.persona) {
                return Err(LauncherError::DefaultPersonaMissing(
                    defaults.persona.to_string(),
                ));
            }
            defaults.persona.to_string()
        }
        (None, None) => return Err(LauncherError::PersonaRequired),
    };

    Ok(Selection {
        persona,
        model: model.unwrap_or(defaults.model).to_string(),
        model_explicit: model.is_some(),
        conflicts,
    })
}
