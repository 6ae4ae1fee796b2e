use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("no system prompts found in {}", format_dirs(.0))]
    NoPrompts(Vec<PathBuf>),

    #[error(
        "failed to load {} import(s) in {}:\n{}",
        .missing.len(),
        .document.display(),
        format_missing(.missing)
    )]
    UnresolvedReferences {
        document: PathBuf,
        missing: Vec<String>,
    },

    #[error("team member '{member}' not found (searched: {})", format_dirs(.searched))]
    UnresolvedTeamMember {
        member: String,
        searched: Vec<PathBuf>,
    },

    #[error("invalid team definition {}: {reason}", .path.display())]
    InvalidTeam { path: PathBuf, reason: String },

    #[error(
        "unknown shortcut: {token}\n  available personas: {}\n  available models: {}",
        .personas.join(", "),
        .models.join(", ")
    )]
    UnknownToken {
        token: String,
        personas: Vec<String>,
        models: Vec<String>,
    },

    #[error("default persona '{0}' not found: specify a persona shortcut")]
    DefaultPersonaMissing(String),

    #[error("persona required (e.g. 'tdd', 'opt', 'arc')")]
    PersonaRequired,

    #[error(
        "could not find the Claude Code binary\n\n\
         Set the CLAUDE_CMD environment variable to the path of your Claude Code binary.\n\
         If installed via npm/nvm, add to your ~/.zshrc or ~/.bashrc:\n  \
         export CLAUDE_CMD=\"$(which claude)\""
    )]
    MissingBinary,

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|m| format!("  - {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, LauncherError>;
