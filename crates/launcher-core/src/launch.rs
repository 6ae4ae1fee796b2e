use crate::error::{LauncherError, Result};
use crate::paths;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

pub const CLAUDE_CMD_ENV: &str = "CLAUDE_CMD";
/// Read by the host's status line.
pub const PERSONA_ENV: &str = "CLAUDE_PERSONA";

/// Everything the host process is started with.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub binary: PathBuf,
    pub system_prompt: String,
    pub model: String,
    pub persona_name: String,
    pub agents_json: Option<String>,
}

/// Locate the Claude Code binary: `$CLAUDE_CMD`, then `PATH`, then
/// `~/.claude/local/claude`.
pub fn find_claude_binary() -> Result<PathBuf> {
    let local = paths::local_binary_path().ok();
    locate_binary(
        std::env::var_os(CLAUDE_CMD_ENV),
        which::which("claude").ok(),
        local,
    )
}

fn locate_binary(
    env_override: Option<OsString>,
    on_path: Option<PathBuf>,
    local: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(cmd) = env_override.filter(|c| !c.is_empty()) {
        return Ok(PathBuf::from(cmd));
    }
    if let Some(p) = on_path {
        return Ok(p);
    }
    local
        .filter(|p| p.exists())
        .ok_or(LauncherError::MissingBinary)
}

/// Build the host command. The persona name is exported to the child only.
pub fn build_command(plan: &LaunchPlan) -> Command {
    let mut cmd = Command::new(&plan.binary);
    cmd.arg("--system-prompt")
        .arg(&plan.system_prompt)
        .arg("--model")
        .arg(&plan.model);
    if let Some(agents) = &plan.agents_json {
        cmd.arg("--agents").arg(agents);
    }
    cmd.env(PERSONA_ENV, &plan.persona_name);
    cmd
}
