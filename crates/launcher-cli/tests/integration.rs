#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let f = Fixture {
            dir: TempDir::new().unwrap(),
        };
        let out = f.out_dir();
        f.write(
            "proj/.claude/launcher.yaml",
            &format!(
                "debug_prompt_path: {}\ndebug_agents_path: {}\n",
                out.join("prompt.md").display(),
                out.join("agents.json").display()
            ),
        );
        std::fs::create_dir_all(f.home()).unwrap();
        f
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("proj")
    }

    fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn manifest(&self) -> PathBuf {
        self.out_dir().join("manifest.json")
    }

    fn local(&self, rel: &str, content: &str) -> PathBuf {
        self.write(&format!("proj/.claude/system-prompts/{rel}"), content)
    }

    fn global(&self, rel: &str, content: &str) -> PathBuf {
        self.write(&format!("home/.claude/system-prompts/{rel}"), content)
    }

    fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("claude-launcher").unwrap();
        cmd.current_dir(self.dir.path())
            .env("CLAUDE_LAUNCHER_ROOT", self.root())
            .env("HOME", self.home())
            .env("CLAUDE_SKILL_MANIFEST", self.manifest())
            .env_remove("CLAUDE_CMD")
            .env_remove("RUST_LOG");
        cmd
    }

    fn summary(&self, args: &[&str]) -> serde_json::Value {
        let out = self
            .cmd()
            .args(["--dry-run", "--json"])
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).unwrap()
    }

    fn standard_personas(&self) {
        self.local(
            "foo.md",
            "---\nname: Foo\nshortcut: tdd\n---\n# Foo persona\n@skills/bar/SKILL.md\n",
        );
        self.local(
            "skills/bar/SKILL.md",
            "---\nname: Bar\ndescription: \"does bar\"\n---\nBar instructions\n",
        );
        self.local("tdd2.md", "---\nname: TDD Two\nshortcut: tdd2\n---\nSecond\n");
        self.local("gen.md", "---\nname: General\nshortcut: gen\n---\nGeneral body\n");
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[test]
fn dry_run_composes_prompt_and_manifest() {
    let f = Fixture::new();
    f.standard_personas();

    f.cmd()
        .args(["--dry-run", "tdd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected: Foo"))
        .stdout(predicate::str::contains("Model: opus"))
        .stdout(predicate::str::contains("Dry run"));

    let prompt = read(&f.out_dir().join("prompt.md"));
    assert!(prompt.starts_with("---\n"));
    assert!(prompt.contains("- **Bar** (development-skills:bar)"));
    assert!(prompt.contains("Bar instructions"));
    assert!(prompt.contains("- **development-skills:bar**: does bar"));

    let manifest: serde_json::Value = serde_json::from_str(&read(&f.manifest())).unwrap();
    assert_eq!(manifest["persona"], "Foo");
    assert_eq!(manifest["skills"][0]["name"], "development-skills:bar");
    assert_eq!(manifest["skills"][0]["description"], "does bar");
}

#[test]
fn tokens_are_order_independent() {
    let f = Fixture::new();
    f.standard_personas();

    let a = f.summary(&["tdd", "sonn"]);
    let b = f.summary(&["sonn", "tdd"]);
    assert_eq!(a["persona"], "Foo");
    assert_eq!(a["model"], "sonnet");
    assert_eq!(a["persona"], b["persona"]);
    assert_eq!(a["model"], b["model"]);
}

#[test]
fn duplicate_persona_warns_and_keeps_first() {
    let f = Fixture::new();
    f.standard_personas();

    f.cmd()
        .args(["--dry-run", "tdd", "tdd2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SHORTCUT CONFLICT"))
        .stdout(predicate::str::contains("Using: tdd (first match)"))
        .stdout(predicate::str::contains("Selected: Foo"));
}

#[test]
fn model_only_uses_default_persona() {
    let f = Fixture::new();
    f.standard_personas();

    let s = f.summary(&["haik"]);
    assert_eq!(s["shortcut"], "gen");
    assert_eq!(s["persona"], "General");
    assert_eq!(s["model"], "haiku");
}

#[test]
fn unknown_token_fails_with_options() {
    let f = Fixture::new();
    f.standard_personas();

    f.cmd()
        .args(["--dry-run", "zzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shortcut: zzz"))
        .stderr(predicate::str::contains("available personas: gen, tdd, tdd2"));
}

#[test]
fn no_tokens_requires_persona() {
    let f = Fixture::new();
    f.standard_personas();

    f.cmd()
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("persona required"));
}

#[test]
fn missing_reference_fails_without_artifacts() {
    let f = Fixture::new();
    f.local("present.md", "PRESENT\n");
    f.local(
        "broken.md",
        "---\nshortcut: br\n---\n@present.md\n@gone/SKILL.md\n",
    );

    f.cmd()
        .args(["--dry-run", "br"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gone/SKILL.md"))
        .stderr(predicate::str::contains("failed to load 1 import(s)"));

    assert!(!f.manifest().exists());
    assert!(!f.out_dir().join("prompt.md").exists());
}

#[test]
fn local_prompt_shadows_global() {
    let f = Fixture::new();
    f.local("mine.md", "---\nname: Local One\nshortcut: x\n---\n");
    f.global("theirs.md", "---\nname: Global One\nshortcut: x\n---\n");
    f.global("only.md", "---\nname: Global Only\nshortcut: g\n---\n");

    assert_eq!(f.summary(&["x"])["persona"], "Local One");
    assert_eq!(f.summary(&["g"])["persona"], "Global Only");
}

#[test]
fn no_prompts_is_fatal() {
    let f = Fixture::new();
    f.cmd()
        .args(["--dry-run", "tdd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no system prompts found"));
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[test]
fn team_writes_agents_record() {
    let f = Fixture::new();
    f.local(
        "squad/team.yaml",
        "name: Squad\nshortcut: sq\nteam:\n  - name: lead\n    model: sonn\n  - name: helper\n    model: haik\n",
    );
    f.local("squad/lead.md", "---\nname: Lead\n---\nLEAD BODY\n");
    f.global(
        "helper.md",
        "---\nname: Helper\ndescription: Reviews diffs\ntools: [Read, Grep]\n---\nHELPER BODY\n",
    );

    let s = f.summary(&["sq"]);
    assert_eq!(s["persona"], "Squad");
    assert_eq!(s["team"], true);
    assert_eq!(s["model"], "sonnet");
    assert_eq!(s["agents"], serde_json::json!(["helper"]));

    let agents: serde_json::Value =
        serde_json::from_str(&read(&f.out_dir().join("agents.json"))).unwrap();
    assert_eq!(agents["helper"]["description"], "Reviews diffs");
    assert_eq!(agents["helper"]["model"], "haik");
    assert_eq!(agents["helper"]["tools"], serde_json::json!(["Read", "Grep"]));
    assert!(agents["helper"]["prompt"]
        .as_str()
        .unwrap()
        .contains("HELPER BODY"));

    assert!(read(&f.out_dir().join("prompt.md")).contains("LEAD BODY"));
}

#[test]
fn explicit_model_beats_lead_override() {
    let f = Fixture::new();
    f.local(
        "squad/team.yaml",
        "shortcut: sq\nteam:\n  - name: lead\n    model: sonn\n",
    );
    f.local("squad/lead.md", "lead\n");
    assert_eq!(f.summary(&["sq", "haik"])["model"], "haiku");
}

#[test]
fn unresolvable_team_member_is_fatal() {
    let f = Fixture::new();
    f.local(
        "squad/team.yaml",
        "shortcut: sq\nteam:\n  - name: lead\n  - name: helper\n",
    );
    f.local("squad/lead.md", "lead\n");

    f.cmd()
        .args(["--dry-run", "sq"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("team member 'helper' not found"));
}

// ---------------------------------------------------------------------------
// Listing and launching
// ---------------------------------------------------------------------------

#[test]
fn list_shows_personas_teams_and_models() {
    let f = Fixture::new();
    f.standard_personas();
    f.local(
        "squad/team.yaml",
        "name: Squad\nshortcut: sq\nteam:\n  - name: gen\n",
    );

    f.cmd()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("tdd2"))
        .stdout(predicate::str::contains("team"))
        .stdout(predicate::str::contains("sonnet"));

    let out = f.cmd().args(["--list", "--json"]).assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let shortcuts: Vec<&str> = v["personas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["shortcut"].as_str().unwrap())
        .collect();
    assert_eq!(shortcuts, vec!["gen", "sq", "tdd", "tdd2"]);
    assert_eq!(v["models"]["haik"], "haiku");
}

#[test]
fn missing_binary_is_fatal() {
    let f = Fixture::new();
    f.standard_personas();

    f.cmd()
        .env("PATH", f.dir.path().join("empty-path"))
        .arg("tdd")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CLAUDE_CMD"));
}

#[cfg(unix)]
#[test]
fn launch_execs_host_with_model_and_persona() {
    use std::os::unix::fs::PermissionsExt;

    let f = Fixture::new();
    f.standard_personas();
    let fake = f.write(
        "bin/claude",
        "#!/bin/sh\necho \"flag=$3 model=$4 persona=$CLAUDE_PERSONA\"\n",
    );
    std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

    f.cmd()
        .env("CLAUDE_CMD", &fake)
        .args(["sonn", "tdd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Launching Claude Code"))
        .stdout(predicate::str::contains(
            "flag=--model model=sonnet persona=Foo",
        ));
}
