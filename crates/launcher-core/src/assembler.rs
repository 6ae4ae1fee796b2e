use crate::frontmatter::DELIMITER;
use crate::resolver::{LoadedSkill, SkillMeta};
use std::fmt::Write as _;

const PRECEDENCE: &str = "# System Instructions

## Precedence

This persona system prompt takes precedence over the default Claude Code system prompt. \
When there is a conflict, follow this system prompt's guidance.

---

";

/// Build the final system prompt: header, expanded body, activation footer.
pub fn assemble(body: &str, loaded: &[LoadedSkill], skills: &[SkillMeta]) -> String {
    let mut out = header(loaded);
    out.push_str(body);
    out.push_str(&activation_protocol(skills));
    out
}

pub fn header(loaded: &[LoadedSkill]) -> String {
    let mut h = format!("{DELIMITER}\n");
    if !loaded.is_empty() {
        h.push_str("\n# Loaded Skills\n\n");
        h.push_str("The following skills have been loaded and are active for this session:\n\n");
        for skill in loaded {
            let _ = writeln!(h, "- **{}** ({})", skill.display_name, skill.id);
        }
        let _ = write!(h, "\n{DELIMITER}\n\n");
    }
    h.push_str(PRECEDENCE);
    h
}

/// Footer listing every described skill. Empty when there are none.
pub fn activation_protocol(skills: &[SkillMeta]) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let mut f = format!("\n{DELIMITER}\n\n## Skill Activation Protocol\n\n");
    let _ = writeln!(
        f,
        "You have {} embedded skills. They are ALL active for this session, at the same time.",
        skills.len()
    );
    f.push_str(
        "IF A SKILL APPLIES TO YOUR TASK, YOU DO NOT HAVE A CHOICE. YOU MUST USE IT. \
         THIS IS NOT NEGOTIABLE.\n",
    );
    f.push_str(
        "Never silently violate a skill. If you catch yourself doing so, STOP, \
         re-read the skill, and correct course.\n",
    );
    f.push_str(
        "Before EVERY action, check: does this violate any embedded skill? \
         If yes, DO NOT PROCEED.\n\n",
    );
    f.push_str("### Embedded Skills\n\n");
    for skill in skills {
        let _ = writeln!(f, "- **{}**: {}", skill.id, skill.description);
    }
    f
}
