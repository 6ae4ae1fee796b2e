//! Flat `key: value` metadata from a document's leading `---` block.
//!
//! Not YAML: values are raw strings, duplicate keys are
//! tolerated (the first one wins) and lines without a `:` are ignored.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const DELIMITER: &str = "---";

/// Metadata mapping of a document. Unknown keys are kept but unused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn shortcut(&self) -> Option<&str> {
        self.get("shortcut")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn model(&self) -> Option<&str> {
        self.get("model")
    }

    pub fn tools(&self) -> Option<&str> {
        self.get("tools")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert_first(&mut self, key: &str, value: &str) {
        self.0
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
}

/// Split raw document text into its metadata and body.
///
/// Without an opening delimiter the body is the content unchanged. With one,
/// the body starts after the closing delimiter line; an unterminated block
/// consumes the whole document.
pub fn split_document(content: &str) -> (Metadata, &str) {
    let mut meta = Metadata::default();

    let first_end = content.find('\n').map(|i| i + 1).unwrap_or(content.len());
    if content[..first_end].trim() != DELIMITER {
        return (meta, content);
    }

    let mut offset = first_end;
    while offset < content.len() {
        let rest = &content[offset..];
        let line_len = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
        let line = rest[..line_len].trim();
        offset += line_len;

        if line == DELIMITER {
            return (meta, &content[offset..]);
        }
        if let Some((key, value)) = line.split_once(':') {
            meta.insert_first(key.trim(), value.trim());
        }
    }

    (meta, "")
}

/// Parse the metadata block of the document at `path`.
///
/// Never fails: an unreadable document is logged and yields empty metadata.
pub fn parse_frontmatter(path: &Path) -> Metadata {
    match std::fs::read_to_string(path) {
        Ok(content) => split_document(&content).0,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse frontmatter");
            Metadata::default()
        }
    }
}

/// Strip one layer of matching surrounding quotes from a metadata value.
pub fn unquote(value: &str) -> &str {
    let v = value.trim();
    for q in ['"', '\''] {
        if let Some(inner) = v.strip_prefix(q).and_then(|s| s.strip_suffix(q)) {
            return inner;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_frontmatter_round_trips() {
        let content = "# Persona\n\nDo things.\n---\nname: not-meta\n";
        let (meta, body) = split_document(content);
        assert!(meta.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn parses_keys_and_trims_values() {
        let content = "---\nname:  Foo \nshortcut:f\ndescription: a: b\n---\nbody\n";
        let (meta, body) = split_document(content);
        assert_eq!(meta.name(), Some("Foo"));
        assert_eq!(meta.shortcut(), Some("f"));
        assert_eq!(meta.description(), Some("a: b"));
        assert_eq!(meta.len(), 3);
        assert_eq!(body, "body\n");
    }

    #[test]
    fn first_duplicate_key_wins() {
        let (meta, _) = split_document("---\nname: first\nname: second\n---\n");
        assert_eq!(meta.name(), Some("first"));
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let (meta, body) = split_document("---\njust words\nmodel: haiku\n---\nx");
        assert_eq!(meta.keys().collect::<Vec<_>>(), vec!["model"]);
        assert_eq!(body, "x");
    }

    #[test]
    fn unknown_keys_are_kept() {
        let (meta, _) = split_document("---\ncolor: blue\n---\n");
        assert_eq!(meta.get("color"), Some("blue"));
    }

    #[test]
    fn unterminated_block_has_empty_body() {
        let (meta, body) = split_document("---\nname: Foo\nshortcut: f\n");
        assert_eq!(meta.shortcut(), Some("f"));
        assert_eq!(body, "");
    }

    #[test]
    fn delimiter_with_surrounding_whitespace_opens_block() {
        let (meta, body) = split_document("  ---  \nname: Foo\n---\r\nrest");
        assert_eq!(meta.name(), Some("Foo"));
        assert_eq!(body, "rest");
    }

    #[test]
    fn empty_document() {
        let (meta, body) = split_document("");
        assert!(meta.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn unreadable_file_yields_empty_metadata() {
        let dir = TempDir::new().unwrap();
        let meta = parse_frontmatter(&dir.path().join("missing.md"));
        assert!(meta.is_empty());
    }

    #[test]
    fn parse_frontmatter_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tdd.md");
        std::fs::write(&path, "---\nname: TDD\nshortcut: tdd\n---\n# Body\n").unwrap();
        let meta = parse_frontmatter(&path);
        assert_eq!(meta.name(), Some("TDD"));
        assert_eq!(meta.shortcut(), Some("tdd"));
    }

    #[test]
    fn unquote_strips_matching_quotes() {
        assert_eq!(unquote("\"does bar\""), "does bar");
        assert_eq!(unquote("'does bar'"), "does bar");
        assert_eq!(unquote("\"mismatched'"), "\"mismatched'");
        assert_eq!(unquote("plain"), "plain");
    }
}
