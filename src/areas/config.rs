//! Repository configuration (`.git/config`)
//!
//! ## File Format
//!
//! ```text
//! [core]
//! 	repositoryformatversion = 0
//! 	filemode = false
//! 	bare = false
//! [remote "origin"]
//! 	url = https://example.com/repo.git
//! ```
//!
//! Section and key names are case-insensitive and stored lowercase. A key with no
//! `=` is a boolean set to `true`. `#` and `;` start a comment, either on their own
//! line or after a value, unless they appear inside double quotes.

use crate::errors::{IoContext, OdbError, Result};
use std::path::Path;

/// Regex pattern for section headers: `[name]` or `[name "subsection"]`
const SECTION_REGEX: &str = r#"^\[([A-Za-z0-9.-]+)(?:\s+"((?:[^"\\]|\\.)*)")?\]$"#;

const CORE: &str = "core";

/// The only repository format this store understands
pub const REPOSITORY_FORMAT_VERSION: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    subsection: Option<String>,
    entries: Vec<(String, String)>,
}

impl Section {
    fn matches(&self, name: &str, subsection: Option<&str>) -> bool {
        self.name == name && self.subsection.as_deref() == subsection
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    sections: Vec<Section>,
}

impl Config {
    /// Configuration written by a fresh `init`
    pub fn default_repository() -> Self {
        let mut config = Config::default();
        config.set(CORE, "repositoryformatversion", REPOSITORY_FORMAT_VERSION);
        config.set(CORE, "filemode", "false");
        config.set(CORE, "bare", "false");
        config
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .io_context(|| format!("Unable to read config file {}", path.display()))?;

        Self::parse(&content).map_err(|(line, reason)| OdbError::InvalidConfig {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string())
            .io_context(|| format!("Unable to write config file {}", path.display()))
    }

    /// Parse config text; errors carry the 1-based line number
    pub fn parse(content: &str) -> std::result::Result<Self, (usize, String)> {
        let section_regex = regex::Regex::new(SECTION_REGEX).map_err(|e| (0, e.to_string()))?;
        let mut sections: Vec<Section> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let line = strip_comment(line).trim();

            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                let captures = section_regex
                    .captures(line)
                    .ok_or_else(|| (line_number, format!("invalid section header '{line}'")))?;
                sections.push(Section {
                    name: captures[1].to_ascii_lowercase(),
                    subsection: captures.get(2).map(|m| m.as_str().replace("\\\"", "\"")),
                    entries: Vec::new(),
                });
                continue;
            }

            let section = sections
                .last_mut()
                .ok_or_else(|| (line_number, "key outside of any section".to_string()))?;
            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), unquote(value.trim())),
                None => (line, "true".to_string()),
            };
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err((line_number, format!("invalid key '{key}'")));
            }

            section.entries.push((key.to_ascii_lowercase(), value));
        }

        Ok(Config { sections })
    }

    /// Last value of `section.key` (later entries override earlier ones)
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.get_in(section, None, key)
    }

    pub fn get_in(&self, section: &str, subsection: Option<&str>, key: &str) -> Option<&str> {
        let section = section.to_ascii_lowercase();
        let key = key.to_ascii_lowercase();

        self.sections
            .iter()
            .filter(|s| s.matches(&section, subsection))
            .flat_map(|s| s.entries.iter())
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .last()
    }

    /// Boolean value using git's spellings; `None` when absent or not a boolean
    pub fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        match self.get(section, key)?.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        }
    }

    /// Set `section.key`, replacing the last existing value or appending a new one
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let section = section.to_ascii_lowercase();
        let key = key.to_ascii_lowercase();

        let existing = self
            .sections
            .iter_mut()
            .rev()
            .filter(|s| s.matches(&section, None))
            .flat_map(|s| s.entries.iter_mut().rev())
            .find(|(k, _)| *k == key);
        if let Some((_, v)) = existing {
            *v = value.to_string();
            return;
        }

        match self
            .sections
            .iter_mut()
            .rev()
            .find(|s| s.matches(&section, None))
        {
            Some(existing) => existing.entries.push((key, value.to_string())),
            None => self.sections.push(Section {
                name: section,
                subsection: None,
                entries: vec![(key, value.to_string())],
            }),
        }
    }

    pub fn repository_format_version(&self) -> Option<&str> {
        self.get(CORE, "repositoryformatversion")
    }

    pub fn filemode(&self) -> bool {
        self.get_bool(CORE, "filemode").unwrap_or(false)
    }

    pub fn is_bare(&self) -> bool {
        self.get_bool(CORE, "bare").unwrap_or(false)
    }
}

/// Cut the line at the first `#` or `;` outside double quotes
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    let mut escaped = false;

    for (index, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => quoted = !quoted,
            '#' | ';' if !quoted => return &line[..index],
            _ => {}
        }
    }

    line
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map(|v| v.replace("\\\"", "\"").replace("\\\\", "\\"))
        .unwrap_or_else(|| value.to_string())
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for section in &self.sections {
            match &section.subsection {
                Some(subsection) => writeln!(
                    f,
                    "[{} \"{}\"]",
                    section.name,
                    subsection.replace('"', "\\\"")
                )?,
                None => writeln!(f, "[{}]", section.name)?,
            }
            for (key, value) in &section.entries {
                writeln!(f, "\t{key} = {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_has_core_keys() {
        let config = Config::default_repository();

        assert_eq!(config.repository_format_version(), Some("0"));
        assert!(!config.filemode());
        assert!(!config.is_bare());
        assert_eq!(
            config.to_string(),
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = false\n\tbare = false\n"
        );
    }

    #[test]
    fn parses_git_written_config() {
        let content = "# written by git\n[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare\n\
                       [remote \"origin\"]\n\turl = \"https://example.com/repo.git\"\n";
        let config = Config::parse(content).unwrap();

        assert_eq!(config.repository_format_version(), Some("0"));
        assert!(config.filemode());
        assert!(config.is_bare());
        assert_eq!(
            config.get_in("remote", Some("origin"), "url"),
            Some("https://example.com/repo.git")
        );
        assert_eq!(config.get("remote", "url"), None);
    }

    #[test]
    fn names_are_case_insensitive_and_last_value_wins() {
        let config = Config::parse("[Core]\nBare = false\n[core]\nbare = true\n").unwrap();

        assert_eq!(config.get("CORE", "BARE"), Some("true"));
    }

    #[test]
    fn saved_config_parses_back() {
        let mut config = Config::default_repository();
        config.set("core", "filemode", "true");
        config.set("user", "name", "Jane Doe");

        let reparsed = Config::parse(&config.to_string()).unwrap();
        assert_eq!(reparsed, config);
        assert_eq!(reparsed.get("user", "name"), Some("Jane Doe"));
        assert!(reparsed.filemode());
    }

    #[test]
    fn strips_inline_comments_outside_quotes() {
        let content = "[core] # main section\n\trepositoryformatversion = 0 ; set by git\n\
                       \tbare = false # no\n\tfilemode ; implicit true\n\
                       [remote \"origin\"]\n\turl = \"https://example.com/#frag;x\" ; quoted\n";
        let config = Config::parse(content).unwrap();

        assert_eq!(config.repository_format_version(), Some("0"));
        assert_eq!(config.get_bool("core", "bare"), Some(false));
        assert!(config.filemode());
        assert_eq!(
            config.get_in("remote", Some("origin"), "url"),
            Some("https://example.com/#frag;x")
        );
    }

    #[test]
    fn reports_line_of_invalid_input() {
        assert_eq!(Config::parse("key = value\n").unwrap_err().0, 1);
        assert_eq!(Config::parse("[core]\n\n[broken\n").unwrap_err().0, 3);
        assert_eq!(Config::parse("[core]\nbad key = 1\n").unwrap_err().0, 2);
    }
}
