//! Steam apps that should not become Sunshine entries
//!
//! Tools, runtimes and redistributables show up as installed apps.
//! Rules come from a built-in pattern list, explicit ids, an optional
//! blacklist file and extra name regexes.

use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_PATTERNS: &[&str] = &[
    r"Steamworks Common Redistributables",
    r"Proton",
    r"SteamVR|OpenVR|Valve Index",
    r"Soundtrack",
    r"Dedicated Server|Server",
    r"SDK|Editor|Mod Tools|Tools?",
    r"Demo",
    r"Benchmark|Test",
    r"Runtime",
    r"Workshop",
    r"Big Picture",
    r"Source",
    r"Linux Runtime",
    r"Redistributables",
    r"Desktop Mode",
];

pub const BLACKLIST_FILE_NAME: &str = "steam-import.blacklist";

#[derive(Debug)]
enum NamePattern {
    Regex(Regex),
    /// Lowercased text of a pattern that failed to compile
    Substring(String),
}

impl NamePattern {
    fn new(pattern: &str) -> Self {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => NamePattern::Regex(re),
            Err(e) => {
                debug!("Blacklist pattern '{}' is not a valid regex ({}), matching as text", pattern, e);
                NamePattern::Substring(pattern.to_lowercase())
            }
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Regex(re) => re.is_match(name),
            NamePattern::Substring(text) => name.to_lowercase().contains(text),
        }
    }
}

#[derive(Debug, Default)]
pub struct Blacklist {
    ids: HashSet<u32>,
    patterns: Vec<NamePattern>,
}

impl Blacklist {
    pub fn new(use_defaults: bool) -> Self {
        let mut blacklist = Blacklist::default();
        if use_defaults {
            blacklist.patterns = DEFAULT_PATTERNS.iter().map(|p| NamePattern::new(p)).collect();
        }
        blacklist
    }

    /// Build the full rule set from settings, reading the blacklist file
    /// from `file` or `<config_dir>/steam-import.blacklist`
    pub fn from_settings(
        settings: &crate::config::ImportSettings,
        config_dir: &Path,
    ) -> Self {
        let mut blacklist = Blacklist::new(settings.use_default_blacklist);
        blacklist.add_ids(&settings.blacklist_ids);

        let file = settings
            .blacklist_file
            .clone()
            .unwrap_or_else(|| config_dir.join(BLACKLIST_FILE_NAME));
        if file.is_file() {
            match std::fs::read(&file) {
                Ok(bytes) => blacklist.add_file_contents(&String::from_utf8_lossy(&bytes)),
                Err(e) => warn!("Cannot read blacklist {}: {}", file.display(), e),
            }
        }

        blacklist.add_name_regexes(&settings.blacklist_name_regex);
        blacklist
    }

    /// Numeric ids separated by commas or whitespace; anything else is ignored
    pub fn add_ids(&mut self, list: &str) {
        self.ids.extend(
            list.split(|c: char| c == ',' || c.is_whitespace())
                .filter_map(|tok| tok.parse::<u32>().ok()),
        );
    }

    /// One id or pattern per line, `#` starts a comment
    pub fn add_file_contents(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<u32>() {
                Ok(id) => {
                    self.ids.insert(id);
                }
                Err(_) => self.patterns.push(NamePattern::new(line)),
            }
        }
    }

    /// `|`-separated list; every piece is its own pattern
    pub fn add_name_regexes(&mut self, list: &str) {
        self.patterns.extend(
            list.split('|')
                .filter(|p| !p.is_empty())
                .map(NamePattern::new),
        );
    }

    pub fn is_blacklisted(&self, app_id: u32, name: &str) -> bool {
        self.ids.contains(&app_id) || self.patterns.iter().any(|p| p.matches(name))
    }
}
