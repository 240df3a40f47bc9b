//! False positive URL remover plugin

use super::traits::{Plugin, PluginInfo};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Informational sources that describe a vulnerability rather than expose it
pub const IGNORED_URL_PREFIXES: [&str; 3] = [
    "https://www.kb.cert.org",
    "https://www.exploit-db.com/",
    "https://twitter.com/ExploitDB/",
];

static IGNORED_URL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    IGNORED_URL_PREFIXES
        .iter()
        .filter_map(|prefix| {
            RegexBuilder::new(&regex::escape(prefix))
                .case_insensitive(true)
                .build()
                .ok()
                .map(|re| (*prefix, re))
        })
        .collect()
});

/// Plugin that drops URLs pointing at advisory sites (CERT, Exploit-DB, its Twitter account)
pub struct FalsePositivePlugin {
    patterns: &'static [(&'static str, Regex)],
}

impl FalsePositivePlugin {
    pub fn new() -> Self {
        Self {
            patterns: IGNORED_URL_PATTERNS.as_slice(),
        }
    }

    /// The denylist entry `url` matches, if any
    pub fn matching_entry(&self, url: &str) -> Option<&'static str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(url))
            .map(|(prefix, _)| *prefix)
    }
}

impl Default for FalsePositivePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for FalsePositivePlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: "false_positive_remover".to_string(),
            name: "False Positive Remover".to_string(),
            description: "Remove advisory and exploit database URLs from dork results".to_string(),
            default_on: true,
        }
    }

    fn on_result(&self, dork: &str, url: &str) -> bool {
        match self.matching_entry(url) {
            Some(entry) => {
                warn!(
                    "Removing {} false positive URL: {} (dork: {})",
                    entry, url, dork
                );
                false
            }
            None => true,
        }
    }
}
