//! Query building module
//!
//! Turns a dork into the query string sent to the search API:
//! - Domain scoping: `site:<domain> <dork>`
//! - Word limit: Google ignores everything past the 32nd space-separated
//!   word, so longer queries are cut down here and the cut is logged

use tracing::{info, warn};

/// Google's per-query word limit
pub const MAX_QUERY_WORDS: usize = 32;

/// Query ready to be sent, with whatever was cut to fit the word limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    /// Effective query string
    pub query: String,
    /// Words removed by truncation, joined by spaces
    pub dropped: Option<String>,
}

impl BuiltQuery {
    pub fn was_truncated(&self) -> bool {
        self.dropped.is_some()
    }
}

/// Build the query for `dork`, optionally scoped to `domain`
pub fn build(dork: &str, domain: Option<&str>) -> BuiltQuery {
    let query = match domain {
        Some(domain) if !domain.is_empty() => format!("site:{} {}", domain, dork),
        _ => dork.to_string(),
    };

    let words: Vec<&str> = query.split(' ').collect();
    if words.len() <= MAX_QUERY_WORDS {
        return BuiltQuery {
            query,
            dropped: None,
        };
    }

    let dropped = words[MAX_QUERY_WORDS..].join(" ");
    warn!(
        "Google limits queries to {} words (separated by spaces): removing from search query: '{}'",
        MAX_QUERY_WORDS, dropped
    );

    let mut truncated = words[..MAX_QUERY_WORDS].join(" ");
    // keep phrase quoting balanced
    if query.ends_with('"') {
        truncated.push('"');
    }
    info!("New search query: {}", truncated);

    BuiltQuery {
        query: truncated,
        dropped: Some(dropped),
    }
}
