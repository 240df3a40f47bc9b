//! Result type definitions

use serde::{Deserialize, Serialize};

/// URLs returned by one page request, in engine order
pub type ResultBatch = Vec<String>;

/// URLs collected for a single dork
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DorkResult {
    /// The dork as read from the dork file (trimmed)
    #[serde(skip)]
    pub dork: String,
    /// Number of URLs kept after filtering
    #[serde(rename = "urls_size")]
    pub count: usize,
    /// Result URLs, duplicates allowed
    pub urls: Vec<String>,
}

impl DorkResult {
    /// Create an empty result for a dork
    pub fn new(dork: impl Into<String>) -> Self {
        Self {
            dork: dork.into(),
            count: 0,
            urls: Vec::new(),
        }
    }

    /// Append URLs and keep the count in step
    pub fn extend(&mut self, urls: impl IntoIterator<Item = String>) {
        self.urls.extend(urls);
        self.count = self.urls.len();
    }

    /// Replace the URL list (after filtering)
    pub fn set_urls(&mut self, urls: Vec<String>) {
        self.count = urls.len();
        self.urls = urls;
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_follows_urls() {
        let mut result = DorkResult::new("inurl:admin");
        result.extend(vec!["https://a.example".to_string()]);
        result.extend(vec!["https://a.example".to_string()]);
        assert_eq!(result.count, 2);

        result.set_urls(vec![]);
        assert_eq!(result.count, 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut result = DorkResult::new("inurl:admin");
        result.extend(vec!["https://a.example".to_string()]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"urls_size": 1, "urls": ["https://a.example"]})
        );
    }
}
