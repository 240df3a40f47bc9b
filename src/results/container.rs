//! Run-level container aggregating every dork's results

use super::types::DorkResult;
use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Everything a dork search run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Per-dork results in processing order, serialized as an object keyed by dork
    #[serde(serialize_with = "serialize_dorks")]
    pub dorks: Vec<DorkResult>,
    /// When the run started
    pub initiation_timestamp: NaiveDateTime,
    /// When the run finished, `None` while still running
    #[serde(serialize_with = "serialize_completion")]
    pub completion_timestamp: Option<NaiveDateTime>,
    /// URLs found across all dorks
    #[serde(skip)]
    pub total_urls_found: usize,
}

impl RunResult {
    /// Start a new run stamped with `initiation_timestamp`
    pub fn new(initiation_timestamp: NaiveDateTime) -> Self {
        Self {
            dorks: Vec::new(),
            initiation_timestamp,
            completion_timestamp: None,
            total_urls_found: 0,
        }
    }

    /// Record a dork's result; a repeated dork replaces its earlier entry
    pub fn record(&mut self, result: DorkResult) {
        self.total_urls_found += result.count;
        match self.dorks.iter_mut().find(|d| d.dork == result.dork) {
            Some(existing) => *existing = result,
            None => self.dorks.push(result),
        }
    }

    /// Look up a dork's result
    pub fn get(&self, dork: &str) -> Option<&DorkResult> {
        self.dorks.iter().find(|d| d.dork == dork)
    }

    /// Mark the run complete
    pub fn complete(&mut self, completion_timestamp: NaiveDateTime) {
        self.completion_timestamp = Some(completion_timestamp);
    }
}

fn serialize_dorks<S: Serializer>(dorks: &[DorkResult], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(dorks.len()))?;
    for result in dorks {
        map.serialize_entry(&result.dork, result)?;
    }
    map.end()
}

fn serialize_completion<S: Serializer>(
    timestamp: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match timestamp {
        Some(ts) => ts.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn dork_result(dork: &str, urls: &[&str]) -> DorkResult {
        let mut result = DorkResult::new(dork);
        result.extend(urls.iter().map(|u| u.to_string()));
        result
    }

    #[test]
    fn test_record_accumulates_total() {
        let mut run = RunResult::new(ts(1));
        run.record(dork_result("a", &["https://1", "https://2"]));
        run.record(dork_result("b", &["https://3"]));
        assert_eq!(run.total_urls_found, 3);
        assert_eq!(run.get("b").unwrap().count, 1);
    }

    #[test]
    fn test_duplicate_dork_replaces_entry() {
        let mut run = RunResult::new(ts(1));
        run.record(dork_result("a", &["https://1"]));
        run.record(dork_result("a", &["https://2", "https://3"]));
        assert_eq!(run.dorks.len(), 1);
        assert_eq!(run.get("a").unwrap().count, 2);
        assert_eq!(run.total_urls_found, 3);
    }

    #[test]
    fn test_json_document_shape() {
        let mut run = RunResult::new(ts(1));
        run.record(dork_result("second", &["https://2"]));
        run.record(dork_result("first", &["https://1"]));

        let pending = serde_json::to_value(&run).unwrap();
        assert_eq!(pending["completion_timestamp"], "");

        run.complete(ts(2));
        let json = serde_json::to_string(&run).unwrap();
        // processing order is kept
        assert!(json.find("\"second\"").unwrap() < json.find("\"first\"").unwrap());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dorks"]["first"]["urls_size"], 1);
        assert_eq!(value["initiation_timestamp"], "2024-05-01T01:00:00");
        assert_eq!(value["completion_timestamp"], "2024-05-01T02:00:00");
        assert!(value.get("total_urls_found").is_none());
    }
}
