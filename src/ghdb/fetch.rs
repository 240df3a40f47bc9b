//! Google Hacking Database retrieval

use crate::engines::{EngineRequest, EngineResponse};
use crate::error::{ConfigError, ConnectorError, GhdbError};
use crate::network::{ClientSettings, HttpClient, Transport};
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// GHDB listing endpoint
pub const GHDB_URL: &str = "https://www.exploit-db.com/google-hacking-database";

/// Raw listing returned by the GHDB endpoint
#[derive(Debug, Deserialize)]
struct GhdbResponse {
    #[serde(rename = "recordsTotal")]
    records_total: u64,
    data: Vec<Value>,
}

/// Dorks of one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDorks {
    pub category_name: String,
    pub dorks: Vec<String>,
}

/// Everything scraped from the GHDB
#[derive(Debug, Clone, PartialEq)]
pub struct GhdbDatabase {
    /// Record count reported by the server
    pub total_dorks: u64,
    /// Dorks in listing order
    pub extracted_dorks: Vec<String>,
    /// Dorks grouped by numeric category id
    pub category_dict: BTreeMap<u32, CategoryDorks>,
    /// Listing records, tabs stripped from `url_title`
    pub records: Vec<Value>,
}

impl GhdbDatabase {
    /// Parse the JSON body of the GHDB listing
    pub fn parse(body: &str) -> Result<Self, ConnectorError> {
        let response: GhdbResponse =
            serde_json::from_str(body).map_err(|e| ConnectorError::Parse(e.to_string()))?;
        let anchor = Selector::parse("a").map_err(|e| ConnectorError::Parse(e.to_string()))?;

        let mut extracted_dorks = Vec::with_capacity(response.data.len());
        let mut category_dict: BTreeMap<u32, CategoryDorks> = BTreeMap::new();
        let mut records = Vec::with_capacity(response.data.len());

        for mut record in response.data {
            let url_title = record
                .get("url_title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let Some(dork) = anchor_text(&url_title, &anchor) else {
                warn!("Skipping GHDB record without a dork link: {}", url_title);
                continue;
            };
            let (category_id, category_name) = category_of(&record)?;

            extracted_dorks.push(dork.clone());
            category_dict
                .entry(category_id)
                .or_insert_with(|| CategoryDorks {
                    category_name,
                    dorks: Vec::new(),
                })
                .dorks
                .push(dork);

            // Some titles carry trailing tabs
            record["url_title"] = Value::from(url_title.replace('\t', ""));
            records.push(record);
        }

        Ok(Self {
            total_dorks: response.records_total,
            extracted_dorks,
            category_dict,
            records,
        })
    }
}

/// Text of the first link in an HTML fragment, trimmed
fn anchor_text(html: &str, anchor: &Selector) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let text = fragment.select(anchor).next()?.text().next()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Numeric category id and title of a record; ids arrive as strings or numbers
fn category_of(record: &Value) -> Result<(u32, String), ConnectorError> {
    let category = &record["category"];
    let id = match &category["cat_id"] {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ConnectorError::Parse(format!("invalid category id: {}", category["cat_id"])))?;

    let name = category["cat_title"].as_str().unwrap_or_default().to_string();
    Ok((id, name))
}

/// Fetches the GHDB listing, falling back to an unverified connection when
/// the TLS handshake fails.
pub struct GhdbScraper {
    transport: Arc<dyn Transport>,
    insecure: Arc<dyn Transport>,
    url: String,
}

impl GhdbScraper {
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let verified = HttpClient::with_settings(&ClientSettings {
            timeout,
            verify_ssl: true,
        })?;
        let insecure = HttpClient::with_settings(&ClientSettings {
            timeout,
            verify_ssl: false,
        })?;
        Ok(Self::with_transports(Arc::new(verified), Arc::new(insecure)))
    }

    pub fn with_transports(transport: Arc<dyn Transport>, insecure: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            insecure,
            url: GHDB_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Retrieve and parse the full dork listing
    pub async fn fetch_dork_database(&self) -> Result<GhdbDatabase, GhdbError> {
        info!("Requesting URL: {}", self.url);

        let response = match self.transport.execute(self.request()).await {
            Err(e) if e.is_tls() => {
                warn!("TLS handshake failed ({}), retrying without certificate verification", e);
                self.insecure.execute(self.request()).await
            }
            other => other,
        }
        .and_then(|response| ensure_ok(&response).map(|_| response))
        .map_err(|source| self.request_error(source))?;

        let database =
            GhdbDatabase::parse(&response.text).map_err(|source| self.request_error(source))?;
        info!("Total Google dorks retrieved: {}", database.total_dorks);
        Ok(database)
    }

    fn request(&self) -> EngineRequest {
        EngineRequest::get(&self.url)
            .header("Accept-Language", "en-US")
            .header("X-Requested-With", "XMLHttpRequest")
    }

    fn request_error(&self, source: ConnectorError) -> GhdbError {
        GhdbError::Request {
            url: self.url.clone(),
            source,
        }
    }
}

fn ensure_ok(response: &EngineResponse) -> Result<(), ConnectorError> {
    if response.status == 200 {
        Ok(())
    } else {
        Err(ConnectorError::Status {
            status: response.status,
            body: response.text.chars().take(200).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing() -> Value {
        json!({
            "recordsTotal": 3,
            "data": [
                {
                    "id": "1",
                    "url_title": "<a href=\"/ghdb/1\">inurl:admin/login.php\t\t</a>",
                    "category": {"cat_id": "12", "cat_title": "Pages Containing Login Portals"}
                },
                {
                    "id": "2",
                    "url_title": "<a href=\"/ghdb/2\">intitle:\"index of\" passwd</a>",
                    "category": {"cat_id": 9, "cat_title": "File Containing Passwords"}
                },
                {
                    "id": "3",
                    "url_title": "<a href=\"/ghdb/3\">inurl:wp-login.php</a>",
                    "category": {"cat_id": "12", "cat_title": "Pages Containing Login Portals"}
                }
            ]
        })
    }

    #[test]
    fn test_parse_listing() {
        let database = GhdbDatabase::parse(&listing().to_string()).unwrap();

        assert_eq!(database.total_dorks, 3);
        assert_eq!(
            database.extracted_dorks,
            vec!["inurl:admin/login.php", "intitle:\"index of\" passwd", "inurl:wp-login.php"]
        );
        assert_eq!(database.category_dict.keys().copied().collect::<Vec<_>>(), vec![9, 12]);
        assert_eq!(database.category_dict[&12].dorks.len(), 2);
        assert_eq!(
            database.category_dict[&9].category_name,
            "File Containing Passwords"
        );
        assert!(!database.records[0]["url_title"].as_str().unwrap().contains('\t'));
    }

    #[test]
    fn test_record_without_link_skipped() {
        let body = json!({
            "recordsTotal": 1,
            "data": [{"url_title": "no link", "category": {"cat_id": "1", "cat_title": "Footholds"}}]
        });
        let database = GhdbDatabase::parse(&body.to_string()).unwrap();
        assert!(database.extracted_dorks.is_empty());
    }

    #[test]
    fn test_invalid_body_is_parse_error() {
        assert!(matches!(
            GhdbDatabase::parse("<html>blocked</html>"),
            Err(ConnectorError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_sends_ajax_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google-hacking-database"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
            .expect(1)
            .mount(&server)
            .await;

        let client: Arc<dyn Transport> = Arc::new(HttpClient::new().unwrap());
        let scraper = GhdbScraper::with_transports(client.clone(), client)
            .with_url(format!("{}/google-hacking-database", server.uri()));

        let database = scraper.fetch_dork_database().await.unwrap();
        assert_eq!(database.extracted_dorks.len(), 3);
    }

    #[tokio::test]
    async fn test_non_200_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client: Arc<dyn Transport> = Arc::new(HttpClient::new().unwrap());
        let scraper = GhdbScraper::with_transports(client.clone(), client).with_url(server.uri());

        let err = scraper.fetch_dork_database().await.unwrap_err();
        assert!(matches!(
            err,
            GhdbError::Request {
                source: ConnectorError::Status { status: 403, .. },
                ..
            }
        ));
    }

    struct Fixed {
        outcome: Result<EngineResponse, ConnectorError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn execute(&self, _request: EngineRequest) -> Result<EngineResponse, ConnectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_tls_failure_falls_back_to_insecure() {
        let verified = Arc::new(Fixed {
            outcome: Err(ConnectorError::Tls("self signed certificate".into())),
            calls: AtomicUsize::new(0),
        });
        let insecure = Arc::new(Fixed {
            outcome: Ok(EngineResponse {
                status: 200,
                text: listing().to_string(),
            }),
            calls: AtomicUsize::new(0),
        });

        let scraper = GhdbScraper::with_transports(verified.clone(), insecure.clone());
        let database = scraper.fetch_dork_database().await.unwrap();

        assert_eq!(database.total_dorks, 3);
        assert_eq!(verified.calls.load(Ordering::SeqCst), 1);
        assert_eq!(insecure.calls.load(Ordering::SeqCst), 1);
    }
}
