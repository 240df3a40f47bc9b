//! Paginating, retrying search connector
//!
//! Drives an [`Engine`] page by page over a [`Transport`], yielding one
//! [`ResultBatch`] per page until the result budget is spent or the API runs
//! out of results.

use super::traits::{Engine, PageCursor, RequestParams};
use crate::error::ConnectorError;
use crate::network::Transport;
use crate::results::ResultBatch;
use futures::stream::{self, BoxStream, StreamExt};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Per-search limits passed to a connector
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Total URLs wanted for the query
    pub max_results: usize,
    /// URLs requested per page
    pub page_size: usize,
    /// Country code for localized results
    pub country_code: String,
}

/// Backoff between attempts of one page request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Jitter range in seconds, multiplied by `2^attempt`
    pub jitter: (f64, f64),
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            jitter: (1.0, 3.0),
        }
    }
}

impl RetryPolicy {
    /// Policy with no waiting between attempts
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            jitter: (0.0, 0.0),
        }
    }

    /// Total attempts including the first one
    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait before the attempt following `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let (low, high) = self.jitter;
        let jitter = if high > low {
            rand::thread_rng().gen_range(low..=high)
        } else {
            low
        };
        Duration::from_secs_f64((jitter * 2f64.powi(attempt as i32)).max(0.0))
    }
}

/// A search backend the orchestrator can query
pub trait SearchConnector: Send + Sync {
    /// Connector name for logs
    fn name(&self) -> &str;

    /// Lazily page through results for `query`.
    ///
    /// The stream ends after the last page; a failed page is yielded as a
    /// final `Err` item.
    fn search<'a>(
        &'a self,
        query: &'a str,
        options: &'a SearchOptions,
    ) -> BoxStream<'a, Result<ResultBatch, ConnectorError>>;
}

/// [`SearchConnector`] backed by an [`Engine`] and a [`Transport`]
pub struct ApiConnector {
    engine: Arc<dyn Engine>,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

struct PageState {
    cursor: PageCursor,
    fetched: usize,
    finished: bool,
}

impl ApiConnector {
    pub fn new(engine: Arc<dyn Engine>, transport: Arc<dyn Transport>) -> Self {
        Self {
            engine,
            transport,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch one page, retrying per the policy
    async fn fetch_page(&self, params: &RequestParams) -> Result<ResultBatch, ConnectorError> {
        let engine_name = self.engine.name();
        let attempts = self.retry.attempts();
        let mut last_error = None;

        for attempt in 0..attempts {
            let request = self.engine.request(params);
            let error = match self.transport.execute(request).await {
                Ok(response) if response.is_success() => {
                    return self.engine.response(&response);
                }
                Ok(response) => ConnectorError::Status {
                    status: response.status,
                    body: response.text,
                },
                // retrying won't fix an untrusted certificate
                Err(e @ ConnectorError::Tls(_)) => {
                    error!("{} request failed TLS validation: {}", engine_name, e);
                    return Err(e);
                }
                Err(e) => e,
            };

            warn!(
                "{} request failed (attempt {}/{}): {}",
                engine_name,
                attempt + 1,
                attempts,
                error
            );
            last_error = Some(error);

            if attempt + 1 < attempts {
                let wait = self.retry.backoff(attempt);
                info!("Retrying in {:.2} seconds...", wait.as_secs_f64());
                tokio::time::sleep(wait).await;
            }
        }

        let last = last_error.unwrap_or_else(|| ConnectorError::Network("no attempt made".into()));
        error!("{} failed after {} attempts", engine_name, attempts);
        Err(ConnectorError::RetriesExhausted {
            engine: engine_name.to_string(),
            attempts,
            last: Box::new(last),
        })
    }
}

impl SearchConnector for ApiConnector {
    fn name(&self) -> &str {
        self.engine.name()
    }

    fn search<'a>(
        &'a self,
        query: &'a str,
        options: &'a SearchOptions,
    ) -> BoxStream<'a, Result<ResultBatch, ConnectorError>> {
        let pagination = self.engine.pagination();
        let page_size = options.page_size.clamp(1, self.engine.max_page_size());

        let state = PageState {
            cursor: pagination.first(),
            fetched: 0,
            finished: false,
        };

        stream::unfold(state, move |mut state| async move {
            if state.finished || state.fetched >= options.max_results {
                return None;
            }

            let num = page_size.min(options.max_results - state.fetched);
            let params = RequestParams {
                query: query.to_string(),
                num,
                cursor: state.cursor,
                country_code: options.country_code.clone(),
            };

            info!(
                "Searching page {} ({:?}) for query: {}",
                state.cursor.page_number(page_size),
                state.cursor,
                query
            );

            match self.fetch_page(&params).await {
                Ok(batch) if batch.is_empty() => None,
                Ok(batch) => {
                    state.fetched += batch.len();
                    // a short page means the API has nothing more
                    state.finished = batch.len() < num;
                    state.cursor = pagination.advance(state.cursor, num);
                    Some((Ok(batch), state))
                }
                Err(e) => {
                    state.finished = true;
                    Some((Err(e), state))
                }
            }
        })
        .boxed()
    }
}
