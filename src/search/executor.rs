//! Dork search execution
//!
//! Runs every dork through query building, the search connector and the
//! result plugins, one dork at a time, pausing between dorks.

use super::delay::DelayPool;
use super::models::{DorkList, RunOptions};
use crate::engines::SearchConnector;
use crate::error::{ConfigError, ConnectorError, Result, SearchError};
use crate::plugins::PluginRegistry;
use crate::query;
use crate::results::{DorkResult, ResultSink, RunResult};
use chrono::Local;
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Lifecycle of a search run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Running,
    Finalizing,
    Done,
    /// Interrupted by the user, no JSON summary written
    AbortedByUser,
    /// Stopped on a TLS trust failure
    Aborted,
}

/// Sequential dork search orchestrator
pub struct DorkSearch {
    /// Search backend
    connector: Arc<dyn SearchConnector>,
    /// Result filters
    plugins: PluginRegistry,
    /// Where results are written
    sink: Box<dyn ResultSink>,
    /// Run parameters
    options: RunOptions,
    /// Pauses between dorks
    delays: DelayPool,
    state: RunState,
}

impl DorkSearch {
    /// Create a run; invalid delay bounds are rejected here, before any search
    pub fn new(
        connector: Arc<dyn SearchConnector>,
        sink: Box<dyn ResultSink>,
        options: RunOptions,
    ) -> std::result::Result<Self, ConfigError> {
        if options.search.max_results == 0 {
            return Err(ConfigError::NonPositive("max_urls"));
        }
        if options.search.page_size == 0 {
            return Err(ConfigError::NonPositive("max_results_per_search"));
        }
        let delays = DelayPool::build(options.min_delay, options.max_delay)?;
        debug!("Delay pool: {:?}", delays.values());

        Ok(Self {
            connector,
            plugins: PluginRegistry::with_defaults(),
            sink,
            options,
            delays,
            state: RunState::Init,
        })
    }

    /// Replace the default result plugins
    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Search every dork and write the results
    pub async fn run(&mut self, dorks: &DorkList) -> Result<RunResult> {
        self.run_until(dorks, std::future::pending()).await
    }

    /// Like [`run`](Self::run), but stops as soon as `shutdown` completes.
    ///
    /// Sections already appended to the text sink stay there; the JSON
    /// summary is not written.
    pub async fn run_until<F>(&mut self, dorks: &DorkList, shutdown: F) -> Result<RunResult>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut run = RunResult::new(Local::now().naive_local());
        info!("Initiation timestamp: {}", run.initiation_timestamp);

        if self.options.max_workers > 1 {
            info!(
                "{} workers configured; dorks are searched sequentially",
                self.options.max_workers
            );
        }

        self.state = RunState::Running;
        let total = dorks.len();

        for (index, raw_dork) in dorks.iter().enumerate() {
            let dork = raw_dork.trim();

            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                outcome = self.search_dork(dork, index + 1, total) => Some(outcome),
            };
            let Some(outcome) = outcome else {
                return Err(self.cancel());
            };

            match outcome {
                Ok(result) => self.record(&mut run, result),
                Err(e) => {
                    self.state = RunState::Aborted;
                    error!("{}", e);
                    return Err(e);
                }
            }

            // Only sleep if there are more dorks to search
            if index + 1 < total {
                let pause = self.delays.next_delay();
                info!(
                    "Sleeping {:.1} seconds before executing the next dork search...",
                    pause.as_secs_f64()
                );
                let slept = tokio::select! {
                    biased;
                    _ = &mut shutdown => false,
                    _ = tokio::time::sleep(pause) => true,
                };
                if !slept {
                    return Err(self.cancel());
                }
            }
        }

        self.state = RunState::Finalizing;
        info!(
            "Total URLs found for the {} total dorks searched: {}",
            total, run.total_urls_found
        );

        run.complete(Local::now().naive_local());
        if let Some(completed) = run.completion_timestamp {
            info!("Completion timestamp: {}", completed);
        }

        self.sink.write_run(&run)?;
        self.state = RunState::Done;

        Ok(run)
    }

    /// Search a single dork. Only a fatal TLS failure is returned as an error;
    /// anything else ends the dork with what was collected so far.
    async fn search_dork(&self, dork: &str, number: usize, total: usize) -> Result<DorkResult> {
        let mut result = DorkResult::new(dork);

        let built = query::build(dork, self.options.domain.as_deref());
        info!(
            "Search ( {} / {} ) for Google dork [ {} ] using {}",
            number,
            total,
            built.query,
            self.connector.name()
        );

        let max_urls = self.options.search.max_results;
        let mut urls = Vec::new();
        let mut batches = self.connector.search(&built.query, &self.options.search);

        while let Some(batch) = batches.next().await {
            match batch {
                Ok(batch) => {
                    urls.extend(batch);
                    if urls.len() >= max_urls {
                        break;
                    }
                }
                Err(e) => {
                    self.connector_failed(dork, e)?;
                    break;
                }
            }
        }

        result.set_urls(self.plugins.filter(dork, urls));
        info!(
            "Results: {} URLs found for Google dork: {}",
            result.count, dork
        );
        if !result.is_empty() {
            debug!("dork_urls_list:\n{}", result.urls.join("\n"));
        }

        Ok(result)
    }

    /// Decide whether a connector failure ends the run or only this dork
    fn connector_failed(&self, dork: &str, error: ConnectorError) -> Result<()> {
        if error.is_tls() && self.options.verify_ssl {
            return Err(SearchError::Tls {
                dork: dork.to_string(),
                source: error,
            });
        }
        error!("Error with dork: {}. {}", dork, error);
        Ok(())
    }

    /// Add a finished dork to the run and flush it to the text sink
    fn record(&mut self, run: &mut RunResult, result: DorkResult) {
        if !result.is_empty() {
            if let Err(e) = self.sink.write_dork(&result) {
                error!("Error with dork: {}. {}", result.dork, e);
            }
        }
        run.record(result);
    }

    fn cancel(&mut self) -> SearchError {
        self.state = RunState::AbortedByUser;
        warn!("Search interrupted, results written so far are kept in the text file");
        SearchError::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::SearchOptions;
    use crate::results::ResultBatch;
    use futures::stream::{self, BoxStream};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Connector replaying fixed stream items per query
    #[derive(Default)]
    struct StubConnector {
        responses: HashMap<String, Vec<std::result::Result<ResultBatch, ConnectorError>>>,
        queries: Mutex<Vec<String>>,
    }

    impl StubConnector {
        fn with(mut self, query: &str, items: Vec<std::result::Result<ResultBatch, ConnectorError>>) -> Self {
            self.responses.insert(query.to_string(), items);
            self
        }
    }

    impl SearchConnector for StubConnector {
        fn name(&self) -> &str {
            "stub"
        }

        fn search<'a>(
            &'a self,
            query: &'a str,
            _options: &'a SearchOptions,
        ) -> BoxStream<'a, std::result::Result<ResultBatch, ConnectorError>> {
            self.queries.lock().unwrap().push(query.to_string());
            let items = self.responses.get(query).cloned().unwrap_or_default();
            stream::iter(items).boxed()
        }
    }

    /// Sink keeping everything in memory
    #[derive(Clone, Default)]
    struct MemorySink {
        sections: Arc<Mutex<Vec<DorkResult>>>,
        runs: Arc<Mutex<Vec<RunResult>>>,
    }

    impl ResultSink for MemorySink {
        fn write_dork(&mut self, result: &DorkResult) -> Result<()> {
            self.sections.lock().unwrap().push(result.clone());
            Ok(())
        }

        fn write_run(&mut self, run: &RunResult) -> Result<()> {
            self.runs.lock().unwrap().push(run.clone());
            Ok(())
        }
    }

    fn batch(urls: &[&str]) -> std::result::Result<ResultBatch, ConnectorError> {
        Ok(urls.iter().map(|u| u.to_string()).collect())
    }

    fn options() -> RunOptions {
        RunOptions {
            domain: None,
            search: SearchOptions {
                max_results: 10,
                page_size: 10,
                country_code: "vn".to_string(),
            },
            min_delay: 0.0,
            max_delay: 0.05,
            verify_ssl: true,
            max_workers: 1,
        }
    }

    fn search(connector: StubConnector, sink: &MemorySink, options: RunOptions) -> DorkSearch {
        DorkSearch::new(Arc::new(connector), Box::new(sink.clone()), options).unwrap()
    }

    #[tokio::test]
    async fn test_filtered_results_recorded() {
        let connector = StubConnector::default().with(
            "inurl:admin",
            vec![batch(&["https://a", "https://www.exploit-db.com/1", "https://b"])],
        );
        let sink = MemorySink::default();
        let mut dork_search = search(connector, &sink, options());

        let run = dork_search
            .run(&DorkList::from_iter(["inurl:admin"]))
            .await
            .unwrap();

        assert_eq!(run.get("inurl:admin").unwrap().urls, vec!["https://a", "https://b"]);
        assert_eq!(run.total_urls_found, 2);
        assert_eq!(sink.sections.lock().unwrap().len(), 1);
        assert_eq!(sink.runs.lock().unwrap().len(), 1);
        assert_eq!(dork_search.state(), RunState::Done);
        assert!(run.completion_timestamp.is_some());
    }

    #[tokio::test]
    async fn test_stops_reading_at_max_urls() {
        let connector = StubConnector::default().with(
            "d",
            vec![
                batch(&["https://1", "https://2", "https://3"]),
                batch(&["https://4"]),
            ],
        );
        let sink = MemorySink::default();
        let mut run_options = options();
        run_options.search.max_results = 2;
        let mut dork_search = search(connector, &sink, run_options);

        let run = dork_search.run(&DorkList::from_iter(["d"])).await.unwrap();
        // the batch that crossed the limit is kept whole
        assert_eq!(run.get("d").unwrap().count, 3);
    }

    #[tokio::test]
    async fn test_connector_error_keeps_partial_results() {
        let connector = StubConnector::default()
            .with(
                "first",
                vec![
                    batch(&["https://1"]),
                    Err(ConnectorError::RetriesExhausted {
                        engine: "stub".into(),
                        attempts: 4,
                        last: Box::new(ConnectorError::Network("reset".into())),
                    }),
                ],
            )
            .with("second", vec![batch(&["https://2"])]);
        let sink = MemorySink::default();
        let mut dork_search = search(connector, &sink, options());

        let run = dork_search
            .run(&DorkList::from_iter(["first", "second"]))
            .await
            .unwrap();
        assert_eq!(run.get("first").unwrap().count, 1);
        assert_eq!(run.get("second").unwrap().count, 1);
        assert_eq!(run.total_urls_found, 2);
    }

    #[tokio::test]
    async fn test_tls_failure_aborts_run() {
        let connector = StubConnector::default()
            .with("first", vec![Err(ConnectorError::Tls("unknown issuer".into()))])
            .with("second", vec![batch(&["https://2"])]);
        let sink = MemorySink::default();
        let mut dork_search = search(connector, &sink, options());

        let err = dork_search
            .run(&DorkList::from_iter(["first", "second"]))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Tls { ref dork, .. } if dork == "first"));
        assert!(err.to_string().contains("--disable-ssl-verification"));
        assert_eq!(dork_search.state(), RunState::Aborted);
        assert!(sink.runs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tls_failure_tolerated_when_verification_disabled() {
        let connector = StubConnector::default()
            .with("first", vec![Err(ConnectorError::Tls("unknown issuer".into()))])
            .with("second", vec![batch(&["https://2"])]);
        let sink = MemorySink::default();
        let mut run_options = options();
        run_options.verify_ssl = false;
        let mut dork_search = search(connector, &sink, run_options);

        let run = dork_search
            .run(&DorkList::from_iter(["first", "second"]))
            .await
            .unwrap();
        assert_eq!(run.get("first").unwrap().count, 0);
        assert_eq!(run.total_urls_found, 1);
    }

    #[tokio::test]
    async fn test_empty_dork_not_written_to_text() {
        let connector = StubConnector::default().with("nothing", vec![batch(&[])]);
        let sink = MemorySink::default();
        let mut dork_search = search(connector, &sink, options());

        let run = dork_search
            .run(&DorkList::from_iter(["nothing"]))
            .await
            .unwrap();
        assert!(sink.sections.lock().unwrap().is_empty());
        assert_eq!(run.get("nothing").unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_domain_scope_and_trimming() {
        let connector = StubConnector::default();
        let sink = MemorySink::default();
        let mut run_options = options();
        run_options.domain = Some("example.com".to_string());
        let connector = Arc::new(connector);
        let mut dork_search =
            DorkSearch::new(connector.clone(), Box::new(sink.clone()), run_options).unwrap();

        dork_search
            .run(&DorkList::from_iter(["  inurl:login  "]))
            .await
            .unwrap();
        assert_eq!(
            *connector.queries.lock().unwrap(),
            vec!["site:example.com inurl:login".to_string()]
        );
    }

    #[tokio::test]
    async fn test_shutdown_skips_json_summary() {
        let connector = StubConnector::default().with("first", vec![batch(&["https://1"])]);
        let sink = MemorySink::default();
        let mut dork_search = search(connector, &sink, options());

        let err = dork_search
            .run_until(&DorkList::from_iter(["first", "second"]), std::future::ready(()))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Cancelled));
        assert_eq!(dork_search.state(), RunState::AbortedByUser);
        assert!(sink.runs.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_only_between_dorks() {
        let mut run_options = options();
        run_options.min_delay = 10.0;
        run_options.max_delay = 20.0;

        let connector = StubConnector::default()
            .with("first", vec![batch(&["https://1"])])
            .with("second", vec![batch(&["https://2"])])
            .with("third", vec![batch(&["https://3"])]);
        let mut dork_search = search(connector, &MemorySink::default(), run_options);

        // a single dork never sleeps
        let start = tokio::time::Instant::now();
        dork_search.run(&DorkList::from_iter(["first"])).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        // two dorks sleep exactly once, for a pooled delay
        let start = tokio::time::Instant::now();
        dork_search
            .run(&DorkList::from_iter(["first", "second"]))
            .await
            .unwrap();
        let slept = start.elapsed().as_secs_f64();
        assert!(
            dork_search
                .delays
                .values()
                .iter()
                .any(|v| (slept - v).abs() < 0.01),
            "slept {}s, pool {:?}",
            slept,
            dork_search.delays.values()
        );

        // three dorks sleep twice
        let start = tokio::time::Instant::now();
        dork_search
            .run(&DorkList::from_iter(["first", "second", "third"]))
            .await
            .unwrap();
        let slept = start.elapsed().as_secs_f64();
        assert!((19.99..=40.01).contains(&slept), "slept {}s", slept);
    }

    #[test]
    fn test_inverted_delays_rejected_before_search() {
        let connector = Arc::new(StubConnector::default());
        let mut run_options = options();
        run_options.min_delay = 5.0;
        run_options.max_delay = 2.0;

        let result = DorkSearch::new(connector.clone(), Box::new(MemorySink::default()), run_options);
        assert!(matches!(result, Err(ConfigError::DelayBounds { .. })));
        assert!(connector.queries.lock().unwrap().is_empty());
    }
}
