//! Discover endpoints use case.
//!
//! This is the discovery engine: it expands every payload into a candidate
//! URL, probes the candidates through the [`ProbeExecutor`] port with a
//! bounded number of requests in flight, classifies the interesting
//! responses and returns them in payload order.

use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use apihawk_domain::{
    Classifier, DiscoveredEndpoint, DiscoveryReport, DiscoveryStats, DomainError, Headers,
    HttpMethod, ProbeOutcome, ProxyConfig, RequestBody, RequestSpec, ScanSettings, UrlTemplate,
};
use futures::StreamExt;
use rand::Rng;

use crate::ports::{
    CancellationReceiver, DiscoveryObserver, NoopObserver, PayloadSource, Payloads, ProbeExecutor,
};
use crate::DiscoveryResult;

/// Input for a discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoverEndpointsInput {
    /// URL template, optionally containing the `FUZZ` marker.
    pub target: String,
    /// HTTP method name; validated before the run starts.
    pub method: String,
    /// Header overrides sent with every probe.
    pub headers: Headers,
    /// Raw cookie string sent with every probe.
    pub cookie: Option<String>,
    /// Explicit body sent with every probe.
    pub body: Option<RequestBody>,
    /// Proxy every probe is routed through.
    pub proxy: Option<ProxyConfig>,
    /// Concurrency, pacing, timeouts and classification knobs.
    pub settings: ScanSettings,
}

/// Use case for discovering live endpoints behind a URL template.
///
/// # Example
///
/// ```ignore
/// let engine = DiscoverEndpoints::new(Arc::new(ReqwestProbeExecutor::new(&settings, &[])?));
/// let report = engine.execute(input, &FileWordlist::new("words.txt")).await?;
/// ```
pub struct DiscoverEndpoints<E: ProbeExecutor> {
    executor: Arc<E>,
    observer: Arc<dyn DiscoveryObserver>,
}

impl<E: ProbeExecutor> DiscoverEndpoints<E> {
    /// Creates the use case with the given executor and no observer.
    pub fn new(executor: Arc<E>) -> Self {
        Self {
            executor,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Attaches an observer notified as results come in.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DiscoveryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs discovery to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only for pre-flight failures: an invalid target, an
    /// unsupported method, invalid settings or an unreadable wordlist. No
    /// request has been sent when an error is returned.
    pub async fn execute<S>(
        &self,
        input: DiscoverEndpointsInput,
        source: &S,
    ) -> DiscoveryResult<DiscoveryReport>
    where
        S: PayloadSource + ?Sized,
    {
        self.execute_with_cancellation(input, source, CancellationReceiver::never())
            .await
    }

    /// Runs discovery until done or until `cancel` fires.
    ///
    /// On cancellation (or when the configured run deadline passes),
    /// in-flight requests are dropped and the report holds every request
    /// that had completed, including those still in their courtesy pause,
    /// with [`DiscoveryReport::cancelled`] set.
    ///
    /// # Errors
    ///
    /// Same as [`DiscoverEndpoints::execute`].
    pub async fn execute_with_cancellation<S>(
        &self,
        input: DiscoverEndpointsInput,
        source: &S,
        cancel: CancellationReceiver,
    ) -> DiscoveryResult<DiscoveryReport>
    where
        S: PayloadSource + ?Sized,
    {
        let plan = DiscoveryPlan::prepare(input)?;
        let payloads = source.payloads()?;
        Ok(self.run(plan, payloads, cancel).await)
    }

    async fn run(
        &self,
        plan: DiscoveryPlan,
        payloads: Payloads<'_>,
        mut cancel: CancellationReceiver,
    ) -> DiscoveryReport {
        let DiscoveryPlan {
            template,
            base,
            classifier,
            pacing,
            concurrency,
            deadline,
        } = plan;
        let executor = self.executor.as_ref();
        let (template, base) = (&template, &base);

        // Workers hand their step over before the courtesy pause, so a
        // result is never lost to a stop that lands while its slot rests.
        let (sender, mut steps) = tokio::sync::mpsc::unbounded_channel();
        let workers = payloads
            .enumerate()
            .map(move |(index, payload)| {
                let sender = sender.clone();
                async move {
                    let url = match template.expand(&payload) {
                        Ok(url) => url,
                        Err(error) => {
                            let _ = sender.send(Step::Invalid { payload, error });
                            return;
                        }
                    };
                    let outcome = executor.execute(&base.with_url(url.as_str())).await;
                    let _ = sender.send(Step::Probed {
                        index,
                        url,
                        outcome,
                    });
                    let pause = pacing.next_pause();
                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }
            })
            .buffer_unordered(concurrency);
        let mut workers = pin!(workers);
        let mut deadline = pin!(async move {
            match deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        });

        let mut report = DiscoveryReport::new(template.as_str());
        let mut found = Vec::new();
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                () = &mut deadline => {
                    report.cancelled = true;
                    break;
                }
                Some(step) = steps.recv() => {
                    self.record(step, &classifier, &mut report.stats, &mut found);
                }
                next = workers.next() => {
                    if next.is_none() {
                        break;
                    }
                }
            }
        }
        // Requests that completed but were not yet recorded still count.
        while let Ok(step) = steps.try_recv() {
            self.record(step, &classifier, &mut report.stats, &mut found);
        }

        if report.cancelled {
            self.observer.on_cancelled(report.stats.probed);
        }
        // Completion order is arbitrary; the report follows payload order.
        found.sort_by_key(|(index, _)| *index);
        report.endpoints = found.into_iter().map(|(_, endpoint)| endpoint).collect();
        report
    }

    fn record(
        &self,
        step: Step,
        classifier: &Classifier,
        stats: &mut DiscoveryStats,
        found: &mut Vec<(usize, DiscoveredEndpoint)>,
    ) {
        let (index, url, outcome) = match step {
            Step::Invalid { payload, error } => {
                stats.invalid_urls += 1;
                self.observer.on_invalid_url(&payload, &error);
                return;
            }
            Step::Probed {
                index,
                url,
                outcome,
            } => (index, url, outcome),
        };

        stats.probed += 1;
        match outcome {
            ProbeOutcome::Failure(failure) => {
                stats.failures += 1;
                self.observer.on_failure(&url, &failure);
            }
            ProbeOutcome::Success(response) if !response.is_interesting() => {
                stats.discarded += 1;
                self.observer.on_discarded(&url, response.status);
            }
            ProbeOutcome::Success(response) => {
                let endpoint = DiscoveredEndpoint {
                    api_type: classifier.classify_url(&url, &response),
                    status_code: response.status,
                    content_length: response.content_length(),
                    url,
                };
                self.observer.on_finding(&endpoint);
                found.push((index, endpoint));
            }
        }
    }
}

/// What happened to one payload.
enum Step {
    Invalid {
        payload: String,
        error: DomainError,
    },
    Probed {
        index: usize,
        url: String,
        outcome: ProbeOutcome,
    },
}

/// Validated, ready-to-run form of [`DiscoverEndpointsInput`].
struct DiscoveryPlan {
    template: UrlTemplate,
    base: RequestSpec,
    classifier: Classifier,
    pacing: Pacing,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl DiscoveryPlan {
    fn prepare(input: DiscoverEndpointsInput) -> DiscoveryResult<Self> {
        let template = UrlTemplate::parse(input.target)?;
        let method: HttpMethod = input.method.parse()?;
        let settings = input.settings;
        settings.validate()?;

        let mut base = RequestSpec::new(method, template.as_str())
            .with_headers(input.headers)
            .with_timeout(settings.timeout());
        if let Some(cookie) = input.cookie {
            base = base.with_cookie(cookie);
        }
        if let Some(body) = input.body {
            base = base.with_body(body);
        }
        if let Some(proxy) = input.proxy {
            proxy.validate().map_err(|e| DomainError::InvalidSetting {
                name: "proxy",
                reason: e.to_string(),
            })?;
            base = base.with_proxy(proxy);
        }

        Ok(Self {
            template,
            base,
            classifier: Classifier::new(settings.rest_policy),
            pacing: Pacing {
                delay: settings.delay(),
                jitter: settings.jitter(),
            },
            concurrency: settings.concurrency,
            deadline: settings.max_duration(),
        })
    }
}

/// Courtesy pause taken after each completed request.
#[derive(Debug, Clone, Copy)]
struct Pacing {
    delay: Duration,
    jitter: Duration,
}

impl Pacing {
    fn next_pause(self) -> Duration {
        if self.jitter.is_zero() {
            return self.delay;
        }
        let max_jitter = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        self.delay + Duration::from_millis(rand::rng().random_range(0..=max_jitter))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use apihawk_domain::{ApiType, ProbeFailure, ProbeResponse};
    use pretty_assertions::assert_eq;

    use crate::ports::InlinePayloads;
    use crate::DiscoveryError;

    /// Answers by URL suffix; everything else is a 404.
    struct RoutedExecutor {
        routes: Vec<(&'static str, ProbeOutcome)>,
        seen: Mutex<Vec<RequestSpec>>,
    }

    impl RoutedExecutor {
        fn new(routes: Vec<(&'static str, ProbeOutcome)>) -> Self {
            Self {
                routes,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<RequestSpec> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ProbeExecutor for RoutedExecutor {
        async fn execute(&self, request: &RequestSpec) -> ProbeOutcome {
            self.seen.lock().unwrap().push(request.clone());
            self.routes
                .iter()
                .find(|(suffix, _)| request.url().ends_with(suffix))
                .map_or_else(
                    || ProbeResponse::new(404, Headers::new(), Vec::new()).into(),
                    |(_, outcome)| outcome.clone(),
                )
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl DiscoveryObserver for RecordingObserver {
        fn on_finding(&self, endpoint: &DiscoveredEndpoint) {
            self.events
                .lock()
                .unwrap()
                .push(format!("found {} {}", endpoint.url, endpoint.api_type));
        }

        fn on_invalid_url(&self, payload: &str, _error: &DomainError) {
            self.events.lock().unwrap().push(format!("invalid {payload}"));
        }

        fn on_failure(&self, url: &str, failure: &ProbeFailure) {
            self.events
                .lock()
                .unwrap()
                .push(format!("failed {url} {}", failure.reason));
        }

        fn on_discarded(&self, url: &str, status: u16) {
            self.events
                .lock()
                .unwrap()
                .push(format!("discarded {url} {status}"));
        }
    }

    fn json(status: u16, body: &str) -> ProbeOutcome {
        ProbeResponse::new(
            status,
            Headers::new().with("Content-Type", "application/json"),
            body.as_bytes().to_vec(),
        )
        .into()
    }

    fn input(target: &str, method: &str) -> DiscoverEndpointsInput {
        DiscoverEndpointsInput {
            target: target.to_string(),
            method: method.to_string(),
            settings: ScanSettings {
                delay_ms: 0,
                ..ScanSettings::default()
            },
            ..DiscoverEndpointsInput::default()
        }
    }

    #[tokio::test]
    async fn test_interesting_statuses_are_reported_in_order() {
        let executor = Arc::new(RoutedExecutor::new(vec![
            ("/users", json(200, "[]")),
            ("/admin", json(403, r#"{"error":"forbidden"}"#)),
            ("/login", json(400, r#"{"errors":[{"message":"bad"}]}"#)),
            ("/down", ProbeFailure::network("connection refused").into()),
        ]));
        let engine = DiscoverEndpoints::new(Arc::clone(&executor));
        let source = InlinePayloads::new(["users", "missing", "admin", "down", "login"]);

        let report = engine.execute(input("http://x/FUZZ", "GET"), &source).await.unwrap();

        let summary: Vec<_> = report
            .endpoints
            .iter()
            .map(|e| (e.url.as_str(), e.api_type, e.status_code))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("http://x/users", ApiType::Rest, 200),
                ("http://x/admin", ApiType::Rest, 403),
                ("http://x/login", ApiType::GraphQl, 400),
            ]
        );
        assert_eq!(
            report.stats,
            DiscoveryStats {
                probed: 5,
                invalid_urls: 0,
                failures: 1,
                discarded: 1,
            }
        );
        assert!(!report.cancelled);
        assert_eq!(executor.seen().len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_type_is_still_reported() {
        let executor = Arc::new(RoutedExecutor::new(vec![(
            "/",
            ProbeResponse::new(200, Headers::new().with("Content-Type", "text/html"), b"<html/>".to_vec())
                .into(),
        )]));
        let engine = DiscoverEndpoints::new(executor);
        let source = InlinePayloads::new(["index/"]);

        let report = engine.execute(input("http://x/FUZZ", "GET"), &source).await.unwrap();

        assert_eq!(report.endpoints.len(), 1);
        assert_eq!(report.endpoints[0].api_type, ApiType::Unknown);
        assert_eq!(report.endpoints[0].content_length, 7);
    }

    #[tokio::test]
    async fn test_invalid_substitution_is_skipped() {
        let executor = Arc::new(RoutedExecutor::new(vec![("/", json(200, "{}"))]));
        let observer = Arc::new(RecordingObserver::default());
        let engine = DiscoverEndpoints::new(Arc::clone(&executor))
            .with_observer(Arc::clone(&observer) as Arc<dyn DiscoveryObserver>);
        let source = InlinePayloads::new(["api", "[bad", "www"]);

        let report = engine.execute(input("http://FUZZ/", "GET"), &source).await.unwrap();

        let urls: Vec<_> = report.endpoints.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["http://api/", "http://www/"]);
        assert_eq!(report.stats.invalid_urls, 1);
        assert_eq!(executor.seen().len(), 2);
        assert!(observer.events.lock().unwrap().contains(&"invalid [bad".to_string()));
    }

    #[tokio::test]
    async fn test_observer_sees_failures_and_discards() {
        let executor = Arc::new(RoutedExecutor::new(vec![(
            "/slow",
            ProbeFailure::timeout(Duration::from_secs(5)).into(),
        )]));
        let observer = Arc::new(RecordingObserver::default());
        let engine = DiscoverEndpoints::new(executor)
            .with_observer(Arc::clone(&observer) as Arc<dyn DiscoveryObserver>);
        let mut request = input("http://x/FUZZ", "GET");
        request.settings.concurrency = 1;

        let report = engine
            .execute(request, &InlinePayloads::new(["slow", "gone"]))
            .await
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(
            *observer.events.lock().unwrap(),
            vec![
                "failed http://x/slow timeout".to_string(),
                "discarded http://x/gone 404".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_preflight_errors() {
        let executor = Arc::new(RoutedExecutor::new(Vec::new()));
        let engine = DiscoverEndpoints::new(Arc::clone(&executor));
        let source = InlinePayloads::new(["users"]);

        let result = engine.execute(input("not a url", "GET"), &source).await;
        assert!(matches!(result, Err(DiscoveryError::InvalidTarget(_))));

        let result = engine.execute(input("http://x/FUZZ", "TRACE"), &source).await;
        assert!(matches!(result, Err(DiscoveryError::UnsupportedMethod(m)) if m == "TRACE"));

        let mut zero = input("http://x/FUZZ", "GET");
        zero.settings.concurrency = 0;
        let result = engine.execute(zero, &source).await;
        assert!(matches!(result, Err(DiscoveryError::Domain(_))));

        let mut bad_proxy = input("http://x/FUZZ", "GET");
        bad_proxy.proxy = Some(ProxyConfig::with_url("ftp://proxy"));
        let result = engine.execute(bad_proxy, &source).await;
        assert!(matches!(result, Err(DiscoveryError::Domain(_))));

        assert!(executor.seen().is_empty());
    }

    #[tokio::test]
    async fn test_request_options_reach_the_executor() {
        let executor = Arc::new(RoutedExecutor::new(Vec::new()));
        let engine = DiscoverEndpoints::new(Arc::clone(&executor));
        let mut request = input("https://api.example.com", "post");
        request.headers = Headers::new().with("X-Api-Key", "k");
        request.cookie = Some("session=1".to_string());
        request.settings.timeout_secs = 9;

        engine
            .execute(request, &InlinePayloads::new(["graphql"]))
            .await
            .unwrap();

        let seen = executor.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url(), "https://api.example.com/graphql");
        assert_eq!(seen[0].method(), HttpMethod::Post);
        assert_eq!(seen[0].timeout(), Duration::from_secs(9));
        assert_eq!(seen[0].effective_headers().get("cookie"), Some("session=1"));
        assert_eq!(seen[0].headers().get("x-api-key"), Some("k"));
        assert!(seen[0].effective_body().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_returns_partial_report() {
        struct Stalling;

        impl ProbeExecutor for Stalling {
            async fn execute(&self, request: &RequestSpec) -> ProbeOutcome {
                if request.url().ends_with("/fast") {
                    return json(200, "[]");
                }
                std::future::pending().await
            }
        }

        let engine = DiscoverEndpoints::new(Arc::new(Stalling));
        let mut request = input("http://x/FUZZ", "GET");
        request.settings.max_duration_secs = Some(30);

        let report = engine
            .execute(request, &InlinePayloads::new(["fast", "stuck", "stuck-too"]))
            .await
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.endpoints.len(), 1);
        assert_eq!(report.endpoints[0].url, "http://x/fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_during_pause_keeps_completed_request() {
        let executor = Arc::new(RoutedExecutor::new(vec![("/users", json(200, "[]"))]));
        let engine = DiscoverEndpoints::new(executor);
        let mut request = input("http://x/FUZZ", "GET");
        request.settings.delay_ms = 5_000;
        request.settings.max_duration_secs = Some(1);

        let report = engine
            .execute(request, &InlinePayloads::new(["users"]))
            .await
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.stats.probed, 1);
        assert_eq!(report.endpoints.len(), 1);
        assert_eq!(report.endpoints[0].url, "http://x/users");
    }

    #[test]
    fn test_pacing_without_jitter_is_fixed() {
        let pacing = Pacing {
            delay: Duration::from_millis(250),
            jitter: Duration::ZERO,
        };
        assert_eq!(pacing.next_pause(), Duration::from_millis(250));
    }

    #[test]
    fn test_pacing_jitter_stays_in_bounds() {
        let pacing = Pacing {
            delay: Duration::from_millis(100),
            jitter: Duration::from_millis(50),
        };
        for _ in 0..100 {
            let pause = pacing.next_pause();
            assert!(pause >= Duration::from_millis(100));
            assert!(pause <= Duration::from_millis(150));
        }
    }
}
