//! End-to-end enumeration tests against local mock sources.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use subenum::config::{EnumeratorConfig, ProxyConfig};
use subenum::enumeration::Enumerator;
use subenum::error::{EnumerationError, FetchError, SourceErrorKind};
use subenum::http::TransportSettings;
use subenum::proxy_pool::ProxyEndpoint;
use subenum::resilience::RetryPolicy;
use subenum::sources::{ParseStrategy, SourceDescriptor, SourceRegistry};

mod common;

const CRT_BODY: &str = r#"[{"common_name":"a.example.com"},{"common_name":"b.example.com"},{"common_name":"a.example.com"}]"#;

fn local_source(name: &str, addr: SocketAddr, attempts: u32) -> SourceDescriptor {
    SourceDescriptor::get(
        name,
        format!("http://{}/?q=%25.{{domain}}&output=json", addr),
        ParseStrategy::CrtSh,
    )
    .with_retry(RetryPolicy::new(attempts, Duration::ZERO, Duration::ZERO))
    .with_min_interval(Duration::ZERO)
    .with_timeout(Duration::from_secs(5))
}

fn enumerator(sources: Vec<SourceDescriptor>, proxies: Vec<ProxyEndpoint>) -> Enumerator {
    Enumerator::with_http(SourceRegistry::new(sources), proxies, TransportSettings::default()).unwrap()
}

#[tokio::test]
async fn test_crtsh_response_is_deduplicated() {
    let addr = common::start_mock_backend(CRT_BODY).await;

    let result = enumerator(vec![local_source("crtsh", addr, 1)], Vec::new())
        .enumerate("example.com")
        .await
        .unwrap();

    assert_eq!(result.domain, "example.com");
    assert_eq!(result.subdomains, vec!["a.example.com", "b.example.com"]);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_one_failing_source_one_succeeding() {
    let good = common::start_mock_backend(CRT_BODY).await;
    let (bad, accepted) = common::start_dropping_backend().await;

    let result = enumerator(
        vec![local_source("good", good, 3), local_source("bad", bad, 3)],
        Vec::new(),
    )
    .enumerate("example.com")
    .await
    .unwrap();

    assert_eq!(result.subdomains, vec!["a.example.com", "b.example.com"]);
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
    assert_eq!(result.errors[0].source_name, "bad");
    assert!(matches!(
        result.errors[0].kind,
        SourceErrorKind::Fetch(FetchError::RetriesExhausted { attempts: 3, .. })
    ));
    assert!(accepted.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_request_timeout_is_retried_then_reported() {
    let slow = common::start_hanging_backend().await;
    let source = local_source("slow", slow, 2).with_timeout(Duration::from_millis(100));

    let result = enumerator(vec![source], Vec::new())
        .with_deadline(Duration::from_secs(10))
        .enumerate("example.com")
        .await
        .unwrap();

    assert!(result.subdomains.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(
        result.errors[0].kind,
        SourceErrorKind::Fetch(FetchError::RetriesExhausted { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn test_deadline_returns_promptly() {
    let good = common::start_mock_backend(CRT_BODY).await;
    let slow = common::start_hanging_backend().await;
    let hanging = local_source("slow", slow, 1).with_timeout(Duration::from_secs(60));

    let started = Instant::now();
    let err = enumerator(vec![local_source("good", good, 1), hanging], Vec::new())
        .with_deadline(Duration::from_millis(300))
        .enumerate("example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, EnumerationError::DeadlineExceeded(_)));
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
}

#[tokio::test]
async fn test_non_success_status_goes_to_parser_without_retry() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (503, "[]".to_string())
        }
    })
    .await;

    let result = enumerator(vec![local_source("busy", addr, 3)], Vec::new())
        .enumerate("example.com")
        .await
        .unwrap();

    assert!(result.subdomains.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_requests_rotate_through_proxies_with_credentials() {
    let (proxy_a, seen_a) = common::start_recording_backend(CRT_BODY).await;
    let (proxy_b, seen_b) = common::start_recording_backend(r#"[{"common_name":"c.example.com"}]"#).await;

    let unreachable: SocketAddr = "10.255.255.1:80".parse().unwrap();
    let proxies = vec![
        ProxyEndpoint::new(format!("http://{}", proxy_a), "http").with_auth("user", "pass"),
        ProxyEndpoint::new(format!("http://{}", proxy_b), "http"),
    ];

    let result = enumerator(
        vec![local_source("one", unreachable, 1), local_source("two", unreachable, 1)],
        proxies,
    )
    .enumerate("example.com")
    .await
    .unwrap();

    assert_eq!(result.subdomains, vec!["a.example.com", "b.example.com", "c.example.com"]);

    let seen_a = seen_a.lock().unwrap().clone();
    let seen_b = seen_b.lock().unwrap().clone();
    assert_eq!(seen_a.len(), 1);
    assert_eq!(seen_b.len(), 1);

    // "user:pass" in base64
    assert!(seen_a[0].to_ascii_lowercase().contains("proxy-authorization: basic dxnlcjpwyxnz"));
    assert!(!seen_b[0].to_ascii_lowercase().contains("proxy-authorization"));
    assert!(seen_a[0].starts_with("GET http://10.255.255.1"));
}

#[tokio::test]
async fn test_proxy_url_credentials_are_sent_as_auth() {
    let (proxy, seen) = common::start_recording_backend(CRT_BODY).await;

    let mut config = EnumeratorConfig::default();
    config.proxies.push(ProxyConfig::from_url(&format!("http://user:pass@{}", proxy)));
    let endpoints = config.proxy_endpoints();

    assert!(endpoints[0].auth.is_some());
    assert!(!endpoints[0].url.contains("pass"));

    let unreachable: SocketAddr = "10.255.255.1:80".parse().unwrap();
    let result = enumerator(vec![local_source("one", unreachable, 1)], endpoints)
        .enumerate("example.com")
        .await
        .unwrap();

    assert_eq!(result.subdomains, vec!["a.example.com", "b.example.com"]);
    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].to_ascii_lowercase().contains("proxy-authorization: basic dxnlcjpwyxnz"));
}

#[tokio::test]
async fn test_free_function_with_builtin_shape() {
    let addr = common::start_mock_backend("a.example.com,1.1.1.1\nb.example.com,2.2.2.2\n").await;
    let source = SourceDescriptor::get(
        "hackertarget",
        format!("http://{}/hostsearch/?q={{domain}}", addr),
        ParseStrategy::HackerTarget,
    )
    .with_retry(RetryPolicy::new(1, Duration::ZERO, Duration::ZERO));

    let result = subenum::enumerate("Example.com", SourceRegistry::new(vec![source]), Vec::new())
        .await
        .unwrap();

    assert_eq!(result.subdomains, vec!["a.example.com", "b.example.com"]);
}
