//! Failure injection tests for the upstream path.

use std::time::{Duration, Instant};

use reqwest::StatusCode;

mod common;

use common::{client, config_for, dead_origin, signed, start_gatekeeper, start_stub_upstream};

#[tokio::test]
async fn connection_refused_yields_bad_gateway() {
    let origin = dead_origin().await;
    let (gate, _shutdown) = start_gatekeeper(config_for(&origin)).await;

    let res = signed(client().get(format!("{gate}/anything")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.headers()["content-type"], "text/plain;charset=UTF-8");
    assert!(res.headers().get("x-custom-headers-validated").is_none());

    let body = res.text().await.unwrap();
    assert!(
        body.starts_with("Error proxying to upstream origin: "),
        "unexpected body: {body}"
    );
    assert!(body.len() > "Error proxying to upstream origin: ".len());
}

#[tokio::test]
async fn dead_upstream_does_not_affect_rejections() {
    let origin = dead_origin().await;
    let (gate, _shutdown) = start_gatekeeper(config_for(&origin)).await;

    let res = client().get(format!("{gate}/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn slow_upstream_times_out_with_bad_gateway() {
    let stub = start_stub_upstream().await;
    let mut config = config_for(&stub.origin());
    config.upstream.timeout_secs = 1;
    let (gate, _shutdown) = start_gatekeeper(config).await;

    let start = Instant::now();
    let res = signed(client().get(format!("{gate}/slow")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(start.elapsed() < Duration::from_secs(3));
    let body = res.text().await.unwrap();
    assert!(body.contains("upstream did not respond within 1s"), "unexpected body: {body}");
}

#[tokio::test]
async fn failures_are_not_retried() {
    let stub = start_stub_upstream().await;
    let mut config = config_for(&stub.origin());
    config.upstream.timeout_secs = 1;
    let (gate, _shutdown) = start_gatekeeper(config).await;

    let res = signed(client().get(format!("{gate}/slow")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn redirect_loop_yields_bad_gateway() {
    let stub = start_stub_upstream().await;
    let mut config = config_for(&stub.origin());
    config.upstream.max_redirects = 2;
    let (gate, _shutdown) = start_gatekeeper(config).await;

    let res = signed(client().get(format!("{gate}/loop")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = res.text().await.unwrap();
    assert!(body.contains("upstream redirected more than 2 times"), "unexpected body: {body}");
    assert_eq!(stub.calls(), 3);
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let stub = start_stub_upstream().await;
    let (gate, shutdown) = start_gatekeeper(config_for(&stub.origin())).await;

    let res = signed(client().get(format!("{gate}/"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let fresh = reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    assert!(fresh.get(format!("{gate}/")).send().await.is_err());
}
