//! Shared utilities for integration and load testing.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use futures_util::{stream, StreamExt};
use gatekeeper_proxy::config::GatekeeperConfig;
use gatekeeper_proxy::http::HttpServer;
use gatekeeper_proxy::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Notify};

/// A request as the stub upstream saw it.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Call-counting upstream that records every request it receives.
///
/// - `/redirect` answers 302 to `/landing`
/// - `/loop` answers 302 to itself
/// - `/slow` waits three seconds before answering
/// - `/teapot` answers 418
/// - `/stream` sends one chunk, then holds the body open until released
/// - anything else echoes the request body, or `METHOD path?query` when empty
///
/// Request body frames are reported one by one as they arrive.
#[derive(Clone)]
pub struct StubUpstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    release: Arc<Notify>,
    frames_tx: mpsc::UnboundedSender<Bytes>,
    frames_rx: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Bytes>>>,
}

#[allow(dead_code)]
impl StubUpstream {
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    /// Let `/stream` finish its body.
    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Next request body frame received, in arrival order.
    pub async fn next_frame(&self) -> Option<Bytes> {
        self.frames_rx.lock().await.recv().await
    }
}

/// Start the stub upstream on an ephemeral port.
pub async fn start_stub_upstream() -> StubUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let stub = StubUpstream {
        addr: listener.local_addr().unwrap(),
        calls: Arc::new(AtomicUsize::new(0)),
        recorded: Arc::new(Mutex::new(Vec::new())),
        release: Arc::new(Notify::new()),
        frames_tx,
        frames_rx: Arc::new(tokio::sync::Mutex::new(frames_rx)),
    };

    let app = Router::new().fallback(stub_handler).with_state(stub.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    stub
}

async fn stub_handler(State(stub): State<StubUpstream>, request: Request<Body>) -> Response {
    stub.calls.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = request.into_parts();
    let mut frames = body.into_data_stream();
    let mut body = Vec::new();
    while let Some(Ok(frame)) = frames.next().await {
        let _ = stub.frames_tx.send(frame.clone());
        body.extend_from_slice(&frame);
    }
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_default();

    stub.recorded.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path_and_query: path_and_query.clone(),
        headers: parts.headers.clone(),
        body: body.clone(),
    });

    match parts.uri.path() {
        "/redirect" => (StatusCode::FOUND, [(header::LOCATION, "/landing")]).into_response(),
        "/loop" => (StatusCode::FOUND, [(header::LOCATION, "/loop")]).into_response(),
        "/stream" => {
            let release = stub.release.clone();
            let first = stream::once(async { Ok::<_, Infallible>(Bytes::from_static(b"first chunk\n")) });
            let rest = stream::once(async move {
                release.notified().await;
                Ok(Bytes::from_static(b"rest of body\n"))
            });
            Body::from_stream(first.chain(rest)).into_response()
        }
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "slow".into_response()
        }
        "/teapot" => (
            StatusCode::IM_A_TEAPOT,
            [("x-stub", "teapot")],
            "short and stout",
        )
            .into_response(),
        _ if !body.is_empty() => (StatusCode::OK, body).into_response(),
        _ => format!("{} {}", parts.method, path_and_query).into_response(),
    }
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn dead_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Config pointing at `origin`, with defaults everywhere else.
pub fn config_for(origin: &str) -> GatekeeperConfig {
    let mut config = GatekeeperConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.origin = origin.into();
    config
}

/// Start the gatekeeper on an ephemeral port.
///
/// Keep the returned `Shutdown` alive for the duration of the test.
pub async fn start_gatekeeper(config: GatekeeperConfig) -> (String, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{}", addr), shutdown)
}

/// HTTP client that never goes through an environment proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Request builder carrying all three default required headers.
#[allow(dead_code)]
pub fn signed(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    builder
        .header("Signature-Input", "sig1=(\"@method\" \"@path\");created=1700000000")
        .header("Signature", "sig1=:dGVzdA==:")
        .header("Signature-Agent", "\"https://agent.example\"")
}

/// Send a raw HTTP/1.1 GET with the default required headers, returning the
/// whole response text. The request target is written exactly as given.
#[allow(dead_code)]
pub async fn send_raw(gate: &str, request_target: &str) -> String {
    let addr = gate.trim_start_matches("http://");
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {request_target} HTTP/1.1\r\n\
         Host: {addr}\r\n\
         Signature-Input: sig1=()\r\n\
         Signature: sig1=:dGVzdA==:\r\n\
         Signature-Agent: agent\r\n\
         Connection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}
