//! Forwarding client for the upstream origin.
//!
//! # Responsibilities
//! - Own the shared, pooled hyper client (plain HTTP and rustls HTTPS)
//! - Rebuild an inbound request against the origin without touching its
//!   path or query
//! - Stream the request body upstream
//! - Follow redirects and enforce connect and response-head deadlines

use std::time::Duration;

use axum::{
    body::{Body, HttpBody},
    http::{header, HeaderMap, Method, Request, Response, Uri},
};
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{ForwardingConfig, UpstreamConfig};
use crate::error::UpstreamError;
use crate::resilience::with_timeout;
use crate::upstream::headers::forward_request_headers;
use crate::upstream::origin::Origin;
use crate::upstream::redirect::{next_headers, next_hop, resolve_location, NextHop};

/// Client that forwards validated requests to the fixed origin.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    origin: Origin,
    timeout: Duration,
    max_redirects: usize,
    strip_hop_by_hop: bool,
}

impl UpstreamClient {
    pub fn new(upstream: &UpstreamConfig, forwarding: &ForwardingConfig) -> Result<Self, UpstreamError> {
        let origin = Origin::parse(&upstream.origin)?;

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(Duration::from_secs(upstream.connect_timeout_secs)));

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            client,
            origin,
            timeout: Duration::from_secs(upstream.timeout_secs),
            max_redirects: upstream.max_redirects,
            strip_hop_by_hop: forwarding.strip_hop_by_hop,
        })
    }

    /// Send `request` to the origin with the same method, headers and body.
    ///
    /// Resolves once the final response head arrives; the body is left for
    /// the caller to stream.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Incoming>, UpstreamError> {
        let (parts, body) = request.into_parts();
        let uri = self.origin.target(&parts.uri)?;
        let headers = forward_request_headers(&parts.headers, self.strip_hop_by_hop);

        tracing::debug!(
            method = %parts.method,
            uri = %uri,
            "Forwarding to upstream"
        );

        with_timeout(self.timeout, self.send(parts.method, uri, headers, body)).await
    }

    async fn send(
        &self,
        mut method: Method,
        mut uri: Uri,
        mut headers: HeaderMap,
        body: Body,
    ) -> Result<Response<Incoming>, UpstreamError> {
        let replayable = body.size_hint().exact() == Some(0);
        let mut body = Some(body);
        let mut redirects = 0;

        loop {
            let mut request = Request::new(body.take().unwrap_or_else(Body::empty));
            *request.method_mut() = method.clone();
            *request.uri_mut() = uri.clone();
            *request.headers_mut() = headers.clone();

            let response = self.client.request(request).await?;

            if self.max_redirects == 0 {
                return Ok(response);
            }
            let Some(location) = response.headers().get(header::LOCATION) else {
                return Ok(response);
            };
            let Some(hop) = next_hop(response.status(), &method, replayable) else {
                return Ok(response);
            };
            if redirects == self.max_redirects {
                return Err(UpstreamError::TooManyRedirects(self.max_redirects));
            }

            let next = resolve_location(&uri, location)?;
            tracing::debug!(
                status = %response.status(),
                location = %next,
                "Following upstream redirect"
            );

            headers = next_headers(&headers, hop, &uri, &next);
            if hop == NextHop::SwitchToGet {
                method = Method::GET;
            }
            uri = next;
            redirects += 1;
        }
    }
}
