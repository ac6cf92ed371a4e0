//! 403 rejection response.
//!
//! The body is an HTML page listing every required header with its status
//! and an example `curl` invocation. Markup is presentational; the status
//! code and the `X-Custom-Headers-Required` header are the contract.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::gate::required::{MissingHeaders, RequiredHeaders};

/// Lists every required header name on a 403.
pub const X_CUSTOM_HEADERS_REQUIRED: &str = "x-custom-headers-required";

/// Rejection responses must not be cached: the decision depends on per-request headers.
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Build the 403 response for a request missing required headers.
pub fn rejection_response(required: &RequiredHeaders, missing: &MissingHeaders, host: &str) -> Response {
    let page = render_page(required, missing, host);

    let mut response = (StatusCode::FORBIDDEN, Body::from(page)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html;charset=UTF-8"),
    );
    headers.insert(X_CUSTOM_HEADERS_REQUIRED, required.joined().clone());
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    response
}

/// Host to show in the example command.
pub fn display_host(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| "localhost".to_string())
}

fn render_page(required: &RequiredHeaders, missing: &MissingHeaders, host: &str) -> String {
    let count = missing.names().len();
    let noun = if count == 1 { "header" } else { "headers" };

    let rows: String = required
        .names()
        .iter()
        .map(|name| {
            let status = if missing.contains(name) {
                r#"<span class="missing">Missing</span>"#
            } else {
                r#"<span class="present">Present</span>"#
            };
            format!(
                "        <li><code>{}</code> {}</li>\n",
                escape_html(name.as_str()),
                status
            )
        })
        .collect();

    let example: String = required
        .names()
        .iter()
        .map(|name| format!(" \\\n  -H \"{}: your-value\"", escape_html(name.as_str())))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>403 Forbidden - Custom Headers Required</title>
    <style>
        body {{ font-family: system-ui, sans-serif; background: #fef2f2; color: #1f2937; padding: 40px; }}
        main {{ max-width: 600px; margin: 0 auto; background: #fff; border-radius: 12px; padding: 32px; }}
        .code {{ color: #dc2626; font-size: 48px; font-weight: 800; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid #fecaca; }}
        .missing {{ color: #dc2626; font-weight: 600; }}
        .present {{ color: #16a34a; }}
        pre {{ background: #1f2937; color: #f3f4f6; padding: 16px; border-radius: 8px; overflow-x: auto; }}
    </style>
</head>
<body>
    <main>
        <div class="code">403</div>
        <h1>Access Denied</h1>
        <p>This page requires specific HTTP headers. Your request is missing <strong>{count}</strong> required {noun}.</p>
        <h2>Required Headers</h2>
        <ul>
{rows}        </ul>
        <p>Example request with the required headers:</p>
        <pre>curl https://{host}{example}</pre>
    </main>
</body>
</html>
"#,
        count = count,
        noun = noun,
        rows = rows,
        host = escape_html(host),
        example = example,
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
