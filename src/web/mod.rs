//! Embedded web server for the portfolio page.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The rendered portfolio page
//! - Every other site file under the source root (images, demos, descriptors)
//! - JSON API endpoints for cards, filtering and the detail panel
//!
//! Launched via `vitrine serve` (default: `http://127.0.0.1:8000`).

mod api;
pub(crate) mod frontend;

use std::io::{Cursor, Read};
use std::time::Instant;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::portfolio::Portfolio;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the server on `addr`.
///
/// Blocks the current thread. Requests are handled sequentially against the
/// single [`Portfolio`]; errors are reported per request without stopping the
/// server.
pub fn serve(mut portfolio: Portfolio, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    prepare(&mut portfolio);

    println!("vitrine running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let url = format!("http://{addr}");
        if let Err(e) = open_browser(&url) {
            tracing::debug!(error = %e, "could not open browser");
        }
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        portfolio.tick(Instant::now());
        let reply = match read_body(&method, request.as_reader()) {
            Err(reply) => reply,
            Ok(body) => match dispatch(&mut portfolio, &method, &url, body.as_deref()) {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(method = %method, url = %url, error = %e, "request failed");
                    Reply::json_error(500, &format!("{e:#}"))
                }
            },
        };

        tracing::info!(
            method = %method,
            url = %url,
            status = reply.status,
            at = %chrono::Local::now().format("%H:%M:%S"),
            "request"
        );

        if let Err(e) = request.respond(reply.into_response()) {
            tracing::warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

/// Put a portfolio in its served state and do the first load.
///
/// The page is reached over HTTP from here on, so manifest failures get the
/// served-page guidance even when the files come from a directory.
fn prepare(portfolio: &mut Portfolio) {
    portfolio.set_served();
    portfolio.load_cards();
}

/// Read the body of a request that carries one.
///
/// A body that cannot be read (or is not UTF-8) is answered with a 400
/// naming the read error.
fn read_body(method: &Method, reader: &mut dyn Read) -> Result<Option<String>, Reply> {
    if !matches!(method, Method::Put | Method::Post | Method::Patch) {
        return Ok(None);
    }

    let mut buf = String::new();
    match reader.read_to_string(&mut buf) {
        Ok(_) => Ok(Some(buf)),
        Err(e) => {
            tracing::debug!(error = %e, "could not read request body");
            Err(Reply::json_error(400, &format!("could not read request body: {e}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// A handler's answer, converted to a `tiny_http` response at the edge.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn html(body: String) -> Self {
        Self::new(200, "text/html; charset=utf-8", body)
    }

    pub fn json_error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new(status, CONTENT_TYPE_JSON, body)
    }

    pub fn not_found() -> Self {
        Self::json_error(404, "not found")
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        match Header::from_bytes("Content-Type", self.content_type) {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub(crate) fn dispatch(
    portfolio: &mut Portfolio,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Reply> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let body = body.unwrap_or("{}");

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_page(portfolio, query)),

        (&Method::Get, "/api/cards") => api::get_cards(portfolio),
        (&Method::Get, "/api/resources") => api::get_resources(portfolio),
        (&Method::Post, "/api/reload") => api::post_reload(portfolio),
        (&Method::Get, "/api/filter") => api::get_filter(portfolio, query),

        (&Method::Get, "/api/panel") => api::get_panel(portfolio),
        (&Method::Post, "/api/panel/open") => api::post_panel_open(portfolio, body),
        (&Method::Post, "/api/panel/close") => api::post_panel_close(portfolio, body),
        (&Method::Post, "/api/panel/frame") => api::post_panel_frame(portfolio, body),

        (&Method::Get, "/api/health") => api::get_health(portfolio),

        (&Method::Get, p) if !p.starts_with("/api/") => Ok(serve_file(portfolio, p)),

        _ => Ok(Reply::not_found()),
    }
}

/// Render the page, applying `?q=` when present.
fn serve_page(portfolio: &mut Portfolio, query: &str) -> Reply {
    let term = query_param(query, "q").unwrap_or_default();
    portfolio.filter_resources(&term);
    Reply::html(portfolio.page_html())
}

/// Proxy any site file from the source root.
fn serve_file(portfolio: &Portfolio, path: &str) -> Reply {
    let Some(path) = decode_path(path) else {
        return Reply::not_found();
    };

    match portfolio.source().fetch(&path) {
        Ok(bytes) => Reply::new(200, content_type_for(&path), bytes),
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "resource not served");
            Reply::not_found()
        }
    }
}

/// Percent-decode a URL path and reject traversal.
fn decode_path(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = path.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    let decoded = String::from_utf8(decoded).ok()?;
    crate::source::normalize_path(&decoded).ok()
}

/// Look up one query-string parameter.
pub(crate) fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => CONTENT_TYPE_JSON,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "txt" | "md" | "rs" | "py" | "c" | "h" | "java" | "ts" | "toml" | "yaml" | "yml" => {
            "text/plain; charset=utf-8"
        }
        _ => "application/octet-stream",
    }
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
