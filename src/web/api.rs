//! JSON API handlers for the portfolio page.
//!
//! Each handler corresponds to an API endpoint and returns a JSON [`Reply`].

use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{Access, LoadOutcome};
use crate::panel::{CloseTrigger, OpenTicket, PanelSnapshot};
use crate::portfolio::Portfolio;
use crate::source::Origin;

use super::{CONTENT_TYPE_JSON, Reply, query_param};

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CardsResponse<'a> {
    outcome: Option<&'a LoadOutcome>,
    resources: Vec<&'a str>,
}

#[derive(Serialize)]
struct ResourcesResponse {
    resources: Vec<String>,
}

#[derive(Serialize)]
struct ReloadResponse<'a> {
    outcome: &'a LoadOutcome,
    html: String,
}

#[derive(Serialize)]
struct FilterResponse<'a> {
    term: String,
    visible: Vec<&'a str>,
}

/// Panel state plus its rendered body.
#[derive(Serialize)]
struct PanelResponse {
    #[serde(flatten)]
    snapshot: PanelSnapshot,
    html: String,
}

#[derive(Serialize)]
struct CloseResponse {
    closed: bool,
    #[serde(flatten)]
    panel: PanelResponse,
}

#[derive(Serialize)]
struct HealthResponse {
    origin: Origin,
    access: Access,
    manifest: String,
    manifest_ok: bool,
    listed: usize,
    cards: usize,
}

#[derive(Deserialize)]
struct OpenRequest {
    id: String,
}

#[derive(Deserialize)]
struct CloseRequest {
    #[serde(default = "default_trigger")]
    trigger: CloseTrigger,
}

fn default_trigger() -> CloseTrigger {
    CloseTrigger::Button
}

#[derive(Deserialize)]
struct FrameRequest {
    ticket: OpenTicket,
    loaded: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Reply> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Reply::new(200, CONTENT_TYPE_JSON, body))
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, Reply> {
    serde_json::from_str(body).map_err(|e| Reply::json_error(400, &format!("invalid request body: {e}")))
}

fn panel_response(portfolio: &Portfolio) -> PanelResponse {
    PanelResponse {
        snapshot: portfolio.panel().snapshot(),
        html: portfolio.panel_html(),
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/cards` — the current load outcome and rendered identifiers.
pub fn get_cards(portfolio: &Portfolio) -> Result<Reply> {
    let resp = CardsResponse {
        outcome: portfolio.outcome(),
        resources: portfolio.cards().iter().map(|c| c.id.as_str()).collect(),
    };
    json_response(&resp)
}

/// `GET /api/resources` — identifiers listed in the manifest, including
/// ones whose descriptor fails.
pub fn get_resources(portfolio: &Portfolio) -> Result<Reply> {
    match portfolio.get_available_resources() {
        Ok(resources) => json_response(&ResourcesResponse { resources }),
        Err(e) => Ok(Reply::json_error(500, &e.to_string())),
    }
}

/// `POST /api/reload` — reload everything and return the new container.
pub fn post_reload(portfolio: &mut Portfolio) -> Result<Reply> {
    portfolio.reload_resources();
    let html = portfolio.container_html();
    let outcome = portfolio
        .outcome()
        .context("no load outcome after reload")?;
    json_response(&ReloadResponse { outcome, html })
}

/// `GET /api/filter?q=term` — identifiers left visible by `term`.
pub fn get_filter(portfolio: &mut Portfolio, query: &str) -> Result<Reply> {
    let term = query_param(query, "q").unwrap_or_default();
    let visible = portfolio.filter_resources(&term);
    json_response(&FilterResponse { term, visible })
}

/// `GET /api/panel` — current panel state.
pub fn get_panel(portfolio: &Portfolio) -> Result<Reply> {
    json_response(&panel_response(portfolio))
}

/// `POST /api/panel/open` — `{"id": "..."}`.
pub fn post_panel_open(portfolio: &mut Portfolio, body: &str) -> Result<Reply> {
    let req: OpenRequest = match parse_body(body) {
        Ok(req) => req,
        Err(reply) => return Ok(reply),
    };
    portfolio.open_panel(&req.id, Instant::now());
    json_response(&panel_response(portfolio))
}

/// `POST /api/panel/close` — `{"trigger": "button" | "overlay" | "cancel-key"}`.
pub fn post_panel_close(portfolio: &mut Portfolio, body: &str) -> Result<Reply> {
    let req: CloseRequest = match parse_body(body) {
        Ok(req) => req,
        Err(reply) => return Ok(reply),
    };
    let closed = portfolio.close_panel(req.trigger, Instant::now());
    json_response(&CloseResponse {
        closed,
        panel: panel_response(portfolio),
    })
}

/// `POST /api/panel/frame` — `{"ticket": n, "loaded": bool}` from the frame's
/// load/error events.
pub fn post_panel_frame(portfolio: &mut Portfolio, body: &str) -> Result<Reply> {
    let req: FrameRequest = match parse_body(body) {
        Ok(req) => req,
        Err(reply) => return Ok(reply),
    };
    if req.loaded {
        portfolio.frame_loaded(req.ticket);
    } else {
        portfolio.frame_failed(req.ticket);
    }
    json_response(&panel_response(portfolio))
}

/// `GET /api/health` — source origin and manifest reachability.
pub fn get_health(portfolio: &Portfolio) -> Result<Reply> {
    let (manifest_ok, listed) = match portfolio.get_available_resources() {
        Ok(ids) => (true, ids.len()),
        Err(_) => (false, 0),
    };
    let resp = HealthResponse {
        origin: portfolio.source().origin(),
        access: portfolio.access(),
        manifest: portfolio.source().locate(&portfolio.paths().manifest()),
        manifest_ok,
        listed,
        cards: portfolio.cards().len(),
    };
    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tiny_http::Method;

    use super::super::dispatch;
    use super::*;
    use crate::config::VitrineConfig;
    use crate::source::MemorySource;

    fn portfolio() -> Portfolio {
        let source = MemorySource::new()
            .with_file("wp-resources/index.json", r#"{"recursos": ["grid", "cores", "ghost"]}"#)
            .with_file(
                "wp-resources/grid/config.json",
                r#"{"titulo": "Grid", "conteudo": "layout", "img": "g.png", "src": "demo.html"}"#,
            )
            .with_file("wp-resources/grid/demo.html", "<h1>grid</h1>")
            .with_file(
                "wp-resources/cores/config.json",
                r#"{"titulo": "Cores", "conteudo": "paleta", "img": "c.png", "src": "paleta.txt"}"#,
            )
            .with_file("wp-resources/cores/paleta.txt", "#fff <white>");
        let mut p = Portfolio::new(Box::new(source), &VitrineConfig::default());
        p.load_cards();
        p
    }

    fn call(p: &mut Portfolio, method: Method, url: &str, body: Option<&str>) -> serde_json::Value {
        let reply = dispatch(p, &method, url, body).unwrap();
        assert_eq!(reply.status, 200, "{}", String::from_utf8_lossy(&reply.body));
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn cards_skip_failed_descriptors() {
        let mut p = portfolio();
        let json = call(&mut p, Method::Get, "/api/cards", None);
        assert_eq!(json["resources"], serde_json::json!(["grid", "cores"]));
        assert_eq!(json["outcome"]["status"], "cards");
        assert_eq!(json["outcome"]["cards"][0]["titulo"], "Grid");
    }

    #[test]
    fn resources_list_the_manifest_including_failed_descriptors() {
        let mut p = portfolio();
        let json = call(&mut p, Method::Get, "/api/resources", None);
        assert_eq!(json["resources"], serde_json::json!(["grid", "cores", "ghost"]));
    }

    #[test]
    fn resources_report_manifest_failure_message() {
        let source = MemorySource::new().unreachable();
        let mut p = Portfolio::new(Box::new(source), &VitrineConfig::default());
        let reply = dispatch(&mut p, &Method::Get, "/api/resources", None).unwrap();
        assert_eq!(reply.status, 500);

        let json: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        let message = json["error"].as_str().unwrap();
        assert!(message.starts_with("Failed to load wp-resources/index.json:"), "{message}");
        assert!(message.contains("Check that wp-resources/index.json exists"));
    }

    #[test]
    fn reload_returns_container_markup() {
        let mut p = portfolio();
        let json = call(&mut p, Method::Post, "/api/reload", None);
        assert!(json["html"].as_str().unwrap().contains(r#"id="card-cores""#));
    }

    #[test]
    fn filter_reports_visible_ids() {
        let mut p = portfolio();
        let json = call(&mut p, Method::Get, "/api/filter?q=PALETA", None);
        assert_eq!(json["visible"], serde_json::json!(["cores"]));
        assert_eq!(json["term"], "PALETA");
    }

    #[test]
    fn open_html_resource_returns_frame() {
        let mut p = portfolio();
        let json = call(&mut p, Method::Post, "/api/panel/open", Some(r#"{"id": "grid"}"#));
        assert_eq!(json["phase"], "opening");
        assert_eq!(json["title"], "Grid");
        assert_eq!(json["content"]["kind"], "frame");
        assert_eq!(json["content"]["title"], "Demo: Grid");
        assert_eq!(json["frame_loading"], true);
        assert!(json["html"].as_str().unwrap().starts_with("<iframe"));
    }

    #[test]
    fn open_text_resource_returns_escaped_pre() {
        let mut p = portfolio();
        let json = call(&mut p, Method::Post, "/api/panel/open", Some(r#"{"id": "cores"}"#));
        assert_eq!(json["content"]["text"], "#fff <white>");
        assert_eq!(json["html"], "<pre class=\"panel-text\">#fff &lt;white&gt;</pre>");
    }

    #[test]
    fn frame_error_degrades_to_unavailable() {
        let mut p = portfolio();
        let opened = call(&mut p, Method::Post, "/api/panel/open", Some(r#"{"id": "grid"}"#));
        let body = format!(r#"{{"ticket": {}, "loaded": false}}"#, opened["ticket"]);
        let json = call(&mut p, Method::Post, "/api/panel/frame", Some(&body));
        assert_eq!(json["content"]["kind"], "unavailable");
    }

    #[test]
    fn close_then_tick_clears_panel() {
        let mut p = portfolio();
        call(&mut p, Method::Post, "/api/panel/open", Some(r#"{"id": "cores"}"#));
        let json = call(
            &mut p,
            Method::Post,
            "/api/panel/close",
            Some(r#"{"trigger": "overlay"}"#),
        );
        assert_eq!(json["closed"], true);
        assert_eq!(json["phase"], "closing");

        p.tick(Instant::now() + Duration::from_secs(1));
        let json = call(&mut p, Method::Get, "/api/panel", None);
        assert_eq!(json["phase"], "closed");
        assert_eq!(json["content"]["kind"], "loading");
    }

    #[test]
    fn bad_bodies_are_400() {
        let mut p = portfolio();
        let reply = dispatch(&mut p, &Method::Post, "/api/panel/open", Some("{}")).unwrap();
        assert_eq!(reply.status, 400);
        let reply = dispatch(
            &mut p,
            &Method::Post,
            "/api/panel/close",
            Some(r#"{"trigger": "swipe"}"#),
        )
        .unwrap();
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn health_reports_manifest() {
        let mut p = portfolio();
        let json = call(&mut p, Method::Get, "/api/health", None);
        assert_eq!(json["origin"], "memory");
        assert_eq!(json["access"], "served");
        assert_eq!(json["manifest_ok"], true);
        assert_eq!(json["listed"], 3);
        assert_eq!(json["cards"], 2);
    }
}
