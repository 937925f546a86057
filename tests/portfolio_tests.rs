/// Portfolio-level tests: the operations a page user (or another script)
/// triggers, checked against the panel state machine and the rendered markup.
use std::fs;
use std::time::{Duration, Instant};

use vitrine::catalog::LoadOutcome;
use vitrine::config::VitrineConfig;
use vitrine::panel::{CloseTrigger, PanelContent, PanelPhase};
use vitrine::portfolio::Portfolio;
use vitrine::source::{DirSource, MemorySource};

fn sample_source() -> MemorySource {
    MemorySource::new()
        .with_file(
            "wp-resources/index.json",
            r#"{"recursos": ["flexbox", "grid", "cores", "rascunho"]}"#,
        )
        .with_file(
            "wp-resources/flexbox/config.json",
            r#"{"titulo": "Flexbox", "conteudo": "Layout em uma dimensão", "img": "f.png",
                "observacao": "IMPORTANTE: use prefixos", "src": "demo.html"}"#,
        )
        .with_file("wp-resources/flexbox/demo.html", "<!doctype html><p>flex</p>")
        .with_file(
            "wp-resources/grid/config.json",
            r#"{"titulo": "CSS Grid", "conteudo": "Layout em duas dimensões", "img": "g.png",
                "src": "grid.css"}"#,
        )
        .with_file("wp-resources/grid/grid.css", ".a { display: grid; }\n")
        .with_file(
            "wp-resources/cores/config.json",
            r#"{"titulo": "Paleta de cores", "conteudo": "Contraste e acessibilidade", "img": "c.png",
                "observacao": "em revisão"}"#,
        )
        .with_file(
            "wp-resources/rascunho/config.json",
            r#"{"titulo": "Rascunho", "conteudo": "sem src", "img": "r.png", "src": ""}"#,
        )
}

fn loaded() -> Portfolio {
    let mut p = Portfolio::new(Box::new(sample_source()), &VitrineConfig::default());
    p.load_cards();
    p
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn filter_hides_exactly_non_matching_cards() {
    let mut p = loaded();

    let visible = p.filter_resources("LAYOUT");
    assert_eq!(visible, vec!["flexbox", "grid"]);
    assert!(p.is_hidden("cores"));
    assert!(p.is_hidden("rascunho"));

    let visible = p.filter_resources("grid");
    assert_eq!(visible, vec!["grid"]);

    // Notes are not part of the match.
    let visible = p.filter_resources("prefixos");
    assert!(visible.is_empty());

    let visible = p.filter_resources("");
    assert_eq!(visible.len(), 4);
}

#[test]
fn filtered_cards_render_hidden() {
    let mut p = loaded();
    p.filter_resources("paleta");
    let html = p.container_html();
    assert!(html.contains(r#"data-resource-id="grid" style="display:none""#));
    assert!(html.contains(r#"data-resource-id="cores">"#));
}

#[test]
fn reload_clears_filter() {
    let mut p = loaded();
    p.filter_resources("grid");
    p.reload_resources();
    assert!(!p.is_hidden("cores"));
}

// ---------------------------------------------------------------------------
// Panel content
// ---------------------------------------------------------------------------

#[test]
fn html_source_opens_in_frame_with_card_title() {
    let mut p = loaded();
    p.open_panel("flexbox", Instant::now());
    assert_eq!(p.panel().title(), Some("Flexbox"));
    assert_eq!(
        p.panel().content(),
        &PanelContent::Frame {
            url: "wp-resources/flexbox/demo.html".into(),
            title: "Demo: Flexbox".into(),
        }
    );
    assert!(p.panel_html().starts_with("<iframe"));
}

#[test]
fn non_html_source_is_literal_text() {
    let mut p = loaded();
    p.open_panel("grid", Instant::now());
    assert_eq!(
        p.panel().content(),
        &PanelContent::Text {
            text: ".a { display: grid; }\n".into()
        }
    );
    assert_eq!(
        p.panel_html(),
        "<pre class=\"panel-text\">.a { display: grid; }\n</pre>"
    );
}

#[test]
fn no_content_source_is_coming_soon() {
    let mut p = loaded();
    for id in ["cores", "rascunho"] {
        p.open_panel(id, Instant::now());
        assert_eq!(p.panel().content(), &PanelContent::ComingSoon, "{id}");
    }
}

#[test]
fn unknown_resource_opens_under_its_id() {
    let mut p = loaded();
    p.open_panel("nao-existe", Instant::now());
    assert_eq!(p.panel().title(), Some("nao-existe"));
    assert_eq!(p.panel().content(), &PanelContent::ComingSoon);
}

// ---------------------------------------------------------------------------
// Panel lifecycle
// ---------------------------------------------------------------------------

#[test]
fn every_close_trigger_returns_to_closed_and_clears() {
    for trigger in [CloseTrigger::Button, CloseTrigger::Overlay, CloseTrigger::CancelKey] {
        let mut p = loaded();
        let t0 = Instant::now();

        p.open_panel("grid", t0);
        p.tick(t0 + ms(100));
        assert_eq!(p.panel().phase(), PanelPhase::Open);

        let closed = match trigger {
            CloseTrigger::CancelKey => p.key_pressed("Escape", t0 + ms(200)),
            other => p.close_panel(other, t0 + ms(200)),
        };
        assert!(closed, "{trigger:?}");
        assert_eq!(p.panel().phase(), PanelPhase::Closing);

        p.tick(t0 + ms(700));
        assert_eq!(p.panel().phase(), PanelPhase::Closed, "{trigger:?}");
        assert_eq!(p.panel().content(), &PanelContent::Loading);
        assert_eq!(p.panel().title(), None);
        assert_eq!(p.panel_html(), "Loading...");
    }
}

#[test]
fn late_content_for_closed_panel_is_discarded() {
    let mut p = loaded();
    let t0 = Instant::now();

    let ticket = p.open_panel("grid", t0);
    p.close_panel(CloseTrigger::Overlay, t0 + ms(10));
    p.tick(t0 + ms(600));

    assert!(!p.apply_panel_content(ticket, PanelContent::ComingSoon));
    assert_eq!(p.panel().content(), &PanelContent::Loading);
}

#[test]
fn frame_events_for_previous_open_are_ignored() {
    let mut p = loaded();
    let t0 = Instant::now();

    let first = p.open_panel("flexbox", t0);
    let second = p.open_panel("grid", t0 + ms(50));
    assert_ne!(first, second);

    assert!(!p.frame_failed(first));
    assert!(matches!(p.panel().content(), PanelContent::Text { .. }));
}

// ---------------------------------------------------------------------------
// Namespace helpers
// ---------------------------------------------------------------------------

#[test]
fn scroll_to_returns_anchor_for_rendered_cards() {
    let p = loaded();
    assert_eq!(p.scroll_to("cores").as_deref(), Some("#card-cores"));
    assert_eq!(p.scroll_to("ghost"), None);
}

#[test]
fn available_resources_come_from_manifest() {
    let p = loaded();
    let ids = p.get_available_resources().unwrap();
    assert_eq!(ids, vec!["flexbox", "grid", "cores", "rascunho"]);
}

#[test]
fn page_shows_loading_before_first_load() {
    let p = Portfolio::new(Box::new(sample_source()), &VitrineConfig::default());
    assert!(p.outcome().is_none());
    assert!(p.page_html().contains("Loading resources..."));
}

#[test]
fn reload_picks_up_edits_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let res = dir.path().join("wp-resources");
    fs::create_dir_all(res.join("a")).unwrap();
    fs::write(res.join("index.json"), r#"{"recursos": []}"#).unwrap();

    let mut p = Portfolio::new(Box::new(DirSource::new(dir.path())), &VitrineConfig::default());
    assert!(matches!(p.load_cards(), LoadOutcome::Empty { .. }));

    fs::write(res.join("index.json"), r#"{"recursos": ["a"]}"#).unwrap();
    fs::write(
        res.join("a/config.json"),
        r#"{"titulo": "Alpha", "conteudo": "first", "img": "a.png"}"#,
    )
    .unwrap();

    assert_eq!(p.reload_resources().cards().len(), 1);
    assert!(p.container_html().contains("<h3>Alpha</h3>"));
}

#[test]
fn important_note_renders_emphasized_and_plain_note_does_not() {
    let p = loaded();
    let html = p.container_html();
    assert!(html.contains(r#"<p class="important"><strong>IMPORTANTE: use prefixos</strong></p>"#));
    assert!(html.contains(r#"<p class="note">em revisão</p>"#));
}
