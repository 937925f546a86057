//! HTML rendering for cards, the card container and the panel body.
//!
//! Every function here is pure: descriptor data in, markup out. Title, body,
//! image path and identifiers are escaped. Note text is trusted markup and is
//! inserted as-is unless [`RenderConfig::escape_notes`] is set.

pub mod page;

use std::collections::HashSet;
use std::fmt::Write;

use crate::catalog::{Card, LoadOutcome, NoteKind};
use crate::config::schema::RenderConfig;
use crate::panel::PanelContent;

/// Shown in the container before the first load completes.
pub const LOADING_HTML: &str = r#"<div class="loading">Loading resources...</div>"#;

/// Replaces a card image whose `error` event fired.
pub const IMAGE_PLACEHOLDER_HTML: &str =
    r#"<div class="image-placeholder">🖼️<br>Image in<br>development</div>"#;

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render one card.
pub fn card_html(card: &Card, options: &RenderConfig, hidden: bool) -> String {
    let id = escape_html(&card.id);
    let title = escape_html(card.title());
    let style = if hidden { r#" style="display:none""# } else { "" };

    let note = match card.note(&options.important_marker) {
        Some((text, kind)) => {
            let text = if options.escape_notes {
                escape_html(text)
            } else {
                text.to_string()
            };
            match kind {
                NoteKind::Important => {
                    format!("\n    <p class=\"important\"><strong>{text}</strong></p>")
                }
                NoteKind::Plain => format!("\n    <p class=\"note\">{text}</p>"),
            }
        }
        None => String::new(),
    };

    format!(
        r#"<div class="card" id="card-{id}" data-resource-id="{id}"{style}>
  <div class="card-image">
    <img src="{image}" alt="{title}" data-fallback>
  </div>
  <div class="card-content">
    <h3>{title}</h3>
    <p>{body}</p>{note}
    <button class="btn-visualizar" data-resource="{id}">View example</button>
  </div>
</div>"#,
        image = escape_html(&card.descriptor.image),
        body = escape_html(card.body()),
    )
}

/// Render the inner markup of the card container.
///
/// `None` means nothing has loaded yet.
pub fn container_html(
    outcome: Option<&LoadOutcome>,
    hidden: &HashSet<String>,
    options: &RenderConfig,
) -> String {
    match outcome {
        None => LOADING_HTML.to_string(),
        Some(LoadOutcome::Failed { message }) => {
            format!(r#"<div class="error">Error: {}</div>"#, multiline(message))
        }
        Some(LoadOutcome::Empty { message }) => {
            format!(r#"<div class="empty">{}</div>"#, escape_html(message))
        }
        Some(LoadOutcome::Cards { cards }) => {
            let mut out = String::new();
            for card in cards {
                let _ = writeln!(out, "{}", card_html(card, options, hidden.contains(&card.id)));
            }
            out
        }
    }
}

/// Render the panel body for `content`.
pub fn panel_content_html(content: &PanelContent) -> String {
    match content {
        PanelContent::Loading => "Loading...".to_string(),
        PanelContent::ComingSoon => r#"<div class="em-breve">Coming soon</div>"#.to_string(),
        PanelContent::Unavailable => {
            r#"<div class="em-breve">Content unavailable</div>"#.to_string()
        }
        PanelContent::Frame { url, title } => format!(
            r#"<iframe class="panel-frame" src="{}" title="{}"></iframe>"#,
            escape_html(url),
            escape_html(title)
        ),
        PanelContent::Text { text } => {
            format!(r#"<pre class="panel-text">{}</pre>"#, escape_html(text))
        }
    }
}

/// Escape and keep line breaks visible.
fn multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Descriptor;

    fn card(note: Option<&str>) -> Card {
        Card::new(
            "flex<box>",
            Descriptor {
                title: "<script>alert(1)</script>".into(),
                body: "a & b".into(),
                image: "img/\"x\".png".into(),
                note: note.map(String::from),
                src: None,
            },
        )
    }

    #[test]
    fn title_body_and_attributes_are_escaped() {
        let html = card_html(&card(None), &RenderConfig::default(), false);
        assert!(html.contains("<h3>&lt;script&gt;alert(1)&lt;/script&gt;</h3>"));
        assert!(html.contains("<p>a &amp; b</p>"));
        assert!(html.contains(r#"src="img/&quot;x&quot;.png""#));
        assert!(html.contains(r#"data-resource="flex&lt;box&gt;""#));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn note_markup_is_raw_by_default() {
        let html = card_html(&card(Some("see <a href=\"/x\">docs</a>")), &RenderConfig::default(), false);
        assert!(html.contains(r#"<p class="note">see <a href="/x">docs</a></p>"#));
    }

    #[test]
    fn note_can_be_escaped() {
        let options = RenderConfig {
            escape_notes: true,
            ..RenderConfig::default()
        };
        let html = card_html(&card(Some("<b>x</b>")), &options, false);
        assert!(html.contains(r#"<p class="note">&lt;b&gt;x&lt;/b&gt;</p>"#));
    }

    #[test]
    fn important_note_is_emphasized() {
        let html = card_html(&card(Some("IMPORTANTE: leia")), &RenderConfig::default(), false);
        assert!(html.contains(r#"<p class="important"><strong>IMPORTANTE: leia</strong></p>"#));
    }

    #[test]
    fn hidden_cards_are_not_displayed() {
        let html = card_html(&card(None), &RenderConfig::default(), true);
        assert!(html.contains(r#"style="display:none""#));
    }

    #[test]
    fn container_states_are_distinct() {
        let options = RenderConfig::default();
        let hidden = HashSet::new();

        assert_eq!(container_html(None, &hidden, &options), LOADING_HTML);

        let empty = LoadOutcome::Empty {
            message: "No resources listed in wp-resources/index.json".into(),
        };
        let html = container_html(Some(&empty), &hidden, &options);
        assert!(html.starts_with(r#"<div class="empty">"#));

        let failed = LoadOutcome::Failed {
            message: "Failed to load x:\n• check".into(),
        };
        let html = container_html(Some(&failed), &hidden, &options);
        assert_eq!(html, r#"<div class="error">Error: Failed to load x:<br>• check</div>"#);
    }

    #[test]
    fn panel_text_is_preformatted_and_escaped() {
        let html = panel_content_html(&PanelContent::Text {
            text: "<p>\n  x".into(),
        });
        assert_eq!(html, "<pre class=\"panel-text\">&lt;p&gt;\n  x</pre>");
    }

    #[test]
    fn panel_frame_is_an_iframe() {
        let html = panel_content_html(&PanelContent::Frame {
            url: "wp-resources/a/demo.html".into(),
            title: "Demo: A".into(),
        });
        assert!(html.starts_with(r#"<iframe class="panel-frame" src="wp-resources/a/demo.html""#));
    }
}
