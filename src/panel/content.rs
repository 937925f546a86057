/// Content resolution for the detail panel.
///
/// Every failure degrades to [`PanelContent::ComingSoon`]; nothing here
/// returns an error.
use crate::catalog::{Descriptor, ResourcePaths};
use crate::source::{ResourceSource, fetch_json};

use super::PanelContent;

/// Resolve what the panel should show for `resource_id`.
///
/// The descriptor is fetched again rather than taken from the rendered
/// cards, so edits to a resource show up without reloading the grid.
pub fn resolve_content(
    source: &dyn ResourceSource,
    paths: &ResourcePaths,
    resource_id: &str,
    card_title: &str,
) -> PanelContent {
    let descriptor = match fetch_json::<Descriptor>(source, &paths.descriptor(resource_id)) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(resource = %resource_id, error = %e, "failed to load descriptor for panel");
            return PanelContent::ComingSoon;
        }
    };

    let Some(src) = descriptor.content_source() else {
        tracing::debug!(resource = %resource_id, "no content-source");
        return PanelContent::ComingSoon;
    };

    let path = paths.content(resource_id, src);
    let bytes = match source.fetch(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(resource = %resource_id, path = %path, error = %e, "failed to load content-source");
            return PanelContent::ComingSoon;
        }
    };

    if src.ends_with(".html") {
        PanelContent::Frame {
            url: path,
            title: format!("Demo: {card_title}"),
        }
    } else {
        PanelContent::Text {
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn source_with(src: Option<&str>) -> MemorySource {
        let src_field = src
            .map(|s| format!(r#", "src": "{s}""#))
            .unwrap_or_default();
        MemorySource::new().with_file(
            "wp-resources/a/config.json",
            format!(r#"{{"titulo": "A", "conteudo": "a", "img": "a.png"{src_field}}}"#),
        )
    }

    #[test]
    fn html_source_is_framed() {
        let source = source_with(Some("demo.html")).with_file("wp-resources/a/demo.html", "<h1>x</h1>");
        let content = resolve_content(&source, &ResourcePaths::default(), "a", "A");
        assert_eq!(
            content,
            PanelContent::Frame {
                url: "wp-resources/a/demo.html".into(),
                title: "Demo: A".into()
            }
        );
    }

    #[test]
    fn other_extensions_are_text_verbatim() {
        let source = source_with(Some("main.rs")).with_file("wp-resources/a/main.rs", "fn main() {}\n<b>");
        let content = resolve_content(&source, &ResourcePaths::default(), "a", "A");
        assert_eq!(
            content,
            PanelContent::Text {
                text: "fn main() {}\n<b>".into()
            }
        );
    }

    #[test]
    fn uppercase_html_extension_is_text() {
        let source = source_with(Some("DEMO.HTML")).with_file("wp-resources/a/DEMO.HTML", "<p>");
        let content = resolve_content(&source, &ResourcePaths::default(), "a", "A");
        assert!(matches!(content, PanelContent::Text { .. }));
    }

    #[test]
    fn missing_or_blank_src_is_coming_soon() {
        let paths = ResourcePaths::default();
        assert_eq!(resolve_content(&source_with(None), &paths, "a", "A"), PanelContent::ComingSoon);
        assert_eq!(resolve_content(&source_with(Some(" ")), &paths, "a", "A"), PanelContent::ComingSoon);
    }

    #[test]
    fn failed_fetches_are_coming_soon() {
        let paths = ResourcePaths::default();
        // content-source listed but absent
        assert_eq!(
            resolve_content(&source_with(Some("demo.html")), &paths, "a", "A"),
            PanelContent::ComingSoon
        );
        // descriptor absent
        assert_eq!(resolve_content(&MemorySource::new(), &paths, "zz", "Z"), PanelContent::ComingSoon);
        // content-source answers with an error status
        let source = source_with(Some("notes.txt"))
            .with_file("wp-resources/a/notes.txt", "x")
            .with_status("wp-resources/a/notes.txt", 404);
        assert_eq!(resolve_content(&source, &paths, "a", "A"), PanelContent::ComingSoon);
    }
}
