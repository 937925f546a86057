//! Wire types for the manifest and the per-resource descriptors.

use serde::{Deserialize, Serialize};

/// Top-level manifest: the ordered list of resource identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "recursos", alias = "resources")]
    pub resources: Vec<String>,
}

/// Per-resource descriptor as authored in `<id>/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    #[serde(rename = "conteudo", alias = "body")]
    pub body: String,
    #[serde(rename = "img", alias = "image")]
    pub image: String,
    #[serde(
        rename = "observacao",
        alias = "note",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl Descriptor {
    /// The content-source path, if one is set and not blank.
    pub fn content_source(&self) -> Option<&str> {
        self.src.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// How a card's note is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Plain,
    Important,
}

impl NoteKind {
    /// Classify `note` against the important marker.
    pub fn classify(note: &str, marker: &str) -> Self {
        if !marker.is_empty() && note.contains(marker) {
            Self::Important
        } else {
            Self::Plain
        }
    }
}

/// A descriptor together with the identifier it was listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    #[serde(flatten)]
    pub descriptor: Descriptor,
}

impl Card {
    pub fn new(id: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            id: id.into(),
            descriptor,
        }
    }

    pub fn title(&self) -> &str {
        &self.descriptor.title
    }

    pub fn body(&self) -> &str {
        &self.descriptor.body
    }

    /// The note and its presentation, if the descriptor has one.
    pub fn note(&self, marker: &str) -> Option<(&str, NoteKind)> {
        self.descriptor
            .note
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| (n, NoteKind::classify(n, marker)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_authored_field_names() {
        let json = r#"{
            "titulo": "Flexbox",
            "conteudo": "Layout em uma dimensão",
            "img": "wp-resources/flexbox/capa.png",
            "observacao": "IMPORTANTE: requer navegador moderno",
            "src": "demo.html"
        }"#;
        let d: Descriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.title, "Flexbox");
        assert_eq!(d.content_source(), Some("demo.html"));
        assert_eq!(
            NoteKind::classify(d.note.as_deref().unwrap(), "IMPORTANTE"),
            NoteKind::Important
        );
    }

    #[test]
    fn accepts_english_aliases() {
        let json = r#"{"title": "Grid", "body": "Two dimensions", "image": "grid.png", "note": "beta"}"#;
        let d: Descriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.body, "Two dimensions");
        assert_eq!(d.note.as_deref(), Some("beta"));
        assert!(d.src.is_none());

        let m: Manifest = serde_json::from_str(r#"{"resources": ["a", "b"]}"#).unwrap();
        assert_eq!(m.resources, vec!["a", "b"]);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        assert!(serde_json::from_str::<Descriptor>(r#"{"titulo": "x", "img": "y"}"#).is_err());
    }

    #[test]
    fn blank_src_counts_as_absent() {
        let d = Descriptor {
            title: "t".into(),
            body: "b".into(),
            image: "i".into(),
            note: None,
            src: Some("   ".into()),
        };
        assert_eq!(d.content_source(), None);
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        assert_eq!(NoteKind::classify("importante", "IMPORTANTE"), NoteKind::Plain);
        assert_eq!(NoteKind::classify("anything", ""), NoteKind::Plain);
    }

    #[test]
    fn empty_note_is_not_rendered() {
        let card = Card::new(
            "x",
            Descriptor {
                title: "t".into(),
                body: "b".into(),
                image: "i".into(),
                note: Some(String::new()),
                src: None,
            },
        );
        assert!(card.note("IMPORTANTE").is_none());
    }
}
