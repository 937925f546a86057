//! Detail panel state machine.
//!
//! ```text
//!   Closed ──open──▶ Opening ──(open delay)──▶ Open
//!     ▲                 │                        │
//!     │               close                    close
//!     │                 ▼                        │
//!     └──(clear delay)── Closing ◀───────────────┘
//! ```
//!
//! Time never advances on its own: callers pass `now` into every transition
//! and call [`Panel::tick`] to apply the delayed ones. Each `open` returns an
//! [`OpenTicket`]; content or frame events carrying an older ticket are
//! discarded, which is how a fetch that outlives its panel gets dropped.

mod content;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub use content::resolve_content;

use crate::config::schema::PanelConfig;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// What asked the panel to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseTrigger {
    /// The panel's close control.
    Button,
    /// A click on the background overlay.
    Overlay,
    /// The cancel key (Escape).
    CancelKey,
}

/// Content shown in the panel body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PanelContent {
    /// Placeholder while the descriptor and content-source are fetched.
    Loading,
    /// The resource has no usable content-source.
    ComingSoon,
    /// The embedded frame reported a load error.
    Unavailable,
    /// An HTML content-source embedded in an isolated frame.
    Frame { url: String, title: String },
    /// Any other content-source, shown verbatim as preformatted text.
    Text { text: String },
}

/// Identifies one `open` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenTicket(pub u64);

/// Serializable view of the panel.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    pub phase: PanelPhase,
    pub resource_id: Option<String>,
    pub title: Option<String>,
    pub content: PanelContent,
    pub frame_loading: bool,
    pub ticket: OpenTicket,
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Panel {
    phase: PanelPhase,
    resource_id: Option<String>,
    title: Option<String>,
    content: PanelContent,
    frame_loading: bool,
    deadline: Option<Instant>,
    generation: u64,
    open_delay: Duration,
    clear_delay: Duration,
}

impl Panel {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            phase: PanelPhase::Closed,
            resource_id: None,
            title: None,
            content: PanelContent::Loading,
            frame_loading: false,
            deadline: None,
            generation: 0,
            open_delay: config.open_delay(),
            clear_delay: config.clear_delay(),
        }
    }

    /// Start showing `resource_id`. Valid from every phase.
    pub fn open(&mut self, resource_id: &str, title: &str, now: Instant) -> OpenTicket {
        self.generation += 1;
        self.phase = PanelPhase::Opening;
        self.deadline = Some(now + self.open_delay);
        self.resource_id = Some(resource_id.to_string());
        self.title = Some(title.to_string());
        self.content = PanelContent::Loading;
        self.frame_loading = false;

        tracing::debug!(resource = %resource_id, ticket = self.generation, "panel opening");
        OpenTicket(self.generation)
    }

    /// Begin closing. Returns `false` when the panel is not open.
    pub fn close(&mut self, trigger: CloseTrigger, now: Instant) -> bool {
        if !self.is_open() {
            return false;
        }

        self.phase = PanelPhase::Closing;
        self.deadline = Some(now + self.clear_delay);
        tracing::debug!(?trigger, "panel closing");
        true
    }

    /// Handle a key press. Only the cancel key does anything, and only while
    /// the panel is open.
    pub fn key_pressed(&mut self, key: &str, now: Instant) -> bool {
        key == "Escape" && self.close(CloseTrigger::CancelKey, now)
    }

    /// Apply any delayed transition whose deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.deadline else {
            return;
        };
        if now < deadline {
            return;
        }

        self.deadline = None;
        match self.phase {
            PanelPhase::Opening => self.phase = PanelPhase::Open,
            PanelPhase::Closing => {
                self.phase = PanelPhase::Closed;
                self.resource_id = None;
                self.title = None;
                self.content = PanelContent::Loading;
                self.frame_loading = false;
            }
            PanelPhase::Closed | PanelPhase::Open => {}
        }
    }

    /// Install resolved content for `ticket`. Stale tickets are ignored.
    pub fn apply_content(&mut self, ticket: OpenTicket, content: PanelContent) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale panel content");
            return false;
        }

        self.frame_loading = matches!(content, PanelContent::Frame { .. });
        self.content = content;
        true
    }

    /// The embedded frame finished loading.
    pub fn frame_loaded(&mut self, ticket: OpenTicket) -> bool {
        if !self.is_current(ticket) || !self.frame_loading {
            return false;
        }
        self.frame_loading = false;
        true
    }

    /// The embedded frame failed to load; fall back to the placeholder.
    pub fn frame_failed(&mut self, ticket: OpenTicket) -> bool {
        if !self.is_current(ticket) || !matches!(self.content, PanelContent::Frame { .. }) {
            return false;
        }
        tracing::warn!(resource = ?self.resource_id, "frame failed to load");
        self.frame_loading = false;
        self.content = PanelContent::Unavailable;
        true
    }

    fn is_current(&self, ticket: OpenTicket) -> bool {
        ticket.0 == self.generation && self.is_open()
    }

    /// Whether the panel accepts close triggers (opening or open).
    pub fn is_open(&self) -> bool {
        matches!(self.phase, PanelPhase::Opening | PanelPhase::Open)
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn frame_loading(&self) -> bool {
        self.frame_loading
    }

    pub fn open_delay(&self) -> Duration {
        self.open_delay
    }

    pub fn clear_delay(&self) -> Duration {
        self.clear_delay
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            phase: self.phase,
            resource_id: self.resource_id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            frame_loading: self.frame_loading,
            ticket: OpenTicket(self.generation),
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(&PanelConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
