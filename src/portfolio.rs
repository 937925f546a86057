//! The portfolio page as one piece of explicit state.
//!
//! [`Portfolio`] owns the source, the last load outcome, the active filter
//! and the detail panel, and exposes the operations the page offers to its
//! users and to other scripts: load, reload, filter, scroll, list, open and
//! close.

use std::collections::HashSet;
use std::time::Instant;

use crate::catalog::{self, Access, Card, CatalogError, LoadOutcome, ResourcePaths};
use crate::config::VitrineConfig;
use crate::config::schema::RenderConfig;
use crate::filter;
use crate::panel::{CloseTrigger, OpenTicket, Panel, PanelContent, resolve_content};
use crate::render::{self, page::PageSettings};
use crate::source::ResourceSource;

pub struct Portfolio {
    source: Box<dyn ResourceSource>,
    paths: ResourcePaths,
    access: Access,
    render: RenderConfig,
    outcome: Option<LoadOutcome>,
    hidden: HashSet<String>,
    panel: Panel,
}

impl Portfolio {
    pub fn new(source: Box<dyn ResourceSource>, config: &VitrineConfig) -> Self {
        Self {
            access: Access::of(source.as_ref()),
            source,
            paths: ResourcePaths::from_config(&config.source),
            render: config.render.clone(),
            outcome: None,
            hidden: HashSet::new(),
            panel: Panel::new(&config.panel),
        }
    }

    /// Mark the page as served over HTTP, whatever the source reads from.
    pub fn set_served(&mut self) {
        self.access = Access::Served;
    }

    pub fn access(&self) -> Access {
        self.access
    }

    // -- Cards --

    /// Load the manifest and every descriptor, replacing the current cards.
    ///
    /// Clears any active filter.
    pub fn load_cards(&mut self) -> &LoadOutcome {
        let outcome = catalog::load_cards(self.source.as_ref(), &self.paths, self.access);
        self.hidden.clear();
        self.outcome.insert(outcome)
    }

    pub fn reload_resources(&mut self) -> &LoadOutcome {
        tracing::info!("reloading resources");
        self.load_cards()
    }

    /// Hide every card whose title and body both lack `term`.
    ///
    /// Returns the identifiers of the cards left visible.
    pub fn filter_resources(&mut self, term: &str) -> Vec<&str> {
        let cards = self.outcome.as_ref().map(LoadOutcome::cards).unwrap_or(&[]);
        self.hidden = filter::hidden_ids(cards, term)
            .into_iter()
            .map(str::to_string)
            .collect();

        cards
            .iter()
            .filter(|c| !self.hidden.contains(&c.id))
            .map(|c| c.id.as_str())
            .collect()
    }

    /// Fragment anchor of a rendered card.
    pub fn scroll_to(&self, resource_id: &str) -> Option<String> {
        self.card(resource_id).map(|c| format!("#card-{}", c.id))
    }

    /// Fetch the manifest's identifiers without touching the rendered cards.
    pub fn get_available_resources(&self) -> Result<Vec<String>, CatalogError> {
        catalog::get_available_resources(self.source.as_ref(), &self.paths, self.access)
    }

    pub fn outcome(&self) -> Option<&LoadOutcome> {
        self.outcome.as_ref()
    }

    pub fn cards(&self) -> &[Card] {
        self.outcome.as_ref().map(LoadOutcome::cards).unwrap_or(&[])
    }

    pub fn card(&self, resource_id: &str) -> Option<&Card> {
        self.cards().iter().find(|c| c.id == resource_id)
    }

    pub fn is_hidden(&self, resource_id: &str) -> bool {
        self.hidden.contains(resource_id)
    }

    // -- Panel --

    /// Open the panel for `resource_id` and resolve its content.
    ///
    /// The title comes from the rendered card; a resource that is not on
    /// the page is shown under its identifier.
    pub fn open_panel(&mut self, resource_id: &str, now: Instant) -> OpenTicket {
        let title = self
            .card(resource_id)
            .map(|c| c.title().to_string())
            .unwrap_or_else(|| resource_id.to_string());
        tracing::info!(resource = %resource_id, title = %title, "opening panel");

        let ticket = self.panel.open(resource_id, &title, now);
        let content = resolve_content(self.source.as_ref(), &self.paths, resource_id, &title);
        self.panel.apply_content(ticket, content);
        ticket
    }

    pub fn close_panel(&mut self, trigger: CloseTrigger, now: Instant) -> bool {
        self.panel.close(trigger, now)
    }

    pub fn key_pressed(&mut self, key: &str, now: Instant) -> bool {
        self.panel.key_pressed(key, now)
    }

    pub fn frame_loaded(&mut self, ticket: OpenTicket) -> bool {
        self.panel.frame_loaded(ticket)
    }

    pub fn frame_failed(&mut self, ticket: OpenTicket) -> bool {
        self.panel.frame_failed(ticket)
    }

    pub fn tick(&mut self, now: Instant) {
        self.panel.tick(now);
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Install content for an earlier ticket; used when content resolves
    /// outside [`open_panel`](Self::open_panel).
    pub fn apply_panel_content(&mut self, ticket: OpenTicket, content: PanelContent) -> bool {
        self.panel.apply_content(ticket, content)
    }

    // -- Markup --

    pub fn container_html(&self) -> String {
        render::container_html(self.outcome.as_ref(), &self.hidden, &self.render)
    }

    pub fn page_html(&self) -> String {
        let settings = PageSettings {
            title: &self.render.page_title,
            open_delay_ms: self.panel.open_delay().as_millis() as u64,
            clear_delay_ms: self.panel.clear_delay().as_millis() as u64,
        };
        render::page::page_html(&settings, &self.container_html())
    }

    pub fn panel_html(&self) -> String {
        render::panel_content_html(self.panel.content())
    }

    pub fn source(&self) -> &dyn ResourceSource {
        self.source.as_ref()
    }

    pub fn paths(&self) -> &ResourcePaths {
        &self.paths
    }
}
