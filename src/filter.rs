//! Text filtering over rendered cards.

use crate::catalog::Card;

/// Whether `card` matches `term`: a case-insensitive substring of the title
/// or the body. An empty term matches every card.
pub fn matches(card: &Card, term: &str) -> bool {
    let term = term.to_lowercase();
    card.title().to_lowercase().contains(&term) || card.body().to_lowercase().contains(&term)
}

/// Identifiers of the cards that do not match `term`, in card order.
pub fn hidden_ids<'a>(cards: &'a [Card], term: &str) -> Vec<&'a str> {
    cards
        .iter()
        .filter(|card| !matches(card, term))
        .map(|card| card.id.as_str())
        .collect()
}
