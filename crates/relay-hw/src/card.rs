//! Sound card enumeration
//!
//! This module lists ALSA cards and picks the one driving the relay board.

use alsa::card::Iter as CardIter;
use alsa::ctl::Ctl;
use tracing::{debug, info};

use crate::error::HwError;

/// Information about a sound card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCard {
    /// ALSA card index
    pub index: i32,
    /// Short card id (e.g. BossDAC)
    pub id: String,
    /// Card name
    pub name: String,
}

impl SoundCard {
    /// ALSA device name for the card's control interface
    pub fn hw_name(&self) -> String {
        format!("hw:{}", self.index)
    }

    /// Whether this card answers to `name` (id or name)
    pub fn matches(&self, name: &str) -> bool {
        self.id == name || self.name == name
    }
}

/// Enumerate all sound cards
pub fn enumerate_cards() -> Result<Vec<SoundCard>, HwError> {
    debug!("Enumerating sound cards...");
    let mut cards = Vec::new();

    for card in CardIter::new() {
        let card = card?;
        let name = card.get_name()?;
        // Fall back to the name when the control interface can't be opened
        let id = Ctl::from_card(&card, false)
            .and_then(|ctl| ctl.card_info().and_then(|info| info.get_id().map(str::to_string)))
            .unwrap_or_else(|_| name.clone());

        cards.push(SoundCard {
            index: card.get_index(),
            id,
            name,
        });
    }

    if cards.is_empty() {
        info!("No sound cards found");
    } else {
        info!("Found {} sound card(s)", cards.len());
        for card in &cards {
            info!("  {} - {} ({})", card.index, card.id, card.name);
        }
    }

    Ok(cards)
}

/// Find the card answering to `name`
pub fn find_card(name: &str) -> Result<SoundCard, HwError> {
    let cards = enumerate_cards()?;
    select_card(&cards, name).cloned()
}

fn select_card<'a>(cards: &'a [SoundCard], name: &str) -> Result<&'a SoundCard, HwError> {
    cards
        .iter()
        .find(|card| card.matches(name))
        .ok_or_else(|| HwError::CardNotFound {
            name: name.to_string(),
            available: cards
                .iter()
                .map(|c| c.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<SoundCard> {
        vec![
            SoundCard {
                index: 0,
                id: "Headphones".to_string(),
                name: "bcm2835 Headphones".to_string(),
            },
            SoundCard {
                index: 2,
                id: "BossDAC".to_string(),
                name: "Boss DAC".to_string(),
            },
        ]
    }

    #[test]
    fn test_select_by_id() {
        let cards = cards();
        let card = select_card(&cards, "BossDAC").unwrap();
        assert_eq!(card.index, 2);
        assert_eq!(card.hw_name(), "hw:2");
    }

    #[test]
    fn test_select_by_name() {
        let cards = cards();
        let card = select_card(&cards, "bcm2835 Headphones").unwrap();
        assert_eq!(card.index, 0);
    }

    #[test]
    fn test_missing_card_lists_available() {
        let cards = cards();
        let err = select_card(&cards, "HifiBerry").unwrap_err();
        assert_eq!(
            err.to_string(),
            "sound card HifiBerry not found (available: Headphones, BossDAC)"
        );
    }
}
