//! Game setup.

use std::sync::Arc;

use thiserror::Error;

use crate::cards::{catalog, CardId, CardRegistry, CatalogError};
use crate::core::{EngineConfig, GameState, PlayerId};
use crate::zones::Location;

use super::Game;

/// Why a game could not be set up.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("a game needs between 1 and 255 players, got {0}")]
    PlayerCount(usize),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Builder for a [`Game`].
///
/// ```
/// use keyforge_pipeline::cards::catalog::{TROLL, ZORG};
/// use keyforge_pipeline::core::PlayerId;
/// use keyforge_pipeline::game::GameBuilder;
///
/// let game = GameBuilder::new()
///     .deck(0, vec![TROLL; 4])
///     .deck(1, vec![ZORG; 4])
///     .starting_hand(2)
///     .build(42)
///     .unwrap();
///
/// assert_eq!(game.state.hand(PlayerId::new(0)).len(), 2);
/// ```
pub struct GameBuilder {
    names: Vec<String>,
    config: EngineConfig,
    registry: Option<Arc<CardRegistry>>,
    decks: Vec<Vec<CardId>>,
    starting_hand: u32,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            names: vec!["Player 1".to_string(), "Player 2".to_string()],
            config: EngineConfig::default(),
            registry: None,
            decks: Vec::new(),
            starting_hand: 0,
        }
    }
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Player names in seat order.
    #[must_use]
    pub fn players<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Card pool; the sample core set when not given.
    #[must_use]
    pub fn registry(mut self, registry: Arc<CardRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Deck contents for the player in `seat`, top card last.
    #[must_use]
    pub fn deck(mut self, seat: usize, cards: Vec<CardId>) -> Self {
        if self.decks.len() <= seat {
            self.decks.resize(seat + 1, Vec::new());
        }
        self.decks[seat] = cards;
        self
    }

    #[must_use]
    pub fn starting_hand(mut self, size: u32) -> Self {
        self.starting_hand = size;
        self
    }

    /// Build the game: create each deck, shuffle it and draw hands.
    pub fn build(self, seed: u64) -> Result<Game, SetupError> {
        if self.names.is_empty() || self.names.len() > usize::from(u8::MAX) {
            return Err(SetupError::PlayerCount(self.names.len()));
        }
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(catalog::core_set()?),
        };
        if let Some(&unknown) = self.decks.iter().flatten().find(|id| !registry.contains(**id)) {
            return Err(CatalogError::UnknownCard(unknown).into());
        }

        let names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        let mut state = GameState::new(self.config, registry, &names, seed);

        for (seat, deck) in self.decks.iter().enumerate().take(names.len()) {
            let player = PlayerId::new(seat as u8);
            for &card_id in deck {
                state.create_card(card_id, player, Location::Deck);
            }
            state.shuffle_deck(player);
        }

        for player in PlayerId::all(names.len()) {
            state.draw_cards(player, self.starting_hand);
        }

        Ok(Game::new(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::{DEXTRE, TROLL};

    #[test]
    fn test_defaults() {
        let game = GameBuilder::new().build(1).unwrap();
        assert_eq!(game.state.player_count(), 2);
        assert_eq!(game.state.player(PlayerId::new(1)).name, "Player 2");
        assert!(game.state.registry().contains(TROLL));
    }

    #[test]
    fn test_decks_and_hands() {
        let game = GameBuilder::new()
            .players(["Alice", "Bob", "Carol"])
            .deck(0, vec![TROLL, DEXTRE, TROLL])
            .deck(2, vec![DEXTRE])
            .starting_hand(2)
            .build(3)
            .unwrap();

        let alice = PlayerId::new(0);
        assert_eq!(game.state.hand(alice).len(), 2);
        assert_eq!(game.state.cards_in(alice, Location::Deck).len(), 1);
        assert!(game.state.hand(PlayerId::new(1)).is_empty());
        assert_eq!(game.state.hand(PlayerId::new(2)).len(), 1);
    }

    #[test]
    fn test_same_seed_same_deal() {
        let build = |seed| {
            GameBuilder::new()
                .deck(0, vec![TROLL, DEXTRE, TROLL, DEXTRE, TROLL, DEXTRE])
                .starting_hand(3)
                .build(seed)
                .unwrap()
        };
        let (a, b) = (build(9), build(9));
        let card_ids = |game: &Game| -> Vec<CardId> {
            game.state
                .hand(PlayerId::new(0))
                .iter()
                .map(|&id| game.state.card(id).unwrap().card_id)
                .collect()
        };
        assert_eq!(card_ids(&a), card_ids(&b));
    }

    #[test]
    fn test_unknown_card_rejected() {
        let result = GameBuilder::new().deck(0, vec![CardId::new(404)]).build(1);
        assert_eq!(
            result.err(),
            Some(SetupError::Catalog(CatalogError::UnknownCard(CardId::new(404))))
        );
    }

    #[test]
    fn test_seat_count_is_checked() {
        let empty: [&str; 0] = [];
        assert_eq!(
            GameBuilder::new().players(empty).build(1).err(),
            Some(SetupError::PlayerCount(0))
        );
        let crowd = (0..300).map(|i| format!("Seat {i}"));
        assert_eq!(
            GameBuilder::new().players(crowd).build(1).err(),
            Some(SetupError::PlayerCount(300))
        );
    }
}
