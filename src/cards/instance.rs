//! Card instances - runtime card state.
//!
//! `CardInstance` represents a specific card in a game at a specific
//! moment. Tokens are plain counters keyed by `TokenKind`; a creature is
//! stunned while it carries a stun token.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::CardId;
use super::house::TokenKind;
use crate::core::{EntityId, PlayerId};
use crate::zones::Location;

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// Reference to the card definition.
    pub card_id: CardId,

    /// Owner (whose deck the card started in).
    pub owner: PlayerId,

    /// Controller; equals the owner outside the play area.
    pub controller: PlayerId,

    /// Mirrors the `ZoneManager`; only `GameState` moves cards.
    pub location: Location,

    pub facedown: bool,

    pub exhausted: bool,

    #[serde(default)]
    pub tokens: FxHashMap<TokenKind, i64>,
}

impl CardInstance {
    /// Create a card instance controlled by its owner.
    #[must_use]
    pub fn new(entity_id: EntityId, card_id: CardId, owner: PlayerId, location: Location) -> Self {
        Self {
            entity_id,
            card_id,
            owner,
            controller: owner,
            location,
            facedown: location.is_hidden(),
            exhausted: false,
            tokens: FxHashMap::default(),
        }
    }

    /// Token count (zero when absent).
    #[must_use]
    pub fn tokens(&self, kind: TokenKind) -> i64 {
        self.tokens.get(&kind).copied().unwrap_or(0)
    }

    /// Add (or remove, with a negative delta) tokens. Counts never go
    /// below zero; empty entries are dropped.
    pub fn add_tokens(&mut self, kind: TokenKind, delta: i64) {
        let count = self.tokens(kind).saturating_add(delta).max(0);
        if count == 0 {
            self.tokens.remove(&kind);
        } else {
            self.tokens.insert(kind, count);
        }
    }

    #[must_use]
    pub fn is_stunned(&self) -> bool {
        self.tokens(TokenKind::Stun) > 0
    }

    pub fn set_stunned(&mut self, stunned: bool) {
        if stunned {
            self.tokens.insert(TokenKind::Stun, 1);
        } else {
            self.tokens.remove(&TokenKind::Stun);
        }
    }

    #[must_use]
    pub fn in_play(&self) -> bool {
        self.location == Location::PlayArea
    }

    /// Reset everything a card loses when it leaves play.
    pub fn reset_play_state(&mut self) {
        self.tokens.clear();
        self.exhausted = false;
        self.controller = self.owner;
    }
}
