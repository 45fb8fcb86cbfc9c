//! Card filters.
//!
//! Declarative predicates over card instances, used by ability target
//! prompts and by actions that affect every matching card.

use serde::{Deserialize, Serialize};

use super::context::Context;
use super::target::Targets;
use crate::cards::{CardInstance, CardKind, House};
use crate::core::GameState;
use crate::zones::Location;

/// Filter for valid card targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFilter {
    // === Location ===

    /// Card must be in the play area.
    InPlay,
    /// Card must be in the given location.
    InLocation(Location),

    // === Card Properties ===

    Kind(CardKind),
    House(House),
    Stunned,
    Exhausted,

    // === Relative to the Context ===

    /// Controlled by the acting player.
    Friendly,
    /// Controlled by someone other than the acting player.
    Enemy,
    /// Not the context's source card.
    NotSource,

    // === Combinators ===

    All(Vec<CardFilter>),
    Any(Vec<CardFilter>),
    Not(Box<CardFilter>),
}

impl CardFilter {
    /// Any creature in play.
    #[must_use]
    pub fn creature() -> Self {
        Self::All(vec![Self::InPlay, Self::Kind(CardKind::Creature)])
    }

    /// A creature in play controlled by the acting player.
    #[must_use]
    pub fn friendly_creature() -> Self {
        Self::creature().and(Self::Friendly)
    }

    /// A creature in play controlled by an opponent.
    #[must_use]
    pub fn enemy_creature() -> Self {
        Self::creature().and(Self::Enemy)
    }

    /// Add another filter with AND.
    #[must_use]
    pub fn and(self, other: CardFilter) -> Self {
        match self {
            Self::All(mut filters) => {
                filters.push(other);
                Self::All(filters)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    #[must_use]
    pub fn matches(&self, card: &CardInstance, context: &Context, game: &GameState) -> bool {
        match self {
            Self::InPlay => card.in_play(),
            Self::InLocation(location) => card.location == *location,
            Self::Kind(kind) => game
                .registry()
                .get(card.card_id)
                .is_some_and(|d| d.kind == *kind),
            Self::House(house) => game
                .registry()
                .get(card.card_id)
                .is_some_and(|d| d.house == *house),
            Self::Stunned => card.is_stunned(),
            Self::Exhausted => card.exhausted,
            Self::Friendly => card.controller == context.player,
            Self::Enemy => card.controller != context.player,
            Self::NotSource => context.source != Some(card.entity_id),
            Self::All(filters) => filters.iter().all(|f| f.matches(card, context, game)),
            Self::Any(filters) => filters.iter().any(|f| f.matches(card, context, game)),
            Self::Not(inner) => !inner.matches(card, context, game),
        }
    }

    /// Every matching card, ordered by entity id.
    #[must_use]
    pub fn select(&self, context: &Context, game: &GameState) -> Targets {
        let mut found: Targets = game
            .cards()
            .filter(|card| self.matches(card, context, game))
            .map(|card| card.entity_id)
            .collect();
        found.sort();
        found
    }
}
