//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` tracks which pile each card is in and handles
//! movement between piles. Every pile is ordered; index 0 is the bottom
//! and the last index is the top.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, GameRng, PlayerId};

/// Where a card is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    Deck,
    Hand,
    PlayArea,
    Discard,
    Archives,
    Purged,
}

impl Location {
    /// Is this location hidden from the opponent?
    #[must_use]
    pub fn is_hidden(self) -> bool {
        matches!(self, Location::Deck | Location::Hand | Location::Archives)
    }
}

/// Position for inserting a card into a pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Add to top of the pile (e.g., top of deck).
    Top,
    /// Add to bottom of the pile.
    Bottom,
    /// Insert at specific index (0 = bottom).
    Index(usize),
}

type Pile = (PlayerId, Location);

/// Tracks the pile of every card.
///
/// ```
/// use keyforge_pipeline::core::{EntityId, PlayerId};
/// use keyforge_pipeline::zones::{Location, ZoneManager, ZonePosition};
///
/// let mut zones = ZoneManager::new();
/// let p0 = PlayerId::new(0);
///
/// zones.add(EntityId(10), p0, Location::Deck, None);
/// zones.add(EntityId(11), p0, Location::Deck, Some(ZonePosition::Bottom));
///
/// assert_eq!(zones.top(p0, Location::Deck), Some(EntityId(10)));
/// zones.move_to(EntityId(10), p0, Location::Hand, None);
/// assert_eq!(zones.cards_in(p0, Location::Hand), &[EntityId(10)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    /// Card locations: entity_id -> pile
    locations: FxHashMap<EntityId, Pile>,

    /// Ordered card lists per pile.
    piles: FxHashMap<Pile, Vec<EntityId>>,
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card to a pile.
    ///
    /// Panics if the entity is already tracked.
    pub fn add(
        &mut self,
        entity: EntityId,
        player: PlayerId,
        location: Location,
        position: Option<ZonePosition>,
    ) {
        if self.locations.contains_key(&entity) {
            panic!("Entity {:?} already exists in zone manager", entity);
        }
        self.locations.insert(entity, (player, location));
        Self::insert(self.piles.entry((player, location)).or_default(), entity, position);
    }

    /// Move a card to another pile.
    ///
    /// Returns the old pile, or `None` if the card wasn't found. Moving
    /// within the same pile repositions the card.
    pub fn move_to(
        &mut self,
        entity: EntityId,
        player: PlayerId,
        location: Location,
        position: Option<ZonePosition>,
    ) -> Option<(PlayerId, Location)> {
        let old = self.locations.get(&entity).copied()?;

        if let Some(order) = self.piles.get_mut(&old) {
            order.retain(|&e| e != entity);
        }
        self.locations.insert(entity, (player, location));
        Self::insert(self.piles.entry((player, location)).or_default(), entity, position);

        Some(old)
    }

    fn insert(order: &mut Vec<EntityId>, entity: EntityId, position: Option<ZonePosition>) {
        match position.unwrap_or(ZonePosition::Top) {
            ZonePosition::Top => order.push(entity),
            ZonePosition::Bottom => order.insert(0, entity),
            ZonePosition::Index(i) => {
                let idx = i.min(order.len());
                order.insert(idx, entity);
            }
        }
    }

    /// Cards in a pile, bottom first.
    #[must_use]
    pub fn cards_in(&self, player: PlayerId, location: Location) -> &[EntityId] {
        self.piles
            .get(&(player, location))
            .map_or(&[], |v| v.as_slice())
    }

    /// Number of cards in a pile.
    #[must_use]
    pub fn len(&self, player: PlayerId, location: Location) -> usize {
        self.cards_in(player, location).len()
    }

    /// Top card of a pile.
    #[must_use]
    pub fn top(&self, player: PlayerId, location: Location) -> Option<EntityId> {
        self.cards_in(player, location).last().copied()
    }

    /// Shuffle a pile in place.
    pub fn shuffle(&mut self, player: PlayerId, location: Location, rng: &mut GameRng) {
        if let Some(order) = self.piles.get_mut(&(player, location)) {
            rng.shuffle(order);
        }
    }
}
