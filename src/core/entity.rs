//! Entity identification.
//!
//! Players and cards share one id space so that actions can target either
//! through a single `EntityId`:
//! - `0..player_count`: players
//! - `player_count..`: card instances, allocated by `GameState`
//!
//! ```
//! use keyforge_pipeline::core::{EntityId, PlayerId};
//!
//! let player = EntityId::player(PlayerId::new(1));
//! assert!(player.is_player(2));
//! assert_eq!(player.as_player(2), Some(PlayerId::new(1)));
//!
//! let card = EntityId(7);
//! assert!(!card.is_player(2));
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Unique identifier for a player or a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Entity id of a player.
    #[must_use]
    pub const fn player(id: PlayerId) -> Self {
        Self(id.0 as u32)
    }

    /// First id available to cards in a game with `player_count` players.
    #[must_use]
    pub const fn first_card(player_count: usize) -> u32 {
        player_count as u32
    }

    /// Does this id refer to a player?
    #[must_use]
    pub const fn is_player(self, player_count: usize) -> bool {
        self.0 < player_count as u32
    }

    /// Convert to a `PlayerId` if this is a player entity.
    #[must_use]
    pub fn as_player(self, player_count: usize) -> Option<PlayerId> {
        if self.is_player(player_count) {
            Some(PlayerId::new(self.0 as u8))
        } else {
            None
        }
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<PlayerId> for EntityId {
    fn from(id: PlayerId) -> Self {
        Self::player(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_entities() {
        assert!(EntityId(0).is_player(2));
        assert!(EntityId(1).is_player(2));
        assert!(!EntityId(2).is_player(2));
        assert_eq!(EntityId::first_card(2), 2);
    }

    #[test]
    fn test_as_player() {
        assert_eq!(EntityId(1).as_player(2), Some(PlayerId::new(1)));
        assert_eq!(EntityId(5).as_player(2), None);
        assert_eq!(EntityId::from(PlayerId::new(1)), EntityId(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(12);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<EntityId>(&json).unwrap(), id);
    }
}
