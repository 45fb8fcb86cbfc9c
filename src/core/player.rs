//! Players and per-player storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier; players are 0-based.
//!
//! ## PlayerMap
//!
//! `Vec`-backed per-player storage indexed by `PlayerId`.
//!
//! ## Player
//!
//! Per-player game data: name, forged keys, amber pool, chess clock and
//! active house.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::clock::Clock;
use crate::cards::House;

/// Player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Seat index, for `Vec` lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every seat, in order.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The next player in seat order (the opponent in a two-player game).
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One `T` per seat, indexed by [`PlayerId`].
///
/// ```
/// use keyforge_pipeline::core::{PlayerId, PlayerMap};
///
/// let mut keys: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// keys[PlayerId::new(1)] += 1;
/// assert_eq!(keys[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "a game needs a player");
        assert!(player_count <= 255, "seat ids are u8");

        Self {
            data: (0..player_count as u8).map(|i| factory(PlayerId(i))).collect(),
        }
    }

    /// Create a map with every entry set to `value`.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Seats paired with their values.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over mutable values in seat order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// The house a player has declared for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveHouse {
    /// A declared house; cards of this house may be used.
    Chosen(House),
    /// A turn in progress with no house selected.
    Unaligned,
}

impl ActiveHouse {
    /// Does this selection allow using cards of `house`?
    #[must_use]
    pub fn allows(self, house: House) -> bool {
        matches!(self, ActiveHouse::Chosen(chosen) if chosen == house)
    }
}

/// Per-player game data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat.
    pub id: PlayerId,
    /// Display name used in spectator messages.
    pub name: String,
    /// Forged keys.
    pub keys: u32,
    /// Amber in the player's pool.
    pub amber: u32,
    /// Chess clock.
    pub clock: Clock,
    /// Active house; `None` outside the player's turn.
    pub active_house: Option<ActiveHouse>,
    /// Set by `/disconnectme`; the transport layer closes the session.
    pub disconnect_requested: bool,
}

impl Player {
    /// Create a player with an empty pool and no active house.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, clock: Clock) -> Self {
        Self {
            id,
            name: name.into(),
            keys: 0,
            amber: 0,
            clock,
            active_house: None,
            disconnect_requested: false,
        }
    }
}
