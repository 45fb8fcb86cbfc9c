//! Core engine types: entities, players, clocks, RNG, configuration, state
//! and the spectator message log.

pub mod clock;
pub mod config;
pub mod entity;
pub mod messages;
pub mod player;
pub mod rng;
pub mod state;

pub use clock::{Clock, ClockState};
pub use config::{ConfigError, EngineConfig};
pub use entity::EntityId;
pub use messages::{GameMessage, MessageArg, MessageLevel};
pub use player::{ActiveHouse, Player, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::GameState;
