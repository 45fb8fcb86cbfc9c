//! # keyforge-pipeline
//!
//! The rules-resolution core of a KeyForge-style card game server: turns a
//! card's declared ability into an ordered sequence of legal, observable
//! game-state mutations.
//!
//! ## Design Principles
//!
//! 1. **Actions are data**: every effect kind implements one `Action`
//!    contract (legality, targets, events, message). Cards combine them
//!    declaratively; no card reimplements sequencing or targeting.
//!
//! 2. **One work queue**: the `Pipeline` drains steps front to back.
//!    Steps queued while a step runs go ahead of everything queued
//!    before it, so nested effects resolve depth-first without recursion.
//!
//! 3. **Explicit state**: `GameState` is passed by reference into every
//!    action and step. It is read anywhere and mutated only inside event
//!    handlers and administrative commands.
//!
//! ## Example
//!
//! ```
//! use keyforge_pipeline::abilities::AbilityRole;
//! use keyforge_pipeline::cards::catalog::TROLL;
//! use keyforge_pipeline::cards::House;
//! use keyforge_pipeline::core::{ActiveHouse, PlayerId};
//! use keyforge_pipeline::game::GameBuilder;
//! use keyforge_pipeline::pipeline::ResolutionStatus;
//! use keyforge_pipeline::zones::Location;
//!
//! let mut game = GameBuilder::new().build(1).unwrap();
//! let alice = PlayerId::new(0);
//! let troll = game.state.create_card(TROLL, alice, Location::PlayArea);
//! game.state.player_mut(alice).active_house = Some(ActiveHouse::Chosen(House::Brobnar));
//!
//! let status = game.activate(alice, troll, AbilityRole::Reap).unwrap();
//! assert_eq!(status, ResolutionStatus::Complete);
//! assert_eq!(game.state.player(alice).amber, 1);
//! ```
//!
//! ## Modules
//!
//! - `core`: Entity ids, players, clocks, RNG, configuration, game state
//! - `zones`: Per-player card piles
//! - `cards`: Card definitions, instances, registry and sample catalog
//! - `abilities`: Typed ability roles, requirements and ability resolution
//! - `actions`: The `Action` contract and every action kind
//! - `pipeline`: Step queue, event windows and prompts
//! - `triggers`: Interrupts and reactions
//! - `commands`: Chat command driver
//! - `game`: Top-level facade and builder

pub mod core;
pub mod zones;
pub mod cards;
pub mod abilities;
pub mod actions;
pub mod pipeline;
pub mod triggers;
pub mod commands;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    EngineConfig, EntityId, GameRng, GameState, PlayerId, PlayerMap,
};

pub use crate::zones::{Location, ZoneManager, ZonePosition};

pub use crate::cards::{CardDefinition, CardId, CardInstance, CardRegistry, House, TokenKind};

pub use crate::abilities::{AbilityEffect, AbilityRole, CardAbility, Requirement};

pub use crate::actions::{Action, Context, GameAction};

pub use crate::pipeline::{Event, EventName, Pipeline, Prompt, PromptResponse, ResolutionStatus};

pub use crate::triggers::{Trigger, TriggerCondition, TriggerRegistry, TriggerTiming};

pub use crate::game::{Game, GameBuilder};
