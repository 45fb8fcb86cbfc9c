//! Chat command driver.
//!
//! Operators type slash commands into the game chat. Parsing produces a
//! typed [`Command`]; executing it either mutates state directly (keys,
//! tokens, clocks, active house) or hands an action to the pipeline,
//! exactly as a card would.
//!
//! ```
//! use std::sync::Arc;
//! use keyforge_pipeline::cards::CardRegistry;
//! use keyforge_pipeline::commands::execute_command;
//! use keyforge_pipeline::core::{EngineConfig, GameState, PlayerId};
//! use keyforge_pipeline::pipeline::Pipeline;
//!
//! let mut game = GameState::new(EngineConfig::default(), Arc::new(CardRegistry::new()), &["Alice", "Bob"], 0);
//! let mut pipeline = Pipeline::new();
//! let alice = PlayerId::new(0);
//!
//! assert!(execute_command(&mut game, &mut pipeline, alice, "/forge"));
//! assert_eq!(game.player(alice).keys, 1);
//! assert!(!execute_command(&mut game, &mut pipeline, alice, "/teleport"));
//! ```

mod driver;
mod parser;

pub use driver::execute_command;
pub use parser::{number_or_default, Command, CommandError};
