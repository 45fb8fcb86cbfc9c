//! Trigger system for interrupts and reactions.
//!
//! Triggers let cards respond to events without the resolving action
//! knowing about them.
//!
//! ## Key Components
//!
//! - [`TriggerCondition`]: Rules for when a trigger fires
//! - [`Trigger`]: A complete trigger definition
//! - [`TriggerRegistry`]: Storage and lookup for triggers
//!
//! ## Timing
//!
//! - `Interrupt` triggers run when a window opens, before any of its
//!   events execute. They may cancel the event they matched.
//! - `Reaction` triggers run when a window closes, once for each matching
//!   event that resolved, in priority order.
//!
//! ## Example Usage
//!
//! ```
//! use keyforge_pipeline::actions::GameAction;
//! use keyforge_pipeline::core::{EntityId, PlayerId};
//! use keyforge_pipeline::pipeline::EventName;
//! use keyforge_pipeline::triggers::{Trigger, TriggerCondition, TriggerRegistry};
//!
//! let mut registry = TriggerRegistry::new();
//!
//! // "After this creature is dealt damage, gain 1 amber."
//! let id = registry.register(
//!     Trigger::reaction("Thick Hide", EventName::Damage, PlayerId::new(0), GameAction::gain_amber(1))
//!         .with_source(EntityId(10))
//!         .with_condition(TriggerCondition::CardIs(EntityId(10))),
//! );
//!
//! assert_eq!(registry.get(id).unwrap().name, "Thick Hide");
//! ```

mod condition;
mod registry;

pub use condition::TriggerCondition;
pub use registry::{
    Trigger, TriggerFiring, TriggerId, TriggerRegistry, TriggerResponse, TriggerTiming,
};
