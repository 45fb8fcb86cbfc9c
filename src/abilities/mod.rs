//! Card abilities.
//!
//! A `CardAbility` is the data a card carries for one of its uses: a
//! typed role, an optional target prompt, costs, and an effect chain.
//! Roles form a closed set so that the engine finds "the fight ability"
//! or "the remove-stun ability" by tag, and the card registry can reject
//! incomplete creature data when it is loaded.
//!
//! `resolve_ability` turns a context carrying an ability into pipeline
//! steps: target prompt, costs, effect, then follow-ups.

mod ability;
mod requirement;
mod resolver;

pub use ability::{AbilityCost, AbilityEffect, AbilityRole, AbilityTarget, CardAbility};
pub use requirement::Requirement;

pub(crate) use resolver::resolve_ability;
