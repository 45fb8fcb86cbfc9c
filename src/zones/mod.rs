//! Card locations.
//!
//! Every card lives in exactly one pile: a (player, location) pair.
//! `ZoneManager` keeps the piles ordered so decks have a top card and
//! hands keep the order cards were drawn in.

mod manager;

pub use manager::{Location, ZoneManager, ZonePosition};
