//! Events and their records.
//!
//! An `Event` is a pending mutation: metadata plus a handler closure that
//! the pipeline runs when the event's turn in its window comes. Handlers
//! re-check their preconditions against live state and return whether
//! they did anything.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Pipeline;
use crate::actions::Context;
use crate::core::{EntityId, GameState, PlayerId};

/// Runs the mutation; returns `true` if the event resolved.
pub type EventHandler = Box<dyn FnOnce(&mut Pipeline, &mut GameState) -> bool>;

/// Event tag, matched by triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    /// Generic event produced by combinators.
    Unnamed,
    Draw,
    Discard,
    ReturnToHand,
    ForgeKey,
    GainAmber,
    Stun,
    RemoveStun,
    Exhaust,
    Damage,
    Destroy,
    Fight,
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventName::Unnamed => "unnamed",
            EventName::Draw => "draw",
            EventName::Discard => "discard",
            EventName::ReturnToHand => "returnToHand",
            EventName::ForgeKey => "forgeKey",
            EventName::GainAmber => "gainAmber",
            EventName::Stun => "stun",
            EventName::RemoveStun => "removeStun",
            EventName::Exhaust => "exhaust",
            EventName::Damage => "damage",
            EventName::Destroy => "destroy",
            EventName::Fight => "fight",
        };
        f.write_str(name)
    }
}

/// Event window identifier, unique per pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window {}", self.0)
    }
}

/// Event identifier, unique per pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u32);

/// A pending state mutation.
pub struct Event {
    pub name: EventName,
    /// Card the event affects.
    pub card: Option<EntityId>,
    /// Player the event affects.
    pub player: Option<PlayerId>,
    /// Magnitude (cards drawn, damage dealt, amber paid).
    pub amount: i64,
    pub context: Context,
    cancelled: bool,
    handler: EventHandler,
}

impl Event {
    /// Create an event with no card, player or amount attached.
    pub fn new(
        name: EventName,
        context: Context,
        handler: impl FnOnce(&mut Pipeline, &mut GameState) -> bool + 'static,
    ) -> Self {
        Self {
            name,
            card: None,
            player: None,
            amount: 0,
            context,
            cancelled: false,
            handler: Box::new(handler),
        }
    }

    #[must_use]
    pub fn with_card(mut self, card: EntityId) -> Self {
        self.card = Some(card);
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// Prevent the handler from running.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(super) fn into_handler(self) -> EventHandler {
        self.handler
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("card", &self.card)
            .field("player", &self.player)
            .field("amount", &self.amount)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

/// What happened to an event, kept after its handler is gone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub window: WindowId,
    pub name: EventName,
    pub card: Option<EntityId>,
    pub player: Option<PlayerId>,
    pub amount: i64,
    pub resolved: bool,
    pub cancelled: bool,
}

impl EventRecord {
    pub(super) fn pending(id: EventId, window: WindowId, event: &Event) -> Self {
        Self {
            id,
            window,
            name: event.name,
            card: event.card,
            player: event.player,
            amount: event.amount,
            resolved: false,
            cancelled: event.cancelled,
        }
    }
}
