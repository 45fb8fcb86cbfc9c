//! Interrupts and reactions keyed by the event names they listen for.
//!
//! A window asks for matching interrupts as it opens and for matching
//! reactions as it closes.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::actions::{Context, GameAction};
use crate::core::{EntityId, GameState, PlayerId};
use crate::pipeline::{EventName, EventRecord};

use super::condition::TriggerCondition;

/// Handle returned by [`TriggerRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger #{}", self.0)
    }
}

/// When in the window lifecycle the trigger fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    /// As the window opens, before its events execute.
    Interrupt,
    /// After the window closes, for events that resolved.
    #[default]
    Reaction,
}

/// What a trigger does when it fires.
#[derive(Clone, Debug)]
pub enum TriggerResponse {
    /// Cancel the matched event. Only meaningful for interrupts.
    Cancel,
    /// Resolve an action for the trigger's controller.
    Resolve(GameAction),
}

/// A card ability (or rule) waiting on an event name.
#[derive(Clone, Debug)]
pub struct Trigger {
    /// Assigned on registration.
    pub id: TriggerId,

    /// Shown in logs and pipeline step labels.
    pub name: String,

    /// Owning card; `None` for rules that outlive every card.
    pub source: Option<EntityId>,

    /// The player resolving the response.
    pub controller: PlayerId,

    /// Event names this trigger listens for.
    pub event_names: Vec<EventName>,

    /// Checked against the event record after the name matches.
    pub condition: TriggerCondition,

    pub timing: TriggerTiming,

    pub response: TriggerResponse,

    /// Remaining firings; `None` never runs out.
    pub uses_remaining: Option<u32>,

    /// Higher priority fires first; ties fall back to registration order.
    pub priority: i32,
}

impl Trigger {
    fn new(
        name: impl Into<String>,
        event_name: EventName,
        controller: PlayerId,
        timing: TriggerTiming,
        response: TriggerResponse,
    ) -> Self {
        Self {
            id: TriggerId(0),
            name: name.into(),
            source: None,
            controller,
            event_names: vec![event_name],
            condition: TriggerCondition::Always,
            timing,
            response,
            uses_remaining: None,
            priority: 0,
        }
    }

    /// An interrupt that cancels matching events.
    pub fn interrupt(name: impl Into<String>, event_name: EventName, controller: PlayerId) -> Self {
        Self::new(
            name,
            event_name,
            controller,
            TriggerTiming::Interrupt,
            TriggerResponse::Cancel,
        )
    }

    /// A reaction resolving `action` after matching events resolve.
    pub fn reaction(
        name: impl Into<String>,
        event_name: EventName,
        controller: PlayerId,
        action: GameAction,
    ) -> Self {
        Self::new(
            name,
            event_name,
            controller,
            TriggerTiming::Reaction,
            TriggerResponse::Resolve(action),
        )
    }

    /// Tie the trigger to a card so it leaves with it.
    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: TriggerCondition) -> Self {
        self.condition = condition;
        self
    }

    /// An interrupt resolving an action runs it ahead of the window's
    /// events instead of cancelling.
    #[must_use]
    pub fn with_response(mut self, response: TriggerResponse) -> Self {
        self.response = response;
        self
    }

    #[must_use]
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.uses_remaining = Some(uses);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn has_uses(&self) -> bool {
        self.uses_remaining != Some(0)
    }

    fn spend_use(&mut self) {
        if let Some(uses) = self.uses_remaining.as_mut() {
            *uses = uses.saturating_sub(1);
        }
    }
}

/// A trigger that has fired, detached from the registry.
#[derive(Clone, Debug)]
pub struct TriggerFiring {
    pub trigger_id: TriggerId,
    pub name: String,
    pub controller: PlayerId,
    pub source: Option<EntityId>,
    pub response: TriggerResponse,
}

impl TriggerFiring {
    /// Fresh context for the response: the trigger's controller acting,
    /// its card as source, the event's card as target.
    #[must_use]
    pub fn context(&self, event: &EventRecord) -> Context {
        let mut context = Context::new(self.controller);
        context.source = self.source;
        context.target = event.card;
        context
    }
}

/// Every live trigger in the game, indexed by event name.
#[derive(Clone, Debug, Default)]
pub struct TriggerRegistry {
    triggers: FxHashMap<TriggerId, Trigger>,
    by_event: FxHashMap<EventName, Vec<TriggerId>>,
    next_id: u32,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a trigger under a fresh id.
    pub fn register(&mut self, mut trigger: Trigger) -> TriggerId {
        self.next_id += 1;
        let id = TriggerId(self.next_id);
        trigger.id = id;

        for name in &trigger.event_names {
            self.by_event.entry(*name).or_default().push(id);
        }

        self.triggers.insert(id, trigger);
        id
    }

    pub fn unregister(&mut self, id: TriggerId) -> Option<Trigger> {
        let trigger = self.triggers.remove(&id)?;
        for name in &trigger.event_names {
            let emptied = self.by_event.get_mut(name).is_some_and(|ids| {
                ids.retain(|other| *other != id);
                ids.is_empty()
            });
            if emptied {
                self.by_event.remove(name);
            }
        }
        Some(trigger)
    }

    #[must_use]
    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    /// Triggers of the given timing that would fire for `event`, sorted by
    /// priority (higher first), then by ID.
    #[must_use]
    pub fn matching(
        &self,
        event: &EventRecord,
        game: &GameState,
        timing: TriggerTiming,
    ) -> Vec<TriggerId> {
        let Some(ids) = self.by_event.get(&event.name) else {
            return Vec::new();
        };

        let mut found: Vec<(i32, TriggerId)> = ids
            .iter()
            .filter_map(|id| self.triggers.get(id))
            .filter(|t| t.timing == timing && t.has_uses())
            .filter(|t| t.condition.evaluate(event, game))
            .map(|t| (t.priority, t.id))
            .collect();

        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        found.into_iter().map(|(_, id)| id).collect()
    }

    /// Consume a use and detach the response. `None` if the trigger is
    /// gone or exhausted.
    pub fn fire(&mut self, id: TriggerId) -> Option<TriggerFiring> {
        let trigger = self.triggers.get_mut(&id)?;
        if !trigger.has_uses() {
            return None;
        }
        trigger.spend_use();
        Some(TriggerFiring {
            trigger_id: id,
            name: trigger.name.clone(),
            controller: trigger.controller,
            source: trigger.source,
            response: trigger.response.clone(),
        })
    }

    /// Drop everything a card registered, e.g. when it leaves play.
    pub fn remove_for_source(&mut self, source: EntityId) {
        let owned: Vec<TriggerId> = self
            .triggers
            .iter()
            .filter_map(|(id, t)| (t.source == Some(source)).then_some(*id))
            .collect();
        for id in owned {
            self.unregister(id);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.values()
    }
}
