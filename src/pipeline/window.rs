//! Event windows.
//!
//! Opening a window gives interrupt triggers a chance to cancel events,
//! then queues one step per surviving event followed by a close step.
//! Closing records the outcome and queues matching reactions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::{Event, EventId, EventRecord, WindowId};
use super::{Pipeline, Step, StepKind};
use crate::core::GameState;
use crate::triggers::{TriggerResponse, TriggerTiming};

/// Outcome of a window's events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    /// One record per event, in the order the events were given.
    pub events: Vec<EventRecord>,
    pub closed: bool,
}

impl WindowRecord {
    fn new(id: WindowId) -> Self {
        Self {
            id,
            events: Vec::new(),
            closed: false,
        }
    }

    /// Did at least one event resolve?
    #[must_use]
    pub fn any_resolved(&self) -> bool {
        self.events.iter().any(|e| e.resolved)
    }

    pub fn resolved(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(|e| e.resolved)
    }
}

impl Pipeline {
    /// Queue a window over `events`; returns its id immediately so later
    /// steps can inspect the outcome.
    pub fn open_event_window(&mut self, events: Vec<Event>) -> WindowId {
        let id = WindowId(self.next_window);
        self.next_window += 1;
        self.windows.insert(id, WindowRecord::new(id));
        self.push(Step {
            label: format!("open {id}"),
            kind: StepKind::OpenWindow(id, events),
        });
        id
    }

    /// Outcome of a window that has not been pruned yet. Windows are
    /// pruned once the pipeline drains completely.
    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.get(&id)
    }

    pub(super) fn run_open_window(&mut self, id: WindowId, events: Vec<Event>, game: &mut GameState) {
        let mut pending = Vec::with_capacity(events.len());
        for mut event in events {
            let record = EventRecord::pending(EventId(self.next_event), id, &event);
            self.next_event += 1;
            if !event.is_cancelled() {
                self.run_interrupts(&mut event, &record, game);
            }
            let record = EventRecord {
                cancelled: event.is_cancelled(),
                ..record
            };
            pending.push((record, event));
        }

        debug!(window = id.0, events = pending.len(), "event window opened");
        if let Some(window) = self.windows.get_mut(&id) {
            window.events = pending.iter().map(|(record, _)| record.clone()).collect();
        }

        for (index, (record, event)) in pending.into_iter().enumerate() {
            if record.cancelled {
                debug!(window = id.0, event = %record.name, "event cancelled");
                continue;
            }
            let handler = event.into_handler();
            self.push(Step::simple(
                format!("{id}: {}", record.name),
                move |pipeline, game| {
                    let resolved = handler(pipeline, game);
                    pipeline.mark_event(id, index, resolved);
                },
            ));
        }

        self.push(Step {
            label: format!("close {id}"),
            kind: StepKind::CloseWindow(id),
        });
    }

    fn run_interrupts(&mut self, event: &mut Event, record: &EventRecord, game: &mut GameState) {
        let matching = {
            let view: &GameState = game;
            view.triggers.matching(record, view, TriggerTiming::Interrupt)
        };

        for trigger in matching {
            let Some(firing) = game.triggers.fire(trigger) else {
                continue;
            };
            match firing.response {
                TriggerResponse::Cancel => {
                    debug!(trigger = %firing.name, event = %record.name, "interrupt cancels event");
                    event.cancel();
                    break;
                }
                TriggerResponse::Resolve(ref action) => {
                    action.resolve(firing.context(record), self);
                }
            }
        }
    }

    fn mark_event(&mut self, id: WindowId, index: usize, resolved: bool) {
        if let Some(record) = self
            .windows
            .get_mut(&id)
            .and_then(|w| w.events.get_mut(index))
        {
            record.resolved = resolved;
        }
    }

    pub(super) fn run_close_window(&mut self, id: WindowId, game: &mut GameState) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        window.closed = true;
        let records = window.events.clone();
        self.event_log.extend(records.iter().cloned());
        debug!(
            window = id.0,
            resolved = records.iter().filter(|r| r.resolved).count(),
            "event window closed"
        );

        let mut reactions = Vec::new();
        {
            let view: &GameState = game;
            for (index, record) in records.iter().enumerate().filter(|(_, r)| r.resolved) {
                for trigger in view.triggers.matching(record, view, TriggerTiming::Reaction) {
                    let priority = view.triggers.get(trigger).map_or(0, |t| t.priority);
                    reactions.push((priority, index, trigger));
                }
            }
        }
        // Higher priority first, then event order, then registration order.
        reactions.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        for (_, index, trigger) in reactions {
            let Some(firing) = game.triggers.fire(trigger) else {
                continue;
            };
            if let TriggerResponse::Resolve(ref action) = firing.response {
                debug!(trigger = %firing.name, "reaction queued");
                action.resolve(firing.context(&records[index]), self);
            }
        }
    }
}
