//! The step pipeline.
//!
//! Resolution is an explicit work queue rather than recursion. A step is
//! a boxed closure receiving the pipeline and the game state; running it
//! may queue more steps, open event windows, or present a prompt.
//!
//! ## Ordering
//!
//! Steps queued from outside the pipeline append to the back of the
//! queue. Steps queued *while a step runs* are staged and, once that step
//! returns, spliced onto the front of the queue in the order they were
//! queued. Everything a step spawns therefore drains before the next
//! step that was already waiting:
//!
//! ```
//! use std::sync::Arc;
//! use keyforge_pipeline::cards::CardRegistry;
//! use keyforge_pipeline::core::{EngineConfig, GameState};
//! use keyforge_pipeline::pipeline::{Pipeline, ResolutionStatus};
//!
//! let mut game = GameState::new(EngineConfig::default(), Arc::new(CardRegistry::new()), &["A", "B"], 0);
//! let mut pipeline = Pipeline::new();
//!
//! pipeline.queue_labelled_step("a", |p, _| {
//!     p.queue_labelled_step("a.1", |_, _| {});
//!     p.queue_labelled_step("a.2", |_, _| {});
//! });
//! pipeline.queue_labelled_step("b", |_, _| {});
//!
//! assert_eq!(pipeline.drain(&mut game), ResolutionStatus::Complete);
//! assert_eq!(pipeline.history(), ["a", "a.1", "a.2", "b"]);
//! ```
//!
//! ## Suspension
//!
//! A prompt step halts draining with `ResolutionStatus::WaitingForPrompt`.
//! The remaining queue is untouched; `respond` runs the prompt's handler
//! and resumes, `cancel_step` drops the prompt and lets draining continue.

mod event;
mod prompt;
mod window;

use std::collections::VecDeque;
use std::fmt;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use event::{Event, EventHandler, EventId, EventName, EventRecord, WindowId};
pub use prompt::{CardCondition, Prompt, PromptError, PromptResponse};
pub use window::WindowRecord;

use crate::actions::{Context, GameAction};
use crate::core::{GameState, PlayerId};

/// A unit of queued work.
pub type StepFn = Box<dyn FnOnce(&mut Pipeline, &mut GameState)>;

enum StepKind {
    Simple(StepFn),
    OpenWindow(WindowId, Vec<Event>),
    CloseWindow(WindowId),
    Prompt(Prompt),
}

struct Step {
    label: String,
    kind: StepKind,
}

impl Step {
    fn simple(label: String, f: impl FnOnce(&mut Pipeline, &mut GameState) + 'static) -> Self {
        Self {
            label,
            kind: StepKind::Simple(Box::new(f)),
        }
    }
}

/// Result of draining the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStatus {
    /// The queue is empty.
    Complete,
    /// Draining halted on a prompt owed by this player.
    WaitingForPrompt(PlayerId),
}

/// Step queue with event windows and prompt suspension.
#[derive(Default)]
pub struct Pipeline {
    queue: VecDeque<Step>,
    staged: Vec<Step>,
    in_step: bool,
    pending: Option<Prompt>,
    windows: FxHashMap<WindowId, WindowRecord>,
    next_window: u32,
    next_event: u32,
    history: Vec<String>,
    event_log: Vector<EventRecord>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an anonymous step.
    pub fn queue_simple_step(&mut self, step: impl FnOnce(&mut Pipeline, &mut GameState) + 'static) {
        self.queue_labelled_step("step", step);
    }

    /// Queue a step; the label shows up in `history` and debug logs.
    pub fn queue_labelled_step(
        &mut self,
        label: impl Into<String>,
        step: impl FnOnce(&mut Pipeline, &mut GameState) + 'static,
    ) {
        self.push(Step::simple(label.into(), step));
    }

    /// Queue a prompt.
    pub fn queue_prompt(&mut self, prompt: Prompt) {
        self.push(Step {
            label: format!("prompt: {}", prompt.title),
            kind: StepKind::Prompt(prompt),
        });
    }

    /// Queue the resolution of the ability carried by `context`.
    pub fn resolve_ability(&mut self, context: Context) {
        crate::abilities::resolve_ability(self, context);
    }

    /// Queue an action: legality gate, pre-event hook, event window.
    pub fn resolve_action(&mut self, action: &GameAction, context: Context) {
        action.resolve(context, self);
    }

    fn push(&mut self, step: Step) {
        if self.in_step {
            self.staged.push(step);
        } else {
            self.queue.push_back(step);
        }
    }

    /// Steps waiting to run, excluding a pending prompt.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len() + self.staged.len()
    }

    /// Nothing queued and no prompt pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.pending.is_none()
    }

    #[must_use]
    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> ResolutionStatus {
        match &self.pending {
            Some(prompt) => ResolutionStatus::WaitingForPrompt(prompt.player),
            None => ResolutionStatus::Complete,
        }
    }

    /// Run steps until the queue is empty or a prompt is pending.
    pub fn drain(&mut self, game: &mut GameState) -> ResolutionStatus {
        while self.pending.is_none() {
            let Some(step) = self.queue.pop_front() else {
                // Windows only matter to steps still in flight.
                self.windows.retain(|_, w| !w.closed);
                break;
            };
            self.run(step, game);
        }
        self.status()
    }

    fn run(&mut self, step: Step, game: &mut GameState) {
        debug!(step = %step.label, "running step");
        self.history.push(step.label);

        self.in_step = true;
        match step.kind {
            StepKind::Simple(f) => f(self, game),
            StepKind::OpenWindow(id, events) => self.run_open_window(id, events, game),
            StepKind::CloseWindow(id) => self.run_close_window(id, game),
            StepKind::Prompt(prompt) => self.present(prompt, game),
        }
        self.in_step = false;
        self.splice_staged();
    }

    fn splice_staged(&mut self) {
        for step in self.staged.drain(..).rev() {
            self.queue.push_front(step);
        }
    }

    fn present(&mut self, mut prompt: Prompt, game: &GameState) {
        if !prompt.refresh(game) {
            debug!(title = %prompt.title, "prompt skipped: nothing to choose");
            return;
        }
        debug!(player = prompt.player.0, title = %prompt.title, "prompt presented");
        self.pending = Some(prompt);
    }

    /// Answer the pending prompt and resume draining.
    pub fn respond(
        &mut self,
        player: PlayerId,
        response: PromptResponse,
        game: &mut GameState,
    ) -> Result<ResolutionStatus, PromptError> {
        let Some(prompt) = self.pending.take() else {
            warn!(player = player.0, "response with no prompt pending");
            return Err(PromptError::NoPendingPrompt);
        };
        if let Err(err) = prompt.validate(player, response, game) {
            warn!(player = player.0, %err, "prompt response rejected");
            self.pending = Some(prompt);
            return Err(err);
        }

        debug!(player = player.0, ?response, "prompt answered");
        self.history.push(format!("answer: {}", prompt.title));
        self.in_step = true;
        prompt.answer(response, self, game);
        self.in_step = false;
        self.splice_staged();

        Ok(self.drain(game))
    }

    /// Administrative skip: discard the pending prompt without running
    /// its handler. Returns `false` if nothing was pending. Call `drain`
    /// afterwards to continue.
    pub fn cancel_step(&mut self) -> bool {
        match self.pending.take() {
            Some(prompt) => {
                debug!(title = %prompt.title, "prompt cancelled");
                self.history.push(format!("cancelled: {}", prompt.title));
                true
            }
            None => false,
        }
    }

    /// Labels of every step run so far, in order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Records of every closed window's events, in close order.
    #[must_use]
    pub fn event_log(&self) -> &Vector<EventRecord> {
        &self.event_log
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("queued", &self.len())
            .field("pending", &self.pending)
            .field("open_windows", &self.windows.len())
            .field("events_logged", &self.event_log.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::actions::Context;
    use crate::cards::{CardDefinition, CardId, CardRegistry, House};
    use crate::core::{EngineConfig, EntityId};
    use crate::triggers::{Trigger, TriggerTiming};
    use crate::zones::Location;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn game() -> GameState {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::creature(CardId::new(1), "Troll", House::Brobnar, 8))
            .unwrap();
        GameState::new(EngineConfig::default(), Arc::new(registry), &["Alice", "Bob"], 7)
    }

    fn noop_event(context: &Context, log: &str) -> Event {
        let label = log.to_string();
        Event::new(EventName::Unnamed, context.clone(), move |p, _| {
            p.history.push(label);
            true
        })
    }

    #[test]
    fn test_top_level_steps_run_fifo() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        for label in ["one", "two", "three"] {
            pipeline.queue_labelled_step(label, |_, _| {});
        }
        assert_eq!(pipeline.len(), 3);
        assert_eq!(pipeline.drain(&mut game), ResolutionStatus::Complete);
        assert_eq!(pipeline.history(), ["one", "two", "three"]);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_nested_steps_drain_depth_first() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        pipeline.queue_labelled_step("a", |p, _| {
            p.queue_labelled_step("a.1", |p, _| p.queue_labelled_step("a.1.x", |_, _| {}));
            p.queue_labelled_step("a.2", |_, _| {});
        });
        pipeline.queue_labelled_step("b", |_, _| {});

        pipeline.drain(&mut game);
        assert_eq!(pipeline.history(), ["a", "a.1", "a.1.x", "a.2", "b"]);
    }

    #[test]
    fn test_window_runs_events_in_order_then_closes() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        let context = Context::new(P0);
        let id = pipeline.open_event_window(vec![
            noop_event(&context, "first"),
            noop_event(&context, "second"),
        ]);

        pipeline.drain(&mut game);
        let history = pipeline.history();
        let first = history.iter().position(|h| h == "first").unwrap();
        let second = history.iter().position(|h| h == "second").unwrap();
        let close = history.iter().position(|h| h == "close window 0").unwrap();
        assert!(first < second && second < close);

        // Pruned after a complete drain; outcome kept in the log.
        assert!(pipeline.window(id).is_none());
        assert_eq!(pipeline.event_log().len(), 2);
        assert!(pipeline.event_log().iter().all(|r| r.resolved && r.window == id));
    }

    #[test]
    fn test_pre_cancelled_event_never_runs() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        let context = Context::new(P0);
        let mut cancelled = noop_event(&context, "cancelled");
        cancelled.cancel();

        pipeline.open_event_window(vec![cancelled, noop_event(&context, "kept")]);
        pipeline.drain(&mut game);

        assert!(!pipeline.history().iter().any(|h| h == "cancelled"));
        assert!(pipeline.history().iter().any(|h| h == "kept"));
        let log: Vec<_> = pipeline.event_log().iter().cloned().collect();
        assert!(log[0].cancelled && !log[0].resolved);
        assert!(log[1].resolved);
    }

    #[test]
    fn test_interrupt_cancels_matching_event() {
        let mut game = game();
        let troll = game.create_card(CardId::new(1), P1, Location::PlayArea);
        game.triggers.register(
            Trigger::interrupt("Shield", EventName::Stun, P1)
                .with_condition(crate::triggers::TriggerCondition::CardIs(troll)),
        );

        let mut pipeline = Pipeline::new();
        let context = Context::new(P0);
        let guarded = Event::new(EventName::Stun, context.clone(), |_, _| true).with_card(troll);
        let other = Event::new(EventName::Stun, context, |_, _| true).with_card(EntityId(99));
        pipeline.open_event_window(vec![guarded, other]);
        pipeline.drain(&mut game);

        let log: Vec<_> = pipeline.event_log().iter().cloned().collect();
        assert!(log[0].cancelled);
        assert!(log[1].resolved);
        assert_eq!(
            game.triggers.iter().filter(|t| t.timing == TriggerTiming::Interrupt).count(),
            1
        );
    }

    #[test]
    fn test_prompt_suspends_and_resumes() {
        let mut game = game();
        let troll = game.create_card(CardId::new(1), P0, Location::PlayArea);
        let mut pipeline = Pipeline::new();

        pipeline.queue_prompt(Prompt::select_card(
            P0,
            "Choose a creature",
            |card, _| card.in_play(),
            |card, p, _| p.queue_labelled_step(format!("picked {}", card.0), |_, _| {}),
        ));
        pipeline.queue_labelled_step("after", |_, _| {});

        assert_eq!(pipeline.drain(&mut game), ResolutionStatus::WaitingForPrompt(P0));
        assert_eq!(pipeline.pending_prompt().unwrap().candidates(), &[troll]);
        assert!(!pipeline.history().iter().any(|h| h == "after"));

        let status = pipeline
            .respond(P0, PromptResponse::Card(troll), &mut game)
            .unwrap();
        assert_eq!(status, ResolutionStatus::Complete);
        let tail: Vec<_> = pipeline.history().iter().rev().take(2).cloned().collect();
        assert_eq!(tail, ["after".to_string(), format!("picked {}", troll.0)]);
    }

    #[test]
    fn test_rejected_responses_leave_prompt_pending() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        pipeline.queue_prompt(Prompt::choice(P0, "Continue?", ["Yes", "No"], |_, _, _| {}));
        pipeline.drain(&mut game);

        assert_eq!(
            pipeline.respond(P1, PromptResponse::Choice(0), &mut game),
            Err(PromptError::WrongPlayer { expected: P0, actual: P1 })
        );
        assert_eq!(
            pipeline.respond(P0, PromptResponse::Choice(2), &mut game),
            Err(PromptError::InvalidChoice(2))
        );
        assert_eq!(
            pipeline.respond(P0, PromptResponse::Cancel, &mut game),
            Err(PromptError::NotCancellable)
        );
        assert!(pipeline.pending_prompt().is_some());
        assert_eq!(
            pipeline.respond(P0, PromptResponse::Choice(1), &mut game),
            Ok(ResolutionStatus::Complete)
        );
        assert_eq!(
            pipeline.respond(P0, PromptResponse::Choice(1), &mut game),
            Err(PromptError::NoPendingPrompt)
        );
    }

    #[test]
    fn test_prompt_without_candidates_is_skipped() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        pipeline.queue_prompt(Prompt::select_card(P0, "Nothing", |_, _| false, |_, _, _| {}));
        assert_eq!(pipeline.drain(&mut game), ResolutionStatus::Complete);
    }

    #[test]
    fn test_cancel_step_skips_handler() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        pipeline.queue_prompt(
            Prompt::choice(P0, "Pick", ["only"], |_, p, _| {
                p.queue_labelled_step("handler ran", |_, _| {});
            })
            .cancellable(false),
        );
        pipeline.queue_labelled_step("after", |_, _| {});
        pipeline.drain(&mut game);

        assert!(pipeline.cancel_step());
        assert!(!pipeline.cancel_step());
        assert_eq!(pipeline.drain(&mut game), ResolutionStatus::Complete);
        assert!(pipeline.history().iter().any(|h| h == "after"));
        assert!(!pipeline.history().iter().any(|h| h == "handler ran"));
    }
}
