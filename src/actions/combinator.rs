//! Combinator actions.
//!
//! Each owns its inner actions. Their single event only queues further
//! steps, so every inner resolution is fully drained (hook, window and
//! anything those spawn) before the next one starts.

use std::fmt;
use std::sync::Arc;

use super::card::merge_targets;
use super::context::Context;
use super::target::{Amount, ResolvedProperties, TargetFn, TargetKind, Targets};
use super::{Action, ActionKind, GameAction};
use crate::core::{EntityId, GameState};
use crate::pipeline::{Event, EventName, Pipeline};

/// Live predicate choosing a conditional's branch.
pub type ConditionFn = Arc<dyn Fn(&Context, &GameState) -> bool>;

const NO_KINDS: &[TargetKind] = &[];

/// Repeat an inner action, either a fixed number of times or once per
/// entity a collection yields.
///
/// ```
/// use std::sync::Arc;
/// use keyforge_pipeline::actions::{Action, Context, GameAction};
/// use keyforge_pipeline::cards::CardRegistry;
/// use keyforge_pipeline::core::{EngineConfig, GameState, PlayerId};
/// use keyforge_pipeline::pipeline::Pipeline;
///
/// let mut game = GameState::new(EngineConfig::default(), Arc::new(CardRegistry::new()), &["A", "B"], 0);
/// let mut pipeline = Pipeline::new();
///
/// GameAction::sequential_for_each(3, GameAction::gain_amber(2))
///     .resolve(Context::new(PlayerId::new(0)), &mut pipeline);
/// pipeline.drain(&mut game);
///
/// assert_eq!(game.player(PlayerId::new(0)).amber, 6);
/// ```
#[derive(Clone)]
pub struct SequentialForEachAction {
    /// Repetitions; when not positive the collection size is used.
    pub count: Amount,
    for_each: Option<TargetFn>,
    inner: Option<Box<GameAction>>,
}

impl SequentialForEachAction {
    /// Repeat a fixed number of times.
    #[must_use]
    pub fn new(count: Amount) -> Self {
        Self {
            count,
            for_each: None,
            inner: None,
        }
    }

    /// Repeat once per entity `source` yields at resolution time.
    #[must_use]
    pub fn over(source: TargetFn) -> Self {
        Self {
            count: Amount::Fixed(0),
            for_each: Some(source),
            inner: None,
        }
    }

    #[must_use]
    pub fn with_inner(mut self, inner: GameAction) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    #[must_use]
    pub fn inner(&self) -> Option<&GameAction> {
        self.inner.as_deref()
    }

    /// Number of repetitions in the current state.
    #[must_use]
    pub fn repetitions(&self, context: &Context, game: &GameState) -> i64 {
        let count = self.count.resolve(context, game);
        if count > 0 {
            return count;
        }
        self.for_each
            .as_ref()
            .map_or(0, |source| source(context, game).len() as i64)
    }

    fn repeat_event(&self, inner: GameAction, context: &Context, game: &GameState) -> Event {
        let repetitions = self.repetitions(context, game);
        let ctx = context.clone();
        Event::new(EventName::Unnamed, context.clone(), move |pipeline, _| {
            let kind = inner.kind();
            for i in 1..=repetitions {
                let (action, hook_ctx) = (inner.clone(), ctx.clone());
                pipeline.queue_labelled_step(
                    format!("{kind} {i}/{repetitions}: pre-event"),
                    move |p, g| action.pre_event(&hook_ctx, p, g),
                );
                let (action, window_ctx) = (inner.clone(), ctx.clone());
                pipeline.queue_labelled_step(
                    format!("{kind} {i}/{repetitions}: window"),
                    move |p, g| {
                        let events = action.event_array(&window_ctx, g);
                        p.open_event_window(events);
                    },
                );
            }
            repetitions > 0
        })
        .with_amount(repetitions)
    }
}

impl fmt::Debug for SequentialForEachAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialForEachAction")
            .field("count", &self.count)
            .field("for_each", &self.for_each.as_ref().map(|_| ".."))
            .field("inner", &self.inner)
            .finish()
    }
}

impl Action for SequentialForEachAction {
    fn kind(&self) -> ActionKind {
        ActionKind::SequentialForEach
    }

    fn target_kinds(&self) -> &'static [TargetKind] {
        self.inner.as_ref().map_or(NO_KINDS, |inner| inner.target_kinds())
    }

    fn effect_template(&self) -> &str {
        self.inner.as_ref().map_or("", |inner| inner.effect_template())
    }

    fn set_target(&mut self, targets: Targets) {
        if let Some(inner) = self.inner.as_mut() {
            inner.set_target(targets);
        }
    }

    fn set_default_target(&mut self, resolver: TargetFn) {
        if let Some(inner) = self.inner.as_mut() {
            inner.set_default_target(resolver);
        }
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self
                .inner
                .as_ref()
                .map(|inner| inner.update(context, game).targets)
                .unwrap_or_default(),
            amount: self.repetitions(context, game),
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.can_affect(target, context, game))
    }

    fn has_legal_target(&self, context: &Context, game: &GameState) -> bool {
        self.inner.is_some() && self.repetitions(context, game) > 0
    }

    fn event(&self, _target: EntityId, context: &Context, game: &GameState) -> Event {
        match self.inner.as_deref() {
            Some(inner) => self.repeat_event(inner.clone(), context, game),
            None => no_op(context),
        }
    }

    fn event_array(&self, context: &Context, game: &GameState) -> Vec<Event> {
        match self.inner.as_deref() {
            Some(inner) if self.has_legal_target(context, game) => {
                vec![self.repeat_event(inner.clone(), context, game)]
            }
            _ => Vec::new(),
        }
    }

    fn effect_message(&self, context: &Context, game: &GameState) -> String {
        self.inner
            .as_ref()
            .map(|inner| inner.effect_message(context, game))
            .unwrap_or_default()
    }
}

/// Resolve several actions in order, each with its own legality gate and
/// window.
#[derive(Clone, Debug)]
pub struct SequentialAction {
    actions: Vec<GameAction>,
}

impl SequentialAction {
    #[must_use]
    pub fn new(actions: Vec<GameAction>) -> Self {
        Self { actions }
    }

    #[must_use]
    pub fn actions(&self) -> &[GameAction] {
        &self.actions
    }

    fn sequence_event(&self, context: &Context) -> Event {
        let (actions, ctx) = (self.actions.clone(), context.clone());
        Event::new(EventName::Unnamed, context.clone(), move |pipeline, _| {
            for action in &actions {
                action.resolve(ctx.clone(), pipeline);
            }
            true
        })
    }
}

impl Action for SequentialAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Sequential
    }

    fn target_kinds(&self) -> &'static [TargetKind] {
        self.actions.first().map_or(NO_KINDS, |action| action.target_kinds())
    }

    fn effect_template(&self) -> &str {
        "{0}"
    }

    fn set_target(&mut self, targets: Targets) {
        for action in &mut self.actions {
            action.set_target(targets.clone());
        }
    }

    fn set_default_target(&mut self, resolver: TargetFn) {
        for action in &mut self.actions {
            action.set_default_target(resolver.clone());
        }
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: merge_targets(self.actions.iter().map(|a| a.update(context, game).targets)),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        self.actions.iter().any(|a| a.can_affect(target, context, game))
    }

    fn has_legal_target(&self, context: &Context, game: &GameState) -> bool {
        self.actions.iter().any(|a| a.has_legal_target(context, game))
    }

    fn event(&self, _target: EntityId, context: &Context, _game: &GameState) -> Event {
        self.sequence_event(context)
    }

    fn event_array(&self, context: &Context, game: &GameState) -> Vec<Event> {
        if self.has_legal_target(context, game) {
            vec![self.sequence_event(context)]
        } else {
            Vec::new()
        }
    }

    fn effect_message(&self, context: &Context, game: &GameState) -> String {
        self.actions
            .iter()
            .filter(|a| a.has_legal_target(context, game))
            .map(|a| a.effect_message(context, game))
            .collect::<Vec<_>>()
            .join(", then ")
    }
}

/// Delegate to one of two actions, chosen from the live state each time
/// the action is consulted.
#[derive(Clone)]
pub struct ConditionalAction {
    condition: ConditionFn,
    if_true: Box<GameAction>,
    if_false: Option<Box<GameAction>>,
}

impl ConditionalAction {
    pub fn new(
        condition: impl Fn(&Context, &GameState) -> bool + 'static,
        if_true: GameAction,
        if_false: Option<GameAction>,
    ) -> Self {
        Self {
            condition: Arc::new(condition),
            if_true: Box::new(if_true),
            if_false: if_false.map(Box::new),
        }
    }

    /// The branch the current state selects, if any.
    #[must_use]
    pub fn branch(&self, context: &Context, game: &GameState) -> Option<&GameAction> {
        if (self.condition)(context, game) {
            Some(self.if_true.as_ref())
        } else {
            self.if_false.as_deref()
        }
    }
}

impl fmt::Debug for ConditionalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalAction")
            .field("if_true", &self.if_true)
            .field("if_false", &self.if_false)
            .finish_non_exhaustive()
    }
}

impl Action for ConditionalAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Conditional
    }

    fn target_kinds(&self) -> &'static [TargetKind] {
        self.if_true.target_kinds()
    }

    fn effect_template(&self) -> &str {
        self.if_true.effect_template()
    }

    fn set_target(&mut self, targets: Targets) {
        if let Some(if_false) = self.if_false.as_mut() {
            if_false.set_target(targets.clone());
        }
        self.if_true.set_target(targets);
    }

    fn set_default_target(&mut self, resolver: TargetFn) {
        if let Some(if_false) = self.if_false.as_mut() {
            if_false.set_default_target(resolver.clone());
        }
        self.if_true.set_default_target(resolver);
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        self.branch(context, game)
            .map(|action| action.update(context, game))
            .unwrap_or_default()
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        self.branch(context, game)
            .is_some_and(|action| action.can_affect(target, context, game))
    }

    fn has_legal_target(&self, context: &Context, game: &GameState) -> bool {
        self.branch(context, game)
            .is_some_and(|action| action.has_legal_target(context, game))
    }

    fn pre_event(&self, context: &Context, pipeline: &mut Pipeline, game: &mut GameState) {
        if let Some(action) = self.branch(context, game).cloned() {
            action.pre_event(context, pipeline, game);
        }
    }

    fn event(&self, target: EntityId, context: &Context, game: &GameState) -> Event {
        match self.branch(context, game) {
            Some(action) => action.event(target, context, game),
            None => no_op(context),
        }
    }

    fn event_array(&self, context: &Context, game: &GameState) -> Vec<Event> {
        self.branch(context, game)
            .map(|action| action.event_array(context, game))
            .unwrap_or_default()
    }

    fn effect_message(&self, context: &Context, game: &GameState) -> String {
        self.branch(context, game)
            .map(|action| action.effect_message(context, game))
            .unwrap_or_default()
    }
}

fn no_op(context: &Context) -> Event {
    Event::new(EventName::Unnamed, context.clone(), |_, _| false)
}
