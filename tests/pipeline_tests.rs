//! Pipeline ordering, window and trigger integration tests.

use std::sync::Arc;

use proptest::prelude::*;

use keyforge_pipeline::actions::{Action, Context, GameAction};
use keyforge_pipeline::cards::{CardDefinition, CardId, CardRegistry, House};
use keyforge_pipeline::core::{EngineConfig, EntityId, GameState, PlayerId};
use keyforge_pipeline::pipeline::{Event, EventName, Pipeline, ResolutionStatus};
use keyforge_pipeline::triggers::{Trigger, TriggerCondition};
use keyforge_pipeline::zones::Location;

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);
const GRUNT: CardId = CardId::new(1);

fn game() -> GameState {
    let mut registry = CardRegistry::new();
    registry
        .register(CardDefinition::creature(GRUNT, "Grunt", House::Brobnar, 3))
        .unwrap();
    GameState::new(EngineConfig::default(), Arc::new(registry), &["Alice", "Bob"], 11)
}

fn position(history: &[String], label: &str) -> usize {
    history
        .iter()
        .position(|l| l == label)
        .unwrap_or_else(|| panic!("{label:?} never ran; history: {history:?}"))
}

fn queue_tree(pipeline: &mut Pipeline, label: String, fanouts: Vec<usize>) {
    pipeline.queue_labelled_step(label.clone(), move |p, _| {
        if let Some((&n, rest)) = fanouts.split_first() {
            for i in 0..n {
                queue_tree(p, format!("{label}.{i}"), rest.to_vec());
            }
        }
    });
}

fn pre_order(label: &str, fanouts: &[usize], out: &mut Vec<String>) {
    out.push(label.to_string());
    if let Some((&n, rest)) = fanouts.split_first() {
        for i in 0..n {
            pre_order(&format!("{label}.{i}"), rest, out);
        }
    }
}

proptest! {
    #[test]
    fn test_nested_steps_run_in_pre_order(
        roots in 1usize..4,
        fanouts in prop::collection::vec(0usize..4, 0..4),
    ) {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        let mut expected = Vec::new();
        for root in 0..roots {
            queue_tree(&mut pipeline, root.to_string(), fanouts.clone());
            pre_order(&root.to_string(), &fanouts, &mut expected);
        }

        prop_assert_eq!(pipeline.drain(&mut game), ResolutionStatus::Complete);
        prop_assert_eq!(pipeline.history(), expected.as_slice());
    }

    #[test]
    fn test_repetitions_never_interleave(count in 1i64..6) {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        GameAction::sequential_for_each(count, GameAction::gain_amber(1))
            .resolve(Context::new(P0), &mut pipeline);
        pipeline.drain(&mut game);

        prop_assert_eq!(i64::from(game.player(P0).amber), count);

        let history = pipeline.history();
        let mut last_close = 0;
        for i in 1..=count {
            let pre = position(history, &format!("gainAmber {i}/{count}: pre-event"));
            let window = position(history, &format!("gainAmber {i}/{count}: window"));
            prop_assert!(pre > last_close || i == 1);
            prop_assert!(window > pre);
            let close = history[window..]
                .iter()
                .position(|l| l.starts_with("close window"))
                .map(|offset| window + offset)
                .unwrap();
            prop_assert!(close > window);
            last_close = close;
        }
    }
}

#[test]
fn test_window_closes_after_nested_steps() {
    let mut game = game();
    let mut pipeline = Pipeline::new();

    pipeline.queue_labelled_step("open", |p, _| {
        let event = Event::new(EventName::Unnamed, Context::new(P0), |p, _| {
            p.queue_labelled_step("nested", |p, _| {
                p.queue_labelled_step("nested deeper", |_, _| {});
            });
            true
        });
        p.open_event_window(vec![event]);
    });
    pipeline.queue_labelled_step("after", |_, _| {});
    pipeline.drain(&mut game);

    assert_eq!(
        pipeline.history(),
        [
            "open",
            "open window 0",
            "window 0: unnamed",
            "nested",
            "nested deeper",
            "close window 0",
            "after",
        ]
    );
    assert!(pipeline.event_log()[0].resolved);
}

#[test]
fn test_cancelled_event_is_logged_but_never_runs() {
    let mut game = game();
    let mut pipeline = Pipeline::new();

    let mut cancelled = Event::new(EventName::GainAmber, Context::new(P0), |_, game| {
        game.player_mut(P0).amber += 5;
        true
    });
    cancelled.cancel();
    let kept = Event::new(EventName::GainAmber, Context::new(P1), |_, game| {
        game.player_mut(P1).amber += 1;
        true
    });
    pipeline.open_event_window(vec![cancelled, kept]);
    pipeline.drain(&mut game);

    assert_eq!(game.player(P0).amber, 0);
    assert_eq!(game.player(P1).amber, 1);

    let log = pipeline.event_log();
    assert_eq!(log.len(), 2);
    assert!(log[0].cancelled && !log[0].resolved);
    assert!(!log[1].cancelled && log[1].resolved);
}

#[test]
fn test_interrupt_protects_a_creature() {
    let mut game = game();
    let grunt = game.create_card(GRUNT, P1, Location::PlayArea);
    game.triggers.register(
        Trigger::interrupt("Ward", EventName::Destroy, P1)
            .with_condition(TriggerCondition::CardIs(grunt))
            .with_uses(1),
    );

    let mut pipeline = Pipeline::new();
    GameAction::destroy()
        .targeting([grunt])
        .resolve(Context::new(P0), &mut pipeline);
    pipeline.drain(&mut game);
    assert!(game.is_creature_in_play(grunt));

    // The ward is spent.
    GameAction::destroy()
        .targeting([grunt])
        .resolve(Context::new(P0), &mut pipeline);
    pipeline.drain(&mut game);
    assert_eq!(game.cards_in(P1, Location::Discard), &[grunt]);
}

#[test]
fn test_reaction_runs_after_its_window_closes() {
    let mut game = game();
    let grunt = game.create_card(GRUNT, P1, Location::PlayArea);
    game.triggers.register(Trigger::reaction(
        "Bounty",
        EventName::Destroy,
        P0,
        GameAction::gain_amber(2),
    ));

    let mut pipeline = Pipeline::new();
    GameAction::destroy()
        .targeting([grunt])
        .resolve(Context::new(P0), &mut pipeline);
    pipeline.drain(&mut game);

    assert_eq!(game.player(P0).amber, 2);
    let history = pipeline.history();
    assert!(position(history, "resolve gainAmber") > position(history, "close window 0"));
}

#[test]
fn test_reactions_only_fire_for_resolved_events() {
    let mut game = game();
    game.triggers.register(Trigger::reaction(
        "Greedy",
        EventName::ForgeKey,
        P0,
        GameAction::gain_amber(1),
    ));
    game.player_mut(P0).amber = 6;

    // The forge event is built while Alice can pay; the event before it
    // empties the pool, so the forge handler finds nothing to spend.
    let context = Context::new(P0);
    let spend = Event::new(EventName::Unnamed, context.clone(), |_, game| {
        game.player_mut(P0).amber = 0;
        true
    });
    let forge = GameAction::forge_key().event(EntityId::player(P0), &context, &game);

    let mut pipeline = Pipeline::new();
    pipeline.open_event_window(vec![spend, forge]);
    pipeline.drain(&mut game);

    assert_eq!(game.player(P0).keys, 0);
    assert_eq!(game.player(P0).amber, 0);
    assert!(!pipeline.event_log()[1].resolved);
}
