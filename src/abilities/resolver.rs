//! Ability resolution.
//!
//! Everything here only queues steps; nothing runs until the pipeline
//! drains. The chosen target, if any, flows into the rest of the
//! resolution through `Context::target`.

use std::sync::Arc;

use tracing::debug;

use super::ability::{AbilityCost, AbilityEffect, CardAbility};
use crate::actions::{Action, Context, GameAction};
use crate::core::{EntityId, GameState, MessageArg};
use crate::pipeline::{Pipeline, Prompt};

/// Queue the resolution of `context.ability`: target prompt, costs,
/// effect chain. A context without an ability resolves nothing.
pub(crate) fn resolve_ability(pipeline: &mut Pipeline, context: Context) {
    let Some(ability) = context.ability.clone() else {
        debug!(player = context.player.0, "resolve_ability without an ability");
        return;
    };

    match &ability.target {
        Some(target) => {
            let (filter, condition_ctx) = (target.filter.clone(), context.clone());
            let (chosen_ability, chosen_ctx) = (Arc::clone(&ability), context.clone());
            let on_select = move |chosen: EntityId, p: &mut Pipeline, _: &mut GameState| {
                pay_and_resolve(&chosen_ability, chosen_ctx.with_target(chosen), p);
            };
            let prompt = Prompt::select_card(
                context.player,
                target.prompt.clone(),
                move |card, game| filter.matches(card, &condition_ctx, game),
                on_select,
            )
            .cancellable(context.cancellable);
            pipeline.queue_prompt(prompt);
        }
        None => pay_and_resolve(&ability, context, pipeline),
    }
}

fn pay_and_resolve(ability: &Arc<CardAbility>, context: Context, pipeline: &mut Pipeline) {
    if !ability.costs.is_empty() {
        let (costs, ctx) = (ability.costs.clone(), context.clone());
        pipeline.queue_labelled_step(format!("pay costs: {}", ability.title), move |p, g| {
            let mut events = Vec::new();
            for cost in &costs {
                match cost {
                    AbilityCost::Exhaust => {
                        let exhaust = GameAction::exhaust();
                        events.extend(exhaust.event_array(&ctx, g));
                    }
                }
            }
            p.open_event_window(events);
        });
    }
    resolve_effect(Arc::clone(&ability.effect), context, pipeline);
}

/// Queue one link of an effect chain, asking first if it is optional.
fn resolve_effect(effect: Arc<AbilityEffect>, context: Context, pipeline: &mut Pipeline) {
    let label = format!("effect: {}", effect.action.kind());
    pipeline.queue_labelled_step(label, move |p, g| {
        let Some(question) = effect.may.clone() else {
            run_effect(effect, context, p, g);
            return;
        };
        if !effect.action.has_legal_target(&context, g) {
            debug!(action = %effect.action.kind(), "optional effect has nothing to do");
            return;
        }

        let player = context.player;
        let cancellable = context.cancellable;
        let prompt = Prompt::choice(
            player,
            format!("Do you wish to {question}?"),
            ["Yes", "No"],
            move |choice, p, g| {
                if choice == 0 {
                    run_effect(effect, context, p, g);
                }
            },
        )
        .cancellable(cancellable);
        p.queue_prompt(prompt);
    });
}

/// Legality gate, spectator message, then the action's hook and window.
/// The next link is queued behind the window and checks its outcome.
fn run_effect(effect: Arc<AbilityEffect>, context: Context, pipeline: &mut Pipeline, game: &mut GameState) {
    let kind = effect.action.kind();
    if !effect.action.has_legal_target(&context, game) {
        debug!(action = %kind, "effect has no legal target");
        return;
    }

    announce(&effect, &context, game);

    let (hook, hook_ctx) = (effect.action.clone(), context.clone());
    pipeline.queue_labelled_step(format!("{kind}: pre-event"), move |p, g| {
        hook.pre_event(&hook_ctx, p, g);
    });

    pipeline.queue_labelled_step(format!("{kind}: window"), move |p, g| {
        let events = effect.action.event_array(&context, g);
        let window = p.open_event_window(events);

        let Some(next) = effect.then.clone() else {
            return;
        };
        p.queue_labelled_step("then", move |p, _| {
            if p.window(window).is_some_and(|w| w.any_resolved()) {
                resolve_effect(next, context, p);
            } else {
                debug!(window = window.0, "follow-up skipped: nothing resolved");
            }
        });
    });
}

fn announce(effect: &AbilityEffect, context: &Context, game: &mut GameState) {
    let source = match (context.source, &context.ability) {
        (Some(card), _) => MessageArg::Entity(card),
        (None, Some(ability)) => MessageArg::Text(ability.title.clone()),
        (None, None) => MessageArg::Text(String::new()),
    };

    match &effect.message {
        Some(template) => {
            let targets = effect.action.update(context, game).targets.to_vec();
            game.add_message(
                template,
                &[context.player.into(), source, MessageArg::Entities(targets)],
            );
        }
        None => {
            let description = effect.action.effect_message(context, game);
            game.add_message(
                "{0} uses {1} to {2}",
                &[context.player.into(), source, MessageArg::Text(description)],
            );
        }
    }
}
