//! Game state.
//!
//! `GameState` is the single mutable view of a game: players, card
//! instances and their locations, triggers, the RNG and the spectator
//! message log. The pipeline receives it explicitly on every step rather
//! than holding a reference.
//!
//! Card movement goes through `move_card` so that the `ZoneManager` and
//! each `CardInstance::location` never disagree.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::config::EngineConfig;
use super::entity::EntityId;
use super::messages::{render_with, GameMessage, MessageArg, MessageLevel};
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use super::clock::Clock;
use crate::cards::{CardDefinition, CardId, CardInstance, CardRegistry, TokenKind};
use crate::triggers::TriggerRegistry;
use crate::zones::{Location, ZoneManager, ZonePosition};

/// Complete game state.
#[derive(Clone, Debug)]
pub struct GameState {
    config: EngineConfig,
    registry: Arc<CardRegistry>,

    pub players: PlayerMap<Player>,

    cards: FxHashMap<EntityId, CardInstance>,
    zones: ZoneManager,

    /// Interrupts and reactions consulted by event windows.
    pub triggers: TriggerRegistry,

    pub rng: GameRng,

    messages: Vector<GameMessage>,

    /// Toggled by `/manual`.
    pub manual_mode: bool,

    /// Set once any player has used `/cancel-prompt`.
    pub cancel_prompt_used: bool,

    next_entity: u32,
}

impl GameState {
    /// Create a game with one player per name.
    ///
    /// Panics if `names` is empty.
    pub fn new(
        config: EngineConfig,
        registry: Arc<CardRegistry>,
        names: &[&str],
        seed: u64,
    ) -> Self {
        let clock = Clock::new(config.starting_clock);
        let players = PlayerMap::new(names.len(), |id| {
            Player::new(id, names[id.index()], clock.clone())
        });

        Self {
            config,
            registry,
            players,
            cards: FxHashMap::default(),
            zones: ZoneManager::new(),
            triggers: TriggerRegistry::new(),
            rng: GameRng::new(seed),
            messages: Vector::new(),
            manual_mode: false,
            cancel_prompt_used: false,
            next_entity: EntityId::first_card(names.len()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Iterate over all player IDs in seat order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count())
    }

    /// Whether `id` names a seat at this table.
    #[must_use]
    pub fn has_player(&self, id: PlayerId) -> bool {
        id.index() < self.player_count()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    // === Cards ===

    /// Create a card instance owned by `owner` on top of the given pile.
    pub fn create_card(&mut self, card_id: CardId, owner: PlayerId, location: Location) -> EntityId {
        let entity = EntityId(self.next_entity);
        self.next_entity += 1;

        self.cards
            .insert(entity, CardInstance::new(entity, card_id, owner, location));
        self.zones.add(entity, owner, location, Some(ZonePosition::Top));
        entity
    }

    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    pub fn card_mut(&mut self, id: EntityId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&id)
    }

    /// All card instances, in no particular order.
    pub fn cards(&self) -> impl Iterator<Item = &CardInstance> {
        self.cards.values()
    }

    /// Definition of a card instance.
    #[must_use]
    pub fn definition(&self, id: EntityId) -> Option<&CardDefinition> {
        self.registry.get(self.cards.get(&id)?.card_id)
    }

    /// Cards in a pile, bottom first.
    #[must_use]
    pub fn cards_in(&self, player: PlayerId, location: Location) -> &[EntityId] {
        self.zones.cards_in(player, location)
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[EntityId] {
        self.cards_in(player, Location::Hand)
    }

    /// Creatures in play, in seat then play order.
    #[must_use]
    pub fn creatures_in_play(&self) -> Vec<EntityId> {
        self.player_ids()
            .flat_map(|p| self.cards_in(p, Location::PlayArea).iter().copied())
            .filter(|&id| self.definition(id).is_some_and(CardDefinition::is_creature))
            .collect()
    }

    #[must_use]
    pub fn is_creature_in_play(&self, id: EntityId) -> bool {
        self.card(id).is_some_and(CardInstance::in_play)
            && self.definition(id).is_some_and(CardDefinition::is_creature)
    }

    /// Printed power plus power tokens.
    #[must_use]
    pub fn power(&self, id: EntityId) -> i64 {
        let printed = self.definition(id).map_or(0, |d| d.power);
        let tokens = self.card(id).map_or(0, |c| c.tokens(TokenKind::Power));
        printed.saturating_add(tokens)
    }

    /// Move a card to a location. Cards enter the play area on their
    /// controller's side and every other pile on their owner's side.
    /// Leaving play clears tokens and exhaustion.
    ///
    /// Returns the previous location, or `None` for an unknown card.
    pub fn move_card(
        &mut self,
        id: EntityId,
        location: Location,
        position: Option<ZonePosition>,
    ) -> Option<Location> {
        let card = self.cards.get_mut(&id)?;
        let from = card.location;

        if from == Location::PlayArea && location != Location::PlayArea {
            card.reset_play_state();
        }
        let side = if location == Location::PlayArea {
            card.controller
        } else {
            card.owner
        };
        card.location = location;
        card.facedown = location.is_hidden();

        self.zones.move_to(id, side, location, position);
        debug!(card = id.raw(), ?from, to = ?location, "card moved");
        Some(from)
    }

    /// Draw up to `count` cards from the top of the deck. Returns the
    /// number actually drawn.
    pub fn draw_cards(&mut self, player: PlayerId, count: u32) -> u32 {
        let mut drawn = 0;
        for _ in 0..count {
            let Some(top) = self.zones.top(player, Location::Deck) else {
                break;
            };
            self.move_card(top, Location::Hand, None);
            drawn += 1;
        }
        drawn
    }

    /// Shuffle a player's deck with the game RNG.
    pub fn shuffle_deck(&mut self, player: PlayerId) {
        self.zones.shuffle(player, Location::Deck, &mut self.rng);
    }

    // === Messages ===

    /// Display name of a player or card.
    #[must_use]
    pub fn name_of(&self, id: EntityId) -> String {
        if let Some(player) = id.as_player(self.player_count()) {
            return self.players[player].name.clone();
        }
        self.definition(id)
            .map_or_else(|| id.to_string(), |d| d.name.clone())
    }

    /// Append an informational chat message.
    pub fn add_message(&mut self, template: &str, args: &[MessageArg]) {
        self.push_message(MessageLevel::Info, template, args);
    }

    /// Append a highlighted chat message.
    pub fn add_alert(&mut self, template: &str, args: &[MessageArg]) {
        self.push_message(MessageLevel::Alert, template, args);
    }

    fn push_message(&mut self, level: MessageLevel, template: &str, args: &[MessageArg]) {
        let text = render_with(template, args, |id| self.name_of(id));
        self.messages.push_back(GameMessage { level, text });
    }

    /// Render a template without logging it.
    #[must_use]
    pub fn render(&self, template: &str, args: &[MessageArg]) -> String {
        render_with(template, args, |id| self.name_of(id))
    }

    #[must_use]
    pub fn messages(&self) -> &Vector<GameMessage> {
        &self.messages
    }

    /// Text of the most recent message.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.messages.back().map(|m| m.text.as_str())
    }
}
