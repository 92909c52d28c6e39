//! The turn engine.
//!
//! This module contains `GameState`, which drives one game as a single
//! sequential pass per turn: roll, react to the robber, act, recompute the
//! awards. Policies only see the legal actions and the read-only state.

use crate::actions::{GameAction, GameEvent};
use crate::awards::{self, Award};
use crate::board::{Board, GenerationError, Harbor, PlayerId, Resource, TileId, VertexId};
use crate::config::{ConfigError, GameConfig};
use crate::player::{DevelopmentCard, Player, ResourceHand};
use crate::policy::Policy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Hands of this size or larger lose half their cards on a 7
const DISCARD_LIMIT: u32 = 8;

/// Turn structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Two rounds of free placement
    Setup {
        /// 1 going forward, 2 coming back
        round: u8,
        /// Settlement first, then its road
        placing: SetupPlacing,
    },

    /// Waiting for the roll
    PreRoll,

    /// After rolling 7 or playing a knight, must move robber
    RobberMoveRequired,

    /// Several opponents border the robber; the roller picks one
    RobberSteal {
        /// Opponents on the tile holding at least one card
        victims: Vec<PlayerId>,
    },

    /// Building, trading, cards and ending the turn
    MainPhase,

    /// Playing road building card - free roads left to place
    RoadBuildingInProgress { roads_remaining: u8 },

    /// Someone has won
    Finished { winner: PlayerId },
}

/// Piece expected next during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupPlacing {
    Settlement,
    Road,
}

/// Why an action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Invalid placement location")]
    InvalidLocation,

    #[error("Cannot afford this")]
    CannotAfford,

    #[error("No pieces remaining")]
    NoPiecesRemaining,

    #[error("No development cards left in deck")]
    EmptyDeck,

    #[error("Don't have that card")]
    NoSuchCard,

    #[error("A development card was already played this turn")]
    CardAlreadyPlayed,

    #[error("Invalid trade")]
    InvalidTrade,

    #[error("Robber must move to a different land tile")]
    InvalidRobberTarget,

    #[error("Cannot steal from that player")]
    InvalidVictim,

    #[error("Game is over")]
    GameOver,
}

/// Errors that prevent a game from starting
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// One game in progress
#[derive(Debug, Clone)]
pub struct GameState {
    /// The game board (also owns the turn counter, card pool and awards)
    pub board: Board,
    /// Seats in turn order
    pub players: Vec<Player>,
    /// Seat to act
    pub current_player: PlayerId,
    /// Where in the turn we are
    pub phase: GamePhase,
    /// Dice of the current turn, once rolled
    pub dice_roll: Option<(u8, u8)>,
    /// One development card per turn
    pub dev_card_played_this_turn: bool,
    /// Setup placements completed so far (settlement + road pairs)
    setup_step: usize,
    /// Settlement the next setup road must touch
    setup_settlement: Option<VertexId>,
    config: GameConfig,
    rng: StdRng,
}

impl GameState {
    /// Create a new game, generating the board from the configured seed
    pub fn new(config: GameConfig) -> Result<Self, StartError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let board = Board::generate(&config.board, &mut rng)?;

        let players = config
            .player_names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name.clone()))
            .collect();

        info!(players = config.player_names.len(), seed = ?config.seed, "Game created");

        Ok(Self {
            board,
            players,
            current_player: 0,
            phase: GamePhase::Setup {
                round: 1,
                placing: SetupPlacing::Settlement,
            },
            dice_roll: None,
            dev_card_played_this_turn: false,
            setup_step: 0,
            setup_settlement: None,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Seat lookup
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id as usize]
    }

    /// Victory points: build levels, VP cards and award bonuses
    pub fn victory_points(&self, player: PlayerId) -> u32 {
        let Some(p) = self.get_player(player) else {
            return 0;
        };
        self.board.building_points(player)
            + p.victory_point_cards()
            + self.board.awards().held_by(player) * self.config.awards.bonus_points
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    /// Seat that places during a given setup step (snake order)
    fn setup_player(&self, step: usize) -> PlayerId {
        let n = self.player_count();
        let seat = if step < n { step } else { 2 * n - 1 - step };
        seat as PlayerId
    }

    /// Exchange rate for giving away one resource
    pub fn maritime_rate(&self, player: PlayerId, resource: Resource) -> u32 {
        rate_for(&self.board.player_harbors(player), resource)
    }

    // ==================== Legal Actions ====================

    /// Every action `player` may take right now; empty off-turn
    pub fn legal_actions(&self, player: PlayerId) -> Vec<GameAction> {
        let mut actions = Vec::new();
        if player != self.current_player {
            return actions;
        }
        let Some(p) = self.get_player(player) else {
            return actions;
        };

        match &self.phase {
            GamePhase::Finished { .. } => {}

            GamePhase::Setup { placing, .. } => match placing {
                SetupPlacing::Settlement => {
                    for vertex in self.board.valid_settlement_spots(player, true) {
                        actions.push(GameAction::PlaceInitialSettlement(vertex));
                    }
                }
                SetupPlacing::Road => {
                    if let Some(settlement) = self.setup_settlement {
                        for edge in &self.board.vertex(settlement).edges {
                            if self.board.edge(*edge).road.owner().is_none() {
                                actions.push(GameAction::PlaceInitialRoad(*edge));
                            }
                        }
                    }
                }
            },

            GamePhase::PreRoll => actions.push(GameAction::RollDice),

            GamePhase::RobberMoveRequired => {
                let robber = self.board.robber_location();
                for tile in self.board.land_tiles().filter(|t| t.id != robber) {
                    actions.push(GameAction::MoveRobber(tile.id));
                }
            }

            GamePhase::RobberSteal { victims } => {
                for victim in victims {
                    actions.push(GameAction::StealFrom(*victim));
                }
            }

            GamePhase::RoadBuildingInProgress { .. } => {
                if p.roads_remaining > 0 {
                    for edge in self.board.valid_road_spots(player) {
                        actions.push(GameAction::BuildRoad(edge));
                    }
                }
            }

            GamePhase::MainPhase => {
                actions.push(GameAction::EndTurn);

                if p.can_afford_road() {
                    for edge in self.board.valid_road_spots(player) {
                        actions.push(GameAction::BuildRoad(edge));
                    }
                }
                if p.can_afford_settlement() {
                    for vertex in self.board.valid_settlement_spots(player, false) {
                        actions.push(GameAction::BuildSettlement(vertex));
                    }
                }
                if p.can_afford_city() {
                    for vertex in self.board.valid_city_spots(player) {
                        actions.push(GameAction::BuildCity(vertex));
                    }
                }
                if p.can_afford_dev_card() && self.board.dev_card_pool().total() > 0 {
                    actions.push(GameAction::BuyDevelopmentCard);
                }

                if !self.dev_card_played_this_turn {
                    if p.has_playable_dev_card(DevelopmentCard::Knight) {
                        actions.push(GameAction::PlayKnight);
                    }
                    if p.has_playable_dev_card(DevelopmentCard::RoadBuilding) {
                        actions.push(GameAction::PlayRoadBuilding);
                    }
                    if p.has_playable_dev_card(DevelopmentCard::YearOfPlenty) {
                        for (i, r1) in Resource::ALL.iter().enumerate() {
                            for r2 in &Resource::ALL[i..] {
                                actions.push(GameAction::PlayYearOfPlenty(*r1, *r2));
                            }
                        }
                    }
                    if p.has_playable_dev_card(DevelopmentCard::Monopoly) {
                        for r in Resource::ALL {
                            actions.push(GameAction::PlayMonopoly(r));
                        }
                    }
                }

                let harbors = self.board.player_harbors(player);
                for give in Resource::ALL {
                    if p.resources.get(give) < rate_for(&harbors, give) {
                        continue;
                    }
                    for receive in Resource::ALL.into_iter().filter(|r| *r != give) {
                        actions.push(GameAction::MaritimeTrade { give, receive });
                    }
                }
            }
        }

        actions
    }

    // ==================== Applying Actions ====================

    /// Validate and perform one action for `player`
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }
        trace!(player, ?action, "Applying action");

        let mut events = Vec::new();

        match action {
            // ==================== Setup ====================
            GameAction::PlaceInitialSettlement(vertex) => {
                let round = match self.phase {
                    GamePhase::Setup {
                        round,
                        placing: SetupPlacing::Settlement,
                    } => round,
                    _ => return Err(GameError::InvalidPhase),
                };
                if !self.board.valid_settlement_spots(player, true).contains(&vertex) {
                    return Err(GameError::InvalidLocation);
                }

                self.board.place_settlement(vertex, player)?;
                self.player_mut(player).settlements_remaining -= 1;
                self.setup_settlement = Some(vertex);
                events.push(GameEvent::SettlementBuilt {
                    player,
                    location: vertex,
                });

                // The second settlement pays one card per adjacent resource tile
                if round == 2 {
                    let mut hand = ResourceHand::new();
                    for tile in self.board.vertex(vertex).tiles {
                        if let Some(resource) = self.board.tile(tile).resource() {
                            hand.add(resource, 1);
                        }
                    }
                    if !hand.is_empty() {
                        self.player_mut(player).resources.add_hand(&hand);
                        events.push(GameEvent::ResourcesDistributed {
                            distributions: vec![(player, hand)],
                        });
                    }
                }

                self.phase = GamePhase::Setup {
                    round,
                    placing: SetupPlacing::Road,
                };
            }

            GameAction::PlaceInitialRoad(edge) => {
                if !matches!(
                    self.phase,
                    GamePhase::Setup {
                        placing: SetupPlacing::Road,
                        ..
                    }
                ) {
                    return Err(GameError::InvalidPhase);
                }
                let settlement = self.setup_settlement.ok_or(GameError::InvalidPhase)?;
                if !self.board.vertex(settlement).edges.contains(&edge) {
                    return Err(GameError::InvalidLocation);
                }

                self.board.place_road(edge, player)?;
                self.player_mut(player).roads_remaining -= 1;
                self.setup_settlement = None;
                events.push(GameEvent::RoadBuilt {
                    player,
                    location: edge,
                });

                self.advance_setup();
            }

            // ==================== Dice ====================
            GameAction::RollDice => {
                if self.phase != GamePhase::PreRoll {
                    return Err(GameError::InvalidPhase);
                }
                let die1 = self.rng.gen_range(1..=6);
                let die2 = self.rng.gen_range(1..=6);
                let total = die1 + die2;
                self.dice_roll = Some((die1, die2));
                debug!(player, total, "Dice rolled");

                events.push(GameEvent::DiceRolled {
                    player,
                    roll: (die1, die2),
                    total,
                });
                events.extend(self.resolve_roll(total));
                // Points gained on an opponent's turn are claimed here
                events.extend(self.check_win(player));
            }

            // ==================== Robber ====================
            GameAction::MoveRobber(tile) => {
                if self.phase != GamePhase::RobberMoveRequired {
                    return Err(GameError::InvalidPhase);
                }
                let from = self.board.move_robber(tile)?;
                events.push(GameEvent::RobberMoved {
                    player,
                    from,
                    to: tile,
                });

                // A single candidate is robbed without asking
                let victims = self.robber_victims(player, tile);
                match victims.len() {
                    0 => self.phase = GamePhase::MainPhase,
                    1 => {
                        events.push(self.steal(player, victims[0]));
                        self.phase = GamePhase::MainPhase;
                    }
                    _ => self.phase = GamePhase::RobberSteal { victims },
                }
            }

            GameAction::StealFrom(victim) => {
                match &self.phase {
                    GamePhase::RobberSteal { victims } if victims.contains(&victim) => {}
                    GamePhase::RobberSteal { .. } => return Err(GameError::InvalidVictim),
                    _ => return Err(GameError::InvalidPhase),
                }
                events.push(self.steal(player, victim));
                self.phase = GamePhase::MainPhase;
            }

            // ==================== Building ====================
            GameAction::BuildRoad(edge) => {
                let free = matches!(self.phase, GamePhase::RoadBuildingInProgress { .. });
                if !free && self.phase != GamePhase::MainPhase {
                    return Err(GameError::InvalidPhase);
                }
                if !self.board.valid_road_spots(player).contains(&edge) {
                    return Err(GameError::InvalidLocation);
                }

                let p = self.player_mut(player);
                if p.roads_remaining == 0 {
                    return Err(GameError::NoPiecesRemaining);
                }
                if free {
                    p.roads_remaining -= 1;
                } else if !p.buy_road() {
                    return Err(GameError::CannotAfford);
                }

                self.board.place_road(edge, player)?;
                events.push(GameEvent::RoadBuilt {
                    player,
                    location: edge,
                });

                if let GamePhase::RoadBuildingInProgress { roads_remaining } = self.phase {
                    let left = roads_remaining - 1;
                    self.phase = if left > 0 && self.can_place_free_road(player) {
                        GamePhase::RoadBuildingInProgress {
                            roads_remaining: left,
                        }
                    } else {
                        GamePhase::MainPhase
                    };
                }

                events.extend(self.update_awards());
                events.extend(self.check_win(player));
            }

            GameAction::BuildSettlement(vertex) => {
                if self.phase != GamePhase::MainPhase {
                    return Err(GameError::InvalidPhase);
                }
                if !self.board.valid_settlement_spots(player, false).contains(&vertex) {
                    return Err(GameError::InvalidLocation);
                }
                let p = self.player_mut(player);
                if p.settlements_remaining == 0 {
                    return Err(GameError::NoPiecesRemaining);
                }
                if !p.buy_settlement() {
                    return Err(GameError::CannotAfford);
                }

                self.board.place_settlement(vertex, player)?;
                events.push(GameEvent::SettlementBuilt {
                    player,
                    location: vertex,
                });

                // A new settlement can split an opponent's road
                events.extend(self.update_awards());
                events.extend(self.check_win(player));
            }

            GameAction::BuildCity(vertex) => {
                if self.phase != GamePhase::MainPhase {
                    return Err(GameError::InvalidPhase);
                }
                if !self.board.valid_city_spots(player).contains(&vertex) {
                    return Err(GameError::InvalidLocation);
                }
                let p = self.player_mut(player);
                if p.cities_remaining == 0 {
                    return Err(GameError::NoPiecesRemaining);
                }
                if !p.buy_city() {
                    return Err(GameError::CannotAfford);
                }

                self.board.upgrade_to_city(vertex, player)?;
                events.push(GameEvent::CityBuilt {
                    player,
                    location: vertex,
                });

                events.extend(self.update_awards());
                events.extend(self.check_win(player));
            }

            GameAction::BuyDevelopmentCard => {
                if self.phase != GamePhase::MainPhase {
                    return Err(GameError::InvalidPhase);
                }
                if self.board.dev_card_pool().total() == 0 {
                    return Err(GameError::EmptyDeck);
                }
                if !self.players[player as usize].can_afford_dev_card() {
                    return Err(GameError::CannotAfford);
                }

                let card = self.board.draw_dev_card(&mut self.rng)?;
                self.player_mut(player).buy_dev_card(card);
                events.push(GameEvent::DevelopmentCardPurchased { player });

                // Victory point cards count as soon as they are drawn
                events.extend(self.check_win(player));
            }

            // ==================== Development Cards ====================
            GameAction::PlayKnight => {
                self.play_card(player, DevelopmentCard::Knight)?;
                events.push(GameEvent::KnightPlayed { player });
                events.extend(self.update_awards());
                events.extend(self.check_win(player));
                if !self.is_finished() {
                    self.phase = GamePhase::RobberMoveRequired;
                }
            }

            GameAction::PlayRoadBuilding => {
                self.play_card(player, DevelopmentCard::RoadBuilding)?;
                let roads = if self.can_place_free_road(player) {
                    self.players[player as usize].roads_remaining.min(2) as u8
                } else {
                    0
                };
                if roads > 0 {
                    self.phase = GamePhase::RoadBuildingInProgress {
                        roads_remaining: roads,
                    };
                }
                events.push(GameEvent::RoadBuildingPlayed { player, roads });
            }

            GameAction::PlayYearOfPlenty(r1, r2) => {
                self.play_card(player, DevelopmentCard::YearOfPlenty)?;
                let p = self.player_mut(player);
                p.resources.add(r1, 1);
                p.resources.add(r2, 1);
                events.push(GameEvent::YearOfPlentyPlayed {
                    player,
                    resources: (r1, r2),
                });
            }

            GameAction::PlayMonopoly(resource) => {
                self.play_card(player, DevelopmentCard::Monopoly)?;
                let total_stolen: u32 = self
                    .players
                    .iter_mut()
                    .filter(|other| other.id != player)
                    .map(|other| other.resources.take_all(resource))
                    .sum();
                self.player_mut(player).resources.add(resource, total_stolen);
                events.push(GameEvent::MonopolyPlayed {
                    player,
                    resource,
                    total_stolen,
                });
            }

            // ==================== Trading ====================
            GameAction::MaritimeTrade { give, receive } => {
                if self.phase != GamePhase::MainPhase {
                    return Err(GameError::InvalidPhase);
                }
                if give == receive {
                    return Err(GameError::InvalidTrade);
                }
                let rate = self.maritime_rate(player, give);
                let p = self.player_mut(player);
                if !p.resources.try_subtract(&ResourceHand::single(give, rate)) {
                    return Err(GameError::CannotAfford);
                }
                p.resources.add(receive, 1);
                events.push(GameEvent::MaritimeTradeCompleted {
                    player,
                    gave: give,
                    gave_count: rate,
                    received: receive,
                });
            }

            // ==================== End of Turn ====================
            GameAction::EndTurn => {
                if self.phase != GamePhase::MainPhase {
                    return Err(GameError::InvalidPhase);
                }
                self.player_mut(player).end_turn();

                let next_player = (self.current_player + 1) % self.player_count() as PlayerId;
                self.current_player = next_player;
                self.board.advance_turn();
                self.dice_roll = None;
                self.dev_card_played_this_turn = false;
                self.phase = GamePhase::PreRoll;

                events.push(GameEvent::TurnEnded {
                    player,
                    next_player,
                });
            }
        }

        Ok(events)
    }

    // ==================== Policy-Driven Play ====================

    /// Run the whole setup phase, asking each seat's policy for placements
    pub fn play_setup(
        &mut self,
        policies: &mut [Box<dyn Policy>],
    ) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();
        while matches!(self.phase, GamePhase::Setup { .. }) {
            let player = self.current_player;
            let action = self.ask(policies, player, 0).ok_or(GameError::InvalidLocation)?;
            events.extend(self.apply_action(player, action)?);
        }
        Ok(events)
    }

    /// Play the current player's turn from roll to end of turn.
    ///
    /// Policy choices outside the legal set are replaced by a default move;
    /// once `max_actions_per_turn` is used up the turn is driven to its end.
    pub fn play_turn(
        &mut self,
        policies: &mut [Box<dyn Policy>],
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if matches!(self.phase, GamePhase::Setup { .. }) {
            return Err(GameError::InvalidPhase);
        }

        let player = self.current_player;
        let mut events = Vec::new();
        let mut steps = 0;
        while self.current_player == player && !self.is_finished() {
            let action = self.ask(policies, player, steps).ok_or(GameError::InvalidPhase)?;
            events.extend(self.apply_action(player, action)?);
            steps += 1;
        }
        Ok(events)
    }

    /// Play setup and then whole turns until someone wins or `max_turns` pass
    pub fn play_game(
        &mut self,
        policies: &mut [Box<dyn Policy>],
        max_turns: u32,
    ) -> Result<Option<PlayerId>, GameError> {
        if matches!(self.phase, GamePhase::Setup { .. }) {
            self.play_setup(policies)?;
        }
        while !self.is_finished() && self.board.turn() <= max_turns {
            self.play_turn(policies)?;
        }
        Ok(self.winner())
    }

    fn ask(
        &self,
        policies: &mut [Box<dyn Policy>],
        player: PlayerId,
        steps: usize,
    ) -> Option<GameAction> {
        let legal = self.legal_actions(player);
        let fallback = legal
            .iter()
            .find(|a| **a == GameAction::EndTurn)
            .or_else(|| legal.first())
            .cloned();
        if steps >= self.config.max_actions_per_turn {
            return fallback;
        }
        policies
            .get_mut(player as usize)
            .and_then(|policy| policy.choose_action(self, player, &legal))
            .filter(|a| legal.contains(a))
            .or(fallback)
    }

    fn advance_setup(&mut self) {
        self.setup_step += 1;
        let n = self.player_count();
        if self.setup_step >= 2 * n {
            self.current_player = 0;
            self.phase = GamePhase::PreRoll;
            self.board.advance_turn();
            info!("Setup complete");
            return;
        }
        self.current_player = self.setup_player(self.setup_step);
        self.phase = GamePhase::Setup {
            round: if self.setup_step < n { 1 } else { 2 },
            placing: SetupPlacing::Settlement,
        };
    }

    /// Production on a non-7 total; discards and the robber on a 7
    fn resolve_roll(&mut self, total: u8) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if total == 7 {
            for i in 0..self.players.len() {
                let held = self.players[i].resources.total();
                if held < DISCARD_LIMIT {
                    continue;
                }
                let count = held / 2;
                for _ in 0..count {
                    self.players[i].resources.remove_random(&mut self.rng);
                }
                events.push(GameEvent::CardsDiscarded {
                    player: self.players[i].id,
                    count,
                });
            }
            self.phase = GamePhase::RobberMoveRequired;
            return events;
        }

        let distributions: Vec<(PlayerId, ResourceHand)> =
            self.board.resources_for_roll(total).into_iter().collect();
        for (pid, hand) in &distributions {
            self.player_mut(*pid).resources.add_hand(hand);
        }
        if !distributions.is_empty() {
            events.push(GameEvent::ResourcesDistributed { distributions });
        }
        self.phase = GamePhase::MainPhase;
        events
    }

    /// Opponents with a building on the tile and a card to lose
    fn robber_victims(&self, thief: PlayerId, tile: TileId) -> Vec<PlayerId> {
        self.board
            .players_adjacent_to_tile(tile)
            .into_iter()
            .filter(|&p| p != thief && self.players[p as usize].resources.total() > 0)
            .collect()
    }

    fn steal(&mut self, thief: PlayerId, victim: PlayerId) -> GameEvent {
        let stolen = self.players[victim as usize]
            .resources
            .remove_random(&mut self.rng);
        if let Some(resource) = stolen {
            self.player_mut(thief).resources.add(resource, 1);
        }
        GameEvent::ResourceStolen {
            thief,
            victim,
            resource: stolen,
        }
    }

    fn play_card(&mut self, player: PlayerId, card: DevelopmentCard) -> Result<(), GameError> {
        if self.phase != GamePhase::MainPhase {
            return Err(GameError::InvalidPhase);
        }
        if self.dev_card_played_this_turn {
            return Err(GameError::CardAlreadyPlayed);
        }
        if !self.player_mut(player).play_dev_card(card) {
            return Err(GameError::NoSuchCard);
        }
        self.dev_card_played_this_turn = true;
        Ok(())
    }

    fn can_place_free_road(&self, player: PlayerId) -> bool {
        self.players[player as usize].roads_remaining > 0
            && !self.board.valid_road_spots(player).is_empty()
    }

    /// Recompute every award from the current board, returning the changes
    pub fn update_awards(&mut self) -> Vec<GameEvent> {
        let rules = &self.config.awards;
        let contests = [
            (
                Award::LongestRoad,
                rules.longest_road_min,
                self.standings(|board, p| board.longest_road(p.id)),
            ),
            (
                Award::LargestArmy,
                rules.largest_army_min,
                self.standings(|_, p| p.played_knights),
            ),
            (
                Award::MostHarbors,
                rules.most_harbors_min,
                self.standings(|board, p| awards::harbor_score(board, p.id)),
            ),
        ];

        let mut events = Vec::new();
        for (award, threshold, standings) in contests {
            if let Some(change) = self.board.awards_mut().contest(award, &standings, threshold) {
                debug!(
                    ?award,
                    previous = ?change.previous,
                    current = ?change.current,
                    value = change.value,
                    "Award changed hands"
                );
                events.push(GameEvent::AwardChanged {
                    award,
                    previous: change.previous,
                    current: change.current,
                    value: change.value,
                });
            }
        }
        events
    }

    fn standings(&self, metric: impl Fn(&Board, &Player) -> u32) -> Vec<(PlayerId, u32)> {
        self.players
            .iter()
            .map(|p| (p.id, metric(&self.board, p)))
            .collect()
    }

    /// Only the acting player can win, and only on their own turn
    fn check_win(&mut self, player: PlayerId) -> Vec<GameEvent> {
        let victory_points = self.victory_points(player);
        if victory_points < self.config.victory_points_to_win {
            return Vec::new();
        }
        info!(player, victory_points, turn = self.board.turn(), "Game won");
        self.phase = GamePhase::Finished { winner: player };
        vec![GameEvent::GameWon {
            player,
            victory_points,
        }]
    }
}

/// Best rate among the harbors a player can use: 2 specific, 3 generic, 4 bank
fn rate_for(harbors: &[Harbor], resource: Resource) -> u32 {
    harbors
        .iter()
        .filter(|h| match h {
            Harbor::Generic => true,
            Harbor::Specific(r) => *r == resource,
        })
        .map(Harbor::rate)
        .min()
        .unwrap_or(4)
}
