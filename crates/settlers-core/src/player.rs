//! Per-seat bookkeeping.
//!
//! Covers:
//! - Player struct with resources, piece supply and development cards
//! - `ResourceHand`, the five resource counters
//! - CardCounts for development card hands and the shared pool
//! - What each piece and card costs

use crate::board::{PlayerId, Resource};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Kinds of development card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DevelopmentCard {
    /// Robber move plus steal; counts toward largest army
    Knight,
    /// Worth 1 VP as soon as it is drawn
    VictoryPoint,
    /// Two free road placements
    RoadBuilding,
    /// Take any 2 resources
    YearOfPlenty,
    /// All opponents give you all of one resource type
    Monopoly,
}

impl DevelopmentCard {
    pub const ALL: [DevelopmentCard; 5] = [
        DevelopmentCard::Knight,
        DevelopmentCard::VictoryPoint,
        DevelopmentCard::RoadBuilding,
        DevelopmentCard::YearOfPlenty,
        DevelopmentCard::Monopoly,
    ];

    /// Victory point cards score while held and are never played
    pub fn is_playable(&self) -> bool {
        !matches!(self, DevelopmentCard::VictoryPoint)
    }
}

/// Count of development cards per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCounts {
    pub knight: u32,
    pub victory_point: u32,
    pub road_building: u32,
    pub year_of_plenty: u32,
    pub monopoly: u32,
}

impl CardCounts {
    /// The 25-card pool the board starts with
    pub fn standard_pool() -> Self {
        Self {
            knight: 14,
            victory_point: 5,
            road_building: 2,
            year_of_plenty: 2,
            monopoly: 2,
        }
    }

    pub fn get(&self, card: DevelopmentCard) -> u32 {
        match card {
            DevelopmentCard::Knight => self.knight,
            DevelopmentCard::VictoryPoint => self.victory_point,
            DevelopmentCard::RoadBuilding => self.road_building,
            DevelopmentCard::YearOfPlenty => self.year_of_plenty,
            DevelopmentCard::Monopoly => self.monopoly,
        }
    }

    fn slot(&mut self, card: DevelopmentCard) -> &mut u32 {
        match card {
            DevelopmentCard::Knight => &mut self.knight,
            DevelopmentCard::VictoryPoint => &mut self.victory_point,
            DevelopmentCard::RoadBuilding => &mut self.road_building,
            DevelopmentCard::YearOfPlenty => &mut self.year_of_plenty,
            DevelopmentCard::Monopoly => &mut self.monopoly,
        }
    }

    pub fn add(&mut self, card: DevelopmentCard, amount: u32) {
        *self.slot(card) += amount;
    }

    /// Remove cards, returning false (and changing nothing) if too few
    pub fn remove(&mut self, card: DevelopmentCard, amount: u32) -> bool {
        let slot = self.slot(card);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }

    pub fn total(&self) -> u32 {
        DevelopmentCard::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Move every card into `other`, leaving this empty
    pub fn drain_into(&mut self, other: &mut CardCounts) {
        for card in DevelopmentCard::ALL {
            other.add(card, self.get(card));
        }
        *self = CardCounts::default();
    }
}

/// Resource cards held by one seat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub brick: u32,
    pub lumber: u32,
    pub ore: u32,
    pub grain: u32,
    pub wool: u32,
}

impl ResourceHand {
    /// No cards
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand from explicit counts, in `Resource::ALL` order
    pub fn with_amounts(brick: u32, lumber: u32, ore: u32, grain: u32, wool: u32) -> Self {
        Self {
            brick,
            lumber,
            ore,
            grain,
            wool,
        }
    }

    /// `amount` cards of one kind
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Hand size
    pub fn total(&self) -> u32 {
        self.brick + self.lumber + self.ore + self.grain + self.wool
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Cards held of one kind
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Lumber => self.lumber,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Wool => self.wool,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Brick => &mut self.brick,
            Resource::Lumber => &mut self.lumber,
            Resource::Ore => &mut self.ore,
            Resource::Grain => &mut self.grain,
            Resource::Wool => &mut self.wool,
        }
    }

    /// Gain `amount` cards of one kind
    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot(resource) += amount;
    }

    /// Merge `other` into this hand
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for resource in Resource::ALL {
            self.add(resource, other.get(resource));
        }
    }

    /// Take every card of one resource, returning how many there were
    pub fn take_all(&mut self, resource: Resource) -> u32 {
        std::mem::take(self.slot(resource))
    }

    /// Whether every count covers `cost`
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL.iter().all(|r| self.get(*r) >= cost.get(*r))
    }

    /// Try to subtract, returning false (and changing nothing) if insufficient
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for resource in Resource::ALL {
            *self.slot(resource) -= cost.get(resource);
        }
        true
    }

    /// Remove one card chosen uniformly at random (robber stealing, discards)
    pub fn remove_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Resource> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for resource in Resource::ALL {
            let count = self.get(resource);
            if pick < count {
                *self.slot(resource) -= 1;
                return Some(resource);
            }
            pick -= count;
        }
        None
    }
}

/// Piece and card prices
pub mod costs {
    use super::ResourceHand;

    /// brick + lumber
    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 0, 0, 0)
    }

    /// brick + lumber + grain + wool
    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 0, 1, 1)
    }

    /// 3 ore + 2 grain
    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 3, 2, 0)
    }

    /// ore + grain + wool
    pub fn development_card() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 1, 1, 1)
    }
}

/// Everything the game tracks for one seat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub resources: ResourceHand,
    /// Development cards that can be played
    pub dev_cards: CardCounts,
    /// Locked until the turn ends
    pub dev_cards_bought_this_turn: CardCounts,
    /// Largest-army metric
    pub played_knights: u32,
    pub settlements_remaining: u32,
    pub cities_remaining: u32,
    pub roads_remaining: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            resources: ResourceHand::new(),
            dev_cards: CardCounts::default(),
            dev_cards_bought_this_turn: CardCounts::default(),
            played_knights: 0,
            settlements_remaining: 5,
            cities_remaining: 4,
            roads_remaining: 15,
        }
    }

    /// Victory point cards held, playable or not
    pub fn victory_point_cards(&self) -> u32 {
        self.dev_cards.victory_point + self.dev_cards_bought_this_turn.victory_point
    }

    /// Every development card held, by kind
    pub fn all_dev_cards(&self) -> CardCounts {
        let mut all = self.dev_cards.clone();
        let mut fresh = self.dev_cards_bought_this_turn.clone();
        fresh.drain_into(&mut all);
        all
    }

    pub fn can_afford_road(&self) -> bool {
        self.resources.can_afford(&costs::road()) && self.roads_remaining > 0
    }

    pub fn can_afford_settlement(&self) -> bool {
        self.resources.can_afford(&costs::settlement()) && self.settlements_remaining > 0
    }

    pub fn can_afford_city(&self) -> bool {
        self.resources.can_afford(&costs::city()) && self.cities_remaining > 0
    }

    pub fn can_afford_dev_card(&self) -> bool {
        self.resources.can_afford(&costs::development_card())
    }

    /// Pay for a road and take the piece
    pub fn buy_road(&mut self) -> bool {
        if !self.can_afford_road() {
            return false;
        }
        self.resources.try_subtract(&costs::road());
        self.roads_remaining -= 1;
        true
    }

    pub fn buy_settlement(&mut self) -> bool {
        if !self.can_afford_settlement() {
            return false;
        }
        self.resources.try_subtract(&costs::settlement());
        self.settlements_remaining -= 1;
        true
    }

    /// Pay for a city; the settlement piece goes back to the supply
    pub fn buy_city(&mut self) -> bool {
        if !self.can_afford_city() {
            return false;
        }
        self.resources.try_subtract(&costs::city());
        self.cities_remaining -= 1;
        self.settlements_remaining += 1;
        true
    }

    /// Pay for a development card drawn from the pool
    pub fn buy_dev_card(&mut self, card: DevelopmentCard) -> bool {
        if !self.resources.try_subtract(&costs::development_card()) {
            return false;
        }
        self.dev_cards_bought_this_turn.add(card, 1);
        true
    }

    /// Cards bought this turn become playable from the next one
    pub fn end_turn(&mut self) {
        self.dev_cards_bought_this_turn.drain_into(&mut self.dev_cards);
    }

    /// Holds at least one `card` bought before this turn
    pub fn has_playable_dev_card(&self, card: DevelopmentCard) -> bool {
        card.is_playable() && self.dev_cards.get(card) > 0
    }

    /// Spend a playable card, returning false when none is held
    pub fn play_dev_card(&mut self, card: DevelopmentCard) -> bool {
        if !self.has_playable_dev_card(card) || !self.dev_cards.remove(card, 1) {
            return false;
        }
        if card == DevelopmentCard::Knight {
            self.played_knights += 1;
        }
        true
    }
}
