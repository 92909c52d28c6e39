//! Requests and outcomes.
//!
//! Every mutation a policy can request is a `GameAction` value; applying
//! one yields the `GameEvent`s describing what happened.

use crate::awards::Award;
use crate::board::{EdgeId, PlayerId, Resource, TileId, VertexId};
use crate::player::ResourceHand;
use serde::{Deserialize, Serialize};

/// One move a seat can request from the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    // ==================== Setup ====================
    /// Free settlement anywhere the distance rule allows
    PlaceInitialSettlement(VertexId),
    /// Free road touching the settlement just placed
    PlaceInitialRoad(EdgeId),

    /// Opens every regular turn
    RollDice,

    // ==================== Robber ====================
    /// Relocate the robber to a different land tile
    MoveRobber(TileId),
    /// Pick the victim when several opponents border the robber
    StealFrom(PlayerId),

    // ==================== Building ====================
    /// Costs brick and lumber, or nothing while road building is pending
    BuildRoad(EdgeId),
    BuildSettlement(VertexId),
    BuildCity(VertexId),
    /// Weighted draw from the board's card pool
    BuyDevelopmentCard,

    // ==================== Development Cards ====================
    PlayKnight,
    /// Opens up to two free road placements
    PlayRoadBuilding,
    /// Two cards of the given kinds, straight from the bank
    PlayYearOfPlenty(Resource, Resource),
    /// Every opponent hands over all cards of one kind
    PlayMonopoly(Resource),

    /// Bank exchange at 4:1, or better through a harbor
    MaritimeTrade { give: Resource, receive: Resource },

    EndTurn,
}

/// Something that changed as a result of an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    DiceRolled {
        player: PlayerId,
        roll: (u8, u8),
        total: u8,
    },

    /// Production from a roll or from the second setup settlement
    ResourcesDistributed {
        distributions: Vec<(PlayerId, ResourceHand)>,
    },

    /// Cards lost to a 7
    CardsDiscarded { player: PlayerId, count: u32 },

    SettlementBuilt { player: PlayerId, location: VertexId },

    CityBuilt { player: PlayerId, location: VertexId },

    RoadBuilt { player: PlayerId, location: EdgeId },

    /// The drawn card stays hidden
    DevelopmentCardPurchased { player: PlayerId },

    KnightPlayed { player: PlayerId },

    /// `roads` is how many free placements were granted (0 to 2)
    RoadBuildingPlayed { player: PlayerId, roads: u8 },

    YearOfPlentyPlayed {
        player: PlayerId,
        resources: (Resource, Resource),
    },

    MonopolyPlayed {
        player: PlayerId,
        resource: Resource,
        total_stolen: u32,
    },

    RobberMoved {
        player: PlayerId,
        from: TileId,
        to: TileId,
    },

    /// `resource` is `None` when the victim's hand was empty
    ResourceStolen {
        thief: PlayerId,
        victim: PlayerId,
        resource: Option<Resource>,
    },

    MaritimeTradeCompleted {
        player: PlayerId,
        gave: Resource,
        gave_count: u32,
        received: Resource,
    },

    /// A bonus award was claimed, changed hands or fell vacant
    AwardChanged {
        award: Award,
        previous: Option<PlayerId>,
        current: Option<PlayerId>,
        value: u32,
    },

    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    GameWon {
        player: PlayerId,
        victory_points: u32,
    },
}
