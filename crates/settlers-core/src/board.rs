//! Game board representation: tiles, vertices, edges and harbors.
//!
//! This module contains:
//! - Resource, terrain and harbor types
//! - The arena types `Tile`, `Vertex` and `Edge`, addressed by small indices
//! - Board generation (lattice, terrain deck, harbor deck, repair passes)
//! - Query and mutation methods used by the game and by policies
//!
//! The board owns every topology object for its whole lifetime. Relations
//! between objects are stored as index lists, so there are no reference
//! cycles and no shared ownership.

use crate::awards::Awards;
use crate::config::BoardConfig;
use crate::game::GameError;
use crate::hex::{walk_lattice, HexCoord};
use crate::placement;
use crate::player::{CardCounts, DevelopmentCard, ResourceHand};
use crate::roads;
use crate::topology;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{info, warn};

/// Seat index
pub type PlayerId = u8;

/// Largest ring that holds land tiles
pub const LAND_RADIUS: u32 = 2;
/// The ring of water tiles that surrounds the land
pub const RIM_RING: u32 = LAND_RADIUS + 1;
/// Cells visited by the lattice walk (land plus rim)
pub const LATTICE_CELLS: usize = 37;
/// Playable land tiles
pub const LAND_TILES: usize = 19;
/// Sum of neighbor counts over every lattice cell
pub const LATTICE_ADJACENCIES: usize = 180;
/// Building locations
pub const VERTEX_COUNT: usize = 54;
/// Road locations
pub const EDGE_COUNT: usize = 72;
/// Coastal edges that draw from the harbor deck
pub const HARBOR_SLOTS: usize = 30;

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub usize);

        impl $name {
            /// Position of this object in the board's arena
            pub const fn index(self) -> usize {
                self.0
            }
        }
    };
}

index_type!(
    /// Index of a tile in the board's tile arena
    TileId
);
index_type!(
    /// Index of a vertex (building location)
    VertexId
);
index_type!(
    /// Index of an edge (road location)
    EdgeId
);

/// Resource types produced by land tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// Every resource, in canonical order
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

/// Terrain of a lattice cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Productive terrain
    Resource(Resource),
    /// No production, starts with the robber
    Desert,
    /// Rim tile beyond the land; only used to derive adjacency
    Water,
}

/// Trade rate improvement on a coastal edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 for any resource
    Generic,
    /// 2:1 for one resource
    Specific(Resource),
}

impl Harbor {
    /// Cards given per card received
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }
}

/// Harbor label carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HarborSlot {
    /// Not on the coast; can never hold a harbor
    Inland,
    /// Coastal edge that drew an empty slot from the harbor deck
    Empty,
    /// Coastal edge holding a usable harbor
    Active(Harbor),
}

impl HarborSlot {
    /// Whether this edge holds a usable harbor
    pub fn is_active(&self) -> bool {
        matches!(self, HarborSlot::Active(_))
    }

    /// The harbor on this edge, if any
    pub fn harbor(&self) -> Option<Harbor> {
        match self {
            HarborSlot::Active(h) => Some(*h),
            _ => None,
        }
    }
}

/// One lattice cell, land or water
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// Position on the hex lattice
    pub coord: HexCoord,
    /// Ring index (distance from the center tile)
    pub ring: u32,
    /// What type of tile (resource, desert, water)
    pub tile_type: TileType,
    /// Dice number that triggers production (2-12, None never triggers)
    pub dice_number: Option<u8>,
    /// Robber present
    pub has_robber: bool,
    /// Adjacent tiles, water included
    pub neighbors: Vec<TileId>,
    /// Corners of this tile
    pub vertices: Vec<VertexId>,
    /// Sides of this tile
    pub edges: Vec<EdgeId>,
}

impl Tile {
    fn new(id: TileId, coord: HexCoord, tile_type: TileType, dice_number: Option<u8>) -> Self {
        Self {
            id,
            coord,
            ring: coord.distance_to(&HexCoord::ORIGIN),
            tile_type,
            dice_number,
            has_robber: false,
            neighbors: Vec::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Whether this is a playable tile (not part of the water rim)
    pub fn is_land(&self) -> bool {
        !matches!(self.tile_type, TileType::Water)
    }

    /// Resource yielded by this terrain
    pub fn resource(&self) -> Option<Resource> {
        match self.tile_type {
            TileType::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Probability that a roll of two dice triggers this tile
    pub fn probability(&self) -> f64 {
        match self.dice_number {
            Some(n) => (6 - (n as i32 - 7).abs()) as f64 / 36.0,
            None => 0.0,
        }
    }

    /// Has a resource and is free of the robber
    pub fn is_productive(&self) -> bool {
        self.resource().is_some() && !self.has_robber
    }
}

/// Occupancy of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VertexBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Settlement (build level 1)
    Settlement(PlayerId),
    /// City (build level 2)
    City(PlayerId),
}

impl VertexBuilding {
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            VertexBuilding::Empty => None,
            VertexBuilding::Settlement(p) | VertexBuilding::City(p) => Some(*p),
        }
    }

    /// Build level: victory points and resources per production
    pub fn level(&self) -> u32 {
        match self {
            VertexBuilding::Empty => 0,
            VertexBuilding::Settlement(_) => 1,
            VertexBuilding::City(_) => 2,
        }
    }
}

/// Occupancy of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgeBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Road
    Road(PlayerId),
}

impl EdgeBuilding {
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            EdgeBuilding::Empty => None,
            EdgeBuilding::Road(p) => Some(*p),
        }
    }
}

/// A corner where three tiles meet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    /// The three mutually adjacent tiles, sorted; this is the vertex identity
    pub tiles: [TileId; 3],
    /// Centroid of the three tile centers
    pub position: (f64, f64),
    /// Whether one of the tiles is water
    pub coastal: bool,
    /// Vertices one edge away
    pub neighbors: Vec<VertexId>,
    /// Edges ending here
    pub edges: Vec<EdgeId>,
    pub building: VertexBuilding,
}

/// A side shared by two tiles, connecting two vertices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    /// Endpoints, sorted; this is the edge identity
    pub vertices: [VertexId; 2],
    /// The two tiles on either side
    pub tiles: [TileId; 2],
    /// Midpoint of the endpoints
    pub position: (f64, f64),
    pub harbor: HarborSlot,
    /// Edges sharing an endpoint
    pub neighbors: Vec<EdgeId>,
    pub road: EdgeBuilding,
}

impl Edge {
    /// The endpoint that is not `vertex`
    pub fn other_vertex(&self, vertex: VertexId) -> VertexId {
        if self.vertices[0] == vertex {
            self.vertices[1]
        } else {
            self.vertices[0]
        }
    }
}

/// Structural failures while generating a board.
///
/// Any of these means the generator itself is wrong; a board is never
/// returned in a partially valid state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("lattice walk produced {found} cells, expected {expected}")]
    LatticeSize { expected: usize, found: usize },

    #[error("expected {expected} {entity}, found {found}")]
    Cardinality {
        entity: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{entity} {index} has {found} {relation}")]
    Degree {
        entity: &'static str,
        index: usize,
        relation: &'static str,
        found: usize,
    },

    #[error("{slots} coastal edges for a harbor deck of {deck}")]
    HarborDeckMismatch { slots: usize, deck: usize },

    #[error("dice repair did not converge after {attempts} attempts")]
    DiceRepairExhausted { attempts: usize },

    #[error("harbor repair did not converge after {attempts} attempts")]
    HarborRepairExhausted { attempts: usize },
}

/// How the constraint repair went for a generated board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Sweeps the dice repair needed
    pub dice_attempts: usize,
    /// Sweeps the harbor repair needed
    pub harbor_attempts: usize,
    /// The harbor repair gave up and kept an unrepaired placement
    pub relaxed_harbors: bool,
}

/// Tiles, vertices and edges plus the shared board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Land tiles first (ids `0..LAND_TILES`), then the water rim
    tiles: Vec<Tile>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Tile currently holding the robber
    robber: TileId,
    /// Development cards left to draw
    dev_cards: CardCounts,
    /// Turn counter (0 during setup)
    turn: u32,
    /// Current holders of the bonus awards
    awards: Awards,
    report: GenerationReport,
}

/// Standard terrain distribution: 4 lumber, 4 grain, 4 wool, 3 ore, 3 brick
fn terrain_deck() -> Vec<Resource> {
    let mut deck = Vec::with_capacity(LAND_TILES - 1);
    for (resource, count) in [
        (Resource::Lumber, 4),
        (Resource::Grain, 4),
        (Resource::Wool, 4),
        (Resource::Ore, 3),
        (Resource::Brick, 3),
    ] {
        deck.extend(std::iter::repeat(resource).take(count));
    }
    deck
}

/// Standard dice numbers, one per resource tile
pub const DICE_NUMBERS: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

/// 4 generic harbors, one specific harbor per resource, the rest empty
fn harbor_deck() -> Vec<HarborSlot> {
    let mut deck = vec![HarborSlot::Active(Harbor::Generic); 4];
    deck.extend(Resource::ALL.map(|r| HarborSlot::Active(Harbor::Specific(r))));
    deck.resize(HARBOR_SLOTS, HarborSlot::Empty);
    deck
}

impl Board {
    /// Generate a board with the default configuration and a fresh RNG
    pub fn standard() -> Result<Self, GenerationError> {
        let mut rng = StdRng::from_entropy();
        Self::generate(&BoardConfig::default(), &mut rng)
    }

    /// Generate a board deterministically from a seed
    pub fn with_seed(seed: u64) -> Result<Self, GenerationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(&BoardConfig::default(), &mut rng)
    }

    /// Generate a board with a provided RNG.
    ///
    /// Steps: walk the lattice, deal terrain and numbers onto the land,
    /// resolve adjacency, deal the harbor deck onto coastal edges, then
    /// repair dice and harbor placement.
    pub fn generate<R: Rng>(config: &BoardConfig, rng: &mut R) -> Result<Self, GenerationError> {
        let cells = walk_lattice(RIM_RING);
        if cells.len() != LATTICE_CELLS {
            return Err(GenerationError::LatticeSize {
                expected: LATTICE_CELLS,
                found: cells.len(),
            });
        }

        let (land, rim): (Vec<HexCoord>, Vec<HexCoord>) = cells
            .into_iter()
            .partition(|c| c.distance_to(&HexCoord::ORIGIN) <= LAND_RADIUS);
        if land.len() != LAND_TILES {
            return Err(GenerationError::Cardinality {
                entity: "land tiles",
                expected: LAND_TILES,
                found: land.len(),
            });
        }

        // Terrain and numbers are dealt as pairs so the desert always gets
        // the never-triggers number.
        let mut terrain = terrain_deck();
        terrain.shuffle(rng);
        let mut pairs: Vec<(TileType, Option<u8>)> = terrain
            .into_iter()
            .zip(DICE_NUMBERS)
            .map(|(r, n)| (TileType::Resource(r), Some(n)))
            .collect();
        pairs.push((TileType::Desert, None));
        pairs.shuffle(rng);

        let mut tiles: Vec<Tile> = land
            .iter()
            .zip(pairs)
            .map(|(coord, (tile_type, number))| (*coord, tile_type, number))
            .chain(rim.iter().map(|coord| (*coord, TileType::Water, None)))
            .enumerate()
            .map(|(i, (coord, tile_type, number))| Tile::new(TileId(i), coord, tile_type, number))
            .collect();

        let (vertices, mut edges) = topology::resolve(&mut tiles)?;

        let mut deck = harbor_deck();
        let slots = edges
            .iter()
            .filter(|e| e.harbor == HarborSlot::Empty)
            .count();
        if slots != deck.len() {
            return Err(GenerationError::HarborDeckMismatch {
                slots,
                deck: deck.len(),
            });
        }
        deck.shuffle(rng);
        for (edge, slot) in edges
            .iter_mut()
            .filter(|e| e.harbor == HarborSlot::Empty)
            .zip(deck)
        {
            edge.harbor = slot;
        }

        let dice_attempts = placement::repair_dice(&mut tiles, config.dice_repair_attempts, rng)?;
        let (harbor_attempts, relaxed_harbors) =
            match placement::repair_harbors(&mut edges, config.harbor_repair_attempts, rng) {
                Ok(attempts) => (attempts, false),
                Err(GenerationError::HarborRepairExhausted { attempts })
                    if config.relaxed_harbor_fallback =>
                {
                    warn!(attempts, "Harbor repair did not converge, keeping relaxed placement");
                    (attempts, true)
                }
                Err(e) => return Err(e),
            };

        let robber = tiles
            .iter()
            .find(|t| t.tile_type == TileType::Desert)
            .map(|t| t.id)
            .ok_or(GenerationError::Cardinality {
                entity: "desert tiles",
                expected: 1,
                found: 0,
            })?;
        tiles[robber.index()].has_robber = true;

        info!(
            tiles = tiles.len(),
            vertices = vertices.len(),
            edges = edges.len(),
            dice_attempts,
            harbor_attempts,
            "Board generated"
        );

        Ok(Self {
            tiles,
            vertices,
            edges,
            robber,
            dev_cards: CardCounts::standard_pool(),
            turn: 0,
            awards: Awards::default(),
            report: GenerationReport {
                dice_attempts,
                harbor_attempts,
                relaxed_harbors,
            },
        })
    }

    // ==================== Queries ====================

    /// Get a tile by id (land or water).
    ///
    /// # Panics
    ///
    /// If `id` is not a tile of this board. Ids handed out by the board are
    /// always valid.
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.index()]
    }

    /// Get a vertex by id.
    ///
    /// # Panics
    ///
    /// If `id` is not a vertex of this board.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get an edge by id.
    ///
    /// # Panics
    ///
    /// If `id` is not an edge of this board.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Every tile, the water rim included
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The playable tiles
    pub fn land_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_land())
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a tile by lattice position
    pub fn tile_at(&self, coord: HexCoord) -> Option<TileId> {
        self.tiles.iter().find(|t| t.coord == coord).map(|t| t.id)
    }

    /// Land tiles triggered by a dice total
    pub fn tiles_with_number(&self, number: u8) -> Vec<TileId> {
        self.land_tiles()
            .filter(|t| t.dice_number == Some(number))
            .map(|t| t.id)
            .collect()
    }

    /// Get the robber's current tile
    pub fn robber_location(&self) -> TileId {
        self.robber
    }

    /// Development cards left in the shared pool
    pub fn dev_card_pool(&self) -> &CardCounts {
        &self.dev_cards
    }

    /// Current turn number (0 during setup)
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn awards(&self) -> &Awards {
        &self.awards
    }

    pub(crate) fn awards_mut(&mut self) -> &mut Awards {
        &mut self.awards
    }

    pub fn generation_report(&self) -> GenerationReport {
        self.report
    }

    /// Harbors on edges with one of the player's buildings at an endpoint
    pub fn player_harbors(&self, player: PlayerId) -> Vec<Harbor> {
        self.edges
            .iter()
            .filter_map(|e| {
                let harbor = e.harbor.harbor()?;
                e.vertices
                    .iter()
                    .any(|v| self.vertex(*v).building.owner() == Some(player))
                    .then_some(harbor)
            })
            .collect()
    }

    /// Sum of build levels over a player's vertices
    pub fn building_points(&self, player: PlayerId) -> u32 {
        self.vertices
            .iter()
            .filter(|v| v.building.owner() == Some(player))
            .map(|v| v.building.level())
            .sum()
    }

    /// Edges holding one of the player's roads
    pub fn player_roads(&self, player: PlayerId) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(move |e| e.road.owner() == Some(player))
    }

    // ==================== Legality ====================

    /// Check if a vertex satisfies the distance rule (no adjacent buildings).
    ///
    /// An unknown vertex never satisfies it.
    pub fn satisfies_distance_rule(&self, vertex: VertexId) -> bool {
        self.vertices.get(vertex.index()).is_some_and(|v| {
            v.neighbors
                .iter()
                .all(|n| self.vertex(*n).building == VertexBuilding::Empty)
        })
    }

    /// Get valid settlement spots for a player.
    ///
    /// During setup the road-adjacency requirement is skipped.
    pub fn valid_settlement_spots(&self, player: PlayerId, is_setup: bool) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|v| {
                v.building == VertexBuilding::Empty
                    && self.satisfies_distance_rule(v.id)
                    && (is_setup || self.is_connected_to_road(v.id, player))
            })
            .map(|v| v.id)
            .collect()
    }

    /// One of the player's roads ends at `vertex`
    fn is_connected_to_road(&self, vertex: VertexId, player: PlayerId) -> bool {
        self.vertex(vertex)
            .edges
            .iter()
            .any(|e| self.edge(*e).road == EdgeBuilding::Road(player))
    }

    /// Empty edges connected to the player's network
    pub fn valid_road_spots(&self, player: PlayerId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| e.road == EdgeBuilding::Empty && self.is_connected_to_network(e.id, player))
            .map(|e| e.id)
            .collect()
    }

    /// `edge` extends the player's buildings or roads
    fn is_connected_to_network(&self, edge: EdgeId, player: PlayerId) -> bool {
        self.edge(edge).vertices.iter().any(|endpoint| {
            let owner = self.vertex(*endpoint).building.owner();
            // Own building at the endpoint
            if owner == Some(player) {
                return true;
            }
            // Or a road leading to it, unless an opponent's building is in the way
            owner.is_none()
                && self
                    .vertex(*endpoint)
                    .edges
                    .iter()
                    .any(|adj| *adj != edge && self.edge(*adj).road == EdgeBuilding::Road(player))
        })
    }

    /// The player's settlements
    pub fn valid_city_spots(&self, player: PlayerId) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|v| v.building == VertexBuilding::Settlement(player))
            .map(|v| v.id)
            .collect()
    }

    // ==================== Mutations ====================

    /// Claim an empty vertex with a settlement
    pub fn place_settlement(
        &mut self,
        vertex: VertexId,
        player: PlayerId,
    ) -> Result<(), GameError> {
        let v = self.vertices.get(vertex.index()).ok_or(GameError::InvalidLocation)?;
        if v.building != VertexBuilding::Empty || !self.satisfies_distance_rule(vertex) {
            return Err(GameError::InvalidLocation);
        }
        self.vertices[vertex.index()].building = VertexBuilding::Settlement(player);
        Ok(())
    }

    /// Upgrade one of the player's settlements to a city
    pub fn upgrade_to_city(&mut self, vertex: VertexId, player: PlayerId) -> Result<(), GameError> {
        let v = self
            .vertices
            .get_mut(vertex.index())
            .ok_or(GameError::InvalidLocation)?;
        if v.building != VertexBuilding::Settlement(player) {
            return Err(GameError::InvalidLocation);
        }
        v.building = VertexBuilding::City(player);
        Ok(())
    }

    /// Claim an empty edge with a road
    pub fn place_road(&mut self, edge: EdgeId, player: PlayerId) -> Result<(), GameError> {
        let e = self
            .edges
            .get_mut(edge.index())
            .ok_or(GameError::InvalidLocation)?;
        if e.road != EdgeBuilding::Empty {
            return Err(GameError::InvalidLocation);
        }
        e.road = EdgeBuilding::Road(player);
        Ok(())
    }

    /// Move the robber to another land tile, returning where it was
    pub fn move_robber(&mut self, to: TileId) -> Result<TileId, GameError> {
        let target = self.tiles.get(to.index()).ok_or(GameError::InvalidRobberTarget)?;
        if !target.is_land() || to == self.robber {
            return Err(GameError::InvalidRobberTarget);
        }
        let from = self.robber;
        self.tiles[from.index()].has_robber = false;
        self.tiles[to.index()].has_robber = true;
        self.robber = to;
        Ok(from)
    }

    /// Draw a random development card from the pool
    pub fn draw_dev_card<R: Rng>(&mut self, rng: &mut R) -> Result<DevelopmentCard, GameError> {
        let total = self.dev_cards.total();
        if total == 0 {
            return Err(GameError::EmptyDeck);
        }
        let mut pick = rng.gen_range(0..total);
        for card in DevelopmentCard::ALL {
            let count = self.dev_cards.get(card);
            if pick < count {
                self.dev_cards.remove(card, 1);
                return Ok(card);
            }
            pick -= count;
        }
        Err(GameError::EmptyDeck)
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
    }

    // ==================== Production ====================

    /// What each player collects for a dice total
    pub fn resources_for_roll(&self, roll: u8) -> BTreeMap<PlayerId, ResourceHand> {
        let mut distribution: BTreeMap<PlayerId, ResourceHand> = BTreeMap::new();

        for tile_id in self.tiles_with_number(roll) {
            let tile = self.tile(tile_id);
            let resource = match tile.resource() {
                Some(r) if tile.is_productive() => r,
                _ => continue,
            };
            for vertex in &tile.vertices {
                let building = self.vertex(*vertex).building;
                if let Some(owner) = building.owner() {
                    distribution
                        .entry(owner)
                        .or_default()
                        .add(resource, building.level());
                }
            }
        }

        distribution
    }

    /// Get players who have buildings on a tile's corners (for robber stealing)
    pub fn players_adjacent_to_tile(&self, tile: TileId) -> BTreeSet<PlayerId> {
        let Some(tile) = self.tiles.get(tile.index()) else {
            return BTreeSet::new();
        };
        tile.vertices
            .iter()
            .filter_map(|v| self.vertex(*v).building.owner())
            .collect()
    }

    // ==================== Longest Road ====================

    /// Length of the player's longest road
    pub fn longest_road(&self, player: PlayerId) -> u32 {
        roads::longest_road(self, player)
    }
}
