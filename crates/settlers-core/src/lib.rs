//! Settlers - a hex-board trading game engine
//!
//! This crate provides the core game logic, including:
//! - Procedural board generation on a hex lattice with exact topology checks
//! - Randomized repair of dice and harbor placement
//! - Longest-road search and the three bonus awards
//! - Player state, resources and development cards
//! - A game state machine driven by pluggable policies
//!
//! # Architecture
//!
//! The board is an arena: tiles, vertices and edges live in vectors owned by
//! [`Board`] and refer to each other through [`TileId`], [`VertexId`] and
//! [`EdgeId`]. Everything is single-threaded and deterministic for a given
//! seed.
//!
//! # Modules
//!
//! - [`hex`]: Lattice coordinates and traversal
//! - [`board`]: Board representation, generation, queries and mutations
//! - `topology`: Tile, vertex and edge adjacency (internal)
//! - [`placement`]: Constraint repair for dice and harbors
//! - [`roads`]: Longest-road search
//! - [`awards`]: Longest road, largest army and most harbors
//! - [`player`]: Player state and resources
//! - [`actions`]: Actions and events
//! - [`game`]: Game state machine
//! - [`policy`]: Decision seam for each seat
//! - [`features`]: Numeric feature vectors
//! - [`config`]: Typed configuration

pub mod actions;
pub mod awards;
pub mod board;
pub mod config;
pub mod features;
pub mod game;
pub mod hex;
pub mod placement;
pub mod player;
pub mod policy;
pub mod roads;
mod topology;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use awards::{Award, AwardChange, AwardHolder, Awards};
pub use board::{
    Board, Edge, EdgeBuilding, EdgeId, GenerationError, GenerationReport, Harbor, HarborSlot,
    PlayerId, Resource, Tile, TileId, TileType, Vertex, VertexBuilding, VertexId,
};
pub use config::{AwardRules, BoardConfig, ConfigError, GameConfig};
pub use features::{feature_vector, player_features};
pub use game::{GameError, GamePhase, GameState, SetupPlacing, StartError};
pub use hex::HexCoord;
pub use player::{CardCounts, DevelopmentCard, Player, ResourceHand};
pub use policy::{random_policies, Policy, RandomPolicy};
