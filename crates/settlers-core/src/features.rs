//! Flattened numeric features for external learners.
//!
//! Per-player block (25 values):
//!
//! | index | value |
//! |-------|-------|
//! | 0 | knights played |
//! | 1 | longest road length |
//! | 2 | harbor score |
//! | 3 | largest army metric (knights played) |
//! | 4..9 | resource counts, in `Resource::ALL` order |
//! | 9..12 | settlements, cities, roads left in supply |
//! | 12..15 | eligible settlement, city and road locations |
//! | 15..20 | expected production per resource |
//! | 20..25 | development cards held, in `DevelopmentCard::ALL` order |
//!
//! The full vector is the player's own block, then the mean block over all
//! players with its last five entries collapsed into their sum (46 values).

use crate::awards::harbor_score;
use crate::board::{PlayerId, Resource};
use crate::game::{GamePhase, GameState};
use crate::player::DevelopmentCard;

/// Length of one player's block
pub const PLAYER_FEATURES: usize = 25;
/// Length of the full vector
pub const FEATURE_LEN: usize = PLAYER_FEATURES + PLAYER_FEATURES - 4;

/// Expected cards per roll of each resource from the player's buildings
pub fn expected_production(game: &GameState, player: PlayerId) -> [f64; 5] {
    let board = &game.board;
    let mut expected = [0.0; 5];
    for tile in board.land_tiles() {
        let Some(resource) = tile.resource() else {
            continue;
        };
        let levels: u32 = tile
            .vertices
            .iter()
            .map(|v| board.vertex(*v).building)
            .filter(|b| b.owner() == Some(player))
            .map(|b| b.level())
            .sum();
        let slot = Resource::ALL
            .iter()
            .position(|r| *r == resource)
            .unwrap_or_default();
        expected[slot] += tile.probability() * levels as f64;
    }
    expected
}

/// The 25-value block describing one player
pub fn player_features(game: &GameState, player: PlayerId) -> Vec<f64> {
    let Some(p) = game.get_player(player) else {
        return vec![0.0; PLAYER_FEATURES];
    };
    let board = &game.board;
    let in_setup = matches!(game.phase, GamePhase::Setup { .. });

    let mut x = Vec::with_capacity(PLAYER_FEATURES);
    x.push(p.played_knights as f64);
    x.push(board.longest_road(player) as f64);
    x.push(harbor_score(board, player) as f64);
    x.push(p.played_knights as f64);
    x.extend(Resource::ALL.iter().map(|r| p.resources.get(*r) as f64));
    x.extend([
        p.settlements_remaining as f64,
        p.cities_remaining as f64,
        p.roads_remaining as f64,
    ]);
    x.extend([
        board.valid_settlement_spots(player, in_setup).len() as f64,
        board.valid_city_spots(player).len() as f64,
        board.valid_road_spots(player).len() as f64,
    ]);
    x.extend(expected_production(game, player));
    let cards = p.all_dev_cards();
    x.extend(DevelopmentCard::ALL.iter().map(|c| cards.get(*c) as f64));
    x
}

/// The full 46-value vector for one player
pub fn feature_vector(game: &GameState, player: PlayerId) -> Vec<f64> {
    let blocks: Vec<Vec<f64>> = game
        .players
        .iter()
        .map(|p| player_features(game, p.id))
        .collect();
    let count = blocks.len().max(1) as f64;
    let mean: Vec<f64> = (0..PLAYER_FEATURES)
        .map(|i| blocks.iter().map(|b| b[i]).sum::<f64>() / count)
        .collect();

    let mut x = player_features(game, player);
    x.extend_from_slice(&mean[..PLAYER_FEATURES - 5]);
    x.push(mean[PLAYER_FEATURES - 5..].iter().sum());
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::VertexId;
    use crate::config::GameConfig;
    use crate::player::ResourceHand;

    fn game() -> GameState {
        GameState::new(GameConfig::seeded(21)).unwrap()
    }

    #[test]
    fn test_lengths() {
        let game = game();
        assert_eq!(player_features(&game, 0).len(), PLAYER_FEATURES);
        assert_eq!(feature_vector(&game, 0).len(), FEATURE_LEN);
        assert_eq!(FEATURE_LEN, 46);
    }

    #[test]
    fn test_fresh_player_block() {
        let game = game();
        let x = player_features(&game, 2);
        assert_eq!(&x[..9], &[0.0; 9]);
        assert_eq!(&x[9..12], &[5.0, 4.0, 15.0]);
        // During setup every open vertex is eligible
        assert_eq!(x[12], game.board.vertices().len() as f64);
        assert_eq!(&x[13..], &[0.0; 12]);
    }

    #[test]
    fn test_expected_production_follows_buildings() {
        let mut game = game();
        let tile = game
            .board
            .land_tiles()
            .find(|t| t.resource().is_some())
            .unwrap()
            .clone();
        let slot = Resource::ALL
            .iter()
            .position(|r| Some(*r) == tile.resource())
            .unwrap();
        let vertex: VertexId = tile.vertices[0];

        game.board.place_settlement(vertex, 1).unwrap();
        let settled = expected_production(&game, 1)[slot];
        assert!(settled >= tile.probability());

        game.board.upgrade_to_city(vertex, 1).unwrap();
        let upgraded = expected_production(&game, 1)[slot];
        assert!((upgraded - 2.0 * settled).abs() < 1e-12);
        assert_eq!(expected_production(&game, 0), [0.0; 5]);
    }

    #[test]
    fn test_mean_block_and_card_sum() {
        let mut game = game();
        game.players[0].resources = ResourceHand::with_amounts(4, 0, 0, 0, 0);
        game.players[1].dev_cards.add(DevelopmentCard::Knight, 2);
        game.players[3].dev_cards_bought_this_turn.add(DevelopmentCard::Monopoly, 2);

        let x = feature_vector(&game, 0);
        assert_eq!(x[4], 4.0);
        // Mean brick over four players
        assert_eq!(x[PLAYER_FEATURES + 4], 1.0);
        // Mean development cards held, summed over kinds
        assert_eq!(x[FEATURE_LEN - 1], 1.0);
    }
}
