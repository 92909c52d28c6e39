//! Decision policies.
//!
//! The game never decides anything on a player's behalf beyond forced
//! moves. Each seat is driven by a `Policy` that picks one of the legal
//! actions the game offers. Real heuristics and learned policies live
//! outside this crate; `RandomPolicy` is the reference implementation.

use crate::actions::GameAction;
use crate::board::PlayerId;
use crate::game::GameState;
use rand::prelude::*;

/// Chooses an action for one seat
pub trait Policy {
    /// Pick one of `legal`, or `None` to accept the game's default move
    fn choose_action(
        &mut self,
        game: &GameState,
        player: PlayerId,
        legal: &[GameAction],
    ) -> Option<GameAction>;
}

/// Picks uniformly at random among the legal actions
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn choose_action(
        &mut self,
        _game: &GameState,
        _player: PlayerId,
        legal: &[GameAction],
    ) -> Option<GameAction> {
        legal.choose(&mut self.rng).cloned()
    }
}

/// One seeded `RandomPolicy` per seat
pub fn random_policies(players: usize, seed: u64) -> Vec<Box<dyn Policy>> {
    (0..players)
        .map(|seat| {
            Box::new(RandomPolicy::with_seed(seed.wrapping_add(seat as u64))) as Box<dyn Policy>
        })
        .collect()
}
