//! Bonus awards: longest road, largest army and most harbors.
//!
//! All three share one comparator. A title is only ever taken by a single
//! leader whose value clears the threshold and strictly exceeds the value
//! recorded for the current holder. When several players tie for the lead the
//! title goes to nobody: a tie for a vacant title leaves it vacant, and a
//! holder beaten by tied challengers loses it. This departs from a seat-order
//! tie-break, which would hand the title to the lowest-indexed leader.

use crate::board::{Board, PlayerId};
use serde::{Deserialize, Serialize};

/// The three bonus titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Award {
    LongestRoad,
    LargestArmy,
    MostHarbors,
}

impl Award {
    pub const ALL: [Award; 3] = [Award::LongestRoad, Award::LargestArmy, Award::MostHarbors];
}

/// Who holds a title and the value they qualified with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardHolder {
    pub player: PlayerId,
    pub value: u32,
}

/// A title changing hands; `current` is `None` when it falls vacant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardChange {
    pub award: Award,
    pub previous: Option<PlayerId>,
    pub current: Option<PlayerId>,
    pub value: u32,
}

/// Current holder records, owned by the board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Awards {
    pub longest_road: Option<AwardHolder>,
    pub largest_army: Option<AwardHolder>,
    pub most_harbors: Option<AwardHolder>,
}

impl Awards {
    pub fn get(&self, award: Award) -> Option<AwardHolder> {
        match award {
            Award::LongestRoad => self.longest_road,
            Award::LargestArmy => self.largest_army,
            Award::MostHarbors => self.most_harbors,
        }
    }

    fn slot_mut(&mut self, award: Award) -> &mut Option<AwardHolder> {
        match award {
            Award::LongestRoad => &mut self.longest_road,
            Award::LargestArmy => &mut self.largest_army,
            Award::MostHarbors => &mut self.most_harbors,
        }
    }

    /// Number of titles the player holds
    pub fn held_by(&self, player: PlayerId) -> u32 {
        Award::ALL
            .iter()
            .filter(|a| self.get(**a).is_some_and(|h| h.player == player))
            .count() as u32
    }

    /// Re-evaluate one title against fresh per-player values.
    ///
    /// Returns the change when the title moves to a new player or is taken
    /// off a holder who was outscored by tied challengers. A holder
    /// improving on their own record only updates the recorded value.
    pub fn contest(
        &mut self,
        award: Award,
        standings: &[(PlayerId, u32)],
        threshold: u32,
    ) -> Option<AwardChange> {
        let best = standings.iter().map(|(_, v)| *v).max()?;
        if best < threshold {
            return None;
        }
        let leaders: Vec<PlayerId> = standings
            .iter()
            .filter(|(_, v)| *v == best)
            .map(|(p, _)| *p)
            .collect();

        let slot = self.slot_mut(award);
        let current = *slot;
        let previous = match current {
            Some(holder) if best <= holder.value => return None,
            Some(holder) if leaders.contains(&holder.player) => {
                *slot = Some(AwardHolder {
                    player: holder.player,
                    value: best,
                });
                return None;
            }
            Some(holder) => Some(holder.player),
            None => None,
        };

        let current = match leaders[..] {
            [leader] => Some(leader),
            _ if previous.is_none() => return None,
            _ => None,
        };
        *slot = current.map(|player| AwardHolder { player, value: best });
        Some(AwardChange {
            award,
            previous,
            current,
            value: best,
        })
    }
}

/// Most-harbors metric: for every road the player owns on an edge with a
/// usable harbor, the build levels of both endpoints, whoever built them.
pub fn harbor_score(board: &Board, player: PlayerId) -> u32 {
    board
        .player_roads(player)
        .filter(|e| e.harbor.is_active())
        .flat_map(|e| e.vertices)
        .map(|v| board.vertex(v).building.level())
        .sum()
}
