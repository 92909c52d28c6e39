//! Constraint repair for dice numbers and harbors.
//!
//! Both constraints have the same shape: no two elements carrying a
//! restricted value may be neighbors. A sweep scans the elements in random
//! order; every restricted element marks itself and its neighbors as
//! restricted, and any neighbor that also carries a restricted value becomes
//! a donor. After a second shuffle each unrestricted element that can take a
//! value swaps with one donor. Swapping keeps the multiset of values intact.
//!
//! Sweeps repeat until one finds no donors, which is exactly the point where
//! the constraint holds, or until the attempt cap is reached.

use crate::board::{Edge, GenerationError, HarborSlot, Tile};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Dice totals that may not sit next to each other
pub const HIGH_NUMBERS: [u8; 2] = [6, 8];

/// Run one repair sweep, returning how many donors were found.
pub(crate) fn repair_sweep<T, R>(
    values: &mut [T],
    neighbors: &[Vec<usize>],
    is_restricted: impl Fn(&T) -> bool,
    can_receive: impl Fn(&T) -> bool,
    rng: &mut R,
) -> usize
where
    R: Rng + ?Sized,
{
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.shuffle(rng);

    let mut restricted = vec![false; values.len()];
    let mut stripped = vec![false; values.len()];
    let mut donors = Vec::new();

    for &i in &order {
        if stripped[i] || !is_restricted(&values[i]) {
            continue;
        }
        restricted[i] = true;
        for &n in &neighbors[i] {
            restricted[n] = true;
            if !stripped[n] && is_restricted(&values[n]) {
                stripped[n] = true;
                donors.push(n);
            }
        }
    }

    let found = donors.len();
    if found == 0 {
        return 0;
    }

    order.shuffle(rng);
    for &i in &order {
        if donors.is_empty() {
            break;
        }
        if restricted[i] || !can_receive(&values[i]) {
            continue;
        }
        if let Some(donor) = donors.pop() {
            values.swap(i, donor);
        }
    }
    // Donors left over keep their value and are retried on the next sweep.
    found
}

/// Repeat sweeps until one finds nothing to move.
///
/// Returns the number of sweeps run, or `Err(attempts)` when the cap is hit.
pub(crate) fn repair<T, R>(
    values: &mut [T],
    neighbors: &[Vec<usize>],
    is_restricted: impl Fn(&T) -> bool,
    can_receive: impl Fn(&T) -> bool,
    max_attempts: usize,
    rng: &mut R,
) -> Result<usize, usize>
where
    R: Rng + ?Sized,
{
    for attempt in 1..=max_attempts {
        let displaced = repair_sweep(values, neighbors, &is_restricted, &can_receive, rng);
        debug!(attempt, displaced, "Repair sweep");
        if displaced == 0 {
            return Ok(attempt);
        }
    }
    Err(max_attempts)
}

fn is_high(number: &Option<u8>) -> bool {
    number.is_some_and(|n| HIGH_NUMBERS.contains(&n))
}

/// Move 6s and 8s apart. The desert and the water rim never take part.
pub(crate) fn repair_dice<R: Rng + ?Sized>(
    tiles: &mut [Tile],
    max_attempts: usize,
    rng: &mut R,
) -> Result<usize, GenerationError> {
    let mut numbers: Vec<Option<u8>> = tiles.iter().map(|t| t.dice_number).collect();
    let neighbors: Vec<Vec<usize>> = tiles
        .iter()
        .map(|t| t.neighbors.iter().map(|n| n.index()).collect())
        .collect();

    let attempts = repair(&mut numbers, &neighbors, is_high, Option::is_some, max_attempts, rng)
        .map_err(|attempts| GenerationError::DiceRepairExhausted { attempts })?;

    for (tile, number) in tiles.iter_mut().zip(numbers) {
        tile.dice_number = number;
    }
    Ok(attempts)
}

/// Move usable harbors apart. Inland edges never receive a harbor.
///
/// On exhaustion the edges keep the placement of the last sweep, which is
/// still a permutation of the harbor deck.
pub(crate) fn repair_harbors<R: Rng + ?Sized>(
    edges: &mut [Edge],
    max_attempts: usize,
    rng: &mut R,
) -> Result<usize, GenerationError> {
    let mut slots: Vec<HarborSlot> = edges.iter().map(|e| e.harbor).collect();
    let neighbors: Vec<Vec<usize>> = edges
        .iter()
        .map(|e| e.neighbors.iter().map(|n| n.index()).collect())
        .collect();

    let result = repair(
        &mut slots,
        &neighbors,
        HarborSlot::is_active,
        |slot| *slot != HarborSlot::Inland,
        max_attempts,
        rng,
    );

    for (edge, slot) in edges.iter_mut().zip(slots) {
        edge.harbor = slot;
    }
    result.map_err(|attempts| GenerationError::HarborRepairExhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, LAND_TILES};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// A path graph 0 - 1 - 2 - ... - (n-1)
    fn path(n: usize) -> Vec<Vec<usize>> {
        (0..n)
            .map(|i| {
                let mut adj = Vec::new();
                if i > 0 {
                    adj.push(i - 1);
                }
                if i + 1 < n {
                    adj.push(i + 1);
                }
                adj
            })
            .collect()
    }

    fn violations(values: &[bool], neighbors: &[Vec<usize>]) -> usize {
        (0..values.len())
            .filter(|&i| values[i] && neighbors[i].iter().any(|&n| values[n]))
            .count()
    }

    #[test]
    fn test_sweep_finds_nothing_when_valid() {
        let neighbors = path(6);
        let mut values = [true, false, true, false, true, false];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(repair_sweep(&mut values, &neighbors, |v| *v, |_| true, &mut rng), 0);
        assert_eq!(values, [true, false, true, false, true, false]);
    }

    #[test]
    fn test_repair_separates_and_preserves_multiset() {
        let neighbors = path(12);
        let mut values = [
            true, true, true, false, false, false, false, false, false, false, false, false,
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let attempts = repair(&mut values, &neighbors, |v| *v, |_| true, 100, &mut rng).unwrap();
        assert!(attempts >= 2);
        assert_eq!(values.iter().filter(|v| **v).count(), 3);
        assert_eq!(violations(&values, &neighbors), 0);
    }

    #[test]
    fn test_repair_never_moves_onto_blank() {
        let neighbors = path(8);
        let mut values = [Some(6), Some(8), None, Some(3), Some(4), Some(5), Some(9), Some(10)];
        let mut rng = StdRng::seed_from_u64(5);
        repair(&mut values, &neighbors, is_high, Option::is_some, 100, &mut rng).unwrap();

        assert_eq!(values[2], None);
        let mut sorted = values;
        sorted.sort();
        assert_eq!(sorted, [None, Some(3), Some(4), Some(5), Some(6), Some(8), Some(9), Some(10)]);
        let flags: Vec<bool> = values.iter().map(is_high).collect();
        assert_eq!(violations(&flags, &neighbors), 0);
    }

    #[test]
    fn test_repair_reports_exhaustion() {
        // Two elements that always neighbor each other can never be separated
        let neighbors = vec![vec![1], vec![0]];
        let mut values = [true, true];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(repair(&mut values, &neighbors, |v| *v, |_| true, 3, &mut rng), Err(3));
        assert_eq!(values, [true, true]);
    }

    #[test]
    fn test_dice_repair_reports_exhaustion() {
        // With every land tile on a 6 no swap can ever separate them
        let mut tiles = Board::with_seed(3).unwrap().tiles().to_vec();
        for tile in tiles.iter_mut().filter(|t| t.is_land()) {
            tile.dice_number = Some(6);
        }
        let before: Vec<Option<u8>> = tiles.iter().map(|t| t.dice_number).collect();

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            repair_dice(&mut tiles, 1, &mut rng),
            Err(GenerationError::DiceRepairExhausted { attempts: 1 })
        );
        let after: Vec<Option<u8>> = tiles.iter().map(|t| t.dice_number).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_no_adjacent_high_numbers() {
        for seed in 0..50 {
            let board = Board::with_seed(seed).unwrap();
            for tile in board.land_tiles().filter(|t| is_high(&t.dice_number)) {
                for n in &tile.neighbors {
                    assert!(
                        !is_high(&board.tile(*n).dice_number),
                        "seed {seed}: high numbers on {:?} and {:?}",
                        tile.coord,
                        board.tile(*n).coord
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_adjacent_harbors() {
        for seed in 0..50 {
            let board = Board::with_seed(seed).unwrap();
            assert!(!board.generation_report().relaxed_harbors);
            for edge in board.edges().iter().filter(|e| e.harbor.is_active()) {
                for n in &edge.neighbors {
                    assert!(!board.edge(*n).harbor.is_active(), "seed {seed}: adjacent harbors");
                }
            }
        }
    }

    #[test]
    fn test_desert_keeps_no_number() {
        for seed in 0..20 {
            let board = Board::with_seed(seed).unwrap();
            let numbered = board.land_tiles().filter(|t| t.dice_number.is_some()).count();
            assert_eq!(numbered, LAND_TILES - 1);
            assert!(board.tiles().iter().filter(|t| !t.is_land()).all(|t| t.dice_number.is_none()));
        }
    }
}
