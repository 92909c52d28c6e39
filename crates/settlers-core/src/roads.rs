//! Longest road: the longest simple path through one player's roads.
//!
//! A depth-first search is seeded at every owned edge, in both directions.
//! The search leaves an edge through its far endpoint only, so forks are
//! never counted as part of a path. An opponent's settlement or city on the
//! vertex between two roads breaks the path there. The visited set is local
//! to one call, so the board is never mutated by the search.

use crate::board::{Board, EdgeBuilding, EdgeId, PlayerId, VertexId};

/// Length in edges of the player's longest road
pub fn longest_road(board: &Board, player: PlayerId) -> u32 {
    let mut visited = vec![false; board.edges().len()];
    let mut longest = 0;

    for edge in board.player_roads(player) {
        visited[edge.id.index()] = true;
        for endpoint in edge.vertices {
            let length = 1 + extend(board, player, edge.id, endpoint, &mut visited);
            longest = longest.max(length);
        }
        visited[edge.id.index()] = false;
    }

    longest
}

/// Longest continuation leaving `edge` through `through`
fn extend(
    board: &Board,
    player: PlayerId,
    edge: EdgeId,
    through: VertexId,
    visited: &mut [bool],
) -> u32 {
    let vertex = board.vertex(through);
    if vertex.building.owner().is_some_and(|owner| owner != player) {
        return 0;
    }

    let mut best = 0;
    for &next in &vertex.edges {
        if next == edge
            || visited[next.index()]
            || board.edge(next).road != EdgeBuilding::Road(player)
        {
            continue;
        }
        visited[next.index()] = true;
        let far = board.edge(next).other_vertex(through);
        best = best.max(1 + extend(board, player, next, far, visited));
        visited[next.index()] = false;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::with_seed(42).unwrap()
    }

    /// Walk a simple chain of `len` edges starting at `start`, returning the
    /// edges and the vertices along it.
    fn chain(board: &Board, start: VertexId, len: usize) -> (Vec<EdgeId>, Vec<VertexId>) {
        fn grow(
            board: &Board,
            len: usize,
            edges: &mut Vec<EdgeId>,
            path: &mut Vec<VertexId>,
        ) -> bool {
            if edges.len() == len {
                return true;
            }
            let current = *path.last().unwrap();
            for &e in &board.vertex(current).edges {
                let far = board.edge(e).other_vertex(current);
                if path.contains(&far) {
                    continue;
                }
                edges.push(e);
                path.push(far);
                if grow(board, len, edges, path) {
                    return true;
                }
                edges.pop();
                path.pop();
            }
            false
        }

        let mut edges = Vec::new();
        let mut path = vec![start];
        assert!(grow(board, len, &mut edges, &mut path), "no simple chain of {len}");
        (edges, path)
    }

    fn interior_start(board: &Board) -> VertexId {
        board
            .vertices()
            .iter()
            .find(|v| !v.coastal)
            .map(|v| v.id)
            .unwrap()
    }

    #[test]
    fn test_no_roads() {
        assert_eq!(longest_road(&board(), 0), 0);
    }

    #[test]
    fn test_single_road() {
        let mut board = board();
        board.place_road(EdgeId(0), 0).unwrap();
        assert_eq!(longest_road(&board, 0), 1);
        assert_eq!(longest_road(&board, 1), 0);
    }

    #[test]
    fn test_chain_length() {
        let mut board = board();
        let (edges, _) = chain(&board, interior_start(&board), 6);
        for e in &edges {
            board.place_road(*e, 0).unwrap();
        }
        assert_eq!(board.longest_road(0), 6);
    }

    #[test]
    fn test_opponent_settlement_splits_chain() {
        let mut board = board();
        let (edges, path) = chain(&board, interior_start(&board), 7);
        for e in &edges {
            board.place_road(*e, 0).unwrap();
        }
        // path[2] is the vertex between the 2nd and 3rd edge
        board.place_settlement(path[2], 1).unwrap();
        assert_eq!(board.longest_road(0), 5);
    }

    #[test]
    fn test_own_settlement_does_not_split_chain() {
        let mut board = board();
        let (edges, path) = chain(&board, interior_start(&board), 5);
        for e in &edges {
            board.place_road(*e, 0).unwrap();
        }
        board.place_settlement(path[3], 0).unwrap();
        assert_eq!(board.longest_road(0), 5);
    }

    #[test]
    fn test_fork_is_not_a_path() {
        let mut board = board();
        let center = board.vertices().iter().find(|v| v.edges.len() == 3).unwrap().clone();
        for e in &center.edges {
            board.place_road(*e, 0).unwrap();
        }
        assert_eq!(board.longest_road(0), 2);
    }

    #[test]
    fn test_roads_of_other_players_are_ignored() {
        let mut board = board();
        let (edges, _) = chain(&board, interior_start(&board), 4);
        for (i, e) in edges.iter().enumerate() {
            board.place_road(*e, (i % 2) as PlayerId).unwrap();
        }
        assert_eq!(board.longest_road(0), 1);
        assert_eq!(board.longest_road(1), 1);
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let mut board = board();
        let (edges, _) = chain(&board, interior_start(&board), 3);
        for e in &edges {
            board.place_road(*e, 0).unwrap();
        }
        let before: Vec<_> = board.edges().iter().map(|e| e.road).collect();
        let _ = board.longest_road(0);
        let after: Vec<_> = board.edges().iter().map(|e| e.road).collect();
        assert_eq!(before, after);
    }
}
