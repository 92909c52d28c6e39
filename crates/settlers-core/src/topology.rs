//! Adjacency resolution: tiles → vertices → edges.
//!
//! Tile adjacency comes from the exact unit-distance test on lattice
//! positions. A vertex is every unordered triple of pairwise adjacent tiles
//! with at least one land tile; an edge is every pair of vertices sharing
//! exactly two tiles. Identities are the sorted index tuples, so
//! deduplication never compares floating point positions.
//!
//! Every cardinality invariant is checked before returning; a violation is
//! a generator bug and is reported as a `GenerationError`.

use crate::board::{
    Edge, EdgeBuilding, EdgeId, GenerationError, HarborSlot, Tile, TileId, Vertex,
    VertexBuilding, VertexId, EDGE_COUNT, LATTICE_ADJACENCIES, VERTEX_COUNT,
};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

const LAND_TILE_DEGREE: usize = 6;
const VERTEX_DEGREE: RangeInclusive<usize> = 2..=3;
const EDGE_DEGREE: RangeInclusive<usize> = 2..=4;

/// Fill tile adjacency and derive the vertex and edge arenas.
pub(crate) fn resolve(tiles: &mut [Tile]) -> Result<(Vec<Vertex>, Vec<Edge>), GenerationError> {
    link_tiles(tiles)?;
    let mut vertices = derive_vertices(tiles)?;
    let mut edges = derive_edges(tiles, &mut vertices)?;
    link_edges(&vertices, &mut edges)?;
    Ok((vertices, edges))
}

fn link_tiles(tiles: &mut [Tile]) -> Result<(), GenerationError> {
    let coords: Vec<_> = tiles.iter().map(|t| t.coord).collect();
    for tile in tiles.iter_mut() {
        tile.neighbors = coords
            .iter()
            .enumerate()
            .filter(|(_, c)| tile.coord.is_adjacent(c))
            .map(|(i, _)| TileId(i))
            .collect();
    }

    let total: usize = tiles.iter().map(|t| t.neighbors.len()).sum();
    if total != LATTICE_ADJACENCIES {
        return Err(GenerationError::Cardinality {
            entity: "tile adjacencies",
            expected: LATTICE_ADJACENCIES,
            found: total,
        });
    }
    for tile in tiles.iter().filter(|t| t.is_land()) {
        check_exact("tile", tile.id.index(), "neighbors", tile.neighbors.len())?;
    }
    Ok(())
}

fn derive_vertices(tiles: &mut [Tile]) -> Result<Vec<Vertex>, GenerationError> {
    let mut triples: BTreeSet<[TileId; 3]> = BTreeSet::new();
    for tile in tiles.iter().filter(|t| t.is_land()) {
        for second in &tile.neighbors {
            for third in &tiles[second.index()].neighbors {
                if *third != tile.id && tile.neighbors.contains(third) {
                    let mut key = [tile.id, *second, *third];
                    key.sort();
                    triples.insert(key);
                }
            }
        }
    }

    if triples.len() != VERTEX_COUNT {
        return Err(GenerationError::Cardinality {
            entity: "vertices",
            expected: VERTEX_COUNT,
            found: triples.len(),
        });
    }

    let vertices: Vec<Vertex> = triples
        .into_iter()
        .enumerate()
        .map(|(i, key)| {
            let centers = key.map(|t| tiles[t.index()].coord.center());
            Vertex {
                id: VertexId(i),
                tiles: key,
                position: (
                    centers.iter().map(|c| c.0).sum::<f64>() / 3.0,
                    centers.iter().map(|c| c.1).sum::<f64>() / 3.0,
                ),
                coastal: key.iter().any(|t| !tiles[t.index()].is_land()),
                neighbors: Vec::new(),
                edges: Vec::new(),
                building: VertexBuilding::Empty,
            }
        })
        .collect();

    for vertex in &vertices {
        for tile in vertex.tiles {
            tiles[tile.index()].vertices.push(vertex.id);
        }
    }
    for tile in tiles.iter().filter(|t| t.is_land()) {
        check_exact("tile", tile.id.index(), "vertices", tile.vertices.len())?;
    }
    Ok(vertices)
}

fn derive_edges(tiles: &mut [Tile], vertices: &mut [Vertex]) -> Result<Vec<Edge>, GenerationError> {
    let mut edges = Vec::new();
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            let shared: Vec<TileId> = a
                .tiles
                .iter()
                .copied()
                .filter(|t| b.tiles.contains(t))
                .collect();
            if let [first, second] = shared[..] {
                edges.push(Edge {
                    id: EdgeId(edges.len()),
                    vertices: [a.id, b.id],
                    tiles: [first, second],
                    position: (
                        (a.position.0 + b.position.0) / 2.0,
                        (a.position.1 + b.position.1) / 2.0,
                    ),
                    harbor: if a.coastal && b.coastal {
                        HarborSlot::Empty
                    } else {
                        HarborSlot::Inland
                    },
                    neighbors: Vec::new(),
                    road: EdgeBuilding::Empty,
                });
            }
        }
    }

    if edges.len() != EDGE_COUNT {
        return Err(GenerationError::Cardinality {
            entity: "edges",
            expected: EDGE_COUNT,
            found: edges.len(),
        });
    }

    for edge in &edges {
        let [a, b] = edge.vertices;
        vertices[a.index()].edges.push(edge.id);
        vertices[b.index()].edges.push(edge.id);
        vertices[a.index()].neighbors.push(b);
        vertices[b.index()].neighbors.push(a);
        for tile in edge.tiles {
            tiles[tile.index()].edges.push(edge.id);
        }
    }

    for vertex in vertices.iter() {
        check_range("vertex", vertex.id.index(), "edges", vertex.edges.len(), VERTEX_DEGREE)?;
        check_range(
            "vertex",
            vertex.id.index(),
            "neighbors",
            vertex.neighbors.len(),
            VERTEX_DEGREE,
        )?;
    }
    for tile in tiles.iter().filter(|t| t.is_land()) {
        check_exact("tile", tile.id.index(), "edges", tile.edges.len())?;
    }
    Ok(edges)
}

fn link_edges(vertices: &[Vertex], edges: &mut [Edge]) -> Result<(), GenerationError> {
    for vertex in vertices {
        for a in &vertex.edges {
            for b in &vertex.edges {
                if a != b {
                    edges[a.index()].neighbors.push(*b);
                }
            }
        }
    }
    for edge in edges.iter_mut() {
        edge.neighbors.sort();
        check_range("edge", edge.id.index(), "neighbors", edge.neighbors.len(), EDGE_DEGREE)?;
    }
    Ok(())
}

fn check_exact(
    entity: &'static str,
    index: usize,
    relation: &'static str,
    found: usize,
) -> Result<(), GenerationError> {
    check_range(entity, index, relation, found, LAND_TILE_DEGREE..=LAND_TILE_DEGREE)
}

fn check_range(
    entity: &'static str,
    index: usize,
    relation: &'static str,
    found: usize,
    allowed: RangeInclusive<usize>,
) -> Result<(), GenerationError> {
    if allowed.contains(&found) {
        Ok(())
    } else {
        Err(GenerationError::Degree {
            entity,
            index,
            relation,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::board::*;
    use std::collections::HashSet;

    #[test]
    fn test_cardinalities() {
        let board = Board::with_seed(1).unwrap();
        assert_eq!(board.land_tiles().count(), LAND_TILES);
        assert_eq!(board.vertices().len(), VERTEX_COUNT);
        assert_eq!(board.edges().len(), EDGE_COUNT);
    }

    #[test]
    fn test_degrees() {
        for seed in 0..5 {
            let board = Board::with_seed(seed).unwrap();
            for tile in board.land_tiles() {
                assert_eq!(tile.neighbors.len(), 6);
                assert_eq!(tile.vertices.len(), 6);
                assert_eq!(tile.edges.len(), 6);
            }
            for vertex in board.vertices() {
                assert!((2..=3).contains(&vertex.edges.len()));
                assert!((2..=3).contains(&vertex.neighbors.len()));
                assert_eq!(vertex.edges.len(), vertex.neighbors.len());
            }
            for edge in board.edges() {
                assert!((2..=4).contains(&edge.neighbors.len()));
            }
        }
    }

    #[test]
    fn test_relations_are_symmetric() {
        let board = Board::with_seed(2).unwrap();
        for tile in board.tiles() {
            for n in &tile.neighbors {
                assert!(board.tile(*n).neighbors.contains(&tile.id));
            }
        }
        for vertex in board.vertices() {
            for n in &vertex.neighbors {
                assert!(board.vertex(*n).neighbors.contains(&vertex.id));
            }
            for e in &vertex.edges {
                assert!(board.edge(*e).vertices.contains(&vertex.id));
            }
        }
        for edge in board.edges() {
            for n in &edge.neighbors {
                assert!(board.edge(*n).neighbors.contains(&edge.id));
                let other = board.edge(*n);
                assert!(edge.vertices.iter().any(|v| other.vertices.contains(v)));
            }
        }
    }

    #[test]
    fn test_identities_are_unique() {
        let board = Board::with_seed(3).unwrap();
        let triples: HashSet<_> = board.vertices().iter().map(|v| v.tiles).collect();
        assert_eq!(triples.len(), VERTEX_COUNT);
        let pairs: HashSet<_> = board.edges().iter().map(|e| e.vertices).collect();
        assert_eq!(pairs.len(), EDGE_COUNT);
    }

    #[test]
    fn test_vertex_tiles_are_mutually_adjacent() {
        let board = Board::with_seed(4).unwrap();
        for vertex in board.vertices() {
            let [a, b, c] = vertex.tiles.map(|t| board.tile(t).coord);
            assert!(a.is_adjacent(&b) && b.is_adjacent(&c) && a.is_adjacent(&c));
            assert!(vertex.tiles.iter().any(|t| board.tile(*t).is_land()));
        }
    }

    #[test]
    fn test_positions_are_centroids() {
        let board = Board::with_seed(5).unwrap();
        let edge = &board.edges()[0];
        let [a, b] = edge.vertices.map(|v| board.vertex(v).position);
        assert!((edge.position.0 - (a.0 + b.0) / 2.0).abs() < 1e-12);
        assert!((edge.position.1 - (a.1 + b.1) / 2.0).abs() < 1e-12);
    }
}
