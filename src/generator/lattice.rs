//! Jittered quad lattice graphs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::geometry::{Graph, GraphBuilder, GraphError, Rect2i};

/// Shape of a lattice graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeOptions {
    /// Cells per side.
    pub cells_per_side: u32,
    /// Maximum corner displacement as a fraction of the cell spacing.
    /// Values below 0.5 keep every cell a simple quad.
    pub jitter: f32,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        Self {
            cells_per_side: 8,
            jitter: 0.35,
        }
    }
}

/// Builds a lattice of quad cells covering `bounds`.
///
/// Interior corners are displaced randomly; corners on the boundary stay
/// pinned so that the graph tiles exactly with its neighbours.
pub fn build_lattice_graph(bounds: Rect2i, options: &LatticeOptions, seed: u64) -> Result<Graph, GraphError> {
    let n = options.cells_per_side.max(1) as usize;
    let step = Vec2::new(bounds.width as f32 / n as f32, bounds.height as f32 / n as f32);
    let origin = Vec2::new(bounds.min_x as f32, bounds.min_y as f32);
    let jitter = options.jitter.clamp(0.0, 0.49);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let corner_index = |i: usize, j: usize| j * (n + 1) + i;
    let mut locations = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            let mut p = origin + step * Vec2::new(i as f32, j as f32);
            let interior = i > 0 && i < n && j > 0 && j < n;
            if interior {
                let dx = (rng.random::<f32>() * 2.0 - 1.0) * jitter;
                let dy = (rng.random::<f32>() * 2.0 - 1.0) * jitter;
                p += step * Vec2::new(dx, dy);
            }
            locations.push(p);
        }
    }

    let mut builder = GraphBuilder::new();
    for &p in &locations {
        builder.add_corner(p);
    }

    let cell_index = |i: usize, j: usize| j * n + i;
    for j in 0..n {
        for i in 0..n {
            let corners = vec![
                corner_index(i, j),
                corner_index(i + 1, j),
                corner_index(i + 1, j + 1),
                corner_index(i, j + 1),
            ];
            let center = corners.iter().map(|&c| locations[c]).sum::<Vec2>() / 4.0;
            builder.add_cell(center, corners);
        }
    }

    // Horizontal edges separate the cell above from the cell below.
    for j in 0..=n {
        for i in 0..n {
            let above = (j > 0).then(|| cell_index(i, j - 1));
            let below = (j < n).then(|| cell_index(i, j));
            builder.add_edge(corner_index(i, j), corner_index(i + 1, j), [above, below]);
        }
    }
    for i in 0..=n {
        for j in 0..n {
            let left = (i > 0).then(|| cell_index(i - 1, j));
            let right = (i < n).then(|| cell_index(i, j));
            builder.add_edge(corner_index(i, j), corner_index(i, j + 1), [left, right]);
        }
    }

    builder.build(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Graph {
        build_lattice_graph(Rect2i::new(256, -512, 256, 256), &LatticeOptions::default(), 9).unwrap()
    }

    #[test]
    fn test_counts() {
        let g = graph();
        assert_eq!(g.cells().len(), 64);
        assert_eq!(g.corners().len(), 81);
        assert_eq!(g.edges().len(), 144);
    }

    #[test]
    fn test_edges_have_distinct_corners_and_cells() {
        let g = graph();
        for e in g.edges() {
            assert_ne!(e.corner0, e.corner1);
            assert!(e.cells.iter().flatten().count() >= 1);
        }
    }

    #[test]
    fn test_triangles_match_corners() {
        let g = graph();
        for cell in 0..g.cells().len() {
            assert_eq!(g.triangles(cell).count(), g.cells()[cell].corners().len());
        }
    }

    #[test]
    fn test_boundary_pinned_and_interior_inside() {
        let g = graph();
        let b = g.bounds();
        for c in g.corners() {
            let p = c.location;
            assert!(p.x >= b.min_x as f32 && p.x <= b.max_x() as f32);
            assert!(p.y >= b.min_y as f32 && p.y <= b.max_y() as f32);
        }
        assert_eq!(g.corners()[0].location, Vec2::new(256.0, -512.0));
        assert_eq!(g.corners()[80].location, Vec2::new(512.0, -256.0));
    }

    #[test]
    fn test_same_seed_same_graph() {
        let a = graph();
        let b = graph();
        assert_eq!(a, b);
        let c = build_lattice_graph(a.bounds(), &LatticeOptions::default(), 10).unwrap();
        assert_ne!(a, c);
    }
}
