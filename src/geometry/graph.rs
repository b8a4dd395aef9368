//! Planar Voronoi-like graphs: cells, corners, edges and fan triangles.

use glam::Vec2;
use thiserror::Error;

use super::Rect2i;

/// Errors raised when assembling a graph that violates its invariants.
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Edge {0} references corner {1} which does not exist")]
    CornerOutOfRange(usize, usize),
    #[error("Edge {0} connects corner {1} to itself")]
    DegenerateEdge(usize, usize),
    #[error("Cell {0} has {1} corners, at least 3 are required")]
    TooFewCorners(usize, usize),
    #[error("Cell {0} lists corner {1} more than once")]
    DuplicateCorner(usize, usize),
    #[error("Edge {0} references cell {1} which does not exist")]
    CellOutOfRange(usize, usize),
    #[error("Cell {0} references corner {1} which does not exist")]
    CellCornerOutOfRange(usize, usize),
}

/// A vertex shared by adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub location: Vec2,
}

/// A polygonal cell with a center point and a cyclically ordered boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub center: Vec2,
    corners: Vec<usize>,
}

impl Cell {
    /// Corner indices, sorted by angle around the center.
    pub fn corners(&self) -> &[usize] {
        &self.corners
    }
}

/// A boundary segment between two corners, separating up to two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub corner0: usize,
    pub corner1: usize,
    /// Cells on either side; border edges have only one.
    pub cells: [Option<usize>; 2],
}

/// One fan triangle `{cell center, corner1, corner2}` of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub cell: usize,
    pub corner1: usize,
    pub corner2: usize,
}

/// An immutable planar graph covering `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    bounds: Rect2i,
    corners: Vec<Corner>,
    cells: Vec<Cell>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn bounds(&self) -> Rect2i {
        self.bounds
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn corner(&self, index: usize) -> Option<&Corner> {
        self.corners.get(index)
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// End points of an edge.
    pub fn edge_points(&self, edge: &Edge) -> (Vec2, Vec2) {
        (
            self.corners[edge.corner0].location,
            self.corners[edge.corner1].location,
        )
    }

    /// Fan triangulation of a cell around its center.
    ///
    /// A cell with `n` corners yields exactly `n` triangles, one per
    /// boundary segment, which together tile the cell.
    pub fn triangles(&self, cell: usize) -> impl Iterator<Item = Triangle> + '_ {
        let corners = &self.cells[cell].corners;
        let n = corners.len();
        (0..n).map(move |i| Triangle {
            cell,
            corner1: corners[i],
            corner2: corners[(i + 1) % n],
        })
    }

    /// Vertex positions of a fan triangle.
    pub fn triangle_points(&self, tri: &Triangle) -> [Vec2; 3] {
        [
            self.cells[tri.cell].center,
            self.corners[tri.corner1].location,
            self.corners[tri.corner2].location,
        ]
    }
}

/// Incrementally assembles a [`Graph`] and validates it on [`build`](GraphBuilder::build).
#[derive(Debug, Default)]
pub struct GraphBuilder {
    corners: Vec<Corner>,
    cells: Vec<Cell>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_corner(&mut self, location: Vec2) -> usize {
        self.corners.push(Corner { location });
        self.corners.len() - 1
    }

    /// Adds a cell. Corner order is normalized during `build`.
    pub fn add_cell(&mut self, center: Vec2, corners: Vec<usize>) -> usize {
        self.cells.push(Cell { center, corners });
        self.cells.len() - 1
    }

    pub fn add_edge(&mut self, corner0: usize, corner1: usize, cells: [Option<usize>; 2]) -> usize {
        self.edges.push(Edge { corner0, corner1, cells });
        self.edges.len() - 1
    }

    /// Validates the graph and sorts every cell's corners by angle around
    /// its center so that the boundary is cyclically ordered.
    pub fn build(mut self, bounds: Rect2i) -> Result<Graph, GraphError> {
        let num_corners = self.corners.len();
        let num_cells = self.cells.len();

        for (i, edge) in self.edges.iter().enumerate() {
            for c in [edge.corner0, edge.corner1] {
                if c >= num_corners {
                    return Err(GraphError::CornerOutOfRange(i, c));
                }
            }
            if edge.corner0 == edge.corner1 {
                return Err(GraphError::DegenerateEdge(i, edge.corner0));
            }
            for cell in edge.cells.iter().flatten() {
                if *cell >= num_cells {
                    return Err(GraphError::CellOutOfRange(i, *cell));
                }
            }
        }

        for (i, cell) in self.cells.iter_mut().enumerate() {
            if cell.corners.len() < 3 {
                return Err(GraphError::TooFewCorners(i, cell.corners.len()));
            }
            let mut seen = cell.corners.clone();
            seen.sort_unstable();
            if let Some(w) = seen.windows(2).find(|w| w[0] == w[1]) {
                return Err(GraphError::DuplicateCorner(i, w[0]));
            }
            if let Some(&c) = seen.iter().find(|&&c| c >= num_corners) {
                return Err(GraphError::CellCornerOutOfRange(i, c));
            }

            let center = cell.center;
            let corners = &self.corners;
            cell.corners.sort_by(|&a, &b| {
                let da = corners[a].location - center;
                let db = corners[b].location - center;
                da.y.atan2(da.x).total_cmp(&db.y.atan2(db.x))
            });
        }

        Ok(Graph {
            bounds,
            corners: self.corners,
            cells: self.cells,
            edges: self.edges,
        })
    }
}
