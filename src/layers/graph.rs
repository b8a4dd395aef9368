//! Diagnostic overlay for planar graph facets.

use glam::Vec2;

use crate::color::{Color, IdentityColors};
use crate::facets::{FacetType, SpatialRegion};
use crate::geometry::Graph;
use crate::raster::Canvas;

use super::{optional, Control, ControlError, ControlValue, FacetLayer, LayerBase, LayerError};

const FILL_BOUNDS: &str = "fill_bounds";
const SHOW_TRIS: &str = "show_tris";
const SHOW_EDGES: &str = "show_edges";
const SHOW_CORNERS: &str = "show_corners";
const SHOW_SITES: &str = "show_sites";
const SHOW_BOUNDS: &str = "show_bounds";

const TRIANGLE_SEED: u64 = 12332434;
const MARKER_RADIUS: f32 = 2.0;
const MARKER_SIZE: i32 = 4;

const EDGE_COLOR: Color = Color::CYAN;
const CORNER_COLOR: Color = Color::WHITE;
const SITE_COLOR: Color = Color::BLACK;
const BOUNDS_COLOR: Color = Color::PINK;
const WASH_COLOR: Color = Color::MAGENTA;

/// Draws graph structure: bounds, triangles, edges, corners and sites.
///
/// Each enabled pass runs over every graph before the next pass starts, so
/// markers are never hidden beneath a neighbouring graph's edges.
#[derive(Debug)]
pub struct GraphFacetLayer {
    facet: FacetType,
    base: LayerBase,
    triangle_colors: IdentityColors,
    fill_bounds: bool,
    show_tris: bool,
    show_edges: bool,
    show_corners: bool,
    show_sites: bool,
    show_bounds: bool,
}

impl Default for GraphFacetLayer {
    fn default() -> Self {
        Self::new(FacetType::Graph)
    }
}

impl GraphFacetLayer {
    pub fn new(facet: FacetType) -> Self {
        Self {
            facet,
            base: LayerBase::default(),
            triangle_colors: IdentityColors::new(TRIANGLE_SEED),
            fill_bounds: false,
            show_tris: false,
            show_edges: true,
            show_corners: true,
            show_sites: true,
            show_bounds: true,
        }
    }

    pub fn fill_bounds(&self) -> bool {
        self.fill_bounds
    }

    pub fn set_fill_bounds(&mut self, value: bool) -> bool {
        self.base.update(&mut self.fill_bounds, value)
    }

    pub fn show_tris(&self) -> bool {
        self.show_tris
    }

    pub fn set_show_tris(&mut self, value: bool) -> bool {
        self.base.update(&mut self.show_tris, value)
    }

    pub fn show_edges(&self) -> bool {
        self.show_edges
    }

    pub fn set_show_edges(&mut self, value: bool) -> bool {
        self.base.update(&mut self.show_edges, value)
    }

    pub fn show_corners(&self) -> bool {
        self.show_corners
    }

    pub fn set_show_corners(&mut self, value: bool) -> bool {
        self.base.update(&mut self.show_corners, value)
    }

    pub fn show_sites(&self) -> bool {
        self.show_sites
    }

    pub fn set_show_sites(&mut self, value: bool) -> bool {
        self.base.update(&mut self.show_sites, value)
    }

    pub fn show_bounds(&self) -> bool {
        self.show_bounds
    }

    pub fn set_show_bounds(&mut self, value: bool) -> bool {
        self.base.update(&mut self.show_bounds, value)
    }

    fn draw_triangles(&self, canvas: &mut Canvas<'_>, graph: &Graph) {
        for cell in 0..graph.cells().len() {
            for tri in graph.triangles(cell) {
                let color = self.triangle_colors.color_for_pair(tri.cell, tri.corner1);
                canvas.fill_polygon(&graph.triangle_points(&tri), color);
            }
        }
    }
}

fn draw_edges(canvas: &mut Canvas<'_>, graph: &Graph) {
    for edge in graph.edges() {
        let (a, b) = graph.edge_points(edge);
        canvas.draw_line(
            a.x.floor() as i32,
            a.y.floor() as i32,
            b.x.floor() as i32,
            b.y.floor() as i32,
            EDGE_COLOR,
        );
    }
}

fn draw_marker(canvas: &mut Canvas<'_>, at: Vec2, color: Color) {
    canvas.fill_oval(
        (at.x - MARKER_RADIUS).floor() as i32,
        (at.y - MARKER_RADIUS).floor() as i32,
        MARKER_SIZE,
        MARKER_SIZE,
        color,
    );
}

fn draw_corners(canvas: &mut Canvas<'_>, graph: &Graph) {
    for corner in graph.corners() {
        draw_marker(canvas, corner.location, CORNER_COLOR);
    }
}

fn draw_sites(canvas: &mut Canvas<'_>, graph: &Graph) {
    for cell in graph.cells() {
        draw_marker(canvas, cell.center, SITE_COLOR);
    }
}

fn draw_bounds(canvas: &mut Canvas<'_>, graph: &Graph) {
    let b = graph.bounds();
    canvas.draw_rect(b.min_x, b.min_y, b.width as i32, b.height as i32, BOUNDS_COLOR);
}

fn wash_bounds(canvas: &mut Canvas<'_>, graph: &Graph) {
    let b = graph.bounds();
    canvas.fill_rect(
        b.min_x + 1,
        b.min_y + 1,
        b.width as i32 - 1,
        b.height as i32 - 1,
        WASH_COLOR,
    );
}

impl FacetLayer for GraphFacetLayer {
    fn facet_type(&self) -> FacetType {
        self.facet
    }

    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn render(&self, canvas: &mut Canvas<'_>, region: &SpatialRegion) -> Result<(), LayerError> {
        let Some(facet) = optional(self.facet, region.graphs(self.facet))? else {
            return Ok(());
        };
        let graphs = facet.graphs();

        if self.fill_bounds {
            graphs.iter().for_each(|g| wash_bounds(canvas, g));
        }
        if self.show_tris {
            graphs.iter().for_each(|g| self.draw_triangles(canvas, g));
        }
        if self.show_edges {
            graphs.iter().for_each(|g| draw_edges(canvas, g));
        }
        if self.show_corners {
            graphs.iter().for_each(|g| draw_corners(canvas, g));
        }
        if self.show_sites {
            graphs.iter().for_each(|g| draw_sites(canvas, g));
        }
        if self.show_bounds {
            graphs.iter().for_each(|g| draw_bounds(canvas, g));
        }
        Ok(())
    }

    fn describe(&self, region: &SpatialRegion, wx: i32, wy: i32) -> String {
        region
            .graphs(self.facet)
            .ok()
            .and_then(|facet| facet.graph_at(wx, wy))
            .map(|g| {
                format!(
                    "{} cells, {} corners, {} edges",
                    g.cells().len(),
                    g.corners().len(),
                    g.edges().len()
                )
            })
            .unwrap_or_default()
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            self.base.visible_control(),
            Control::new(FILL_BOUNDS, "Fill bounds", self.fill_bounds),
            Control::new(SHOW_TRIS, "Triangles", self.show_tris),
            Control::new(SHOW_EDGES, "Edges", self.show_edges),
            Control::new(SHOW_CORNERS, "Corners", self.show_corners),
            Control::new(SHOW_SITES, "Sites", self.show_sites),
            Control::new(SHOW_BOUNDS, "Bounds", self.show_bounds),
        ]
    }

    fn set_control(&mut self, name: &str, value: ControlValue) -> Result<bool, ControlError> {
        let setter: fn(&mut Self, bool) -> bool = match name {
            FILL_BOUNDS => Self::set_fill_bounds,
            SHOW_TRIS => Self::set_show_tris,
            SHOW_EDGES => Self::set_show_edges,
            SHOW_CORNERS => Self::set_show_corners,
            SHOW_SITES => Self::set_show_sites,
            SHOW_BOUNDS => Self::set_show_bounds,
            _ => return self.base.set_base_control(name, value),
        };
        let flag = value.as_bool().ok_or_else(|| ControlError::expects_bool(name))?;
        Ok(setter(self, flag))
    }
}
