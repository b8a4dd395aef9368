//! World-space geometry shared by facets, layers and the compositor.
//!
//! Provides integer world rectangles and the planar cell graph drawn by the
//! graph layer.

mod rect;
pub mod graph;

pub use rect::Rect2i;
pub use graph::{Cell, Corner, Edge, Graph, GraphBuilder, GraphError, Triangle};
