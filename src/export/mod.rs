//! Export of composed views to image formats.

mod png;

pub use png::{encode_png, ExportError, PngOptions};
