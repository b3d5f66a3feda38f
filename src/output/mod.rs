//! Output encoders for finished figures.
//!
//! - PNG: rasterized framebuffer via the `png` crate
//! - SVG: vector document built from the display list
//! - Terminal: text preview of the rasterized framebuffer

mod png_encoder;
mod svg;
mod terminal;

pub use png_encoder::PngEncoder;
pub use svg::{SvgElement, SvgEncoder};
pub use terminal::{TerminalEncoder, TerminalMode};
