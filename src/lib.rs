//! # Trueno-Hist
//!
//! Binned-data extraction and histogram plotting for physics-analysis
//! histograms.
//!
//! Histogram objects (1-D and 2-D histograms, profiles, graphs) are read
//! through small source traits into plain array-backed series, which plot
//! layers draw into a figure with an optional ratio panel.
//!
//! ## Features
//!
//! - **Extraction**: bin contents, errors, edges and centers from any
//!   [`BinnedSource`](source::BinnedSource); flat 2-D buffers reshaped with
//!   or without the under/overflow ring
//! - **Layers**: stacked or overlaid histograms, error bars, profiles,
//!   scatter and heatmaps
//! - **Multiple Outputs**: PNG, SVG, and terminal rendering
//! - **Configuration**: plot and stack options from YAML
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_hist::prelude::*;
//!
//! let mut hist = Hist1D::uniform("mass", 20, 0.0, 200.0)?;
//! for i in 0..500 {
//!     hist.fill(f64::from(i % 200));
//! }
//!
//! let series = BinnedSeries::extract(&hist)?;
//! let mut figure = Figure::new(PlotOptions::default().labels("m [GeV]", "Events"))?;
//! figure.draw(HistogramLayer::new(series).label("signal"));
//!
//! let png = figure.finalize()?.png_bytes()?;
//! assert_eq!(&png[1..4], b"PNG");
//! # Ok::<(), trueno_hist::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `gpu`: Enable GPU compute acceleration in trueno
//! - `parallel`: Enable parallel processing with rayon in trueno

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Data Modules
// ============================================================================

/// Histogram source traits and in-memory histograms.
pub mod source;

/// 1-D binned series extraction.
pub mod binned;

/// 2-D grid extraction.
pub mod grid;

/// Graph point extraction.
pub mod points;

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and the default color cycle.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions and tick placement.
pub mod scale;

/// Plot and stack options.
pub mod config;

// ============================================================================
// Plotting Modules
// ============================================================================

/// Figure render context and the layer trait.
pub mod figure;

/// Plot layers (histograms, stacks, error bars, scatter, heatmaps).
pub mod plots;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Display-list primitives and rasterization.
pub mod render;

/// Output encoders (PNG, SVG, terminal).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-hist operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_hist::prelude::*;
/// ```
pub mod prelude {
    pub use crate::binned::{stack_cumulative, BinnedSeries};
    pub use crate::color::Rgba;
    pub use crate::config::{
        AxisLimits, HistType, LegendPlacement, Margins, PlotOptions, RatioPanel, StackOptions,
    };
    pub use crate::error::{Error, Result};
    pub use crate::figure::{DrawContext, Extent, Figure, FinishedFigure, Layer, LegendEntry};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, Rect};
    pub use crate::grid::Grid2D;
    pub use crate::output::{PngEncoder, SvgEncoder, TerminalEncoder, TerminalMode};
    pub use crate::plots::{
        ErrorBarLayer, HeatmapLayer, HistStack, HistogramLayer, ScatterLayer, StackLayer,
    };
    pub use crate::points::PointSeries;
    pub use crate::render::{MarkerShape, Primitive};
    pub use crate::scale::{AxisMapping, ColorScale, LinearScale, LogScale, Palette, Scale};
    pub use crate::source::{
        Axis, BinnedSource, Graph, GridSource, Hist1D, Hist2D, PointSource, Profile1D,
    };
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
