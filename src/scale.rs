//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values (`f64`, as extracted from histograms) to
//! pixel positions (`f32`) or colors. Tick helpers pick "nice" positions
//! for the axis frame.

use crate::color::Rgba;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

fn check_domain(domain: (f64, f64)) -> Result<()> {
    if !(domain.0.is_finite() && domain.1.is_finite()) {
        return Err(Error::ScaleDomain(format!(
            "domain [{}, {}] is not finite",
            domain.0, domain.1
        )));
    }
    if domain.0 == domain.1 {
        return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
    }
    Ok(())
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Result<Self> {
        check_domain(domain)?;
        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f64 {
        let t = f64::from(value - self.range_min) / f64::from(self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }
}

impl Scale<f64, f32> for LinearScale {
    fn scale(&self, value: f64) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + (t as f32) * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Base-10 logarithmic scale.
///
/// Non-positive values map as if they were `f64::MIN_POSITIVE`, far below
/// any plotted domain; callers clip to the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f32,
    range_max: f32,
}

impl LogScale {
    /// Create a new logarithmic scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain contains non-positive values.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Result<Self> {
        if domain.0 <= 0.0 || domain.1 <= 0.0 {
            return Err(Error::ScaleDomain("Log scale domain must be positive".to_string()));
        }
        check_domain(domain)?;
        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<f64, f32> for LogScale {
    fn scale(&self, value: f64) -> f32 {
        let log_min = self.domain_min.log10();
        let log_max = self.domain_max.log10();
        let log_val = value.max(f64::MIN_POSITIVE).log10();

        let t = (log_val - log_min) / (log_max - log_min);
        self.range_min + (t as f32) * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// A positional axis mapping, linear or logarithmic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisMapping {
    /// Linear axis.
    Linear(LinearScale),
    /// Base-10 log axis.
    Log(LogScale),
}

impl AxisMapping {
    /// Build a linear or log mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] for an invalid domain.
    pub fn new(domain: (f64, f64), range: (f32, f32), log: bool) -> Result<Self> {
        if log {
            Ok(Self::Log(LogScale::new(domain, range)?))
        } else {
            Ok(Self::Linear(LinearScale::new(domain, range)?))
        }
    }

    /// True for a log mapping.
    #[must_use]
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log(_))
    }

    /// Tick positions inside the domain.
    #[must_use]
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        let (lo, hi) = self.domain();
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        match self {
            Self::Linear(_) => nice_ticks(lo, hi, target),
            Self::Log(_) => log_ticks(lo, hi),
        }
    }
}

impl Scale<f64, f32> for AxisMapping {
    fn scale(&self, value: f64) -> f32 {
        match self {
            Self::Linear(s) => s.scale(value),
            Self::Log(s) => s.scale(value),
        }
    }

    fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Log(s) => s.domain(),
        }
    }

    fn range(&self) -> (f32, f32) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Log(s) => s.range(),
        }
    }
}

/// Named color maps for heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Perceptually uniform, dark purple to yellow.
    #[default]
    Viridis,
    /// Perceptually uniform, black to pale yellow.
    Magma,
    /// Sequential white to dark blue.
    Blues,
    /// Diverging red to blue.
    RedBlue,
    /// Black to white.
    Greyscale,
    /// Black, red, yellow, white.
    Heat,
}

const VIRIDIS: &[Rgba] = &[
    Rgba::rgb(68, 1, 84),
    Rgba::rgb(59, 82, 139),
    Rgba::rgb(33, 145, 140),
    Rgba::rgb(94, 201, 98),
    Rgba::rgb(253, 231, 37),
];

const MAGMA: &[Rgba] = &[
    Rgba::rgb(0, 0, 4),
    Rgba::rgb(81, 18, 124),
    Rgba::rgb(183, 55, 121),
    Rgba::rgb(252, 137, 97),
    Rgba::rgb(252, 253, 191),
];

const BLUES: &[Rgba] = &[
    Rgba::rgb(247, 251, 255),
    Rgba::rgb(198, 219, 239),
    Rgba::rgb(107, 174, 214),
    Rgba::rgb(33, 113, 181),
    Rgba::rgb(8, 48, 107),
];

const RED_BLUE: &[Rgba] = &[
    Rgba::rgb(178, 24, 43),
    Rgba::rgb(239, 138, 98),
    Rgba::rgb(247, 247, 247),
    Rgba::rgb(103, 169, 207),
    Rgba::rgb(33, 102, 172),
];

const GREYSCALE: &[Rgba] = &[Rgba::BLACK, Rgba::WHITE];

const HEAT: &[Rgba] = &[
    Rgba::rgb(0, 0, 0),
    Rgba::rgb(128, 0, 0),
    Rgba::rgb(255, 0, 0),
    Rgba::rgb(255, 128, 0),
    Rgba::rgb(255, 255, 0),
    Rgba::rgb(255, 255, 255),
];

impl Palette {
    /// Color stops from low to high.
    #[must_use]
    pub fn stops(self) -> &'static [Rgba] {
        match self {
            Self::Viridis => VIRIDIS,
            Self::Magma => MAGMA,
            Self::Blues => BLUES,
            Self::RedBlue => RED_BLUE,
            Self::Greyscale => GREYSCALE,
            Self::Heat => HEAT,
        }
    }

    /// A color scale over `domain` using this palette.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] for an empty or non-finite domain.
    pub fn scale(self, domain: (f64, f64)) -> Result<ColorScale> {
        ColorScale::new(self.stops().to_vec(), domain)
    }
}

/// Color scale for mapping values to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f64,
    domain_max: f64,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if colors is empty or domain is invalid.
    pub fn new(colors: Vec<Rgba>, domain: (f64, f64)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain("Color scale requires at least one color".to_string()));
        }
        check_domain(domain)?;
        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }
}

impl Scale<f64, Rgba> for ColorScale {
    fn scale(&self, value: f64) -> Rgba {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f32).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}

// ============================================================================
// Ticks
// ============================================================================

/// Round tick positions (multiples of 1, 2 or 5 times a power of ten)
/// covering `[lo, hi]`, aiming for about `target` ticks.
#[must_use]
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if target == 0 || !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        return Vec::new();
    }

    let step = nice_step((hi - lo) / target as f64);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;

    (first..=last).map(|k| clean_zero(k as f64 * step)).collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn clean_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Powers of ten inside `[lo, hi]`. Empty for non-positive bounds.
#[must_use]
pub fn log_ticks(lo: f64, hi: f64) -> Vec<f64> {
    if lo <= 0.0 || !(lo.is_finite() && hi.is_finite()) || hi < lo {
        return Vec::new();
    }
    let first = (lo.log10() - 1e-9).ceil() as i32;
    let last = (hi.log10() + 1e-9).floor() as i32;
    (first..=last).map(|k| 10f64.powi(k)).collect()
}

/// Label for a tick at `value` on an axis whose tick spacing is `step`.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let value = clean_zero(value);
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e5).contains(&magnitude) {
        return format!("{value:e}");
    }
    let decimals = if step >= 1.0 || step <= 0.0 || !step.is_finite() {
        0
    } else {
        (-step.log10()).ceil() as usize
    };
    let text = format!("{value:.decimals$}");
    // "-0.0" after rounding
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}
