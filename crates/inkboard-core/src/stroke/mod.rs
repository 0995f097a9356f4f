//! Freehand stroke processing: raw samples → stroke points → outline → path.

mod outline;
mod path;
mod points;

pub use outline::stroke_outline;
pub use path::svg_path_from_stroke;
pub use points::stroke_points;

use serde::{Deserialize, Serialize};

/// Tuning knobs for the stroke pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrokeOptions {
    /// Nominal stroke diameter.
    pub size: f64,
    /// Smoothing strength, 0 = raw input, 1 = maximum smoothing.
    pub streamline: f64,
    /// Derive pressure from pointer velocity instead of the samples.
    pub simulate_pressure: bool,
    /// The samples form a finished stroke.
    pub last: bool,
    /// How strongly pressure affects the outline width, in `[-1, 1]`.
    pub thinning: f64,
    /// Minimum spacing of outline points as a fraction of `size`.
    pub smoothing: f64,
    /// Length over which the stroke tapers in from its start (0 = none).
    pub taper_start: f64,
    /// Length over which the stroke tapers out at its end (0 = none).
    pub taper_end: f64,
    pub cap_start: bool,
    pub cap_end: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 16.0,
            streamline: 0.5,
            simulate_pressure: false,
            last: false,
            thinning: 0.5,
            smoothing: 0.5,
            taper_start: 0.0,
            taper_end: 0.0,
            cap_start: true,
            cap_end: true,
        }
    }
}

impl StrokeOptions {
    /// Options for a completed stroke.
    pub fn finished(mut self) -> Self {
        self.last = true;
        self
    }
}

/// Run the whole pipeline and return a closed outline path.
pub fn stroke_to_svg_path<P: AsRef<[f64]>>(samples: &[P], options: &StrokeOptions) -> String {
    let points = stroke_points(samples, options);
    let outline = stroke_outline(&points, options);
    svg_path_from_stroke(&outline, true)
}
