//! Color gradient over color stops, optionally quantized into flat bins.

use crate::color::Color;
use crate::error::{check_position, Result, TransferFunctionError};
use crate::interpolation::{ColorInterpolator, InterpolationMethod};
use crate::stops::{ColorStop, StopCollection};
use serde::{Deserialize, Serialize};

/// Bin count used when discretization is first switched on.
pub const DEFAULT_BINS: u32 = 8;

/// One flat-colored slice of a discrete color map, covering
/// `[lower_bound, upper_bound)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorMapBin {
    pub lower_bound: f64,
    pub center: f64,
    pub upper_bound: f64,
    pub color: Color,
}

/// Color stops plus the method used to blend them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorMapRecord")]
pub struct ColorMap {
    color_stops: StopCollection<ColorStop>,
    interpolation_method: InterpolationMethod,
    discrete: bool,
    /// Ignored unless `discrete`.
    bins: u32,
}

#[derive(Deserialize)]
struct ColorMapRecord {
    color_stops: StopCollection<ColorStop>,
    #[serde(default)]
    interpolation_method: InterpolationMethod,
    #[serde(default)]
    discrete: bool,
    #[serde(default = "default_bins")]
    bins: u32,
}

fn default_bins() -> u32 {
    DEFAULT_BINS
}

impl TryFrom<ColorMapRecord> for ColorMap {
    type Error = TransferFunctionError;

    fn try_from(record: ColorMapRecord) -> Result<Self> {
        let map = Self {
            color_stops: record.color_stops,
            interpolation_method: record.interpolation_method,
            discrete: record.discrete,
            bins: record.bins,
        };
        map.check_bins()?;
        Ok(map)
    }
}

impl ColorMap {
    /// Continuous color map.
    pub fn new(color_stops: StopCollection<ColorStop>, method: InterpolationMethod) -> Self {
        Self {
            color_stops,
            interpolation_method: method,
            discrete: false,
            bins: DEFAULT_BINS,
        }
    }

    /// Color map quantized into `bins` slices.
    pub fn discretized(
        color_stops: StopCollection<ColorStop>,
        method: InterpolationMethod,
        bins: u32,
    ) -> Result<Self> {
        let map = Self {
            discrete: true,
            bins,
            ..Self::new(color_stops, method)
        };
        map.check_bins()?;
        Ok(map)
    }

    fn check_bins(&self) -> Result<()> {
        if self.discrete && self.bins < 1 {
            return Err(TransferFunctionError::DegenerateBins { bins: self.bins });
        }
        Ok(())
    }

    pub fn color_stops(&self) -> &StopCollection<ColorStop> {
        &self.color_stops
    }

    pub fn color_stops_mut(&mut self) -> &mut StopCollection<ColorStop> {
        &mut self.color_stops
    }

    pub fn interpolation_method(&self) -> InterpolationMethod {
        self.interpolation_method
    }

    /// Returns whether the method changed.
    pub fn set_interpolation_method(&mut self, method: InterpolationMethod) -> bool {
        let changed = self.interpolation_method != method;
        self.interpolation_method = method;
        changed
    }

    pub fn is_discrete(&self) -> bool {
        self.discrete
    }

    /// Returns whether the flag changed.
    pub fn set_discrete(&mut self, discrete: bool) -> Result<bool> {
        if discrete && self.bins < 1 {
            return Err(TransferFunctionError::DegenerateBins { bins: self.bins });
        }
        let changed = self.discrete != discrete;
        self.discrete = discrete;
        Ok(changed)
    }

    pub fn bins(&self) -> u32 {
        self.bins
    }

    /// Zero is rejected whether or not the map is discrete. Returns whether
    /// the count changed.
    pub fn set_bins(&mut self, bins: u32) -> Result<bool> {
        if bins < 1 {
            return Err(TransferFunctionError::DegenerateBins { bins });
        }
        let changed = self.bins != bins;
        self.bins = bins;
        Ok(changed)
    }

    /// Color at `position`, quantized when discrete.
    pub fn sample_color(&self, position: f64) -> Result<Color> {
        Ok(self.color_at(check_position(position)?))
    }

    /// [`sample_color`](Self::sample_color) for a position already in [0, 1].
    pub(crate) fn color_at(&self, position: f64) -> Color {
        let position = if self.discrete {
            self.representative_position(self.bin_index(position))
        } else {
            position
        };
        self.sample_continuous(position)
    }

    /// Blend the two stops around `position`, ignoring discretization.
    fn sample_continuous(&self, position: f64) -> Color {
        let seg = self.color_stops.segment(position);
        ColorInterpolator::new(self.interpolation_method, seg.lower.color, seg.upper.color)
            .at(seg.t)
    }

    /// Index of the bin containing `position`.
    fn bin_index(&self, position: f64) -> u32 {
        let (lo, hi) = self.color_stops.span();
        let width = hi - lo;
        if width <= 0.0 {
            return 0;
        }
        let u = ((position - lo) / width).clamp(0.0, 1.0);
        ((u * self.bins as f64).floor() as u32).min(self.bins - 1)
    }

    /// Position whose continuous color a bin takes. Bins span the stop
    /// range end to end, so the first bin shows the first stop's color and
    /// the last bin the last stop's. A single bin shows the span midpoint.
    fn representative_position(&self, index: u32) -> f64 {
        let (lo, hi) = self.color_stops.span();
        let u = if self.bins <= 1 {
            0.5
        } else {
            index as f64 / (self.bins - 1) as f64
        };
        lo + u * (hi - lo)
    }

    /// Flat slices of the map; empty when continuous.
    pub fn bins_list(&self) -> Vec<ColorMapBin> {
        if !self.discrete {
            return Vec::new();
        }
        let (lo, hi) = self.color_stops.span();
        let width = hi - lo;
        let n = self.bins as f64;
        (0..self.bins)
            .map(|i| {
                let lower_bound = lo + width * i as f64 / n;
                let upper_bound = lo + width * (i + 1) as f64 / n;
                ColorMapBin {
                    lower_bound,
                    center: (lower_bound + upper_bound) / 2.0,
                    upper_bound,
                    color: self.sample_continuous(self.representative_position(i)),
                }
            })
            .collect()
    }
}
