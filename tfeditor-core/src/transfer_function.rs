//! Opacity curve and color map combined into one transfer function.

use crate::color::Color;
use crate::color_map::{ColorMap, ColorMapBin};
use crate::error::{check_position, Result};
use crate::interpolation::InterpolationMethod;
use crate::stops::{AlphaStop, ColorStop, StopCollection};
use serde::{Deserialize, Serialize};

/// The complete, serializable description of a scalar-to-RGBA mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    pub alpha_stops: StopCollection<AlphaStop>,
    pub color_map: ColorMap,
}

impl Default for TransferFunction {
    /// Linear opacity ramp over a blue-white-red gradient.
    fn default() -> Self {
        Self {
            alpha_stops: StopCollection::presorted(vec![
                AlphaStop {
                    position: 0.0,
                    alpha: 0.0,
                },
                AlphaStop {
                    position: 0.5,
                    alpha: 0.5,
                },
                AlphaStop {
                    position: 1.0,
                    alpha: 1.0,
                },
            ]),
            color_map: ColorMap::new(
                StopCollection::presorted(vec![
                    ColorStop {
                        position: 0.0,
                        color: Color::rgb(0.0, 0.0, 1.0),
                    },
                    ColorStop {
                        position: 0.5,
                        color: Color::WHITE,
                    },
                    ColorStop {
                        position: 1.0,
                        color: Color::rgb(1.0, 0.0, 0.0),
                    },
                ]),
                InterpolationMethod::Rgb,
            ),
        }
    }
}

impl TransferFunction {
    pub fn new(alpha_stops: StopCollection<AlphaStop>, color_map: ColorMap) -> Self {
        Self {
            alpha_stops,
            color_map,
        }
    }

    pub fn sample_alpha(&self, position: f64) -> Result<f64> {
        self.alpha_stops.sample(position)
    }

    pub fn sample_color(&self, position: f64) -> Result<Color> {
        self.color_map.sample_color(position)
    }

    /// Color at `position` with its alpha replaced by the opacity curve.
    pub fn sample_color_with_alpha(&self, position: f64) -> Result<Color> {
        Ok(self.rgba_at(check_position(position)?))
    }

    /// [`sample_color_with_alpha`](Self::sample_color_with_alpha) with RGB
    /// multiplied by alpha.
    pub fn sample_premultiplied(&self, position: f64) -> Result<Color> {
        Ok(self.sample_color_with_alpha(position)?.premultiplied())
    }

    fn rgba_at(&self, position: f64) -> Color {
        self.color_map
            .color_at(position)
            .with_alpha(self.alpha_stops.alpha_at(position))
    }

    /// Discrete color bins; empty when the color map is continuous.
    pub fn bins(&self) -> Vec<ColorMapBin> {
        self.color_map.bins_list()
    }

    /// Sample `size` evenly spaced RGBA8 entries over [0, 1].
    pub fn to_rgba_lut(&self, size: usize) -> Vec<[u8; 4]> {
        match size {
            0 => Vec::new(),
            1 => vec![self.rgba_at(0.5).to_rgba8()],
            _ => (0..size)
                .map(|i| {
                    let t = (i as f64 / (size - 1) as f64).clamp(0.0, 1.0);
                    self.rgba_at(t).to_rgba8()
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a serialized transfer function.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            log::warn!("Rejected transfer function JSON: {e}");
            e.into()
        })
    }
}
