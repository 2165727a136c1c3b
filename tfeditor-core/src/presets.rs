//! Built-in transfer functions.

use crate::color::Color;
use crate::color_map::ColorMap;
use crate::interpolation::InterpolationMethod;
use crate::stops::{AlphaStop, ColorStop, Stop, StopCollection};
use crate::transfer_function::TransferFunction;

/// A named transfer function shipped with the library.
#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub transfer_function: TransferFunction,
}

/// Factory default transfer functions built into the binary.
pub fn factory_defaults() -> Vec<Preset> {
    vec![grayscale(), cool_warm(), heat(), rainbow()]
}

/// Look up a factory default by id.
pub fn by_id(id: &str) -> Option<Preset> {
    factory_defaults().into_iter().find(|p| p.id == id)
}

fn alpha(pairs: &[(f64, f64)]) -> StopCollection<AlphaStop> {
    StopCollection::presorted(pairs.iter().map(|&(p, a)| AlphaStop::new(p, a)).collect())
}

fn colors(pairs: &[(f64, [u8; 3])]) -> StopCollection<ColorStop> {
    StopCollection::presorted(
        pairs
            .iter()
            .map(|&(p, rgb)| ColorStop::new(p, Color::from_rgb8(rgb)))
            .collect(),
    )
}

fn grayscale() -> Preset {
    Preset {
        id: "grayscale",
        name: "Grayscale",
        transfer_function: TransferFunction::new(
            alpha(&[(0.0, 0.0), (1.0, 1.0)]),
            ColorMap::new(
                colors(&[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])]),
                InterpolationMethod::Rgb,
            ),
        ),
    }
}

fn cool_warm() -> Preset {
    Preset {
        id: "cool-warm",
        name: "Cool to Warm",
        transfer_function: TransferFunction::new(
            alpha(&[(0.0, 1.0), (0.5, 0.2), (1.0, 1.0)]),
            ColorMap::new(
                colors(&[
                    (0.0, [59, 76, 192]),
                    (0.5, [221, 221, 221]),
                    (1.0, [180, 4, 38]),
                ]),
                InterpolationMethod::Lab,
            ),
        ),
    }
}

fn heat() -> Preset {
    Preset {
        id: "heat",
        name: "Heat",
        transfer_function: TransferFunction::new(
            alpha(&[(0.0, 0.0), (0.2, 0.1), (1.0, 1.0)]),
            ColorMap::new(
                colors(&[
                    (0.0, [0, 0, 0]),
                    (0.35, [230, 0, 0]),
                    (0.7, [255, 210, 0]),
                    (1.0, [255, 255, 255]),
                ]),
                InterpolationMethod::Rgb,
            ),
        ),
    }
}

fn rainbow() -> Preset {
    Preset {
        id: "rainbow",
        name: "Rainbow",
        transfer_function: TransferFunction::new(
            alpha(&[(0.0, 0.5), (1.0, 0.5)]),
            ColorMap::new(
                colors(&[(0.0, [110, 64, 170]), (1.0, [175, 240, 91])]),
                InterpolationMethod::CubehelixLong,
            ),
        ),
    }
}
