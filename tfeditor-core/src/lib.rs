pub mod color;
pub mod color_map;
pub mod color_space;
pub mod config;
pub mod editor;
pub mod error;
pub mod interpolation;
pub mod listeners;
pub mod presets;
pub mod stops;
pub mod transfer_function;

pub use color::Color;
pub use color_map::{ColorMap, ColorMapBin, DEFAULT_BINS};
pub use config::{EditorConfig, DEFAULT_LUT_SIZE};
pub use editor::TransferFunctionEditor;
pub use error::{Result, TransferFunctionError};
pub use interpolation::{interpolate, ColorInterpolator, HueMemory, InterpolationMethod};
pub use listeners::{ListenerId, Listeners};
pub use presets::Preset;
pub use stops::{
    AlphaStop, ColorStop, EndpointPolicy, Segment, Stop, StopCollection, StopRules,
    DEFAULT_MIN_STOP_GAP,
};
pub use transfer_function::TransferFunction;
