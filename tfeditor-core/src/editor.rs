//! Editing handle over a transfer function.
//!
//! The presentation layer owns one [`TransferFunctionEditor`] per widget,
//! mutates stops through it, and redraws from the state its listeners
//! receive. Every mutation that changes state notifies all listeners
//! synchronously, once per call, with no batching.

use crate::color::Color;
use crate::color_map::{ColorMap, ColorMapBin};
use crate::config::EditorConfig;
use crate::error::{Result, TransferFunctionError};
use crate::interpolation::{HueMemory, InterpolationMethod};
use crate::listeners::{ListenerId, Listeners};
use crate::stops::{AlphaStop, ColorStop};
use crate::transfer_function::TransferFunction;

fn rejected(what: &str, err: TransferFunctionError) -> TransferFunctionError {
    log::warn!("Rejected {what}: {err}");
    err
}

/// A transfer function being edited, with its listeners and session state.
#[derive(Debug)]
pub struct TransferFunctionEditor {
    config: EditorConfig,
    /// Live edits
    working: TransferFunction,
    /// Snapshot at open or last save (for revert and dirty check)
    saved: TransferFunction,
    hue_memory: HueMemory,
    listeners: Listeners<TransferFunction>,
}

impl TransferFunctionEditor {
    /// Editor over the default transfer function.
    pub fn new(config: EditorConfig) -> Result<Self> {
        Self::with_transfer_function(TransferFunction::default(), config)
    }

    /// Editor over `initial`, re-validated under the config's stop rules.
    pub fn with_transfer_function(
        mut initial: TransferFunction,
        config: EditorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let rules = config.stop_rules();
        initial.alpha_stops.set_rules(rules)?;
        initial.color_map.color_stops_mut().set_rules(rules)?;

        let mut hue_memory = HueMemory::default();
        for stop in initial.color_map.color_stops() {
            hue_memory.observe(&stop.color);
        }

        Ok(Self {
            config,
            saved: initial.clone(),
            working: initial,
            hue_memory,
            listeners: Listeners::new(),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn transfer_function(&self) -> &TransferFunction {
        &self.working
    }

    /// Owned copy of the current state, for serialization by the caller.
    pub fn snapshot(&self) -> TransferFunction {
        self.working.clone()
    }

    pub fn alpha_stops(&self) -> &[AlphaStop] {
        self.working.alpha_stops.stops()
    }

    pub fn color_stops(&self) -> &[ColorStop] {
        self.working.color_map.color_stops().stops()
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.working.color_map
    }

    pub fn hue_memory(&self) -> &HueMemory {
        &self.hue_memory
    }

    pub fn sample_alpha(&self, position: f64) -> Result<f64> {
        self.working.sample_alpha(position)
    }

    pub fn sample_color(&self, position: f64) -> Result<Color> {
        self.working.sample_color(position)
    }

    pub fn sample_color_with_alpha(&self, position: f64) -> Result<Color> {
        self.working.sample_color_with_alpha(position)
    }

    pub fn bins(&self) -> Vec<ColorMapBin> {
        self.working.bins()
    }

    /// RGBA8 lookup table of `config.lut_size` entries.
    pub fn lut(&self) -> Vec<[u8; 4]> {
        self.working.to_rgba_lut(self.config.lut_size)
    }

    /// HSV for a color picker bound to the stop at `index`. Grays keep the
    /// last hue this editor saw instead of snapping to red.
    pub fn color_stop_hsv(&self, index: usize) -> Option<(f64, f64, f64)> {
        let stop = self.working.color_map.color_stops().get(index)?;
        Some(self.hue_memory.hsv(&stop.color))
    }

    pub fn add_alpha_stop(&mut self, position: f64, alpha: f64) -> Result<usize> {
        let before = self.working.alpha_stops.clone();
        let index = self.working.alpha_stops.add(position, alpha)?;
        if self.working.alpha_stops != before {
            self.changed("add alpha stop");
        }
        Ok(index)
    }

    /// No-op (returns false) for pinned endpoints and when two stops remain.
    pub fn remove_alpha_stop_at(&mut self, index: usize) -> bool {
        let removed = self.working.alpha_stops.remove(index);
        if removed {
            self.changed("remove alpha stop");
        }
        removed
    }

    pub fn move_alpha_stop_to(&mut self, index: usize, position: f64, alpha: f64) -> Result<f64> {
        let before = self.working.alpha_stops.stops()[index];
        let applied = self.working.alpha_stops.move_to(index, position, alpha)?;
        if self.working.alpha_stops.stops()[index] != before {
            self.changed("move alpha stop");
        }
        Ok(applied)
    }

    /// All-or-nothing; on error the current stops are kept.
    pub fn replace_alpha_stops(&mut self, stops: Vec<AlphaStop>) -> Result<()> {
        let before = self.working.alpha_stops.clone();
        self.working
            .alpha_stops
            .replace(stops)
            .map_err(|e| rejected("alpha stop replacement", e))?;
        if self.working.alpha_stops != before {
            self.changed("replace alpha stops");
        }
        Ok(())
    }

    pub fn add_color_stop(&mut self, position: f64, color: Color) -> Result<usize> {
        let before = self.working.color_map.color_stops().clone();
        let index = self
            .working
            .color_map
            .color_stops_mut()
            .add(position, color)?;
        self.hue_memory.observe(&color);
        if *self.working.color_map.color_stops() != before {
            self.changed("add color stop");
        }
        Ok(index)
    }

    /// No-op (returns false) for pinned endpoints and when two stops remain.
    pub fn remove_color_stop_at(&mut self, index: usize) -> bool {
        let removed = self.working.color_map.color_stops_mut().remove(index);
        if removed {
            self.changed("remove color stop");
        }
        removed
    }

    pub fn move_color_stop_to(&mut self, index: usize, position: f64, color: Color) -> Result<f64> {
        let before = self.working.color_map.color_stops().stops()[index];
        let applied = self
            .working
            .color_map
            .color_stops_mut()
            .move_to(index, position, color)?;
        self.hue_memory.observe(&color);
        if self.working.color_map.color_stops().stops()[index] != before {
            self.changed("move color stop");
        }
        Ok(applied)
    }

    /// All-or-nothing; on error the current color map is kept.
    pub fn replace_color_map(&mut self, mut color_map: ColorMap) -> Result<()> {
        color_map
            .color_stops_mut()
            .set_rules(self.config.stop_rules())
            .map_err(|e| rejected("color map replacement", e))?;
        for stop in color_map.color_stops() {
            self.hue_memory.observe(&stop.color);
        }
        if color_map != self.working.color_map {
            self.working.color_map = color_map;
            self.changed("replace color map");
        }
        Ok(())
    }

    pub fn set_interpolation_method(&mut self, method: InterpolationMethod) {
        if self.working.color_map.set_interpolation_method(method) {
            self.changed("set interpolation method");
        }
    }

    pub fn set_discrete(&mut self, discrete: bool) -> Result<()> {
        if self.working.color_map.set_discrete(discrete)? {
            self.changed("set discrete");
        }
        Ok(())
    }

    pub fn set_bins(&mut self, bins: u32) -> Result<()> {
        if self.working.color_map.set_bins(bins)? {
            self.changed("set bins");
        }
        Ok(())
    }

    /// Replace alpha stops and color map together. All-or-nothing.
    pub fn replace_transfer_function(&mut self, mut tf: TransferFunction) -> Result<()> {
        let rules = self.config.stop_rules();
        tf.alpha_stops
            .set_rules(rules)
            .map_err(|e| rejected("transfer function replacement", e))?;
        tf.color_map
            .color_stops_mut()
            .set_rules(rules)
            .map_err(|e| rejected("transfer function replacement", e))?;
        for stop in tf.color_map.color_stops() {
            self.hue_memory.observe(&stop.color);
        }
        if tf != self.working {
            self.working = tf;
            self.changed("replace transfer function");
        }
        Ok(())
    }

    /// Register `callback`; it runs once immediately with the current state.
    pub fn add_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&TransferFunction) + 'static,
    {
        let id = self.listeners.add(&self.working, callback);
        log::debug!("Added listener {:?} ({} total)", id, self.listeners.len());
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        if removed {
            log::debug!("Removed listener {:?}", id);
        }
        removed
    }

    /// Whether the working state differs from the last saved state.
    pub fn is_dirty(&self) -> bool {
        self.working != self.saved
    }

    /// Discard edits since open or the last [`mark_saved`](Self::mark_saved).
    pub fn revert(&mut self) {
        if self.is_dirty() {
            self.working = self.saved.clone();
            self.changed("revert");
        }
    }

    /// Treat the current state as saved.
    pub fn mark_saved(&mut self) {
        self.saved = self.working.clone();
    }

    fn changed(&self, what: &str) {
        log::debug!(
            "{what}: {} alpha stops, {} color stops",
            self.working.alpha_stops.len(),
            self.working.color_map.color_stops().len()
        );
        self.listeners.notify(&self.working);
    }
}
