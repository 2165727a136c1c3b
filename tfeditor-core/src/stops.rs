//! Ordered control points shared by the opacity curve and the color map.

use crate::color::Color;
use crate::error::{check_position, Result, TransferFunctionError};
use serde::{Deserialize, Serialize};

/// Default minimum distance kept between neighbouring stops when dragging.
pub const DEFAULT_MIN_STOP_GAP: f64 = 1e-9;

/// A control point: a position in [0, 1] carrying a payload.
pub trait Stop: Clone + PartialEq {
    type Value: Copy + PartialEq;

    /// Build a stop, normalizing the payload into its valid range.
    fn new(position: f64, value: Self::Value) -> Self;
    fn position(&self) -> f64;
    fn value(&self) -> Self::Value;
}

/// One point of the opacity curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlphaStop {
    pub position: f64,
    pub alpha: f64,
}

impl Stop for AlphaStop {
    type Value = f64;

    fn new(position: f64, alpha: f64) -> Self {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Self { position, alpha }
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn value(&self) -> f64 {
        self.alpha
    }
}

/// One point of the color gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

impl Stop for ColorStop {
    type Value = Color;

    fn new(position: f64, color: Color) -> Self {
        // Re-clamp in case channels were written directly
        let color = Color::rgba(color.r, color.g, color.b, color.a);
        Self { position, color }
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn value(&self) -> Color {
        self.color
    }
}

/// Whether the first and last stops are fixed domain anchors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPolicy {
    /// Endpoints sit at exactly 0 and 1, cannot be removed, and only their
    /// value can change.
    #[default]
    Pinned,
    /// Endpoints may be dragged and removed like any other stop, as long
    /// as two stops remain.
    Free,
}

/// Mutation rules a collection enforces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopRules {
    pub endpoints: EndpointPolicy,
    /// Dragged stops stay at least this far from their neighbours.
    pub min_gap: f64,
}

impl Default for StopRules {
    fn default() -> Self {
        Self {
            endpoints: EndpointPolicy::Pinned,
            min_gap: DEFAULT_MIN_STOP_GAP,
        }
    }
}

/// The two stops around a sampled position and the local blend factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<'a, S> {
    pub lower: &'a S,
    pub upper: &'a S,
    /// 0 at `lower`, 1 at `upper`.
    pub t: f64,
}

/// Stops sorted by strictly increasing position, at least two of them.
///
/// Serializes as a plain array. Deserializing checks ordering and domain
/// only; a set spanning exactly [0, 1] comes back with pinned endpoints,
/// anything narrower with free ones.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<S>",
    into = "Vec<S>",
    bound(
        serialize = "S: Stop + Serialize",
        deserialize = "S: Stop + Deserialize<'de>"
    )
)]
pub struct StopCollection<S> {
    stops: Vec<S>,
    rules: StopRules,
}

impl<S: Stop> PartialEq for StopCollection<S> {
    /// Rules are editor configuration, not data.
    fn eq(&self, other: &Self) -> bool {
        self.stops == other.stops
    }
}

impl<S: Stop> TryFrom<Vec<S>> for StopCollection<S> {
    type Error = TransferFunctionError;

    fn try_from(stops: Vec<S>) -> Result<Self> {
        let free = StopRules {
            endpoints: EndpointPolicy::Free,
            ..StopRules::default()
        };
        let mut collection = Self::with_rules(stops, free)?;
        if collection.span() == (0.0, 1.0) {
            collection.rules = StopRules::default();
        }
        Ok(collection)
    }
}

impl<S: Stop> From<StopCollection<S>> for Vec<S> {
    fn from(collection: StopCollection<S>) -> Self {
        collection.stops
    }
}

fn invalid(reason: String) -> TransferFunctionError {
    TransferFunctionError::InvalidStopSet(reason)
}

/// Normalize, sort, and check a candidate stop set against `rules`.
fn validate<S: Stop>(stops: Vec<S>, rules: &StopRules) -> Result<Vec<S>> {
    if stops.len() < 2 {
        return Err(invalid(format!(
            "at least 2 stops required, got {}",
            stops.len()
        )));
    }
    if let Some(stop) = stops.iter().find(|s| !(0.0..=1.0).contains(&s.position())) {
        return Err(invalid(format!(
            "stop position {} outside [0, 1]",
            stop.position()
        )));
    }

    let mut stops: Vec<S> = stops
        .into_iter()
        .map(|s| S::new(s.position(), s.value()))
        .collect();
    stops.sort_by(|a, b| a.position().total_cmp(&b.position()));

    if let Some(pair) = stops
        .windows(2)
        .find(|pair| pair[0].position() == pair[1].position())
    {
        return Err(invalid(format!(
            "two stops share position {}",
            pair[0].position()
        )));
    }

    if rules.endpoints == EndpointPolicy::Pinned {
        let first = stops[0].position();
        let last = stops[stops.len() - 1].position();
        if first != 0.0 || last != 1.0 {
            return Err(invalid(format!(
                "pinned endpoints must sit at 0 and 1, got {first} and {last}"
            )));
        }
    }
    Ok(stops)
}

impl<S: Stop> StopCollection<S> {
    /// Validate `stops` under the default (pinned) rules. Unsorted input is
    /// sorted.
    pub fn new(stops: Vec<S>) -> Result<Self> {
        Self::with_rules(stops, StopRules::default())
    }

    pub fn with_rules(stops: Vec<S>, rules: StopRules) -> Result<Self> {
        let stops = validate(stops, &rules)?;
        Ok(Self { stops, rules })
    }

    /// Built-in stop tables that are sorted with endpoints at 0 and 1.
    pub(crate) fn presorted(stops: Vec<S>) -> Self {
        debug_assert!(validate(stops.clone(), &StopRules::default()).is_ok());
        Self {
            stops,
            rules: StopRules::default(),
        }
    }

    /// Build from `(position, value)` pairs.
    pub fn from_pairs(pairs: &[(f64, S::Value)]) -> Result<Self> {
        Self::new(pairs.iter().map(|&(p, v)| S::new(p, v)).collect())
    }

    pub fn rules(&self) -> StopRules {
        self.rules
    }

    /// Switch rules, rejecting the change if current stops violate them.
    pub fn set_rules(&mut self, rules: StopRules) -> Result<()> {
        validate(self.stops.clone(), &rules)?;
        self.rules = rules;
        Ok(())
    }

    pub fn stops(&self) -> &[S] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Never true for a validated collection.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.stops.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.stops.iter()
    }

    /// Positions of the first and last stop.
    pub fn span(&self) -> (f64, f64) {
        (
            self.stops[0].position(),
            self.stops[self.stops.len() - 1].position(),
        )
    }

    fn is_pinned_endpoint(&self, index: usize) -> bool {
        self.rules.endpoints == EndpointPolicy::Pinned
            && (index == 0 || index == self.stops.len() - 1)
    }

    /// Insert a stop, keeping the order. A stop already at exactly
    /// `position` has its value replaced instead. Returns the stop's index.
    pub fn add(&mut self, position: f64, value: S::Value) -> Result<usize> {
        let position = check_position(position)?;
        let index = self.stops.partition_point(|s| s.position() < position);
        let stop = S::new(position, value);
        match self.stops.get(index) {
            Some(existing) if existing.position() == position => self.stops[index] = stop,
            _ => self.stops.insert(index, stop),
        }
        Ok(index)
    }

    /// Whether [`remove`](Self::remove) would delete the stop at `index`.
    pub fn can_remove(&self, index: usize) -> bool {
        index < self.stops.len() && self.stops.len() > 2 && !self.is_pinned_endpoint(index)
    }

    /// Delete the stop at `index`. Pinned endpoints and the last two stops
    /// are kept; returns whether anything was removed.
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> bool {
        assert!(
            index < self.stops.len(),
            "stop index {index} out of bounds for {} stops",
            self.stops.len()
        );
        if !self.can_remove(index) {
            return false;
        }
        self.stops.remove(index);
        true
    }

    /// Drag the stop at `index` toward `position` and set its value.
    ///
    /// Pinned endpoints keep their position. Other stops are clamped to
    /// stay `min_gap` inside their neighbours, so order never changes.
    /// Returns the position actually applied.
    ///
    /// Panics if `index` is out of bounds.
    pub fn move_to(&mut self, index: usize, position: f64, value: S::Value) -> Result<f64> {
        assert!(
            index < self.stops.len(),
            "stop index {index} out of bounds for {} stops",
            self.stops.len()
        );
        let position = check_position(position)?;

        let applied = if self.is_pinned_endpoint(index) {
            self.stops[index].position()
        } else {
            let gap = self.rules.min_gap;
            let (prev, lo) = match index.checked_sub(1) {
                Some(i) => (Some(self.stops[i].position()), self.stops[i].position() + gap),
                None => (None, 0.0),
            };
            let (next, hi) = match self.stops.get(index + 1) {
                Some(s) => (Some(s.position()), s.position() - gap),
                None => (None, 1.0),
            };
            if lo <= hi {
                position.clamp(lo, hi)
            } else {
                // Neighbours closer than two gaps: split the difference
                let prev = prev.unwrap_or(0.0);
                let next = next.unwrap_or(1.0);
                prev + (next - prev) / 2.0
            }
        };

        self.stops[index] = S::new(applied, value);
        Ok(applied)
    }

    /// Replace every stop at once. On error the collection is unchanged.
    pub fn replace(&mut self, stops: Vec<S>) -> Result<()> {
        self.stops = validate(stops, &self.rules)?;
        Ok(())
    }

    /// Locate `position` (already checked to be in [0, 1]) between stops.
    /// Positions outside the stop span collapse onto the boundary stop.
    pub fn segment(&self, position: f64) -> Segment<'_, S> {
        let last = self.stops.len() - 1;
        let (lo, hi) = self.span();
        if position <= lo {
            let s = &self.stops[0];
            return Segment {
                lower: s,
                upper: s,
                t: 0.0,
            };
        }
        if position >= hi {
            let s = &self.stops[last];
            return Segment {
                lower: s,
                upper: s,
                t: 0.0,
            };
        }
        let upper = self
            .stops
            .partition_point(|s| s.position() <= position)
            .min(last);
        let lower = upper - 1;
        let (p0, p1) = (self.stops[lower].position(), self.stops[upper].position());
        Segment {
            lower: &self.stops[lower],
            upper: &self.stops[upper],
            t: (position - p0) / (p1 - p0),
        }
    }
}

impl StopCollection<AlphaStop> {
    /// Piecewise-linear opacity at `position`.
    pub fn sample(&self, position: f64) -> Result<f64> {
        Ok(self.alpha_at(check_position(position)?))
    }

    pub(crate) fn alpha_at(&self, position: f64) -> f64 {
        let seg = self.segment(position);
        seg.lower.alpha + seg.t * (seg.upper.alpha - seg.lower.alpha)
    }
}

impl<'a, S: Stop> IntoIterator for &'a StopCollection<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.stops.iter()
    }
}
