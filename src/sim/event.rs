//! Scheduled hot-water draw events.

use serde::{Deserialize, Serialize};

use super::flow::draw_kw;
use super::types::{MINUTES_PER_DAY, STEP_MINUTES};

/// What the draw is for. Baths and showers are treated as full-hot draws by
/// the mixed supply path; everything else is sink-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawKind {
    Sink,
    Shower,
    Bath,
    Dishwasher,
}

impl DrawKind {
    /// Whether this draw is sink-type (partially hot under the mixed path).
    pub fn is_sink_type(self) -> bool {
        matches!(self, DrawKind::Sink | DrawKind::Dishwasher)
    }
}

/// Qualitative draw intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

/// A hot-water draw spanning `[start_minute, end_minute)` of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawEvent {
    /// Start minute (inclusive, 0–1439).
    pub start_minute: u32,
    /// End minute (exclusive, up to 1440).
    pub end_minute: u32,
    /// Draw kind.
    pub kind: DrawKind,
    /// Draw intensity.
    pub intensity: Intensity,
}

impl DrawEvent {
    /// Creates a draw event spanning `[start_minute, end_minute)`.
    ///
    /// # Panics
    ///
    /// Panics if `start_minute >= end_minute` or `end_minute > 1440`.
    pub fn new(start_minute: u32, end_minute: u32, kind: DrawKind, intensity: Intensity) -> Self {
        assert!(start_minute < end_minute);
        assert!(end_minute <= MINUTES_PER_DAY);

        Self {
            start_minute,
            end_minute,
            kind,
            intensity,
        }
    }

    /// Flow rate for this kind and intensity (L/min).
    pub fn flow_lpm(&self) -> f64 {
        use DrawKind::*;
        use Intensity::*;
        match (self.kind, self.intensity) {
            (Sink, Low) => 2.0,
            (Sink, Medium) => 4.0,
            (Sink, High) => 6.0,
            (Shower, Low) => 6.0,
            (Shower, Medium) => 8.0,
            (Shower, High) => 10.0,
            (Bath, Low) => 8.0,
            (Bath, Medium) => 10.0,
            (Bath, High) => 12.0,
            (Dishwasher, Low) => 1.0,
            (Dishwasher, Medium) => 2.0,
            (Dishwasher, High) => 3.0,
        }
    }

    /// Thermal power while the draw is running, as if fully hot (kW).
    pub fn full_hot_kw(&self) -> f64 {
        draw_kw(self.flow_lpm())
    }

    /// Minutes of this draw that fall inside step `step`.
    pub fn overlap_minutes(&self, step: usize) -> u32 {
        let window_start = step as u32 * STEP_MINUTES;
        let window_end = window_start + STEP_MINUTES;
        let start = self.start_minute.max(window_start);
        let end = self.end_minute.min(window_end);
        end.saturating_sub(start)
    }

    /// Returns `true` when the draw overlaps step `step`.
    pub fn is_active(&self, step: usize) -> bool {
        self.overlap_minutes(step) > 0
    }

    /// Returns `true` when the draw is running during minute `minute` of the day.
    pub fn covers_minute(&self, minute: u32) -> bool {
        (self.start_minute..self.end_minute).contains(&minute)
    }

    /// Step-averaged full-hot power of this draw during `step` (kW).
    pub fn full_hot_kw_at(&self, step: usize) -> f64 {
        let overlap = self.overlap_minutes(step);
        if overlap == 0 {
            return 0.0;
        }
        if overlap == STEP_MINUTES {
            return self.full_hot_kw();
        }
        self.full_hot_kw() * f64::from(overlap) / f64::from(STEP_MINUTES)
    }
}
