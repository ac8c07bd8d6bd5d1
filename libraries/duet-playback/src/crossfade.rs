//! Crossfade timing for two-slot playback
//!
//! The transition is derived purely from the active media's reported
//! position: no timer, no accumulated state. Every time-update recomputes the
//! phase and volumes from scratch, so the ramp stays locked to the actual
//! playback position under scheduling jitter.
//!
//! Fade curves:
//! - Linear: `active = 1 - progress`, `inactive = progress` (default)
//! - EqualPower: constant perceived loudness
//! - S-Curve: slow start, fast middle, slow end

use crate::types::TimeUpdate;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Default crossfade window in milliseconds
pub const DEFAULT_WINDOW_MS: u32 = 30_000;

/// Crossfade curve type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Linear fade: volumes always sum to 1.0
    #[default]
    Linear,

    /// Equal power fade: in² + out² = 1
    EqualPower,

    /// S-Curve fade: slow start, fast middle, slow end
    SCurve,
}

impl FadeCurve {
    /// Volume of one side of the crossfade at `position` (0 = start, 1 = end)
    ///
    /// `fade_out` selects the outgoing side. Out-of-range positions are
    /// clamped, so the result is always within `[0, 1]`.
    #[inline]
    pub fn calculate_gain(&self, position: f32, fade_out: bool) -> f32 {
        let position = position.clamp(0.0, 1.0);
        let t = if fade_out { 1.0 - position } else { position };

        let gain = match self {
            FadeCurve::Linear => t,
            FadeCurve::EqualPower => (t * PI * 0.5).sin(),
            FadeCurve::SCurve => (1.0 - (PI * t).cos()) * 0.5,
        };
        gain.clamp(0.0, 1.0)
    }

    /// Name used in logs
    pub fn display_name(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::EqualPower => "Equal Power",
            FadeCurve::SCurve => "S-Curve",
        }
    }
}

impl std::str::FromStr for FadeCurve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(FadeCurve::Linear),
            "equal_power" | "equal-power" | "equalpower" => Ok(FadeCurve::EqualPower),
            "s_curve" | "s-curve" | "scurve" => Ok(FadeCurve::SCurve),
            other => Err(format!(
                "unknown fade curve '{other}' (expected linear, equal-power or s-curve)"
            )),
        }
    }
}

/// Crossfade settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossfadeSettings {
    /// Trailing window before track end during which volumes ramp (0 = no ramp)
    pub window_ms: u32,

    /// Fade curve type
    pub curve: FadeCurve,
}

impl Default for CrossfadeSettings {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            curve: FadeCurve::Linear,
        }
    }
}

/// Where the active slot stands relative to the crossfade window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    /// Remaining time is at least the window length
    Idle,

    /// Inside the window; `progress` in [0.0, 1.0]
    Transitioning { progress: f32 },
}

/// Volumes to apply to both slots for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeRamp {
    pub active: f32,
    pub inactive: f32,
}

impl CrossfadeSettings {
    /// Create settings with a specific window and the default curve
    pub fn with_window(window_ms: u32) -> Self {
        Self {
            window_ms,
            ..Self::default()
        }
    }

    /// Compute the transition phase for a time-update of the active media
    ///
    /// `remaining == window` is still Idle. Unknown durations and a zero
    /// window never transition.
    pub fn phase(&self, update: TimeUpdate) -> TransitionPhase {
        let remaining_ms = update.remaining_ms();
        let window_ms = f64::from(self.window_ms);

        if self.window_ms == 0 || !remaining_ms.is_finite() || remaining_ms >= window_ms {
            return TransitionPhase::Idle;
        }

        let progress = (1.0 - remaining_ms / window_ms).clamp(0.0, 1.0);
        TransitionPhase::Transitioning {
            progress: progress as f32,
        }
    }

    /// Volumes for the active (outgoing) and inactive (incoming) slot
    pub fn ramp(&self, progress: f32) -> VolumeRamp {
        VolumeRamp {
            active: self.curve.calculate_gain(progress, true),
            inactive: self.curve.calculate_gain(progress, false),
        }
    }
}
