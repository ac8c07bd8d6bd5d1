/// Simulator configuration
use crate::error::{Result, SimError};
use duet_playback::{FadeCurve, PlayerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Settings handed to the playback manager
    pub player: PlayerConfig,

    /// Interval between simulated `timeupdate` events (default: 250)
    pub tick_ms: u64,

    /// Media seconds that pass per wall-clock second (default: 1.0)
    pub speed: f64,

    /// Sleep between ticks; when false the playlist runs as fast as possible
    pub realtime: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            tick_ms: 250,
            speed: 1.0,
            realtime: true,
        }
    }
}

/// Command-line values that win over file and environment settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub window_ms: Option<u32>,
    pub curve: Option<FadeCurve>,
    pub tick_ms: Option<u64>,
    pub speed: Option<f64>,
    pub no_realtime: bool,
}

impl SimConfig {
    /// Load configuration from an optional TOML file, then the environment
    ///
    /// Environment variables use the `DUET_` prefix with `__` between nested
    /// keys, e.g. `DUET_TICK_MS=100` or `DUET_PLAYER__CROSSFADE__WINDOW_MS=5000`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(SimError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("DUET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| SimError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| SimError::Config(e.to_string()))
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(window_ms) = overrides.window_ms {
            self.player.crossfade.window_ms = window_ms;
        }
        if let Some(curve) = overrides.curve {
            self.player.crossfade.curve = curve;
        }
        if let Some(tick_ms) = overrides.tick_ms {
            self.tick_ms = tick_ms;
        }
        if let Some(speed) = overrides.speed {
            self.speed = speed;
        }
        if overrides.no_realtime {
            self.realtime = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(SimError::Config(
                "tick_ms must be greater than 0".to_string(),
            ));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SimError::Config(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }
        self.player.validate()?;
        Ok(())
    }

    /// Media milliseconds that pass in one tick
    pub fn media_step_ms(&self) -> f64 {
        self.tick_ms as f64 * self.speed
    }
}
