//! Host-tunable timing policy. Defaults give the stock game cadence; a host
//! may override any subset from JSON (`start_game_with_config`).

use serde::Deserialize;

use crate::error::Result;
use crate::game::motion::MotionTuning;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// A bug spawns every interval.
    pub bug_interval_ms: f64,
    pub bomb_interval_ms: f64,
    /// Probability that a bomb attempt actually spawns one.
    pub bomb_chance: f64,
    pub power_up_interval_ms: f64,
    /// Probability that a power-up attempt reaches the spawner (which applies
    /// its own gate on top).
    pub power_up_attempt_chance: f64,
    /// Power-up durations are counted in ticks of this length.
    pub power_up_tick_ms: f64,
    /// Delay between an unshielded bomb catch and the end of the session.
    pub bomb_end_delay_ms: f64,
    pub konami_duration_ms: f64,
    pub motion: MotionTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bug_interval_ms: 2_500.0,
            bomb_interval_ms: 4_000.0,
            bomb_chance: 0.6,
            power_up_interval_ms: 10_000.0,
            power_up_attempt_chance: 0.3,
            power_up_tick_ms: crate::game::powerup::DEFAULT_TICK_MS,
            bomb_end_delay_ms: 1_000.0,
            konami_duration_ms: 30_000.0,
            motion: MotionTuning::default(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override; missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
