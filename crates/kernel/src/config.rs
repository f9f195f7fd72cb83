use serde::{Deserialize, Serialize};
use tileworld_common::{MAX_DELTA_MS, MAX_SPEED};

/// Player movement and bookkeeping constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal run speed, px/s.
    pub run_speed: f64,
    pub ladder_speed: f64,
    pub jump_speed: f64,
    pub max_fall_speed: f64,
    /// px/s²
    pub gravity: f64,
    /// Animation rates, frames per second.
    pub run_anim_fps: f64,
    pub ladder_anim_fps: f64,
    pub max_health: i32,
    pub lives: u32,
    pub respawn_invincibility_ms: f64,
    pub blink_period_ms: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            run_speed: 72.0,
            ladder_speed: 48.0,
            jump_speed: 216.0,
            max_fall_speed: 120.0,
            gravity: 24.0 * 48.0,
            run_anim_fps: 8.0,
            ladder_anim_fps: 6.0,
            max_health: 100,
            lives: 3,
            respawn_invincibility_ms: 2000.0,
            blink_period_ms: 200.0,
        }
    }
}

/// Frame pacing parameters handed to [`crate::FramePacer::start`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub frame_rate: u32,
    pub max_delta_ms: f64,
    /// Number of frame deltas kept for statistics.
    pub stats_window: usize,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            max_delta_ms: MAX_DELTA_MS,
            stats_window: 120,
        }
    }
}

/// Everything tunable about a simulation run. Missing fields fall back to
/// the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub player: PlayerTuning,
    pub pacing: PacingConfig,
    /// Velocity clamp applied to both axes, px/s.
    pub max_speed: f64,
    /// Interval between object compaction passes, ms.
    pub cleanup_period_ms: f64,
    /// Room array size used when building from a level source.
    pub rooms_y: usize,
    pub rooms_x: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            pacing: PacingConfig::default(),
            max_speed: MAX_SPEED,
            cleanup_period_ms: 10_000.0,
            rooms_y: 2,
            rooms_x: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_game_constants() {
        let config = SimConfig::default();
        assert_eq!(config.player.gravity, 1152.0);
        assert_eq!(config.player.lives, 3);
        assert_eq!(config.max_speed, 384.0);
        assert_eq!(config.cleanup_period_ms, 10_000.0);
        assert_eq!(config.pacing.frame_rate, 60);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "player:\n  lives: 5\npacing:\n  frame_rate: 30\nrooms_x: 3\n";
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.player.lives, 5);
        assert_eq!(config.player.run_speed, 72.0);
        assert_eq!(config.pacing.frame_rate, 30);
        assert_eq!(config.pacing.max_delta_ms, MAX_DELTA_MS);
        assert_eq!(config.rooms_x, 3);
        assert_eq!(config.rooms_y, 2);
    }
}
