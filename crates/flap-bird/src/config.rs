use serde::{Deserialize, Serialize};

/// Every constant of the simulation in one place. Values are world
/// pixels, seconds, and radians; the defaults reproduce the classic
/// 768×896 field. Loadable from JSON so an embedder can retune a
/// session without recompiling; absent fields keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Visible field width.
    pub field_width: f32,
    /// Visible field height.
    pub field_height: f32,

    /// Bird spawn point.
    pub bird_spawn_x: f32,
    pub bird_spawn_y: f32,
    /// Bird AABB extent.
    pub bird_width: f32,
    pub bird_height: f32,
    /// Downward acceleration while gravity is enabled, px/s².
    pub gravity: f32,
    /// Vertical velocity applied by one flap (negative = up).
    pub flap_impulse: f32,
    /// Nose-up angle snapped to on each flap, radians.
    pub ascend_angle: f32,
    /// Nose-down angle the rotation ease settles toward, radians.
    pub descend_angle: f32,
    /// Angle the bird is pinned to once dead, radians.
    pub death_angle: f32,
    /// Rotation ease duration and start delay, seconds.
    pub rotation_ease_duration: f32,
    pub rotation_ease_delay: f32,
    /// Idle float amplitude (px) and half-period (seconds).
    pub float_amplitude: f32,
    pub float_half_period: f32,

    /// Vertical clearance between the two obstacles of a pair.
    pub gap: f32,
    /// Obstacle AABB extent.
    pub pipe_width: f32,
    pub pipe_height: f32,
    /// Leftward scroll speed of obstacles, px/s (positive magnitude).
    pub scroll_speed: f32,
    /// Seconds between pipe spawns while playing.
    pub spawn_interval: f32,
    /// An obstacle pair is retired once its x falls below this.
    pub expiry_threshold_x: f32,
    /// Top edge of the ground slab.
    pub ground_top: f32,

    /// Survival bonus period (seconds) and amount.
    pub survival_interval: f32,
    pub alive_score: u32,
    /// Pass-scan period (seconds) and pass bonus amount.
    pub pass_interval: f32,
    pub pass_score: u32,
    /// How long the transient "+N" display stays up, seconds.
    pub delta_clear_delay: f32,

    /// Fixed simulation step, seconds.
    pub fixed_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 768.0,
            field_height: 896.0,
            bird_spawn_x: 384.0,
            bird_spawn_y: 448.0,
            bird_width: 92.0,
            bird_height: 64.0,
            gravity: 2700.0,
            flap_impulse: -700.0,
            ascend_angle: (-25.0_f32).to_radians(),
            descend_angle: 90.0_f32.to_radians(),
            death_angle: 90.0_f32.to_radians(),
            rotation_ease_duration: 0.5,
            rotation_ease_delay: 0.3,
            float_amplitude: 12.0,
            float_half_period: 0.4,
            gap: 200.0,
            pipe_width: 100.0,
            pipe_height: 960.0,
            scroll_speed: 200.0,
            spawn_interval: 2.0,
            expiry_threshold_x: -100.0,
            ground_top: 800.0,
            survival_interval: 1.0,
            alive_score: 1,
            pass_interval: 0.2,
            pass_score: 10,
            delta_clear_delay: 1.0,
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// X where new pairs appear: just past the right edge.
    pub fn pipe_spawn_x(&self) -> f32 {
        self.field_width + self.pipe_width * 0.5
    }

    /// A pair scores once it scrolls left of one third of the field.
    pub fn pass_threshold_x(&self) -> f32 {
        self.field_width / 3.0
    }

    /// Period of the per-pair off-screen recheck: the time a pair needs
    /// to cross the field plus a wide margin. A recheck, not a one-shot,
    /// so inexact timing can never strand a pair on screen.
    pub fn expiry_check_interval(&self) -> f32 {
        self.field_width / self.scroll_speed + 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_canonical() {
        let t = Tuning::default();
        assert_eq!(t.field_width, 768.0);
        assert_eq!(t.field_height, 896.0);
        assert_eq!(t.flap_impulse, -700.0);
        assert_eq!(t.gravity, 2700.0);
        assert_eq!(t.pass_score, 10);
        assert_eq!(t.alive_score, 1);
        assert!((t.pass_threshold_x() - 256.0).abs() < 0.001);
        assert!((t.expiry_check_interval() - 6.84).abs() < 0.001);
    }

    #[test]
    fn json_overrides_single_field() {
        let t = Tuning::from_json(r#"{ "gap": 260.0 }"#).unwrap();
        assert_eq!(t.gap, 260.0);
        assert_eq!(t.field_width, 768.0, "unset fields keep defaults");
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(Tuning::from_json("{ gap:").is_err());
    }
}
