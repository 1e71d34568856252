//! Movement patterns — cosmetic only.
//!
//! RULE: Nothing here may feed back into progress or speed. The hint is
//! a pure function of (pattern, tick) for the renderer to animate.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    #[default]
    Normal,
    Confused,
    Dazed,
    Warped,
}

/// Transform hint for the sprite on the current tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MotionHint {
    pub offset_x:     f64,
    pub offset_y:     f64,
    pub rotation_deg: f64,
    pub scale:        f64,
    pub opacity:      f64,
}

impl Default for MotionHint {
    fn default() -> Self {
        Self {
            offset_x:     0.0,
            offset_y:     0.0,
            rotation_deg: 0.0,
            scale:        1.0,
            opacity:      1.0,
        }
    }
}

pub fn motion_hint(pattern: MovementPattern, tick: Tick) -> MotionHint {
    let t = tick as f64;
    match pattern {
        MovementPattern::Normal => MotionHint::default(),
        // Zig-zags across the lane, flipping heading every tick.
        MovementPattern::Confused => MotionHint {
            offset_x: (t * 1.3).sin() * 6.0,
            rotation_deg: if tick % 2 == 0 { 10.0 } else { -10.0 },
            ..MotionHint::default()
        },
        MovementPattern::Dazed => MotionHint {
            offset_y: (t * 0.8).cos() * 2.0,
            rotation_deg: (t * 0.8).sin() * 15.0,
            scale: 0.95,
            ..MotionHint::default()
        },
        MovementPattern::Warped => MotionHint {
            scale: 1.0 + 0.15 * (t * 2.1).sin(),
            opacity: 0.6 + 0.4 * t.cos().abs(),
            ..MotionHint::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_identity_on_every_tick() {
        for tick in 0..50 {
            assert_eq!(motion_hint(MovementPattern::Normal, tick), MotionHint::default());
        }
    }

    #[test]
    fn hints_are_pure() {
        for pattern in [
            MovementPattern::Confused,
            MovementPattern::Dazed,
            MovementPattern::Warped,
        ] {
            assert_eq!(motion_hint(pattern, 17), motion_hint(pattern, 17));
        }
    }

    #[test]
    fn warped_opacity_stays_visible() {
        for tick in 0..200 {
            let hint = motion_hint(MovementPattern::Warped, tick);
            assert!((0.6..=1.0).contains(&hint.opacity));
            assert!((0.85..=1.15).contains(&hint.scale));
        }
    }
}
