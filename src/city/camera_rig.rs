//! Camera presets
//!
//! Four named viewpoints. `FollowScore` is computed from the indicator's
//! position when the view is selected and stays put afterwards; select it
//! again to re-center on the marker.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Camera, Vec3};

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// Named viewpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraMode {
    #[default]
    Fixed,
    Overhead,
    FirstPerson,
    FollowScore,
}

impl CameraMode {
    pub const ALL: [CameraMode; 4] = [
        CameraMode::Fixed,
        CameraMode::Overhead,
        CameraMode::FirstPerson,
        CameraMode::FollowScore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CameraMode::Fixed => "fixed",
            CameraMode::Overhead => "overhead",
            CameraMode::FirstPerson => "firstPerson",
            CameraMode::FollowScore => "followScore",
        }
    }

    /// Eye and look-at point. `indicator_x` is only read by `FollowScore`.
    pub fn pose(self, indicator_x: f32) -> (Vec3, Vec3) {
        match self {
            CameraMode::Fixed => (Vec3::new(0.0, 15.0, 30.0), Vec3::new(0.0, 5.0, 0.0)),
            CameraMode::Overhead => (Vec3::new(0.0, 40.0, 0.0), Vec3::ZERO),
            CameraMode::FirstPerson => (Vec3::new(0.0, 2.0, 25.0), Vec3::new(0.0, 5.0, 0.0)),
            CameraMode::FollowScore => (
                Vec3::new(indicator_x, 7.0, 12.0),
                Vec3::new(indicator_x, 5.0, 0.0),
            ),
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown camera mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for CameraMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CameraMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// The scene camera plus the mode that placed it
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: Camera,
    mode: CameraMode,
}

impl CameraRig {
    /// Camera at the fixed preset
    pub fn new(fov: f32, aspect: f32) -> Self {
        let mut rig = Self {
            camera: Camera::perspective(fov, aspect, NEAR, FAR),
            mode: CameraMode::Fixed,
        };
        rig.set_view(CameraMode::Fixed, 0.0);
        rig
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Jump to `mode`. For `FollowScore` the pose is a snapshot of `indicator_x`.
    pub fn set_view(&mut self, mode: CameraMode, indicator_x: f32) {
        let (position, target) = mode.pose(indicator_x);
        self.camera.look_at(position, target);
        self.mode = mode;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in CameraMode::ALL {
            assert_eq!(mode.name().parse::<CameraMode>(), Ok(mode));
        }
        assert_eq!("followscore".parse::<CameraMode>(), Ok(CameraMode::FollowScore));
        assert!("orbit".parse::<CameraMode>().is_err());
        assert_eq!(CameraMode::FirstPerson.to_string(), "firstPerson");
    }

    #[test]
    fn test_fixed_presets() {
        let mut rig = CameraRig::new(60.0, 1.5);
        assert_eq!(rig.camera.position, Vec3::new(0.0, 15.0, 30.0));
        assert_eq!(rig.camera.target, Vec3::new(0.0, 5.0, 0.0));

        rig.set_view(CameraMode::Overhead, 12.0);
        assert_eq!(rig.camera.position, Vec3::new(0.0, 40.0, 0.0));
        assert_eq!(rig.camera.target, Vec3::ZERO);

        rig.set_view(CameraMode::FirstPerson, 12.0);
        assert_eq!(rig.camera.position, Vec3::new(0.0, 2.0, 25.0));
        assert_eq!(rig.mode(), CameraMode::FirstPerson);
    }

    #[test]
    fn test_follow_score_uses_given_x() {
        let mut rig = CameraRig::new(60.0, 1.5);
        rig.set_view(CameraMode::FollowScore, -12.5);
        assert_eq!(rig.camera.position, Vec3::new(-12.5, 7.0, 12.0));
        assert_eq!(rig.camera.target, Vec3::new(-12.5, 5.0, 0.0));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let text = ron::to_string(&CameraMode::FollowScore).unwrap();
        assert_eq!(text, "followScore");
    }
}
