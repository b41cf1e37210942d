//! Pinhole camera for ray generation.

use lumen_math::{Ray, Vec3, Vec3Ext};
use serde::{Deserialize, Serialize};

/// User-facing camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f64,
    /// Image plane width / height
    pub aspect_ratio: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            fov: 90.0,
            aspect_ratio: 1.0,
        }
    }
}

/// Camera with its orthonormal basis and image plane precomputed.
///
/// The image plane sits at distance 1 along the view direction; `(u, v)` in
/// `[0, 1]^2` maps from its lower-left corner to its upper-right corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CameraSettings", into = "CameraSettings")]
pub struct Camera {
    settings: CameraSettings,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    pub fn new(settings: CameraSettings) -> Self {
        let forward = (settings.target - settings.position).safe_normalize();
        let forward = if forward == Vec3::ZERO {
            -Vec3::Z
        } else {
            forward
        };

        // An up vector parallel to the view direction gives no right vector
        let mut right = forward.cross(settings.up).safe_normalize();
        if right == Vec3::ZERO {
            right = forward.any_orthonormal_vector();
        }
        let up = right.cross(forward);

        let half_height = (settings.fov.to_radians() / 2.0).tan();
        let half_width = settings.aspect_ratio * half_height;

        Self {
            settings,
            lower_left: settings.position + forward - right * half_width - up * half_height,
            horizontal: right * (2.0 * half_width),
            vertical: up * (2.0 * half_height),
        }
    }

    /// Camera looking from `position` at `target`.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3, fov: f64, aspect_ratio: f64) -> Self {
        Self::new(CameraSettings {
            position,
            target,
            up,
            fov,
            aspect_ratio,
        })
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn position(&self) -> Vec3 {
        self.settings.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.update(|s| s.position = position);
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.update(|s| s.target = target);
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.update(|s| s.up = up);
    }

    pub fn set_fov(&mut self, fov: f64) {
        self.update(|s| s.fov = fov);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.update(|s| s.aspect_ratio = aspect_ratio);
    }

    /// Change settings and rebuild the derived basis.
    fn update(&mut self, change: impl FnOnce(&mut CameraSettings)) {
        let mut settings = self.settings;
        change(&mut settings);
        *self = Self::new(settings);
    }

    /// Ray through image plane coordinates `(u, v)`, origin at the camera.
    pub fn get_ray(&self, u: f64, v: f64) -> Ray {
        let point = self.lower_left + self.horizontal * u + self.vertical * v;
        Ray::new(self.settings.position, point - self.settings.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

impl From<CameraSettings> for Camera {
    fn from(settings: CameraSettings) -> Self {
        Self::new(settings)
    }
}

impl From<Camera> for CameraSettings {
    fn from(camera: Camera) -> Self {
        camera.settings
    }
}
