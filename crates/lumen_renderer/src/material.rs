//! Phong surface description.

use lumen_math::Color;
use serde::{Deserialize, Serialize};

/// Phong material: ambient, diffuse and specular weights plus a mirror term.
///
/// `reflectivity` blends the shaded color toward the reflected color and is
/// clamped to `[0, 1]` by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub color: Color,
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
    pub reflectivity: f64,
}

impl Material {
    /// Matte material of the given base color with default Phong weights.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn with_ambient(mut self, ambient: f64) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_diffuse(mut self, diffuse: f64) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Specular weight and Phong exponent.
    pub fn with_specular(mut self, specular: f64, shininess: f64) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f64) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    /// Reflectivity as used by the shader, clamped to `[0, 1]`.
    ///
    /// Deserialized materials skip the builder, so the shader reads through
    /// this rather than the raw field.
    #[inline]
    pub fn mirror_weight(&self) -> f64 {
        if self.reflectivity.is_nan() {
            0.0
        } else {
            self.reflectivity.clamp(0.0, 1.0)
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::gray(0.8),
            ambient: 0.1,
            diffuse: 0.7,
            specular: 0.3,
            shininess: 32.0,
            reflectivity: 0.0,
        }
    }
}
