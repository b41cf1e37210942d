use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// Point light. No falloff with distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    #[serde(default = "white")]
    pub color: Color,
    #[serde(default = "unit_intensity")]
    pub intensity: f64,
}

fn white() -> Color {
    Color::WHITE
}

fn unit_intensity() -> f64 {
    1.0
}

impl Light {
    pub fn new(position: Vec3, color: Color, intensity: f64) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }

    /// White light of intensity 1.
    pub fn white(position: Vec3) -> Self {
        Self::new(position, Color::WHITE, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let light: Light = serde_json::from_str(r#"{ "position": [2.0, 2.0, 0.0] }"#).unwrap();
        assert_eq!(light, Light::white(Vec3::new(2.0, 2.0, 0.0)));
    }
}
