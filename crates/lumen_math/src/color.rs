//! Clamped RGB color.
//!
//! Every way of producing a [`Color`] clamps each channel to `[0, 1]`, so no
//! amount of light accumulation in the shader can push a pixel out of range.
//! Code that needs unbounded sums (sample averaging) accumulates in a
//! [`Vec3`] and converts once at the end.

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::Vec3;

/// RGB color with every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

#[inline]
fn clamp_channel(c: f64) -> f64 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Build a color, clamping each channel (NaN becomes 0).
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    pub fn gray(v: f64) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub fn r(&self) -> f64 {
        self.r
    }

    #[inline]
    pub fn g(&self) -> f64 {
        self.g
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// `self * (1 - t) + other * t`
    pub fn lerp(self, other: Color, t: f64) -> Color {
        self * (1.0 - t) + other * t
    }

    /// Apply `c^(1/gamma)` per channel.
    ///
    /// `gamma == 1.0` returns the color unchanged.
    pub fn gamma_correct(self, gamma: f64) -> Color {
        if gamma == 1.0 {
            return self;
        }
        let inv = 1.0 / gamma;
        Color::new(self.r.powf(inv), self.g.powf(inv), self.b.powf(inv))
    }

    /// Quantize to 8 bits per channel (`255 * c`, truncated).
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (255.0 * self.r) as u8,
            (255.0 * self.g) as u8,
            (255.0 * self.b) as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Color::new(v.x, v.y, v.z)
    }
}

impl From<[f64; 3]> for Color {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Color::new(r, g, b)
    }
}

impl From<Color> for [f64; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Sub for Color {
    type Output = Color;
    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

/// Channel-wise (Hadamard) product.
impl Mul for Color {
    type Output = Color;
    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f64> for Color {
    type Output = Color;
    fn mul(self, rhs: f64) -> Color {
        Color::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Mul<Color> for f64 {
    type Output = Color;
    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

impl Div<f64> for Color {
    type Output = Color;
    fn div(self, rhs: f64) -> Color {
        Color::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}
