//! Single-threaded ray tracing.
//!
//! Implements:
//! - Phong shading (ambient, diffuse, specular) with hard shadows
//! - Mirror reflection up to a configurable depth
//! - Stratified or random antialiasing with a per-pixel seeded RNG
//! - Gamma correction, once per final pixel
//!
//! Pixel `y` grows upward: row 0 is the bottom of the image, and every render
//! path emits rows from `height - 1` down to 0 so the output is top row first.

use crate::{derive_pixel_seed, Camera, HitRecord, Lcg, RenderConfig, Scene};
use lumen_math::{Color, Ray, Vec3, Vec3Ext};
use std::ops::Range;
use std::time::Instant;

/// Minimum `t` for secondary rays and slack at both ends of shadow rays.
pub const RAY_EPSILON: f64 = 1e-3;

/// Rendered raster, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Image {
    /// Black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    /// Image from rows given top row first.
    pub fn from_rows(width: u32, height: u32, rows: Vec<Vec<Color>>) -> Self {
        let pixels: Vec<Color> = rows.into_iter().flatten().collect();
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at column `x` of row `row` (row 0 is the top).
    pub fn get(&self, x: u32, row: u32) -> Color {
        self.pixels[self.index(x, row)]
    }

    pub fn set(&mut self, x: u32, row: u32, color: Color) {
        let index = self.index(x, row);
        self.pixels[index] = color;
    }

    pub fn row(&self, row: u32) -> &[Color] {
        let start = row as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Packed 8-bit RGB, three bytes per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgb8()).collect()
    }

    fn index(&self, x: u32, row: u32) -> usize {
        row as usize * self.width as usize + x as usize
    }
}

/// Ray tracer over a borrowed scene, camera and configuration.
pub struct Raytracer<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    config: &'a RenderConfig,
}

impl<'a> Raytracer<'a> {
    pub fn new(scene: &'a Scene, camera: &'a Camera, config: &'a RenderConfig) -> Self {
        Self {
            scene,
            camera,
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// Final, gamma-corrected color of pixel `(x, y)`.
    ///
    /// The pixel's RNG is seeded from its coordinates alone, so the result
    /// does not depend on which pixels were rendered before it.
    pub fn render_pixel(&self, x: u32, y: u32) -> Color {
        let config = self.config;
        let mut rng = Lcg::new(derive_pixel_seed(
            config.seed,
            x,
            y,
            config.width,
            config.height,
        ));

        let samples = config.effective_samples();
        let linear = if samples <= 1 {
            self.sample(x, y, 0.5, 0.5)
        } else if config.uses_stratified() {
            let n = config.strata_per_axis();
            let cell = 1.0 / n as f64;
            let mut sum = Vec3::ZERO;
            for sy in 0..n {
                for sx in 0..n {
                    let dx = (sx as f64 + rng.next_f64()) * cell;
                    let dy = (sy as f64 + rng.next_f64()) * cell;
                    sum += self.sample(x, y, dx, dy);
                }
            }
            sum / (n as f64 * n as f64)
        } else {
            let mut sum = Vec3::ZERO;
            for _ in 0..samples {
                let dx = rng.next_f64();
                let dy = rng.next_f64();
                sum += self.sample(x, y, dx, dy);
            }
            sum / samples as f64
        };

        Color::from(linear).gamma_correct(config.gamma)
    }

    /// Linear color seen through offset `(dx, dy)` within pixel `(x, y)`.
    fn sample(&self, x: u32, y: u32, dx: f64, dy: f64) -> Vec3 {
        let u = (x as f64 + dx) / self.config.width as f64;
        let v = (y as f64 + dy) / self.config.height as f64;
        let ray = self.camera.get_ray(u, v);
        self.trace_ray(&ray, self.config.max_depth).to_vec3()
    }

    /// Color seen along `ray` with `depth` levels of recursion left.
    pub fn trace_ray(&self, ray: &Ray, depth: u32) -> Color {
        if depth == 0 {
            return Color::BLACK;
        }
        match self.scene.intersect(ray, RAY_EPSILON, f64::INFINITY) {
            Some(hit) => self.shade(&hit, ray, depth),
            None => self.scene.background(),
        }
    }

    /// Phong shading at `hit`, plus mirror reflection while depth remains.
    pub fn shade(&self, hit: &HitRecord<'_>, ray: &Ray, depth: u32) -> Color {
        let material = hit.material;
        let view = -ray.direction;
        let mut color = material.color * material.ambient;

        for light in self.scene.lights() {
            if self
                .scene
                .is_occluded(hit.point, light.position, RAY_EPSILON)
            {
                continue;
            }

            let to_light = (light.position - hit.point).safe_normalize();
            let n_dot_l = hit.normal.dot(to_light).max(0.0);
            color = color
                + material.color * light.color * (material.diffuse * n_dot_l * light.intensity);

            let reflected = (-to_light).reflect_about(hit.normal);
            let highlight = view.dot(reflected).max(0.0).powf(material.shininess);
            color = color + light.color * (material.specular * highlight * light.intensity);
        }

        let mirror = material.mirror_weight();
        if mirror > 0.0 && depth > 1 {
            let direction = ray.direction.reflect_about(hit.normal);
            let reflected = self.trace_ray(&Ray::new(hit.point, direction), depth - 1);
            color = color.lerp(reflected, mirror);
        }

        color
    }

    /// Pixels of row `y`, left to right.
    pub fn render_row(&self, y: u32) -> Vec<Color> {
        (0..self.config.width)
            .map(|x| self.render_pixel(x, y))
            .collect()
    }

    /// Rows in `rows`, highest `y` first.
    pub fn render_rows(&self, rows: Range<u32>) -> Vec<Vec<Color>> {
        rows.rev().map(|y| self.render_row(y)).collect()
    }

    /// Render the whole image on the calling thread.
    pub fn render(&self) -> Image {
        let config = self.config;
        log_sample_plan(config);
        log::info!(
            "Rendering {}x{} on 1 thread, {} samples/pixel",
            config.width,
            config.height,
            config.samples_traced()
        );
        let start = Instant::now();

        let image = Image::from_rows(
            config.width,
            config.height,
            self.render_rows(0..config.height),
        );

        log::info!("Render complete in {:.2?}", start.elapsed());
        image
    }
}

/// Warn when stratified sampling traces more samples than requested.
pub(crate) fn log_sample_plan(config: &RenderConfig) {
    let requested = config.effective_samples();
    let traced = config.samples_traced();
    if traced != u64::from(requested) {
        log::warn!(
            "Stratified sampling rounds {} samples/pixel up to {} ({}x{} grid)",
            requested,
            traced,
            config.strata_per_axis(),
            config.strata_per_axis()
        );
    }
}
