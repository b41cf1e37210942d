//! Row-strip tiles for parallel rendering.
//!
//! The image is cut into contiguous horizontal strips that workers render
//! independently. Strip boundaries never affect pixel values: every pixel
//! seeds its own RNG from its coordinates.

use crate::{Color, Raytracer};
use serde::{Deserialize, Serialize};

/// Half-open row range `[start_y, end_y)` of a `width` x `height` image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub start_y: u32,
    pub end_y: u32,
    /// Full image width
    pub width: u32,
    /// Full image height
    pub height: u32,
    /// Base seed shared by every tile of a render
    pub seed: u32,
}

impl Tile {
    pub fn new(start_y: u32, end_y: u32, width: u32, height: u32, seed: u32) -> Self {
        Self {
            start_y,
            end_y,
            width,
            height,
            seed,
        }
    }

    pub fn row_count(&self) -> u32 {
        self.end_y.saturating_sub(self.start_y)
    }

    pub fn pixel_count(&self) -> u32 {
        self.row_count() * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Split `height` rows into `min(count, height)` non-empty strips, from the
/// bottom row up. The first `height % strips` strips get one extra row.
pub fn partition_rows(width: u32, height: u32, count: usize, seed: u32) -> Vec<Tile> {
    let strips = (count.max(1) as u32).min(height);
    if strips == 0 {
        return Vec::new();
    }

    let base = height / strips;
    let remainder = height % strips;
    let mut tiles = Vec::with_capacity(strips as usize);
    let mut start = 0;
    for i in 0..strips {
        let rows = base + u32::from(i < remainder);
        tiles.push(Tile::new(start, start + rows, width, height, seed));
        start += rows;
    }
    tiles
}

/// Rows of one rendered tile, highest `y` first.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    pub rows: Vec<Vec<Color>>,
}

impl TileResult {
    pub fn new(tile: Tile, rows: Vec<Vec<Color>>) -> Self {
        Self { tile, rows }
    }
}

/// Render every row of `tile`, in the same top-down order as a full
/// single-threaded render.
pub fn render_tile(tile: &Tile, tracer: &Raytracer<'_>) -> TileResult {
    TileResult::new(*tile, tracer.render_rows(tile.start_y..tile.end_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(tiles: &[Tile], height: u32) {
        let mut next = 0;
        for tile in tiles {
            assert_eq!(tile.start_y, next);
            assert!(!tile.is_empty());
            next = tile.end_y;
        }
        assert_eq!(next, height);
    }

    #[test]
    fn test_even_split() {
        let tiles = partition_rows(64, 100, 4, 7);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.row_count() == 25 && t.seed == 7));
        assert_covers(&tiles, 100);
    }

    #[test]
    fn test_remainder_goes_to_first_strips() {
        let tiles = partition_rows(10, 10, 3, 0);
        let rows: Vec<u32> = tiles.iter().map(Tile::row_count).collect();
        assert_eq!(rows, vec![4, 3, 3]);
        assert_covers(&tiles, 10);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let tiles = partition_rows(10, 5, 16, 0);
        assert_eq!(tiles.len(), 5);
        assert_covers(&tiles, 5);
    }

    #[test]
    fn test_zero_count_means_one_strip() {
        let tiles = partition_rows(10, 5, 0, 0);
        assert_eq!(tiles, vec![Tile::new(0, 5, 10, 5, 0)]);
    }

    #[test]
    fn test_pixel_count_sums_to_image() {
        let tiles = partition_rows(33, 17, 4, 0);
        let total: u32 = tiles.iter().map(Tile::pixel_count).sum();
        assert_eq!(total, 33 * 17);
    }
}
