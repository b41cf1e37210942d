//! Plain-text PPM (P3) output.

use crate::Image;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `image` as P3: header lines `P3`, `width height`, `255`, then one
/// `R G B` line per pixel, top row first.
pub fn write_ppm<W: Write>(image: &Image, writer: W) -> io::Result<()> {
    let mut out = BufWriter::new(writer);
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width(), image.height())?;
    writeln!(out, "255")?;
    for color in image.pixels() {
        let [r, g, b] = color.to_rgb8();
        writeln!(out, "{r} {g} {b}")?;
    }
    out.flush()
}

/// Write `image` to a PPM file at `path`.
pub fn save_ppm<P: AsRef<Path>>(image: &Image, path: P) -> io::Result<()> {
    let path = path.as_ref();
    write_ppm(image, File::create(path)?)?;
    log::info!("Saved {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}
