// Reading and writing single sprite views as PNG files.
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{bail, ensure, Context, Result};
use hashbrown::HashMap;
use log::{debug, info};

use crate::{
    canvas::Canvas,
    common::{ColorIdx, ColorRGB, PixelCoord},
    palette::Palette,
    remap::nearest_index,
};

pub type ColorRGBA = [u8; 4];

fn check_size(width: u32, height: u32) -> Result<(PixelCoord, PixelCoord)> {
    ensure!(
        width <= PixelCoord::MAX as u32 && height <= PixelCoord::MAX as u32,
        "Image of {}x{} pixels is too large",
        width,
        height
    );
    Ok((width as PixelCoord, height as PixelCoord))
}

// Read an 8-bit palette PNG whose indices are game palette indices.
pub fn read_indexed(path: &Path) -> Result<Canvas> {
    debug!("Reading {}", path.display());
    let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    ensure!(
        frame.color_type == png::ColorType::Indexed && frame.bit_depth == png::BitDepth::Eight,
        "{} is not an 8-bit indexed PNG",
        path.display()
    );
    let (width, height) = check_size(frame.width, frame.height)?;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for row in buf.chunks(frame.line_size).take(height as usize) {
        pixels.extend_from_slice(&row[..width as usize]);
    }
    Canvas::from_pixels(width, height, pixels).context("Truncated image data")
}

pub fn write_indexed(path: &Path, canvas: &Canvas, palette: &Palette) -> Result<()> {
    info!("Writing {}", path.display());
    let file =
        File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        canvas.width() as u32,
        canvas.height() as u32,
    );
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    let plte: Vec<u8> = palette.colors().iter().flatten().copied().collect();
    encoder.set_palette(plte);
    // Only the transparent entry carries alpha.
    let mut trns = vec![255u8; palette.transparent() as usize + 1];
    trns[palette.transparent() as usize] = 0;
    encoder.set_trns(trns);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(canvas.pixels())?;
    writer.finish()?;
    Ok(())
}

// Read any 8-bit-per-channel PNG as RGBA.
pub fn read_rgba(path: &Path) -> Result<(PixelCoord, PixelCoord, Vec<ColorRGBA>)> {
    debug!("Reading {}", path.display());
    let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let (width, height) = check_size(frame.width, frame.height)?;
    let channels = match frame.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => bail!("Palette was not expanded for {}", path.display()),
    };
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for row in buf.chunks(frame.line_size).take(height as usize) {
        for px in row[..width as usize * channels].chunks(channels) {
            pixels.push(match channels {
                1 => [px[0], px[0], px[0], 255],
                2 => [px[0], px[0], px[0], px[1]],
                3 => [px[0], px[1], px[2], 255],
                _ => [px[0], px[1], px[2], px[3]],
            });
        }
    }
    Ok((width, height, pixels))
}

// Convert RGBA pixels to palette indices. Pixels that are fully transparent
// or match `transparency` (the upper-left pixel's color when None) become the
// transparent index; all others take the nearest palette color.
pub fn import_rgba(
    palette: &Palette,
    width: PixelCoord,
    height: PixelCoord,
    rgba: &[ColorRGBA],
    transparency: Option<ColorRGB>,
) -> Result<Canvas> {
    ensure!(
        rgba.len() == width as usize * height as usize,
        "Expected {} pixels, got {}",
        width as usize * height as usize,
        rgba.len()
    );
    let transparency = match (transparency, rgba.first()) {
        (Some(c), _) => Some(c),
        (None, Some(p)) => Some([p[0], p[1], p[2]]),
        (None, None) => None,
    };
    let mut cache: HashMap<ColorRGB, ColorIdx> = HashMap::new();
    let pixels = rgba
        .iter()
        .map(|p| {
            let rgb = [p[0], p[1], p[2]];
            if p[3] == 0 || Some(rgb) == transparency {
                return palette.transparent();
            }
            *cache
                .entry(rgb)
                .or_insert_with(|| nearest_index(palette, rgb))
        })
        .collect();
    Canvas::from_pixels(width, height, pixels).context("Invalid image size")
}
