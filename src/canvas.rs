// Palette-indexed pixel grid of a single sprite view.
use hashbrown::{HashMap, HashSet};
use itertools::iproduct;

use crate::{
    common::{ChangedPixels, ColorIdx, PixelCoord},
    error::{EditError, EditResult},
    palette::TRANSPARENT_IDX,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: PixelCoord,
    height: PixelCoord,
    pixels: Vec<ColorIdx>, // Row-major
    // Anchor of the sprite within the object's bounding box
    pub offset: (i32, i32),
    pub visible: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: PixelCoord,
    pub y: PixelCoord,
    pub width: PixelCoord,
    pub height: PixelCoord,
}

impl Canvas {
    pub fn new(width: PixelCoord, height: PixelCoord, fill: ColorIdx) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
            offset: (0, 0),
            visible: true,
            locked: false,
        }
    }

    // Returns None when `pixels` doesn't hold exactly width * height entries.
    pub fn from_pixels(
        width: PixelCoord,
        height: PixelCoord,
        pixels: Vec<ColorIdx>,
    ) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Canvas {
            width,
            height,
            pixels,
            offset: (0, 0),
            visible: true,
            locked: false,
        })
    }

    pub fn width(&self) -> PixelCoord {
        self.width
    }

    pub fn height(&self) -> PixelCoord {
        self.height
    }

    pub fn pixels(&self) -> &[ColorIdx] {
        &self.pixels
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    fn out_of_range(&self, x: i32, y: i32) -> EditError {
        EditError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn offset_of(&self, x: PixelCoord, y: PixelCoord) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: i32, y: i32) -> EditResult<ColorIdx> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        Ok(self.pixels[self.offset_of(x as PixelCoord, y as PixelCoord)])
    }

    pub fn set(&mut self, x: i32, y: i32, idx: ColorIdx) -> EditResult<()> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        let i = self.offset_of(x as PixelCoord, y as PixelCoord);
        self.pixels[i] = idx;
        Ok(())
    }

    // Unchecked access for coordinates the caller already clipped.
    pub(crate) fn at(&self, x: PixelCoord, y: PixelCoord) -> ColorIdx {
        self.pixels[self.offset_of(x, y)]
    }

    // Writes `idx` and records the coordinate if the pixel changed.
    pub(crate) fn put(
        &mut self,
        x: PixelCoord,
        y: PixelCoord,
        idx: ColorIdx,
        changed: &mut ChangedPixels,
    ) {
        let i = self.offset_of(x, y);
        if self.pixels[i] != idx {
            self.pixels[i] = idx;
            changed.insert((x, y));
        }
    }

    pub fn coords(&self) -> impl Iterator<Item = (PixelCoord, PixelCoord)> {
        iproduct!(0..self.height, 0..self.width).map(|(y, x)| (x, y))
    }

    // Resize keeping the top-left aligned; new pixels are transparent.
    pub fn resize(&mut self, width: PixelCoord, height: PixelCoord) {
        self.resize_with(width, height, TRANSPARENT_IDX);
    }

    pub fn resize_with(&mut self, width: PixelCoord, height: PixelCoord, fill: ColorIdx) {
        let mut pixels = vec![fill; width as usize * height as usize];
        for y in 0..height.min(self.height) {
            for x in 0..width.min(self.width) {
                pixels[y as usize * width as usize + x as usize] = self.at(x, y);
            }
        }
        self.width = width;
        self.height = height;
        self.pixels = pixels;
    }

    // Crop to `rect`, which must lie inside the canvas. The offset is moved so
    // the remaining pixels keep their position within the object.
    pub fn crop(&mut self, rect: Rect) -> EditResult<()> {
        let x_end = rect.x as i32 + rect.width as i32;
        let y_end = rect.y as i32 + rect.height as i32;
        if x_end > self.width as i32 || y_end > self.height as i32 {
            return Err(self.out_of_range(x_end - 1, y_end - 1));
        }
        self.pixels = self.region(rect);
        self.width = rect.width;
        self.height = rect.height;
        self.offset.0 += rect.x as i32;
        self.offset.1 += rect.y as i32;
        Ok(())
    }

    // Copy of the pixels inside `rect`, clipped to the canvas.
    pub fn region(&self, rect: Rect) -> Vec<ColorIdx> {
        let x_end = (rect.x as u32 + rect.width as u32).min(self.width as u32) as PixelCoord;
        let y_end = (rect.y as u32 + rect.height as u32).min(self.height as u32) as PixelCoord;
        let mut out = vec![];
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                out.push(self.at(x, y));
            }
        }
        out
    }

    pub fn count(&self, idx: ColorIdx) -> usize {
        self.pixels.iter().filter(|&&p| p == idx).count()
    }

    pub fn used_indices(&self) -> HashSet<ColorIdx> {
        self.pixels.iter().copied().collect()
    }

    // Bounding box of every pixel that isn't `transparent`.
    pub fn content_bounds(&self, transparent: ColorIdx) -> Option<Rect> {
        let mut bounds: Option<(PixelCoord, PixelCoord, PixelCoord, PixelCoord)> = None;
        for (x, y) in self.coords() {
            if self.at(x, y) == transparent {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds.map(|(x0, y0, x1, y1)| Rect {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }

    pub fn fill(&mut self, idx: ColorIdx) -> ChangedPixels {
        let mut changed = ChangedPixels::new();
        for (x, y) in self.coords() {
            self.put(x, y, idx, &mut changed);
        }
        changed
    }

    // Substitute indices according to `map`; unmapped indices stay.
    pub fn replace(&mut self, map: &HashMap<ColorIdx, ColorIdx>) -> ChangedPixels {
        let mut changed = ChangedPixels::new();
        for (x, y) in self.coords() {
            if let Some(&to) = map.get(&self.at(x, y)) {
                self.put(x, y, to, &mut changed);
            }
        }
        changed
    }
}
