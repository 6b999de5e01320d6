// Conversion of canvases between palette variants.
//
// An index keeps its meaning across palettes: a ramp shade maps to the same
// position of the same-named ramp and a special entry to the same-named
// special. Indices without a counterpart fall back to the nearest color
// (squared Euclidean RGB distance, lowest index on ties), never to the
// transparent entry.
use log::{debug, info};

use crate::{
    canvas::Canvas,
    common::{ChangedPixels, ColorIdx, ColorRGB, PALETTE_SIZE},
    helpers::color_distance,
    palette::{Palette, Slot},
};

pub fn nearest_index(palette: &Palette, color: ColorRGB) -> ColorIdx {
    let transparent = palette.transparent();
    let mut best = (u32::MAX, transparent);
    for (i, &c) in palette.colors().iter().enumerate() {
        let idx = i as ColorIdx;
        if idx == transparent {
            continue;
        }
        let d = color_distance(c, color);
        if d < best.0 {
            best = (d, idx);
            if d == 0 {
                break;
            }
        }
    }
    best.1
}

// Position within a ramp of `to_len` shades matching `position` in a ramp of
// `from_len` shades.
pub fn scale_position(position: usize, from_len: usize, to_len: usize) -> usize {
    if from_len == to_len || from_len <= 1 {
        return position.min(to_len.saturating_sub(1));
    }
    (position * (to_len - 1) + (from_len - 1) / 2) / (from_len - 1)
}

pub fn remap_index(idx: ColorIdx, from: &Palette, to: &Palette) -> ColorIdx {
    if from.variant() == to.variant() {
        return idx;
    }
    match from.slot_of(idx) {
        Some(Slot::Ramp { name, position }) => {
            if let Some(ramp) = to.ramp(name) {
                let len = from.ramp(name).map_or(ramp.indices.len(), |r| r.indices.len());
                return ramp.indices[scale_position(position, len, ramp.indices.len())];
            }
        }
        Some(Slot::Special(name)) => {
            if let Some(special) = to.special(name) {
                return special;
            }
        }
        None => {
            if to.slot_of(idx).is_none() && to.color(idx) == from.color(idx) {
                return idx;
            }
        }
    }
    nearest_index(to, from.color(idx))
}

// Lookup table covering every index of one palette pair.
pub struct RemapTable {
    table: [ColorIdx; PALETTE_SIZE],
}

impl RemapTable {
    pub fn new(from: &Palette, to: &Palette) -> Self {
        let mut table = [0; PALETTE_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = remap_index(i as ColorIdx, from, to);
        }
        debug!(
            "Built remap table {} -> {}",
            from.variant().name(),
            to.variant().name()
        );
        RemapTable { table }
    }

    pub fn get(&self, idx: ColorIdx) -> ColorIdx {
        self.table[idx as usize]
    }

    pub fn is_identity(&self) -> bool {
        self.table.iter().enumerate().all(|(i, &t)| i == t as usize)
    }

    pub fn apply(&self, canvas: &mut Canvas) -> ChangedPixels {
        let mut changed = ChangedPixels::new();
        if self.is_identity() {
            return changed;
        }
        for (x, y) in canvas.coords() {
            let to = self.get(canvas.at(x, y));
            canvas.put(x, y, to, &mut changed);
        }
        changed
    }
}

pub fn remap_canvas(canvas: &Canvas, from: &Palette, to: &Palette) -> Canvas {
    let mut out = canvas.clone();
    remap_in_place(&mut out, from, to);
    out
}

pub fn remap_in_place(canvas: &mut Canvas, from: &Palette, to: &Palette) -> ChangedPixels {
    RemapTable::new(from, to).apply(canvas)
}

// Remap a set of canvases with one table, returning the changes per canvas in
// iteration order.
pub fn remap_all<'a>(
    canvases: impl IntoIterator<Item = &'a mut Canvas>,
    from: &Palette,
    to: &Palette,
) -> Vec<ChangedPixels> {
    let table = RemapTable::new(from, to);
    let results: Vec<ChangedPixels> = canvases.into_iter().map(|c| table.apply(c)).collect();
    info!(
        "Remapped {} canvases from the {} to the {} palette",
        results.len(),
        from.variant().name(),
        to.variant().name()
    );
    results
}
