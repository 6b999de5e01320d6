// Drawing and color tools operating on a single canvas, plus the fan-out that
// applies the color tools to every view of an object.
//
// Every mutating tool returns the coordinates whose index changed so callers
// can redraw (and record undo data for) just those pixels.
use itertools::iproduct;
use log::{debug, warn};

use crate::{
    canvas::Canvas,
    common::{ChangedPixels, ColorIdx, PixelCoord, ViewId, MAX_BRUSH_SIZE},
    error::{EditError, EditResult},
    helpers::color_distance,
    object::CanvasSource,
    palette::{Palette, Ramp},
    remap::{nearest_index, scale_position},
    selection::Selection,
};

// Probability that an airbrush application sets a covered pixel.
pub const AIRBRUSH_DENSITY: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Pen,
    Eraser,
    Eyedropper,
    Brightness,
    Remap,
    Flood,
}

const TOOL_NAMES: [&str; 6] = ["Draw", "Erase", "Eyedrop", "Brightn.", "Remap", "Fill"];

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Pen,
        Tool::Eraser,
        Tool::Eyedropper,
        Tool::Brightness,
        Tool::Remap,
        Tool::Flood,
    ];

    pub fn display_name(self) -> &'static str {
        TOOL_NAMES[self as usize]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BrushKind {
    #[default]
    Solid,
    Airbrush,
}

const BRUSH_NAMES: [&str; 2] = ["Solid", "Airbrush"];

impl BrushKind {
    pub fn display_name(self) -> &'static str {
        BRUSH_NAMES[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub kind: BrushKind,
    size: u8, // Radius in pixels, 1 = single pixel
}

impl Default for Brush {
    fn default() -> Self {
        Brush {
            kind: BrushKind::Solid,
            size: 1,
        }
    }
}

impl Brush {
    pub fn new(kind: BrushKind, size: u8) -> EditResult<Self> {
        if size == 0 || size > MAX_BRUSH_SIZE {
            return Err(EditError::InvalidBrushSize(size));
        }
        Ok(Brush { kind, size })
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    // Pixels covered by the brush centered at (x, y), clipped to the canvas.
    // Origins far outside the canvas give an empty footprint.
    pub fn footprint(&self, canvas: &Canvas, x: i32, y: i32) -> Vec<(PixelCoord, PixelCoord)> {
        let r = self.size as i32 - 1;
        iproduct!(-r..=r, -r..=r)
            .filter(|&(dy, dx)| dx * dx + dy * dy <= r * r)
            .filter_map(|(dy, dx)| Some((x.checked_add(dx)?, y.checked_add(dy)?)))
            .filter(|&(px, py)| canvas.in_bounds(px, py))
            .map(|(px, py)| (px as PixelCoord, py as PixelCoord))
            .collect()
    }
}

fn ensure_unlocked(canvas: &Canvas) -> EditResult<()> {
    if canvas.locked {
        return Err(EditError::Locked);
    }
    Ok(())
}

fn stroke(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    brush: Brush,
    idx: ColorIdx,
) -> EditResult<ChangedPixels> {
    match brush.kind {
        BrushKind::Solid => {
            ensure_unlocked(canvas)?;
            let mut changed = ChangedPixels::new();
            for (px, py) in brush.footprint(canvas, x, y) {
                canvas.put(px, py, idx, &mut changed);
            }
            Ok(changed)
        }
        BrushKind::Airbrush => airbrush(canvas, x, y, brush.size, idx),
    }
}

pub fn pen(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    brush: Brush,
    shade: ColorIdx,
) -> EditResult<ChangedPixels> {
    stroke(canvas, x, y, brush, shade)
}

pub fn eraser(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    brush: Brush,
    palette: &Palette,
) -> EditResult<ChangedPixels> {
    stroke(canvas, x, y, brush, palette.transparent())
}

pub fn eyedropper(canvas: &Canvas, x: i32, y: i32) -> EditResult<ColorIdx> {
    canvas.get(x, y)
}

// 4-connected fill from (x, y) using an explicit stack. Each pixel is queued
// at most once.
pub fn flood_fill(canvas: &mut Canvas, x: i32, y: i32, idx: ColorIdx) -> EditResult<ChangedPixels> {
    let target = canvas.get(x, y)?;
    ensure_unlocked(canvas)?;
    let mut changed = ChangedPixels::new();
    if target == idx {
        return Ok(changed);
    }

    let width = canvas.width();
    let height = canvas.height();
    let mut queued = vec![false; width as usize * height as usize];
    let (x, y) = (x as PixelCoord, y as PixelCoord);
    queued[y as usize * width as usize + x as usize] = true;
    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        canvas.put(cx, cy, idx, &mut changed);

        let neighbors = [
            (cx > 0).then(|| (cx - 1, cy)),
            (cx + 1 < width).then(|| (cx + 1, cy)),
            (cy > 0).then(|| (cx, cy - 1)),
            (cy + 1 < height).then(|| (cx, cy + 1)),
        ];
        for (nx, ny) in neighbors.into_iter().flatten() {
            let i = ny as usize * width as usize + nx as usize;
            if !queued[i] && canvas.at(nx, ny) == target {
                queued[i] = true;
                stack.push((nx, ny));
            }
        }
    }
    debug!("Flood fill at ({}, {}) changed {} pixels", x, y, changed.len());
    Ok(changed)
}

// Each pixel under a brush of radius `size` is set independently with
// probability AIRBRUSH_DENSITY. Not reproducible between calls.
pub fn airbrush(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    size: u8,
    idx: ColorIdx,
) -> EditResult<ChangedPixels> {
    ensure_unlocked(canvas)?;
    let brush = Brush::new(BrushKind::Airbrush, size)?;
    let mut rng = fastrand::Rng::new();
    let mut changed = ChangedPixels::new();
    for (px, py) in brush.footprint(canvas, x, y) {
        if rng.f32() < AIRBRUSH_DENSITY {
            canvas.put(px, py, idx, &mut changed);
        }
    }
    Ok(changed)
}

// Shade of `idx` moved `step` positions along its ramp, clamped at the ends.
// Indices outside any ramp are returned unchanged.
pub fn shifted_shade(palette: &Palette, idx: ColorIdx, step: i8) -> ColorIdx {
    match palette.ramp_of(idx) {
        Some((ramp, position)) => ramp.at(position as isize + step as isize),
        None => idx,
    }
}

// Ramp named `slot`. Specials such as "Transparent" exist but can't be a
// remap destination.
pub fn remap_destination<'a>(palette: &'a Palette, slot: &str) -> EditResult<&'a Ramp> {
    match palette.ramp(slot) {
        Some(ramp) => Ok(ramp),
        None if palette.has_slot(slot) => Err(EditError::NotARamp(slot.to_string())),
        None => Err(EditError::UnknownSlot(slot.to_string())),
    }
}

// Counterpart of `idx` in `dest`, keeping the brightness position. Indices
// outside any ramp take the nearest color of `dest`.
fn remapped_shade(palette: &Palette, idx: ColorIdx, dest: &Ramp) -> ColorIdx {
    if let Some((ramp, position)) = palette.ramp_of(idx) {
        let pos = scale_position(position, ramp.indices.len(), dest.indices.len());
        return dest.indices[pos];
    }
    let color = palette.color(idx);
    dest
        .indices
        .iter()
        .copied()
        .min_by_key(|&i| color_distance(palette.color(i), color))
        .unwrap_or_else(|| nearest_index(palette, color))
}

// Applies `f` to every selected pixel in `area` (the whole canvas when None).
fn recolor_selected(
    canvas: &mut Canvas,
    palette: &Palette,
    selection: &Selection,
    area: Option<Vec<(PixelCoord, PixelCoord)>>,
    mut f: impl FnMut(ColorIdx) -> EditResult<ColorIdx>,
) -> EditResult<ChangedPixels> {
    ensure_unlocked(canvas)?;
    let mut changed = ChangedPixels::new();
    let selected = selection.indices_for(palette);
    if selected.is_empty() {
        return Ok(changed);
    }
    let coords = match area {
        Some(area) => area,
        None => canvas.coords().collect(),
    };
    for (x, y) in coords {
        let idx = canvas.at(x, y);
        if selected.contains(&idx) {
            let to = f(idx)?;
            canvas.put(x, y, to, &mut changed);
        }
    }
    Ok(changed)
}

pub fn change_brightness(
    canvas: &mut Canvas,
    palette: &Palette,
    selection: &Selection,
    step: i8,
) -> EditResult<ChangedPixels> {
    recolor_selected(canvas, palette, selection, None, |idx| {
        Ok(shifted_shade(palette, idx, step))
    })
}

pub fn remap_to(
    canvas: &mut Canvas,
    palette: &Palette,
    selection: &Selection,
    slot: &str,
) -> EditResult<ChangedPixels> {
    let dest = remap_destination(palette, slot)?;
    let transparent = palette.transparent();
    recolor_selected(canvas, palette, selection, None, |idx| {
        if idx == transparent {
            return Ok(idx);
        }
        Ok(remapped_shade(palette, idx, dest))
    })
}

pub fn remove(
    canvas: &mut Canvas,
    palette: &Palette,
    selection: &Selection,
) -> EditResult<ChangedPixels> {
    let transparent = palette.transparent();
    recolor_selected(canvas, palette, selection, None, |_| Ok(transparent))
}

// Brightness tool: shift only the selected pixels under the brush.
pub fn brightness_brush(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    brush: Brush,
    palette: &Palette,
    selection: &Selection,
    step: i8,
) -> EditResult<ChangedPixels> {
    let area = brush.footprint(canvas, x, y);
    recolor_selected(canvas, palette, selection, Some(area), |idx| {
        Ok(shifted_shade(palette, idx, step))
    })
}

// Remap tool: remap only the selected pixels under the brush.
pub fn remap_brush(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    brush: Brush,
    palette: &Palette,
    selection: &Selection,
    slot: &str,
) -> EditResult<ChangedPixels> {
    let dest = remap_destination(palette, slot)?;
    let transparent = palette.transparent();
    let area = brush.footprint(canvas, x, y);
    recolor_selected(canvas, palette, selection, Some(area), |idx| {
        if idx == transparent {
            return Ok(idx);
        }
        Ok(remapped_shade(palette, idx, dest))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutcome {
    pub view: ViewId,
    pub result: EditResult<ChangedPixels>,
}

// Run `op` on every view of `source`, one canvas at a time. A failing view is
// reported and skipped; views already updated stay updated.
pub fn apply_to_all<S, F>(source: &mut S, mut op: F) -> Vec<ViewOutcome>
where
    S: CanvasSource + ?Sized,
    F: FnMut(&mut Canvas) -> EditResult<ChangedPixels>,
{
    let mut outcomes = vec![];
    for view in source.view_ids() {
        let result = match source.canvas_mut(view) {
            Some(canvas) => op(canvas),
            None => Err(EditError::MissingView(view)),
        };
        if let Err(e) = &result {
            warn!("Skipping view {}: {}", view, e);
        }
        outcomes.push(ViewOutcome { view, result });
    }
    outcomes
}

pub fn change_brightness_all<S: CanvasSource + ?Sized>(
    source: &mut S,
    palette: &Palette,
    selection: &Selection,
    step: i8,
) -> Vec<ViewOutcome> {
    apply_to_all(source, |c| change_brightness(c, palette, selection, step))
}

pub fn remap_to_all<S: CanvasSource + ?Sized>(
    source: &mut S,
    palette: &Palette,
    selection: &Selection,
    slot: &str,
) -> Vec<ViewOutcome> {
    apply_to_all(source, |c| remap_to(c, palette, selection, slot))
}

pub fn remove_all<S: CanvasSource + ?Sized>(
    source: &mut S,
    palette: &Palette,
    selection: &Selection,
) -> Vec<ViewOutcome> {
    apply_to_all(source, |c| remove(c, palette, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        object::SpriteObject,
        palette::{palette, PaletteVariant, FIRST_REMAP, TRANSPARENT},
    };

    fn modern() -> &'static Palette {
        palette(PaletteVariant::Modern)
    }

    fn select(slots: &[&str]) -> Selection {
        let mut sel = Selection::new(modern());
        sel.set_active_slots(slots, modern()).unwrap();
        sel
    }

    #[test]
    fn tool_names() {
        let names: Vec<&str> = Tool::ALL.iter().map(|t| t.display_name()).collect();
        assert_eq!(names, ["Draw", "Erase", "Eyedrop", "Brightn.", "Remap", "Fill"]);
        assert_eq!(BrushKind::Airbrush.display_name(), "Airbrush");
    }

    #[test]
    fn brush_size_is_validated() {
        assert_eq!(
            Brush::new(BrushKind::Solid, 0),
            Err(EditError::InvalidBrushSize(0))
        );
        assert!(Brush::new(BrushKind::Solid, MAX_BRUSH_SIZE + 1).is_err());
        assert_eq!(Brush::new(BrushKind::Solid, 3).unwrap().size(), 3);
    }

    #[test]
    fn footprint_shapes() {
        let c = Canvas::new(10, 10, 0);
        let one = Brush::new(BrushKind::Solid, 1).unwrap();
        assert_eq!(one.footprint(&c, 4, 4), vec![(4, 4)]);
        let two = Brush::new(BrushKind::Solid, 2).unwrap();
        assert_eq!(two.footprint(&c, 4, 4).len(), 5);
        // Clipped at the corner
        assert_eq!(two.footprint(&c, 0, 0).len(), 3);
        assert!(two.footprint(&c, -5, -5).is_empty());
    }

    #[test]
    fn strokes_at_extreme_origins_are_clipped() {
        let mut c = Canvas::new(8, 8, 0);
        let brush = Brush::new(BrushKind::Solid, 2).unwrap();
        for (x, y) in [(i32::MAX, 0), (0, i32::MAX), (i32::MIN, 0), (i32::MIN, i32::MIN)] {
            assert!(brush.footprint(&c, x, y).is_empty());
            assert!(pen(&mut c, x, y, brush, 5).unwrap().is_empty());
            assert!(eraser(&mut c, x, y, brush, modern()).unwrap().is_empty());
        }
        let airbrush = Brush::new(BrushKind::Airbrush, MAX_BRUSH_SIZE).unwrap();
        assert!(pen(&mut c, i32::MAX, i32::MAX, airbrush, 5).unwrap().is_empty());
        assert_eq!(c.count(0), 64);
    }

    #[test]
    fn pen_and_eraser() {
        let mut c = Canvas::new(5, 5, 0);
        let brush = Brush::new(BrushKind::Solid, 2).unwrap();
        let changed = pen(&mut c, 0, 2, brush, 42).unwrap();
        assert_eq!(changed.len(), 4);
        assert_eq!(c.count(42), 4);
        assert!(changed.contains(&(0, 1)));

        // Already painted pixels are not reported again
        let changed = pen(&mut c, 0, 2, brush, 42).unwrap();
        assert!(changed.is_empty());

        let changed = eraser(&mut c, 0, 2, Brush::default(), modern()).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(c.get(0, 2), Ok(modern().transparent()));
    }

    #[test]
    fn locked_canvas_is_untouched() {
        let mut c = Canvas::new(4, 4, 0);
        c.locked = true;
        assert_eq!(pen(&mut c, 1, 1, Brush::default(), 9), Err(EditError::Locked));
        assert_eq!(flood_fill(&mut c, 1, 1, 9), Err(EditError::Locked));
        assert_eq!(
            remove(&mut c, modern(), &select(&["Black"])),
            Err(EditError::Locked)
        );
        assert_eq!(c, {
            let mut l = Canvas::new(4, 4, 0);
            l.locked = true;
            l
        });
        // Reading is still allowed
        assert_eq!(eyedropper(&c, 1, 1), Ok(0));
    }

    #[test]
    fn eyedropper_reads_without_change() {
        let mut c = Canvas::new(3, 3, 0);
        c.set(2, 1, 77).unwrap();
        let before = c.clone();
        assert_eq!(eyedropper(&c, 2, 1), Ok(77));
        assert!(eyedropper(&c, 3, 1).is_err());
        assert_eq!(c, before);
    }

    #[test]
    fn flood_fill_whole_canvas() {
        let mut c = Canvas::new(8, 8, 5);
        let changed = flood_fill(&mut c, 0, 0, 9).unwrap();
        assert_eq!(changed.len(), 64);
        assert_eq!(c.count(9), 64);
    }

    #[test]
    fn flood_fill_same_index_is_noop() {
        let mut c = Canvas::new(8, 8, 0);
        let changed = flood_fill(&mut c, 3, 3, modern().transparent()).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn flood_fill_is_four_connected() {
        // Diagonal wall of 1s splits the canvas
        let mut c = Canvas::new(4, 4, 0);
        for i in 0..4 {
            c.set(i, i, 1).unwrap();
        }
        let changed = flood_fill(&mut c, 3, 0, 2).unwrap();
        assert_eq!(changed.len(), 6);
        assert_eq!(c.get(0, 3), Ok(0));
        assert_eq!(c.get(1, 0), Ok(2));
        assert!(flood_fill(&mut c, 4, 0, 2).is_err());
    }

    #[test]
    fn flood_fill_large_canvas() {
        let mut c = Canvas::new(400, 300, 0);
        let changed = flood_fill(&mut c, 200, 150, 3).unwrap();
        assert_eq!(changed.len(), 400 * 300);
    }

    #[test]
    fn airbrush_scatters() {
        let mut c = Canvas::new(41, 41, 0);
        let brush = Brush::new(BrushKind::Airbrush, MAX_BRUSH_SIZE).unwrap();
        let area = brush.footprint(&c, 20, 20);
        let changed = pen(&mut c, 20, 20, brush, 8).unwrap();
        assert!(!changed.is_empty());
        assert!(changed.len() < area.len());
        assert!(changed.iter().all(|p| area.contains(p)));
        assert!(airbrush(&mut c, 0, 0, 0, 8).is_err());
    }

    #[test]
    fn brightness_clamps_at_ramp_ends() {
        let pal = modern();
        let black = pal.ramp("Black").unwrap();
        let mut c = Canvas::new(2, 1, black.indices[1]);
        let sel = select(&["Black"]);
        for _ in 0..5 {
            change_brightness(&mut c, pal, &sel, -1).unwrap();
        }
        assert_eq!(c.count(black.indices[0]), 2);
        let changed = change_brightness(&mut c, pal, &sel, -1).unwrap();
        assert!(changed.is_empty());

        for _ in 0..20 {
            change_brightness(&mut c, pal, &sel, 1).unwrap();
        }
        assert_eq!(c.count(*black.indices.last().unwrap()), 2);
    }

    #[test]
    fn brightness_only_touches_selection() {
        let pal = modern();
        let red = pal.ramp("Red").unwrap();
        let blue = pal.ramp("Blue").unwrap();
        let mut c = Canvas::from_pixels(2, 1, vec![red.indices[3], blue.indices[3]]).unwrap();
        let changed = change_brightness(&mut c, pal, &select(&["Red"]), 1).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(c.pixels(), &[red.indices[4], blue.indices[3]]);
    }

    #[test]
    fn remap_preserves_position() {
        let pal = modern();
        let sand = pal.ramp("Sand").unwrap();
        let remap = pal.ramp(FIRST_REMAP).unwrap();
        let mut c = Canvas::from_pixels(3, 1, vec![sand.indices[2], sand.indices[9], 0]).unwrap();
        let changed = remap_to(&mut c, pal, &select(&["Sand", TRANSPARENT]), FIRST_REMAP).unwrap();
        assert_eq!(changed.len(), 2);
        assert_eq!(c.pixels(), &[remap.indices[2], remap.indices[9], 0]);
        assert_eq!(
            remap_to(&mut c, pal, &select(&["Sand"]), "Nope"),
            Err(EditError::UnknownSlot("Nope".to_string()))
        );
    }

    #[test]
    fn specials_are_not_remap_destinations() {
        let pal = modern();
        let sand = pal.ramp("Sand").unwrap();
        let mut c = Canvas::new(2, 2, sand.indices[4]);
        let brush = Brush::default();
        assert_eq!(
            remap_to(&mut c, pal, &select(&["Sand"]), TRANSPARENT),
            Err(EditError::NotARamp(TRANSPARENT.to_string()))
        );
        assert_eq!(
            remap_brush(&mut c, 0, 0, brush, pal, &select(&["Sand"]), TRANSPARENT),
            Err(EditError::NotARamp(TRANSPARENT.to_string()))
        );
        assert_eq!(c.count(sand.indices[4]), 4);
        assert_eq!(remap_destination(pal, "Sand").map(|r| r.name.as_str()), Ok("Sand"));
    }

    #[test]
    fn remove_single_pixel() {
        let pal = modern();
        let mut c = Canvas::new(8, 8, 0);
        c.set(3, 3, 5).unwrap();
        let mut sel = Selection::new(pal);
        sel.set_active_indices(&[5], pal);
        let changed = remove(&mut c, pal, &sel).unwrap();
        assert_eq!(changed.len(), 1);
        assert!(changed.contains(&(3, 3)));
        assert_eq!(c.count(pal.transparent()), 64);
    }

    #[test]
    fn empty_selection_is_noop() {
        let pal = modern();
        let mut c = Canvas::new(4, 4, 20);
        let sel = Selection::new(pal);
        assert!(remove(&mut c, pal, &sel).unwrap().is_empty());
        assert!(change_brightness(&mut c, pal, &sel, 1).unwrap().is_empty());
        assert_eq!(c.count(20), 16);
    }

    #[test]
    fn brush_scoped_tools() {
        let pal = modern();
        let grey = pal.ramp("Grey").unwrap();
        let mut c = Canvas::new(5, 5, grey.indices[4]);
        let brush = Brush::new(BrushKind::Solid, 1).unwrap();
        let changed = brightness_brush(&mut c, 2, 2, brush, pal, &select(&["Grey"]), 1).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(c.get(2, 2), Ok(grey.indices[5]));

        let changed =
            remap_brush(&mut c, 0, 0, brush, pal, &select(&["Grey"]), FIRST_REMAP).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(c.get(0, 0), Ok(pal.ramp(FIRST_REMAP).unwrap().indices[4]));
    }

    #[test]
    fn all_views_continue_past_failures() {
        let pal = modern();
        let black = pal.ramp("Black").unwrap().indices[3];
        let mut obj = SpriteObject::new("Tree", 4, (3, 3), black);
        obj.detach_canvas(1);
        obj.canvas_mut(2).unwrap().locked = true;

        let outcomes = remove_all(&mut obj, pal, &select(&["Black"]));
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].result.as_ref().map(|c| c.len()), Ok(9));
        assert_eq!(outcomes[1].result, Err(EditError::MissingView(1)));
        assert_eq!(outcomes[2].result, Err(EditError::Locked));
        assert_eq!(outcomes[3].result.as_ref().map(|c| c.len()), Ok(9));
        assert_eq!(obj.canvas(3).unwrap().count(pal.transparent()), 9);
        assert_eq!(obj.canvas(2).unwrap().count(black), 9);
    }

    #[test]
    fn all_views_brightness_and_remap() {
        let pal = modern();
        let sand = pal.ramp("Sand").unwrap();
        let mut obj = SpriteObject::new("Rock", 2, (2, 2), sand.indices[0]);
        let outcomes = change_brightness_all(&mut obj, pal, &select(&["Sand"]), 1);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        let outcomes = remap_to_all(&mut obj, pal, &select(&["Sand"]), FIRST_REMAP);
        assert!(outcomes.iter().all(|o| o.result.as_ref().map(|c| c.len()) == Ok(4)));
        let remap = pal.ramp(FIRST_REMAP).unwrap();
        assert_eq!(obj.canvas(1).unwrap().count(remap.indices[1]), 4);
    }
}
