use crate::{
    canvas::Canvas,
    common::{ChangedPixels, ColorIdx, ObjectIdx, PixelCoord, ViewId},
    error::EditError,
    object::{CanvasSource, SpriteObject},
    tools::ViewOutcome,
};

pub const MAX_UNDO: usize = 100;

// Previous indices of the pixels an operation changed in one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEdit {
    pub view: ViewId,
    pub pixels: Vec<(PixelCoord, PixelCoord, ColorIdx)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub object: ObjectIdx,
    pub edits: Vec<ViewEdit>,
}

pub fn record_view(before: &Canvas, view: ViewId, changed: &ChangedPixels) -> ViewEdit {
    let mut pixels: Vec<(PixelCoord, PixelCoord, ColorIdx)> = changed
        .iter()
        .map(|&(x, y)| (x, y, before.at(x, y)))
        .collect();
    pixels.sort_unstable();
    ViewEdit { view, pixels }
}

// Undo data for an operation, given the canvases as they were before it.
pub fn record(
    object: ObjectIdx,
    before: &[(ViewId, Canvas)],
    outcomes: &[ViewOutcome],
) -> Option<UndoEntry> {
    let edits: Vec<ViewEdit> = outcomes
        .iter()
        .filter_map(|o| {
            let changed = o.result.as_ref().ok()?;
            if changed.is_empty() {
                return None;
            }
            let (_, canvas) = before.iter().find(|(v, _)| *v == o.view)?;
            Some(record_view(canvas, o.view, changed))
        })
        .collect();
    if edits.is_empty() {
        return None;
    }
    Some(UndoEntry { object, edits })
}

// Write the recorded indices back, returning what changed per view.
pub fn restore(object: &mut SpriteObject, entry: &UndoEntry) -> Vec<ViewOutcome> {
    entry
        .edits
        .iter()
        .map(|edit| {
            let result = match object.canvas_mut(edit.view) {
                Some(canvas) => {
                    let mut changed = ChangedPixels::new();
                    for &(x, y, idx) in &edit.pixels {
                        if canvas.in_bounds(x as i32, y as i32) {
                            canvas.put(x, y, idx, &mut changed);
                        }
                    }
                    Ok(changed)
                }
                None => Err(EditError::MissingView(edit.view)),
            };
            ViewOutcome {
                view: edit.view,
                result,
            }
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

impl UndoLog {
    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_UNDO {
            self.entries.remove(0);
        }
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // Drop the entries of a closed object and shift the indices of the
    // objects after it.
    pub fn forget_object(&mut self, object: ObjectIdx) {
        self.entries.retain(|e| e.object != object);
        for e in &mut self.entries {
            if e.object > object {
                e.object -= 1;
            }
        }
    }
}
