use log::{error, info, warn};

use crate::{
    canvas::Canvas,
    common::{ChangedPixels, ColorIdx, ObjectIdx, ViewId},
    error::{EditError, EditResult},
    message::Message,
    object::{CanvasSource, SpriteObject, DEFAULT_SPRITE_SIZE, DEFAULT_VIEW_COUNT},
    palette::{self, PaletteVariant, FIRST_REMAP},
    persist,
    remap::{remap_all, remap_index},
    state::EditorState,
    tools::{self, apply_to_all, Brush, Tool, ViewOutcome},
    undo,
};

// What a message changed, for the presentation layer to redraw.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Update {
    pub object: Option<ObjectIdx>,
    pub outcomes: Vec<ViewOutcome>,
    pub picked: Option<ColorIdx>,
    pub redraw_all: bool,
}

impl Update {
    fn redraw_all() -> Self {
        Update {
            redraw_all: true,
            ..Update::default()
        }
    }

    pub fn changed_pixels(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|c| c.len())
            .sum()
    }
}

pub fn update(state: &mut EditorState, message: Message) -> EditResult<Update> {
    match message {
        Message::SelectTool(tool) => {
            state.tool = tool;
        }
        Message::SelectBrush(kind) => {
            state.brush.kind = kind;
        }
        Message::SetBrushSize(size) => {
            state.brush = Brush::new(state.brush.kind, size)?;
        }
        Message::SelectShade(idx) => {
            state.active_shade = idx;
        }
        Message::SetActiveSlots(names) => {
            state.selection.set_active_slots(names.as_slice(), state.palette)?;
        }
        Message::SetActiveIndices(indices) => {
            state.selection.set_active_indices(&indices, state.palette);
        }
        Message::SetRemapTarget(slot) => {
            tools::remap_destination(state.palette, &slot)?;
            state.remap_target = slot;
        }
        Message::ClickPixel { x, y, inverse } => return click_pixel(state, x, y, inverse),
        Message::ChangeBrightness { step, all_views } => {
            let palette = state.palette;
            let selection = state.selection.clone();
            return apply_edit(state, all_views, |c| {
                tools::change_brightness(c, palette, &selection, step)
            });
        }
        Message::RemapTo { slot, all_views } => {
            tools::remap_destination(state.palette, &slot)?;
            let palette = state.palette;
            let selection = state.selection.clone();
            return apply_edit(state, all_views, |c| {
                tools::remap_to(c, palette, &selection, &slot)
            });
        }
        Message::RemoveColor { all_views } => {
            let palette = state.palette;
            let selection = state.selection.clone();
            return apply_edit(state, all_views, |c| tools::remove(c, palette, &selection));
        }
        Message::SetPalette(variant) => return switch_palette(state, variant),
        Message::SaveSettings => {
            if let Some(path) = &state.settings_path {
                if let Err(e) = persist::save_settings(path, &mut state.settings) {
                    error!("Error saving settings: {}\n{}", e, e.backtrace());
                    return Err(EditError::Settings(format!("{e:#}")));
                }
            }
        }
        Message::NewObject => {
            new_object(state);
            return Ok(Update::redraw_all());
        }
        Message::CloseObject(idx) => {
            close_object(state, idx)?;
            return Ok(Update::redraw_all());
        }
        Message::SelectObject(idx) => {
            if idx >= state.objects.len() {
                return Err(EditError::NoActiveObject);
            }
            state.object_idx = Some(idx);
            state.view_id = 0;
            return Ok(Update::redraw_all());
        }
        Message::SelectView(view) => {
            if !state.current_object()?.view_ids().contains(&view) {
                return Err(EditError::MissingView(view));
            }
            state.view_id = view;
            return Ok(Update::redraw_all());
        }
        Message::LockObject(locked) => {
            state.current_object_mut()?.set_locked(locked);
        }
        Message::ShowObject(visible) => {
            state.current_object_mut()?.set_visible(visible);
            return Ok(Update::redraw_all());
        }
        Message::Undo => return undo_last(state),
    }
    Ok(Update::default())
}

fn click_pixel(state: &mut EditorState, x: i32, y: i32, inverse: bool) -> EditResult<Update> {
    let brush = state.brush;
    let palette = state.palette;
    let shade = state.active_shade;
    match state.tool {
        Tool::Eyedropper => {
            let idx = tools::eyedropper(state.current_canvas()?, x, y)?;
            state.active_shade = idx;
            Ok(Update {
                object: state.object_idx,
                picked: Some(idx),
                ..Update::default()
            })
        }
        Tool::Pen => apply_edit(state, false, |c| tools::pen(c, x, y, brush, shade)),
        Tool::Eraser => apply_edit(state, false, |c| tools::eraser(c, x, y, brush, palette)),
        Tool::Flood => apply_edit(state, false, |c| tools::flood_fill(c, x, y, shade)),
        Tool::Brightness => {
            let step = if inverse { -1 } else { 1 };
            let selection = state.selection.clone();
            apply_edit(state, false, |c| {
                tools::brightness_brush(c, x, y, brush, palette, &selection, step)
            })
        }
        Tool::Remap => {
            let selection = state.selection.clone();
            let target = state.remap_target.clone();
            apply_edit(state, false, |c| {
                tools::remap_brush(c, x, y, brush, palette, &selection, &target)
            })
        }
    }
}

// Run `op` on the current view, or on every view of the current object, and
// record undo data for whatever changed.
fn apply_edit<F>(state: &mut EditorState, all_views: bool, mut op: F) -> EditResult<Update>
where
    F: FnMut(&mut Canvas) -> EditResult<ChangedPixels>,
{
    let object_idx = state.object_idx.ok_or(EditError::NoActiveObject)?;
    let view_id = state.view_id;
    let object = state.current_object_mut()?;

    let before: Vec<(ViewId, Canvas)> = object
        .views
        .iter()
        .filter(|v| all_views || v.id == view_id)
        .filter_map(|v| v.canvas.clone().map(|c| (v.id, c)))
        .collect();

    let outcomes = if all_views {
        apply_to_all(object, op)
    } else {
        let canvas = object
            .canvas_mut(view_id)
            .ok_or(EditError::MissingView(view_id))?;
        let changed = op(canvas)?;
        vec![ViewOutcome {
            view: view_id,
            result: Ok(changed),
        }]
    };

    if let Some(entry) = undo::record(object_idx, &before, &outcomes) {
        state.undo.push(entry);
    }
    Ok(Update {
        object: Some(object_idx),
        outcomes,
        ..Update::default()
    })
}

fn switch_palette(state: &mut EditorState, variant: PaletteVariant) -> EditResult<Update> {
    let from = state.palette;
    let to = palette::palette(variant);
    if from.variant() == to.variant() {
        return Ok(Update::default());
    }
    info!(
        "Switching from the {} to the {} palette",
        from.variant().name(),
        to.variant().name()
    );

    for object in &state.objects {
        for view in object.views.iter().filter(|v| v.canvas.is_none()) {
            warn!("{}: view {} has no canvas to remap", object.name, view.id);
        }
    }
    remap_all(
        state.objects.iter_mut().flat_map(|o| o.canvases_mut()),
        from,
        to,
    );

    state.palette = to;
    state.selection.rebind(to);
    state.active_shade = remap_index(state.active_shade, from, to);
    if to.ramp(&state.remap_target).is_none() {
        state.remap_target = FIRST_REMAP.to_string();
    }
    state.settings.palette = variant;
    state.settings.modified = true;
    // Recorded indices belong to the old palette.
    state.undo.clear();
    Ok(Update::redraw_all())
}

fn new_object(state: &mut EditorState) {
    let name = format!("Object {}", state.new_object_count);
    state.new_object_count += 1;

    // Objects start out in the modern palette.
    let modern = palette::palette(PaletteVariant::Modern);
    let mut object = SpriteObject::new(
        &name,
        DEFAULT_VIEW_COUNT,
        DEFAULT_SPRITE_SIZE,
        modern.transparent(),
    );
    if state.palette.variant() != PaletteVariant::Modern {
        remap_all(object.canvases_mut(), modern, state.palette);
    }
    info!("Created {}", name);
    state.objects.push(object);
    state.object_idx = Some(state.objects.len() - 1);
    state.view_id = 0;
}

fn close_object(state: &mut EditorState, idx: ObjectIdx) -> EditResult<()> {
    if idx >= state.objects.len() {
        return Err(EditError::NoActiveObject);
    }
    let object = state.objects.remove(idx);
    info!("Closed {}", object.name);
    state.undo.forget_object(idx);
    state.object_idx = match state.object_idx {
        _ if state.objects.is_empty() => None,
        Some(current) if current > idx => Some(current - 1),
        Some(current) if current == idx => Some(idx.min(state.objects.len() - 1)),
        other => other,
    };
    state.view_id = 0;
    Ok(())
}

fn undo_last(state: &mut EditorState) -> EditResult<Update> {
    let Some(entry) = state.undo.pop() else {
        info!("Nothing to undo.");
        return Ok(Update::default());
    };
    let object = state
        .objects
        .get_mut(entry.object)
        .ok_or(EditError::NoActiveObject)?;
    let outcomes = undo::restore(object, &entry);
    Ok(Update {
        object: Some(entry.object),
        outcomes,
        ..Update::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        palette::{THIRD_REMAP, TRANSPARENT},
        persist::Settings,
        tools::BrushKind,
    };

    fn state_with_object() -> EditorState {
        let mut state = EditorState::new(Settings::default());
        update(&mut state, Message::NewObject).unwrap();
        state
    }

    fn click(state: &mut EditorState, x: i32, y: i32) -> EditResult<Update> {
        update(
            state,
            Message::ClickPixel {
                x,
                y,
                inverse: false,
            },
        )
    }

    #[test]
    fn tool_settings() {
        let mut state = EditorState::new(Settings::default());
        update(&mut state, Message::SelectTool(Tool::Flood)).unwrap();
        update(&mut state, Message::SelectBrush(BrushKind::Airbrush)).unwrap();
        update(&mut state, Message::SetBrushSize(4)).unwrap();
        assert_eq!(state.tool, Tool::Flood);
        assert_eq!(state.brush.kind, BrushKind::Airbrush);
        assert_eq!(state.brush.size(), 4);
        assert_eq!(
            update(&mut state, Message::SetBrushSize(0)),
            Err(EditError::InvalidBrushSize(0))
        );
        assert_eq!(
            update(&mut state, Message::SetRemapTarget("Beige".to_string())),
            Err(EditError::UnknownSlot("Beige".to_string()))
        );
        assert_eq!(
            update(&mut state, Message::SetRemapTarget(TRANSPARENT.to_string())),
            Err(EditError::NotARamp(TRANSPARENT.to_string()))
        );
        assert_eq!(state.remap_target, FIRST_REMAP);
    }

    #[test]
    fn click_far_outside_the_canvas() {
        let mut state = state_with_object();
        update(&mut state, Message::SetBrushSize(3)).unwrap();
        assert_eq!(click(&mut state, i32::MAX, i32::MIN).unwrap().changed_pixels(), 0);
        assert!(state.undo.is_empty());
    }

    #[test]
    fn settings_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();
        let mut state = EditorState::new(Settings::default());
        state.settings_path = Some(blocker.join("config.json"));
        state.settings.modified = true;
        assert!(matches!(
            update(&mut state, Message::SaveSettings),
            Err(EditError::Settings(_))
        ));
        assert!(state.settings.modified);

        let path = dir.path().join("config.json");
        state.settings_path = Some(path.clone());
        update(&mut state, Message::SaveSettings).unwrap();
        assert!(path.exists());
        assert!(!state.settings.modified);
    }

    #[test]
    fn drawing_needs_an_object() {
        let mut state = EditorState::new(Settings::default());
        assert_eq!(click(&mut state, 0, 0), Err(EditError::NoActiveObject));
    }

    #[test]
    fn pen_eyedropper_and_undo() {
        let mut state = state_with_object();
        update(&mut state, Message::SelectShade(40)).unwrap();
        let result = click(&mut state, 3, 4).unwrap();
        assert_eq!(result.changed_pixels(), 1);
        assert_eq!(state.current_canvas().unwrap().get(3, 4), Ok(40));

        update(&mut state, Message::SelectShade(1)).unwrap();
        update(&mut state, Message::SelectTool(Tool::Eyedropper)).unwrap();
        let result = click(&mut state, 3, 4).unwrap();
        assert_eq!(result.picked, Some(40));
        assert_eq!(state.active_shade, 40);

        let result = update(&mut state, Message::Undo).unwrap();
        assert_eq!(result.changed_pixels(), 1);
        assert_eq!(state.current_canvas().unwrap().get(3, 4), Ok(0));
        assert_eq!(update(&mut state, Message::Undo).unwrap(), Update::default());
    }

    #[test]
    fn out_of_range_click() {
        let mut state = state_with_object();
        update(&mut state, Message::SelectTool(Tool::Flood)).unwrap();
        assert!(matches!(
            click(&mut state, 64, 0),
            Err(EditError::OutOfRange { .. })
        ));
        // Pen strokes are clipped instead
        update(&mut state, Message::SelectTool(Tool::Pen)).unwrap();
        assert_eq!(click(&mut state, -3, 0).unwrap().changed_pixels(), 0);
    }

    #[test]
    fn color_operations_on_all_views() {
        let mut state = state_with_object();
        let sand = state.palette.ramp("Sand").unwrap().indices.clone();
        for c in state.objects[0].canvases_mut() {
            c.fill(sand[3]);
        }
        update(&mut state, Message::SetActiveSlots(vec!["Sand".to_string()])).unwrap();

        let result = update(
            &mut state,
            Message::ChangeBrightness {
                step: -1,
                all_views: true,
            },
        )
        .unwrap();
        assert_eq!(result.outcomes.len(), DEFAULT_VIEW_COUNT as usize);
        assert_eq!(state.objects[0].canvas(3).unwrap().count(sand[2]), 64 * 64);

        // Only the current view
        let result = update(&mut state, Message::RemoveColor { all_views: false }).unwrap();
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(state.objects[0].canvas(0).unwrap().count(0), 64 * 64);
        assert_eq!(state.objects[0].canvas(1).unwrap().count(sand[2]), 64 * 64);

        update(&mut state, Message::Undo).unwrap();
        assert_eq!(state.objects[0].canvas(0).unwrap().count(sand[2]), 64 * 64);
    }

    #[test]
    fn remap_message() {
        let mut state = state_with_object();
        let pal = state.palette;
        let grey = pal.ramp("Grey").unwrap().indices.clone();
        state.current_canvas_mut().unwrap().set(1, 1, grey[7]).unwrap();
        update(&mut state, Message::SetActiveSlots(vec!["Grey".to_string()])).unwrap();
        let result = update(
            &mut state,
            Message::RemapTo {
                slot: FIRST_REMAP.to_string(),
                all_views: false,
            },
        )
        .unwrap();
        assert_eq!(result.changed_pixels(), 1);
        assert_eq!(
            state.current_canvas().unwrap().get(1, 1),
            Ok(pal.ramp(FIRST_REMAP).unwrap().indices[7])
        );
    }

    #[test]
    fn brightness_and_remap_tools() {
        let mut state = state_with_object();
        let pal = state.palette;
        let red = pal.ramp("Red").unwrap().indices.clone();
        state.current_canvas_mut().unwrap().fill(red[5]);
        update(&mut state, Message::SetActiveSlots(vec!["Red".to_string()])).unwrap();
        update(&mut state, Message::SelectTool(Tool::Brightness)).unwrap();
        update(
            &mut state,
            Message::ClickPixel {
                x: 0,
                y: 0,
                inverse: true,
            },
        )
        .unwrap();
        assert_eq!(state.current_canvas().unwrap().get(0, 0), Ok(red[4]));

        update(&mut state, Message::SetRemapTarget("Teal".to_string())).unwrap();
        update(&mut state, Message::SelectTool(Tool::Remap)).unwrap();
        click(&mut state, 5, 5).unwrap();
        let teal = pal.ramp("Teal").unwrap();
        assert_eq!(state.current_canvas().unwrap().get(5, 5), Ok(teal.indices[5]));
    }

    #[test]
    fn locked_object_rejects_edits() {
        let mut state = state_with_object();
        update(&mut state, Message::LockObject(true)).unwrap();
        assert_eq!(click(&mut state, 1, 1), Err(EditError::Locked));
        // Visibility is independent of the lock
        update(&mut state, Message::ShowObject(false)).unwrap();
        assert!(!state.current_canvas().unwrap().visible);
        update(&mut state, Message::SetActiveSlots(vec![TRANSPARENT.to_string()])).unwrap();
        let result = update(&mut state, Message::RemoveColor { all_views: true }).unwrap();
        assert!(result
            .outcomes
            .iter()
            .all(|o| o.result == Err(EditError::Locked)));
    }

    #[test]
    fn palette_switch_remaps_everything() {
        let mut state = state_with_object();
        update(&mut state, Message::NewObject).unwrap();
        let modern = state.palette;
        let legacy = palette::palette(PaletteVariant::Legacy);
        let remap = modern.ramp(FIRST_REMAP).unwrap().indices.clone();
        for object in &mut state.objects {
            for c in object.canvases_mut() {
                c.set(2, 2, remap[6]).unwrap();
            }
        }
        update(
            &mut state,
            Message::SetActiveSlots(vec![FIRST_REMAP.to_string(), THIRD_REMAP.to_string()]),
        )
        .unwrap();
        update(&mut state, Message::SetRemapTarget(THIRD_REMAP.to_string())).unwrap();
        update(&mut state, Message::SelectShade(remap[6])).unwrap();
        click(&mut state, 0, 0).unwrap();
        assert_eq!(state.undo.len(), 1);

        let result = update(&mut state, Message::SetPalette(PaletteVariant::Legacy)).unwrap();
        assert!(result.redraw_all);
        assert_eq!(state.palette.variant(), PaletteVariant::Legacy);
        assert_eq!(state.settings.palette, PaletteVariant::Legacy);
        assert!(state.settings.modified);
        assert!(state.undo.is_empty());
        assert_eq!(state.selection.slots(), &[FIRST_REMAP.to_string()]);
        assert_eq!(state.remap_target, FIRST_REMAP);
        let legacy_remap = legacy.ramp(FIRST_REMAP).unwrap().indices[6];
        assert_eq!(state.active_shade, legacy_remap);
        for object in &state.objects {
            for view in &object.views {
                assert_eq!(view.canvas.as_ref().unwrap().get(2, 2), Ok(legacy_remap));
            }
        }

        // Switching to the active palette does nothing
        let result = update(&mut state, Message::SetPalette(PaletteVariant::Legacy)).unwrap();
        assert_eq!(result, Update::default());
    }

    #[test]
    fn objects_open_and_close() {
        let mut state = state_with_object();
        update(&mut state, Message::NewObject).unwrap();
        update(&mut state, Message::NewObject).unwrap();
        assert_eq!(state.objects[2].name, "Object 3");
        assert_eq!(state.object_idx, Some(2));

        update(&mut state, Message::SelectObject(1)).unwrap();
        update(&mut state, Message::SelectView(3)).unwrap();
        assert_eq!(
            update(&mut state, Message::SelectView(9)),
            Err(EditError::MissingView(9))
        );
        click(&mut state, 0, 0).unwrap();

        update(&mut state, Message::CloseObject(0)).unwrap();
        assert_eq!(state.object_idx, Some(0));
        assert_eq!(state.objects[0].name, "Object 2");
        update(&mut state, Message::CloseObject(1)).unwrap();
        update(&mut state, Message::CloseObject(0)).unwrap();
        assert_eq!(state.object_idx, None);
        assert_eq!(
            update(&mut state, Message::CloseObject(0)),
            Err(EditError::NoActiveObject)
        );
    }

    #[test]
    fn new_objects_in_legacy_palette() {
        let settings = Settings {
            palette: PaletteVariant::Legacy,
            ..Settings::default()
        };
        let mut state = EditorState::new(settings);
        update(&mut state, Message::NewObject).unwrap();
        assert_eq!(state.current_canvas().unwrap().count(0), 64 * 64);
    }
}
