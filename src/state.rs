use std::path::PathBuf;

use anyhow::Result;

use crate::{
    canvas::Canvas,
    common::{ColorIdx, ObjectIdx, ViewId},
    error::{EditError, EditResult},
    object::{CanvasSource, SpriteObject},
    palette::{self, Palette, FIRST_REMAP},
    persist::{self, Settings},
    selection::Selection,
    tools::{Brush, Tool},
    undo::UndoLog,
};

// Editing context passed to every operation in place of global GUI state.
pub struct EditorState {
    pub settings_path: Option<PathBuf>,
    pub settings: Settings,
    pub palette: &'static Palette,

    // Open objects
    pub objects: Vec<SpriteObject>,
    pub object_idx: Option<ObjectIdx>,
    pub view_id: ViewId,
    pub new_object_count: usize,

    // Tool state
    pub tool: Tool,
    pub brush: Brush,
    pub active_shade: ColorIdx,
    pub selection: Selection,
    pub remap_target: String,

    pub undo: UndoLog,
}

fn default_shade(palette: &Palette) -> ColorIdx {
    palette
        .ramp(FIRST_REMAP)
        .map_or(palette.transparent(), |r| r.indices[r.indices.len() / 2])
}

impl EditorState {
    pub fn new(settings: Settings) -> Self {
        let palette = palette::palette(settings.palette);
        EditorState {
            settings_path: None,
            settings,
            palette,
            objects: vec![],
            object_idx: None,
            view_id: 0,
            new_object_count: 1,
            tool: Tool::Pen,
            brush: Brush::default(),
            active_shade: default_shade(palette),
            selection: Selection::new(palette),
            remap_target: FIRST_REMAP.to_string(),
            undo: UndoLog::default(),
        }
    }

    pub fn current_object(&self) -> EditResult<&SpriteObject> {
        self.object_idx
            .and_then(|i| self.objects.get(i))
            .ok_or(EditError::NoActiveObject)
    }

    pub fn current_object_mut(&mut self) -> EditResult<&mut SpriteObject> {
        self.object_idx
            .and_then(|i| self.objects.get_mut(i))
            .ok_or(EditError::NoActiveObject)
    }

    pub fn current_canvas(&self) -> EditResult<&Canvas> {
        let view = self.view_id;
        self.current_object()?
            .canvas(view)
            .ok_or(EditError::MissingView(view))
    }

    pub fn current_canvas_mut(&mut self) -> EditResult<&mut Canvas> {
        let view = self.view_id;
        self.current_object_mut()?
            .canvas_mut(view)
            .ok_or(EditError::MissingView(view))
    }
}

pub fn get_initial_state() -> Result<EditorState> {
    let settings_path = persist::get_settings_path()?;
    let settings = persist::load_settings(&settings_path)?;
    let mut state = EditorState::new(settings);
    state.settings_path = Some(settings_path);
    Ok(state)
}
