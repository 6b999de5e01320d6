use crate::{
    canvas::Canvas,
    common::{ColorIdx, PixelCoord, ViewId},
};

pub const DEFAULT_VIEW_COUNT: ViewId = 4; // One view per rotation
pub const DEFAULT_SPRITE_SIZE: (PixelCoord, PixelCoord) = (64, 64);

// Collaborator owning the canvases of one logical object.
pub trait CanvasSource {
    fn view_ids(&self) -> Vec<ViewId>;
    fn canvas_mut(&mut self, view: ViewId) -> Option<&mut Canvas>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteView {
    pub id: ViewId,
    pub canvas: Option<Canvas>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteObject {
    pub name: String,
    pub views: Vec<SpriteView>,
}

impl SpriteObject {
    pub fn new(
        name: &str,
        view_count: ViewId,
        size: (PixelCoord, PixelCoord),
        fill: ColorIdx,
    ) -> Self {
        let views = (0..view_count)
            .map(|id| SpriteView {
                id,
                canvas: Some(Canvas::new(size.0, size.1, fill)),
            })
            .collect();
        SpriteObject {
            name: name.to_string(),
            views,
        }
    }

    pub fn canvas(&self, view: ViewId) -> Option<&Canvas> {
        self.views
            .iter()
            .find(|v| v.id == view)
            .and_then(|v| v.canvas.as_ref())
    }

    pub fn canvases_mut(&mut self) -> impl Iterator<Item = &mut Canvas> {
        self.views.iter_mut().filter_map(|v| v.canvas.as_mut())
    }

    pub fn detach_canvas(&mut self, view: ViewId) -> Option<Canvas> {
        self.views
            .iter_mut()
            .find(|v| v.id == view)
            .and_then(|v| v.canvas.take())
    }

    pub fn set_locked(&mut self, locked: bool) {
        for c in self.canvases_mut() {
            c.locked = locked;
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        for c in self.canvases_mut() {
            c.visible = visible;
        }
    }
}

impl CanvasSource for SpriteObject {
    fn view_ids(&self) -> Vec<ViewId> {
        self.views.iter().map(|v| v.id).collect()
    }

    fn canvas_mut(&mut self, view: ViewId) -> Option<&mut Canvas> {
        self.views
            .iter_mut()
            .find(|v| v.id == view)
            .and_then(|v| v.canvas.as_mut())
    }
}
