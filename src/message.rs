use crate::{
    common::{ColorIdx, ObjectIdx, ViewId},
    palette::PaletteVariant,
    tools::{BrushKind, Tool},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    SelectTool(Tool),
    SelectBrush(BrushKind),
    SetBrushSize(u8),
    SelectShade(ColorIdx),
    SetActiveSlots(Vec<String>),
    SetActiveIndices(Vec<ColorIdx>),
    SetRemapTarget(String),
    // `inverse` darkens with the brightness tool
    ClickPixel { x: i32, y: i32, inverse: bool },
    ChangeBrightness { step: i8, all_views: bool },
    RemapTo { slot: String, all_views: bool },
    RemoveColor { all_views: bool },
    SetPalette(PaletteVariant),
    SaveSettings,
    NewObject,
    CloseObject(ObjectIdx),
    SelectObject(ObjectIdx),
    SelectView(ViewId),
    LockObject(bool),
    ShowObject(bool),
    Undo,
}
