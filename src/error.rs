use thiserror::Error;

use crate::common::ViewId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },

    #[error("unknown palette slot: {0}")]
    UnknownSlot(String),

    #[error("palette slot {0} is not a color ramp")]
    NotARamp(String),

    #[error("canvas is locked")]
    Locked,

    #[error("view {0} has no canvas")]
    MissingView(ViewId),

    #[error("no object is open")]
    NoActiveObject,

    #[error("invalid brush size {0}")]
    InvalidBrushSize(u8),

    #[error("unable to save settings: {0}")]
    Settings(String),
}

pub type EditResult<T> = Result<T, EditError>;
