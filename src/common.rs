use hashbrown::HashSet;

pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorIdx = u8; // Index into the 256-entry game palette
pub type ColorRGB = [ColorValue; 3];
pub type PixelCoord = u16; // Pixel coordinate within a canvas
pub type ViewId = u8; // Sprite view (rotation) of an object
pub type ObjectIdx = usize; // Index into the open object list

// Coordinates of pixels whose index was changed by an operation
pub type ChangedPixels = HashSet<(PixelCoord, PixelCoord)>;

pub const PALETTE_SIZE: usize = 256;
pub const MAX_BRUSH_SIZE: u8 = 20;
