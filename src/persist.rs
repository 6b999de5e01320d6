use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Serializer;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::{common::ColorRGB, palette::PaletteVariant};

// Which color marks transparent pixels when importing RGB sprites.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum ImportColorMode {
    #[default]
    Black = 0,
    White = 1,
    UpperLeftPixel = 2,
    Custom = 3,
}

impl ImportColorMode {
    // None means the color is taken from the upper-left pixel of the image.
    pub fn color(self, custom: ColorRGB) -> Option<ColorRGB> {
        match self {
            ImportColorMode::Black => Some([0, 0, 0]),
            ImportColorMode::White => Some([255, 255, 255]),
            ImportColorMode::UpperLeftPixel => None,
            ImportColorMode::Custom => Some(custom),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub palette: PaletteVariant,
    pub transparency_color: ImportColorMode,
    pub import_color: ColorRGB,
    pub author: String,
    pub author_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            modified: false,
            palette: PaletteVariant::Modern,
            transparency_color: ImportColorMode::Black,
            import_color: [0, 0, 0],
            author: String::new(),
            author_id: String::new(),
        }
    }
}

impl Settings {
    pub fn transparency(&self) -> Option<ColorRGB> {
        self.transparency_color.color(self.import_color)
    }
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn get_settings_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "scenery_editor")
        .context("Unable to open settings directory.")?;
    let config_dir = project_dirs.config_dir();
    Ok(config_dir.join("config.json"))
}

// Missing settings are not an error: the defaults are used until the first
// save.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        info!("No settings at {}, using defaults.", path.display());
        return Ok(Settings::default());
    }
    load_json(path).with_context(|| format!("Invalid settings file {}", path.display()))
}

pub fn save_settings(path: &Path, settings: &mut Settings) -> Result<()> {
    if settings.modified {
        save_json(path, settings)?;
        settings.modified = false;
    }
    Ok(())
}
