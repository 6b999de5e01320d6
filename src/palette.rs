// Fixed game palettes: 256 colors plus the named slots (ramps and specials)
// that give the indices their meaning.
use once_cell::sync::Lazy;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::{
    common::{ColorIdx, ColorRGB, PALETTE_SIZE},
    helpers::lerp_color,
};

pub const TRANSPARENT: &str = "Transparent";
pub const FIRST_REMAP: &str = "1st Remap";
pub const SECOND_REMAP: &str = "2nd Remap";
pub const THIRD_REMAP: &str = "3rd Remap";

pub const TRANSPARENT_IDX: ColorIdx = 0;
pub const RAMP_LEN: usize = 12;

const PRIMARY_RAMPS_START: usize = 10;
const REMAP_RAMPS_START: usize = 202;
const EXTRA_COLORS_START: usize = 238;

// Primary color ramps, darkest and lightest shade.
const PRIMARY_RAMPS: [(&str, ColorRGB, ColorRGB); 16] = [
    ("Black", [8, 8, 8], [112, 112, 112]),
    ("Grey", [40, 44, 48], [200, 204, 208]),
    ("White", [120, 120, 120], [255, 255, 255]),
    ("Purple", [40, 8, 56], [216, 168, 236]),
    ("Blue", [8, 16, 80], [140, 168, 255]),
    ("Light Blue", [24, 56, 104], [192, 228, 255]),
    ("Teal", [0, 48, 48], [140, 232, 220]),
    ("Green", [0, 40, 8], [132, 236, 124]),
    ("Olive Green", [32, 40, 0], [212, 220, 120]),
    ("Grass Green", [16, 48, 0], [168, 220, 92]),
    ("Sand", [72, 56, 24], [252, 236, 188]),
    ("Yellow", [72, 56, 0], [255, 248, 128]),
    ("Orange", [88, 32, 0], [255, 196, 112]),
    ("Bark", [40, 20, 8], [208, 160, 112]),
    ("Bordeaux Red", [48, 0, 8], [228, 128, 140]),
    ("Red", [72, 0, 0], [255, 148, 132]),
];

const MODERN_REMAPS: [(&str, ColorRGB, ColorRGB); 3] = [
    (FIRST_REMAP, [64, 0, 48], [255, 176, 232]),
    (SECOND_REMAP, [56, 24, 0], [255, 200, 120]),
    (THIRD_REMAP, [0, 40, 56], [168, 236, 255]),
];

// Legacy objects use a green primary remap and know no 3rd remap; the
// indices the 3rd remap occupies in the modern table are plain colors here.
const LEGACY_REMAPS: [(&str, ColorRGB, ColorRGB); 2] = [
    (FIRST_REMAP, [0, 48, 0], [168, 255, 140]),
    (SECOND_REMAP, [56, 24, 0], [255, 200, 120]),
];
const LEGACY_UNSLOTTED: (ColorRGB, ColorRGB) = ([0, 40, 56], [168, 236, 255]);

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum PaletteVariant {
    #[default]
    Modern = 0,
    Legacy = 1,
}

impl PaletteVariant {
    pub fn name(self) -> &'static str {
        match self {
            PaletteVariant::Modern => "modern",
            PaletteVariant::Legacy => "legacy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp {
    pub name: String,
    // Ordered darkest to lightest
    pub indices: Vec<ColorIdx>,
}

impl Ramp {
    pub fn position(&self, idx: ColorIdx) -> Option<usize> {
        self.indices.iter().position(|&i| i == idx)
    }

    // Index at `position`, or the nearest end of the ramp.
    pub fn at(&self, position: isize) -> ColorIdx {
        let last = self.indices.len() as isize - 1;
        self.indices[position.clamp(0, last) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    Ramp { name: &'a str, position: usize },
    Special(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotRef {
    Ramp(usize, usize),
    Special(usize),
}

#[derive(Debug)]
pub struct Palette {
    variant: PaletteVariant,
    colors: [ColorRGB; PALETTE_SIZE],
    ramps: Vec<Ramp>,
    specials: Vec<(String, ColorIdx)>,
    slot_refs: [Option<SlotRef>; PALETTE_SIZE],
}

static MODERN: Lazy<Palette> = Lazy::new(|| Palette::build(PaletteVariant::Modern));
static LEGACY: Lazy<Palette> = Lazy::new(|| Palette::build(PaletteVariant::Legacy));

pub fn palette(variant: PaletteVariant) -> &'static Palette {
    match variant {
        PaletteVariant::Modern => &MODERN,
        PaletteVariant::Legacy => &LEGACY,
    }
}

fn shade(dark: ColorRGB, light: ColorRGB, k: usize, len: usize) -> ColorRGB {
    lerp_color(dark, light, k as f32 / (len - 1) as f32)
}

impl Palette {
    fn build(variant: PaletteVariant) -> Self {
        let mut colors = [[0, 0, 0]; PALETTE_SIZE];
        let mut ramps = vec![];

        // System colors
        for i in 1..PRIMARY_RAMPS_START {
            let v = (i * 16) as u8;
            colors[i] = [v, v, v];
        }

        let mut push_ramps = |start: usize, table: &[(&str, ColorRGB, ColorRGB)]| {
            for (n, &(name, dark, light)) in table.iter().enumerate() {
                let first = start + n * RAMP_LEN;
                for k in 0..RAMP_LEN {
                    colors[first + k] = shade(dark, light, k, RAMP_LEN);
                }
                ramps.push(Ramp {
                    name: name.to_string(),
                    indices: (first..first + RAMP_LEN).map(|i| i as ColorIdx).collect(),
                });
            }
        };
        push_ramps(PRIMARY_RAMPS_START, &PRIMARY_RAMPS);
        match variant {
            PaletteVariant::Modern => push_ramps(REMAP_RAMPS_START, &MODERN_REMAPS),
            PaletteVariant::Legacy => {
                push_ramps(REMAP_RAMPS_START, &LEGACY_REMAPS);
                let (dark, light) = LEGACY_UNSLOTTED;
                let first = REMAP_RAMPS_START + LEGACY_REMAPS.len() * RAMP_LEN;
                for k in 0..RAMP_LEN {
                    colors[first + k] = shade(dark, light, k, RAMP_LEN);
                }
            }
        }

        // Water and animation colors
        let extra_len = PALETTE_SIZE - EXTRA_COLORS_START;
        for k in 0..extra_len {
            colors[EXTRA_COLORS_START + k] = shade([20, 60, 100], [150, 200, 240], k, extra_len);
        }

        let specials = vec![(TRANSPARENT.to_string(), TRANSPARENT_IDX)];

        let mut slot_refs = [None; PALETTE_SIZE];
        for (r, ramp) in ramps.iter().enumerate() {
            for (pos, &idx) in ramp.indices.iter().enumerate() {
                slot_refs[idx as usize] = Some(SlotRef::Ramp(r, pos));
            }
        }
        for (s, &(_, idx)) in specials.iter().enumerate() {
            slot_refs[idx as usize] = Some(SlotRef::Special(s));
        }

        Palette {
            variant,
            colors,
            ramps,
            specials,
            slot_refs,
        }
    }

    pub fn variant(&self) -> PaletteVariant {
        self.variant
    }

    pub fn color(&self, idx: ColorIdx) -> ColorRGB {
        self.colors[idx as usize]
    }

    pub fn colors(&self) -> &[ColorRGB; PALETTE_SIZE] {
        &self.colors
    }

    pub fn transparent(&self) -> ColorIdx {
        TRANSPARENT_IDX
    }

    pub fn ramps(&self) -> &[Ramp] {
        &self.ramps
    }

    pub fn ramp(&self, name: &str) -> Option<&Ramp> {
        self.ramps.iter().find(|r| r.name == name)
    }

    pub fn special(&self, name: &str) -> Option<ColorIdx> {
        self.specials
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, idx)| idx)
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.ramp(name).is_some() || self.special(name).is_some()
    }

    // Slot names in palette order, specials first.
    pub fn slot_names(&self) -> Vec<&str> {
        self.specials
            .iter()
            .map(|(n, _)| n.as_str())
            .chain(self.ramps.iter().map(|r| r.name.as_str()))
            .collect()
    }

    pub fn slot_indices(&self, name: &str) -> Option<Vec<ColorIdx>> {
        if let Some(ramp) = self.ramp(name) {
            return Some(ramp.indices.clone());
        }
        self.special(name).map(|idx| vec![idx])
    }

    pub fn slot_of(&self, idx: ColorIdx) -> Option<Slot<'_>> {
        match self.slot_refs[idx as usize]? {
            SlotRef::Ramp(r, position) => Some(Slot::Ramp {
                name: &self.ramps[r].name,
                position,
            }),
            SlotRef::Special(s) => Some(Slot::Special(&self.specials[s].0)),
        }
    }

    pub fn ramp_of(&self, idx: ColorIdx) -> Option<(&Ramp, usize)> {
        match self.slot_refs[idx as usize]? {
            SlotRef::Ramp(r, position) => Some((&self.ramps[r], position)),
            SlotRef::Special(_) => None,
        }
    }
}
