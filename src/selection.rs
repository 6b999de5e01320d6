// Active palette slots scoping the color operations (brightness, remap, remove).
use std::borrow::Cow;

use hashbrown::HashSet;
use itertools::Itertools;
use log::{debug, warn};

use crate::{
    common::ColorIdx,
    error::{EditError, EditResult},
    palette::{self, Palette, PaletteVariant},
    remap::remap_index,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    slots: Vec<String>,
    // Individually picked indices, valid in `variant`
    picked: Vec<ColorIdx>,
    // Palette the cached indices were resolved against
    variant: PaletteVariant,
    indices: HashSet<ColorIdx>,
}

fn resolve(
    slots: &[String],
    picked: &[ColorIdx],
    picked_variant: PaletteVariant,
    palette: &Palette,
) -> HashSet<ColorIdx> {
    let from = palette::palette(picked_variant);
    slots
        .iter()
        .filter_map(|s| palette.slot_indices(s))
        .flatten()
        .chain(picked.iter().map(|&p| remap_index(p, from, palette)))
        .collect()
}

impl Selection {
    pub fn new(palette: &Palette) -> Self {
        Selection {
            slots: vec![],
            picked: vec![],
            variant: palette.variant(),
            indices: HashSet::new(),
        }
    }

    // Replaces the active slots. On an unknown name the selection is left
    // unchanged.
    pub fn set_active_slots<S: AsRef<str>>(
        &mut self,
        names: &[S],
        palette: &Palette,
    ) -> EditResult<()> {
        if let Some(bad) = names.iter().find(|n| !palette.has_slot(n.as_ref())) {
            return Err(EditError::UnknownSlot(bad.as_ref().to_string()));
        }
        let mut slots: Vec<String> = vec![];
        for name in names {
            if !slots.iter().any(|s| s == name.as_ref()) {
                slots.push(name.as_ref().to_string());
            }
        }
        self.indices = resolve(&slots, &[], palette.variant(), palette);
        self.slots = slots;
        self.picked.clear();
        self.variant = palette.variant();
        debug!("Selected slots {:?} ({} indices)", self.slots, self.indices.len());
        Ok(())
    }

    // Replaces the selection with individual indices (e.g. picked with the
    // eyedropper).
    pub fn set_active_indices(&mut self, indices: &[ColorIdx], palette: &Palette) {
        self.slots.clear();
        self.picked = indices.iter().copied().unique().collect();
        self.variant = palette.variant();
        self.indices = self.picked.iter().copied().collect();
        debug!("Selected indices {:?}", self.picked);
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn variant(&self) -> PaletteVariant {
        self.variant
    }

    pub fn selected_indices(&self) -> &HashSet<ColorIdx> {
        &self.indices
    }

    // Indices of the active slots in `palette`. Resolved afresh whenever
    // `palette` isn't the one the selection was bound to.
    pub fn indices_for(&self, palette: &Palette) -> Cow<'_, HashSet<ColorIdx>> {
        if palette.variant() == self.variant {
            Cow::Borrowed(&self.indices)
        } else {
            Cow::Owned(resolve(&self.slots, &self.picked, self.variant, palette))
        }
    }

    // Re-seed against a new palette. Slots the palette lacks are dropped and
    // returned; picked indices are carried over to their counterparts.
    pub fn rebind(&mut self, palette: &Palette) -> Vec<String> {
        let (kept, dropped): (Vec<String>, Vec<String>) = std::mem::take(&mut self.slots)
            .into_iter()
            .partition(|s| palette.has_slot(s));
        for name in &dropped {
            warn!(
                "Slot {} doesn't exist in the {} palette, removing it from the selection.",
                name,
                palette.variant().name()
            );
        }
        let from = palette::palette(self.variant);
        self.picked = self
            .picked
            .iter()
            .map(|&p| remap_index(p, from, palette))
            .unique()
            .collect();
        self.indices = resolve(&kept, &self.picked, palette.variant(), palette);
        self.slots = kept;
        self.variant = palette.variant();
        dropped
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.picked.clear();
        self.indices.clear();
    }
}
