//! Palette-indexed sprite editing for scenery objects.
//!
//! Sprites are grids of palette indices ([`canvas::Canvas`]) interpreted
//! through one of two fixed 256-color palettes ([`palette::Palette`]).
//! The [`tools`] module draws on canvases, [`remap`] moves them between
//! palette variants, and [`update::update`] drives a whole editing session.

pub mod canvas;
pub mod common;
pub mod error;
pub mod helpers;
pub mod message;
pub mod object;
pub mod palette;
pub mod persist;
pub mod remap;
pub mod selection;
pub mod sprite_png;
pub mod state;
pub mod tools;
pub mod undo;
pub mod update;
