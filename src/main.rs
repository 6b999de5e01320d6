use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use scenery_editor::{
    common::ColorRGB,
    helpers::parse_rgb,
    message::Message,
    object::{SpriteObject, SpriteView},
    palette::PaletteVariant,
    persist::ImportColorMode,
    sprite_png,
    state::{get_initial_state, EditorState},
    update::update,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PaletteArg {
    Modern,
    Legacy,
}

impl From<PaletteArg> for PaletteVariant {
    fn from(p: PaletteArg) -> Self {
        match p {
            PaletteArg::Modern => PaletteVariant::Modern,
            PaletteArg::Legacy => PaletteVariant::Legacy,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TransparencyArg {
    Black,
    White,
    UpperLeft,
    Custom,
}

impl From<TransparencyArg> for ImportColorMode {
    fn from(t: TransparencyArg) -> Self {
        match t {
            TransparencyArg::Black => ImportColorMode::Black,
            TransparencyArg::White => ImportColorMode::White,
            TransparencyArg::UpperLeft => ImportColorMode::UpperLeftPixel,
            TransparencyArg::Custom => ImportColorMode::Custom,
        }
    }
}

fn parse_color(s: &str) -> Result<ColorRGB, String> {
    parse_rgb(s).ok_or_else(|| format!("expected R,G,B but got {s:?}"))
}

#[derive(Parser, Debug)]
#[command(version, about = "Edit palette-indexed scenery sprites")]
struct Args {
    /// Palette the sprites are in (defaults to the configured palette)
    #[arg(long, value_enum, global = true)]
    palette: Option<PaletteArg>,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an RGB(A) PNG to an indexed sprite
    Import {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum)]
        transparency: Option<TransparencyArg>,
        /// Transparency color for `--transparency custom`
        #[arg(long, value_parser = parse_color)]
        color: Option<ColorRGB>,
    },
    /// Move the selected colors to another ramp
    Remap {
        pattern: String,
        #[arg(long, required = true, num_args = 1..)]
        from: Vec<String>,
        #[arg(long)]
        to: String,
    },
    /// Shift the selected colors along their ramps
    Brightness {
        pattern: String,
        #[arg(long = "slot", required = true, num_args = 1..)]
        slots: Vec<String>,
        #[arg(long, allow_hyphen_values = true)]
        step: i8,
    },
    /// Make the selected colors transparent
    Remove {
        pattern: String,
        #[arg(long = "slot", required = true, num_args = 1..)]
        slots: Vec<String>,
    },
    /// Convert sprites to the other palette variant
    SwitchPalette {
        pattern: String,
        #[arg(long, value_enum)]
        to: PaletteArg,
    },
    /// Change and save the default settings
    Config {
        #[arg(long, value_enum)]
        default_palette: Option<PaletteArg>,
        #[arg(long, value_enum)]
        transparency: Option<TransparencyArg>,
        #[arg(long, value_parser = parse_color)]
        color: Option<ColorRGB>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        author_id: Option<String>,
    },
}

fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .with_context(|| format!("Invalid pattern {pattern}"))?
        .collect::<Result<Vec<_>, _>>()?;
    if paths.is_empty() {
        warn!("No files match {}", pattern);
    }
    Ok(paths)
}

// Each file becomes a single-view object of the session.
fn open_files(state: &mut EditorState, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let canvas = sprite_png::read_indexed(path)?;
        state.objects.push(SpriteObject {
            name: path.display().to_string(),
            views: vec![SpriteView {
                id: 0,
                canvas: Some(canvas),
            }],
        });
    }
    Ok(())
}

fn write_files(state: &EditorState, paths: &[PathBuf]) -> Result<()> {
    for (object, path) in state.objects.iter().zip(paths) {
        let canvas = object.canvas(0).context("Sprite lost its canvas")?;
        sprite_png::write_indexed(path, canvas, state.palette)?;
    }
    Ok(())
}

fn edit_files(state: &mut EditorState, pattern: &str, messages: Vec<Message>) -> Result<()> {
    let paths = expand(pattern)?;
    open_files(state, &paths)?;
    for idx in 0..state.objects.len() {
        update(state, Message::SelectObject(idx))?;
        let mut changed = 0;
        for message in messages.iter().cloned() {
            changed += update(state, message)?.changed_pixels();
        }
        info!("{}: {} pixels changed", state.objects[idx].name, changed);
    }
    write_files(state, &paths)
}

fn import(
    state: &EditorState,
    input: &Path,
    output: &Path,
    transparency: Option<ColorRGB>,
) -> Result<()> {
    let (width, height, rgba) = sprite_png::read_rgba(input)?;
    let canvas = sprite_png::import_rgba(state.palette, width, height, &rgba, transparency)?;
    sprite_png::write_indexed(output, &canvas, state.palette)
}

// A session in another palette than the configured one.
fn session_in(state: EditorState, variant: PaletteVariant) -> EditorState {
    let mut settings = state.settings;
    settings.palette = variant;
    let mut session = EditorState::new(settings);
    session.settings_path = state.settings_path;
    session
}

fn run(args: Args) -> Result<()> {
    let mut state = get_initial_state()?;
    if let Some(p) = args.palette {
        if !matches!(args.command, Command::Config { .. }) {
            state = session_in(state, p.into());
        }
    }

    match args.command {
        Command::Import {
            input,
            output,
            transparency,
            color,
        } => {
            if matches!(transparency, Some(TransparencyArg::Custom)) && color.is_none() {
                bail!("--transparency custom needs --color");
            }
            let mode = transparency.map_or(state.settings.transparency_color, |t| t.into());
            let custom = color.unwrap_or(state.settings.import_color);
            import(&state, &input, &output, mode.color(custom))
        }
        Command::Remap { pattern, from, to } => edit_files(
            &mut state,
            &pattern,
            vec![
                Message::SetActiveSlots(from),
                Message::RemapTo {
                    slot: to,
                    all_views: true,
                },
            ],
        ),
        Command::Brightness {
            pattern,
            slots,
            step,
        } => edit_files(
            &mut state,
            &pattern,
            vec![
                Message::SetActiveSlots(slots),
                Message::ChangeBrightness {
                    step,
                    all_views: true,
                },
            ],
        ),
        Command::Remove { pattern, slots } => edit_files(
            &mut state,
            &pattern,
            vec![
                Message::SetActiveSlots(slots),
                Message::RemoveColor { all_views: true },
            ],
        ),
        Command::SwitchPalette { pattern, to } => {
            let paths = expand(&pattern)?;
            open_files(&mut state, &paths)?;
            // The conversion only applies to these files.
            let settings = state.settings.clone();
            update(&mut state, Message::SetPalette(to.into()))?;
            state.settings = settings;
            write_files(&state, &paths)
        }
        Command::Config {
            default_palette,
            transparency,
            color,
            author,
            author_id,
        } => {
            let settings = &mut state.settings;
            if let Some(p) = default_palette {
                settings.palette = p.into();
            }
            if let Some(t) = transparency {
                settings.transparency_color = t.into();
            }
            if let Some(c) = color {
                settings.import_color = c;
            }
            if let Some(a) = author {
                settings.author = a;
            }
            if let Some(a) = author_id {
                settings.author_id = a;
            }
            settings.modified = true;
            update(&mut state, Message::SaveSettings)?;
            Ok(())
        }
    }
}

pub fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    run(args)
}
