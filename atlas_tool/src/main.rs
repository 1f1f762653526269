use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use glyph_atlas::prelude::*;
use std::path::PathBuf;

const DEFAULT_OUTPUT_DIR: &str = "atlas_out";

#[derive(Debug)]
struct ToolConfig {
    font_path: PathBuf,
    settings: AtlasSettings,
    output_dir: PathBuf,
    write_png: bool,
    texts: Vec<String>,
    origin: (i32, i32),
    phantom: Option<char>,
}

fn parse_args() -> Result<ToolConfig> {
    let matches = Command::new("atlas_tool")
        .about("Builds a strip-packed glyph atlas from a font and prints layout anchors")
        .arg(
            Arg::new("font")
                .value_name("FONT")
                .help("TrueType/OpenType font file")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Atlas settings (.toml or .ron)"),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_name("PIXELS")
                .help("Pixel height, overrides the settings file")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Directory for atlas.bin, atlas.png and atlas.ron")
                .default_value(DEFAULT_OUTPUT_DIR),
        )
        .arg(
            Arg::new("no-png")
                .long("no-png")
                .help("Skip writing the PNG preview")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("STRING")
                .help("String to lay out (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("x")
                .long("x")
                .help("Pen x origin")
                .default_value("0")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            Arg::new("y")
                .long("y")
                .help("Baseline y origin")
                .default_value("0")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            Arg::new("phantom")
                .long("phantom")
                .value_name("CHAR")
                .help("Character assumed to precede each string (texture layout)")
                .value_parser(clap::value_parser!(char)),
        )
        .get_matches();

    let mut settings = match matches.get_one::<String>("config") {
        Some(path) => AtlasSettings::load_from_file(path)
            .with_context(|| format!("Failed to read settings from {path}"))?,
        None => AtlasSettings::default(),
    };
    if let Some(&size) = matches.get_one::<u32>("size") {
        settings.pixel_height = size;
    }

    Ok(ToolConfig {
        font_path: PathBuf::from(
            matches
                .get_one::<String>("font")
                .context("Missing font path")?,
        ),
        settings,
        output_dir: PathBuf::from(
            matches
                .get_one::<String>("output")
                .map_or(DEFAULT_OUTPUT_DIR, String::as_str),
        ),
        write_png: !matches.get_flag("no-png"),
        texts: matches
            .get_many::<String>("text")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        origin: (
            matches.get_one::<i32>("x").copied().unwrap_or(0),
            matches.get_one::<i32>("y").copied().unwrap_or(0),
        ),
        phantom: matches.get_one::<char>("phantom").copied(),
    })
}

fn format_anchors(result: &LayoutResult) -> String {
    result
        .anchors()
        .map(|a| format!("({}, {})", a.x, a.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    glyph_atlas::foundation::logging::init_with_level(log::LevelFilter::Info);

    let config = parse_args()?;
    log::debug!("Tool configuration: {:?}", config);

    let alphabet = config.settings.alphabet().context("Invalid alphabet")?;
    let rasterizer = FontdueRasterizer::from_file(&config.font_path)
        .with_context(|| format!("Failed to load font {:?}", config.font_path))?;

    let mut atlas = FontAtlas::new(rasterizer, alphabet);
    atlas
        .load(config.settings.pixel_height)
        .context("Failed to build atlas")?;

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {:?}", config.output_dir))?;
    atlas.save_raw(config.output_dir.join("atlas.bin"))?;
    atlas.save_manifest(config.output_dir.join("atlas.ron"))?;
    if config.write_png {
        atlas.save_png(config.output_dir.join("atlas.png"))?;
    }

    let (width, height) = atlas.dimensions();
    println!("Atlas: {width}x{height} at {}px", config.settings.pixel_height);

    let layout = TextLayout::new(&atlas);
    let (x, y) = config.origin;
    for text in &config.texts {
        let result = match config.phantom {
            Some(_) => layout.layout_texture(text, x, y, config.phantom),
            None => layout.layout_buffer(text, x, y),
        }
        .with_context(|| format!("Failed to lay out {text:?}"))?;

        println!("{text:?}: {}", format_anchors(&result));
    }

    Ok(())
}
