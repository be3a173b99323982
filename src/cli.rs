//! Command-line parsing, producing the [`AppSettings`] that [`main`](crate::main) runs

use crate::AppSettings;
use bloom_tree::config::{SceneConfig, DEFAULT_SIZE};
use bloom_tree::img::PixelCount;

use clap::{App, Arg, ArgMatches};
use eyre::{eyre, WrapErr};
use std::path::Path;
use std::process::exit;

/// Number of digits frame numbers are padded to in output file names
const FRAME_DIGITS: usize = 5;

/// The placeholder in an output pattern that gets replaced by the frame number
const FRAME_PLACEHOLDER: &str = "{}";

/// Where the frames of a run go
pub enum DisplayMethod<'cli> {
    /// Write frames as PNG files, with names made by [`substitute_png_file_pattern`]
    Png { file_pattern: &'cli str },
    /// Grow the tree without writing anything
    None,
}

/// Parses the command-line arguments and runs the app, exiting the process on failure
pub fn run() {
    let matches = app().get_matches();

    let settings = AppSettings::from_matches(&matches).unwrap_or_else(|e| {
        eprintln!("{:?}", e.wrap_err("invalid arguments"));
        exit(1)
    });

    if let Err(e) = settings.run() {
        eprintln!("{:?}", e);
        exit(1)
    }
}

fn app() -> App<'static, 'static> {
    App::new("bloom-tree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Grows a tree from a seed, frame by frame, and renders the frames as PNG images")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("JSON file describing the seed, colors and surface"),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .value_name("PIXELS")
                .takes_value(true)
                .help("Width of the surface; overrides the config file"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .value_name("PIXELS")
                .takes_value(true)
                .help("Height of the surface; overrides the config file"),
        )
        .arg(
            Arg::with_name("rng-seed")
                .long("rng-seed")
                .value_name("N")
                .takes_value(true)
                .help("Seeds the random number generator, making the tree reproducible"),
        )
        .arg(
            Arg::with_name("out")
                .short("o")
                .long("out")
                .value_name("PATTERN")
                .takes_value(true)
                .help("Output file pattern; '{}' is replaced by the frame number"),
        )
        .arg(
            Arg::with_name("every")
                .long("every")
                .value_name("N")
                .takes_value(true)
                .default_value("1")
                .help("Only write every N-th frame (the final frame is always written)"),
        )
        .arg(
            Arg::with_name("flowers")
                .long("flowers")
                .value_name("N")
                .takes_value(true)
                .default_value("0")
                .help("Number of flowers to add once the tree is fully grown"),
        )
        .arg(
            Arg::with_name("slide")
                .long("slide")
                .help("Once done, slide a snapshot of the tree off the right edge of the surface"),
        )
}

impl<'cli> AppSettings<'cli> {
    fn from_matches(matches: &'cli ArgMatches<'static>) -> eyre::Result<Self> {
        let width = parse_opt::<PixelCount>(matches, "width")?;
        let height = parse_opt::<PixelCount>(matches, "height")?;

        let scene = match matches.value_of("config") {
            Some(file) => {
                let mut scene = SceneConfig::from_file(Path::new(file))
                    .wrap_err_with(|| format!("failed to load config {:?}", file))?;
                scene.width = width.unwrap_or(scene.width);
                scene.height = height.unwrap_or(scene.height);
                scene
            }
            // Without a config file, the seed is centered on whatever size was asked for
            None => SceneConfig::default_for(
                width.unwrap_or(DEFAULT_SIZE),
                height.unwrap_or(DEFAULT_SIZE),
            ),
        };
        scene
            .validate()
            .wrap_err("invalid --width/--height for this scene")?;

        let frame_every = parse_opt::<usize>(matches, "every")?.unwrap_or(1);
        if frame_every == 0 {
            return Err(eyre!("--every must be at least 1"));
        }

        let display_method = match matches.value_of("out") {
            Some(pat) if !pat.contains(FRAME_PLACEHOLDER) => {
                return Err(eyre!(
                    "output pattern {:?} must contain {:?}",
                    pat,
                    FRAME_PLACEHOLDER
                ))
            }
            Some(pat) => DisplayMethod::Png { file_pattern: pat },
            None => DisplayMethod::None,
        };

        Ok(AppSettings {
            scene,
            rng_seed: parse_opt(matches, "rng-seed")?,
            frame_every,
            flowers: parse_opt(matches, "flowers")?.unwrap_or(0),
            slide: matches.is_present("slide"),
            display_method,
        })
    }
}

fn parse_opt<T>(matches: &ArgMatches, name: &str) -> eyre::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .value_of(name)
        .map(|s| s.parse::<T>())
        .transpose()
        .wrap_err_with(|| format!("invalid value for --{}", name))
}

/// Produces the file name for frame `n` by replacing the first `{}` in `pattern`
pub fn substitute_png_file_pattern(pattern: &str, n: usize) -> String {
    let number = format!("{:0width$}", n, width = FRAME_DIGITS);
    pattern.replacen(FRAME_PLACEHOLDER, &number, 1)
}
