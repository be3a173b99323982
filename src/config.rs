//! Tree configuration, and loading it from the JSON files given on the command line
//!
//! The JSON form is [`ParsedConfig`]; it is checked and converted into the [`TreeConfig`] (plus
//! surface settings) that the rest of the crate works with.

use crate::img::{self, rgb, Color, PixelCount};
use crate::snapshot;
use crate::Float;

use eyre::{eyre, WrapErr};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default surface width and height, in pixels
pub const DEFAULT_SIZE: PixelCount = 600;

/// Everything a [`Tree`](crate::tree::Tree) needs besides its surface and random source
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TreeConfig {
    pub seed: SeedOptions,
    /// Color of the trunk, inherited by every branch
    pub branch_color: Color,
    /// Full length of the trunk. If absent, a quarter of the surface height is used.
    pub trunk_length: Option<Float>,
    /// Number of snapshots kept before the least recently used is evicted
    pub snapshot_capacity: usize,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SeedOptions {
    /// Horizontal position of the seed. It always sits on the bottom edge of the surface.
    pub x: Float,
    pub color: Color,
    /// Scales the seed's final radius as well as the trunk's growth rate and width
    pub scale: Float,
}

impl TreeConfig {
    /// A configuration with the default colors and everything else taken from the seed options
    pub fn with_seed(seed: SeedOptions) -> Self {
        TreeConfig {
            seed,
            branch_color: rgb(0xffffff),
            trunk_length: None,
            snapshot_capacity: snapshot::DEFAULT_CAPACITY,
        }
    }
}

/// A complete set of settings for a run: the tree, plus the surface it's drawn on
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub width: PixelCount,
    pub height: PixelCount,
    pub background: Color,
    pub tree: TreeConfig,
}

impl SceneConfig {
    /// The scene used when no configuration file is given: a centered seed on a black background
    pub fn default_for(width: PixelCount, height: PixelCount) -> Self {
        SceneConfig {
            width,
            height,
            background: rgb(0x000000),
            tree: TreeConfig::with_seed(SeedOptions {
                x: width as Float / 2.0,
                color: rgb(0xffc0cb),
                scale: 1.0,
            }),
        }
    }

    /// Reads and validates the JSON configuration at the given path
    pub fn from_file(file: &Path) -> eyre::Result<Self> {
        let file_content = fs::read_to_string(file)
            .wrap_err_with(|| format!("failed to read file at {:?}", file.to_string_lossy()))?;

        Self::from_json(&file_content)
    }

    pub fn from_json(json: &str) -> eyre::Result<Self> {
        let parsed: ParsedConfig =
            serde_json::from_str(json).wrap_err("could not deserialize JSON structure")?;

        Self::from_parsed(parsed)
    }

    fn from_parsed(parsed: ParsedConfig) -> eyre::Result<Self> {
        if matches!(parsed.trunk_length, Some(l) if !(l > 0.0)) {
            return Err(eyre!("trunk length must be > 0"))
                .wrap_err("invalid value at .trunk_length in JSON config");
        }
        if parsed.snapshot_capacity == Some(0) {
            return Err(eyre!("snapshot capacity must be at least 1"))
                .wrap_err("invalid value at .snapshot_capacity in JSON config");
        }

        let seed = &parsed.seed;
        let seed_color =
            img::parse_color(&seed.color).wrap_err("invalid value at .seed.color in JSON config")?;
        let branch_color = parse_optional_color(&parsed.branch_color, rgb(0xffffff))
            .wrap_err("invalid value at .branch_color in JSON config")?;
        let background = parse_optional_color(&parsed.background, rgb(0x000000))
            .wrap_err("invalid value at .background in JSON config")?;

        let scene = SceneConfig {
            width: parsed.width.unwrap_or(DEFAULT_SIZE),
            height: parsed.height.unwrap_or(DEFAULT_SIZE),
            background,
            tree: TreeConfig {
                seed: SeedOptions {
                    x: seed.x,
                    color: seed_color,
                    scale: seed.scale,
                },
                branch_color,
                trunk_length: parsed.trunk_length,
                snapshot_capacity: parsed
                    .snapshot_capacity
                    .unwrap_or(snapshot::DEFAULT_CAPACITY),
            },
        };

        scene.validate().wrap_err("invalid value in JSON config")?;
        Ok(scene)
    }

    /// Checks that the surface isn't empty and that the seed can be placed on it
    ///
    /// This has to hold again after any change to the surface size, e.g. from command-line
    /// overrides.
    pub fn validate(&self) -> eyre::Result<()> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(eyre!("surface must be at least 1x1, got {}x{}", width, height));
        }

        let seed = &self.tree.seed;
        if !(seed.scale > 0.0) {
            return Err(eyre!("seed scale must be > 0, got {}", seed.scale));
        }
        if !(0.0..=width as Float).contains(&seed.x) {
            return Err(eyre!(
                "seed x ({}) must be within the surface width, 0..={}",
                seed.x,
                width
            ));
        }

        Ok(())
    }
}

fn parse_optional_color(value: &Option<String>, default: Color) -> eyre::Result<Color> {
    match value {
        Some(s) => img::parse_color(s),
        None => Ok(default),
    }
}

/// The JSON configuration file, as written
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedConfig {
    pub width: Option<PixelCount>,
    pub height: Option<PixelCount>,
    pub seed: ParsedSeed,
    pub branch_color: Option<String>,
    pub background: Option<String>,
    pub trunk_length: Option<Float>,
    pub snapshot_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedSeed {
    pub x: Float,
    pub color: String,
    pub scale: Float,
}
