//! Procedurally grown, animated trees
//!
//! A [`Tree`] starts as a seed at the bottom of a drawing [`Surface`]. Each call to
//! [`Tree::grow`] advances it by one frame: the seed swells, the trunk sprouts and forks, every
//! branch splits in two until four levels deep, and the final tips bloom. Flowers can be scattered
//! over the blooms afterwards, and the finished picture can be snapshotted and slid around.
//!
//! Drawing is abstracted behind [`Surface`]; [`ImageSurface`] renders into an in-memory image that
//! can be written out as PNG.

pub mod bloom;
pub mod branch;
pub mod config;
pub mod float;
pub mod growth;
pub mod img;
pub mod point;
pub mod seed;
pub mod snapshot;
pub mod surface;
pub mod tree;

pub use bloom::{Bloom, BloomId, Flower};
pub use branch::{Branch, Offspring};
pub use config::{SceneConfig, SeedOptions, TreeConfig};
pub use float::Float;
pub use img::{Color, ImageSurface};
pub use point::Point;
pub use seed::Seed;
pub use snapshot::SnapshotCache;
pub use surface::Surface;
pub use tree::Tree;
