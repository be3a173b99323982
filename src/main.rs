//! Grows a tree from a seed and renders it, frame by frame
//!
//! The entrypoint is in [`cli::run`] ('src/cli.rs'), which parses the arguments into an
//! [`AppSettings`] and calls its `run` method.

use bloom_tree::config::SceneConfig;
use bloom_tree::surface::Surface;
use bloom_tree::{Float, ImageSurface, Tree};

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;

/// Name of the snapshot used to slide the finished tree off the surface
const SLIDE_SNAPSHOT: &str = "tree";
/// The number of frames it takes to slide the tree across the full width of the surface
const SLIDE_FRAMES: Float = 60.0;

struct AppSettings<'cli> {
    scene: SceneConfig,
    rng_seed: Option<u64>,
    /// Write one frame out of every `frame_every`
    frame_every: usize,
    flowers: usize,
    slide: bool,
    display_method: cli::DisplayMethod<'cli>,
}

fn main() {
    env_logger::init();

    // Internally calls `AppSettings::run`
    cli::run()
}

type DisplayCallback<'cli> = Box<dyn 'cli + FnMut(&ImageSurface) -> eyre::Result<()>>;

type AppTree = Tree<ImageSurface, StdRng>;

impl<'cli> AppSettings<'cli> {
    /// Runs the app until completion, using the settings filled by the `cli` module
    fn run(&self) -> eyre::Result<()> {
        let scene = &self.scene;
        let surface = ImageSurface::new(scene.width, scene.height, scene.background);
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut tree = Tree::new(surface, &scene.tree, rng);
        let mut callback = self.display_callback();

        tree.draw();
        callback(tree.surface())?;

        let frames = self.grow(&mut tree, &mut callback)?;

        let mut branches = 0;
        tree.root().visit(&mut |_| branches += 1);
        info!(
            "fully grown after {} frames: {} branches, {} blooms",
            frames,
            branches,
            tree.blooms().len()
        );

        if self.flowers != 0 {
            if tree.can_flower() {
                tree.flower(self.flowers);
                tree.draw();
                callback(tree.surface())?;
            } else {
                warn!("no blooms to put flowers on");
            }
        }

        if self.slide {
            self.slide_away(&mut tree, &mut callback)?;
        }

        Ok(())
    }

    /// Grows the tree until it's done, returning the number of frames that took
    fn grow(
        &self,
        tree: &mut AppTree,
        callback: &mut DisplayCallback<'cli>,
    ) -> eyre::Result<usize> {
        let mut frame = 0;
        while tree.can_grow() {
            tree.grow();
            frame += 1;

            if frame % self.frame_every == 0 {
                callback(tree.surface())?;
            }
        }

        // The final frame is always written
        if frame % self.frame_every != 0 {
            callback(tree.surface())?;
        }

        Ok(frame)
    }

    /// Snapshots the whole surface and moves it right until it's gone
    fn slide_away(
        &self,
        tree: &mut AppTree,
        callback: &mut DisplayCallback<'cli>,
    ) -> eyre::Result<()> {
        let width = tree.surface().width();
        let height = tree.surface().height();
        tree.snapshot(SLIDE_SNAPSHOT, 0, 0, width, height)?;

        let step = width as Float / SLIDE_FRAMES;
        let mut x = 0.0;
        loop {
            x += step;
            let on_surface = tree.move_snapshot(SLIDE_SNAPSHOT, x, 0.0)?;
            callback(tree.surface())?;

            if !on_surface {
                return Ok(());
            }
        }
    }

    fn display_callback(&self) -> DisplayCallback<'cli> {
        match &self.display_method {
            cli::DisplayMethod::Png { file_pattern } => Self::png_callback(*file_pattern),
            cli::DisplayMethod::None => Box::new(|_| Ok(())),
        }
    }

    fn png_callback(file_pattern: &'cli str) -> DisplayCallback<'cli> {
        // Image number:
        let mut n = 0;

        Box::new(move |surface: &ImageSurface| {
            surface.save_png(cli::substitute_png_file_pattern(file_pattern, n))?;
            n += 1;
            Ok(())
        })
    }
}
