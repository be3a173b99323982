//! Wrapper module for [`Tree`]

use crate::bloom::{Bloom, Flower};
use crate::branch::{Branch, SPLIT_LENGTH_SCALE, SPLIT_SCALE};
use crate::config::TreeConfig;
use crate::img::PixelCount;
use crate::seed::Seed;
use crate::snapshot::SnapshotCache;
use crate::surface::Surface;
use crate::{float, Float, Point};

use eyre::eyre;
use log::{debug, info};
use rand::Rng;

/// Fraction of the surface height used for the trunk when no length is configured
const DEFAULT_TRUNK_FRACTION: Float = 0.25;
/// Starting thickness of the trunk, before scaling
const TRUNK_THICKNESS: Float = 1.0;

/// A seed, the branches that grow out of it, and everything blooming on them, drawn onto a surface
///
/// The tree is animated by calling [`grow`] once per frame for as long as [`can_grow`] holds; each
/// call redraws the whole surface. The seed swells first and, once it's done, the trunk starts
/// growing from the middle of the bottom edge.
///
/// Randomness (branch angles, bloom sizes, flower placement) comes from the `R` given to
/// [`Tree::new`], so seeding it makes a tree reproducible.
///
/// [`grow`]: Self::grow
/// [`can_grow`]: Self::can_grow
pub struct Tree<S, R> {
    surface: S,
    rng: R,
    seed: Seed,
    root: Branch,
    blooms: Vec<Bloom>,
    flowers: Vec<Flower>,
    snapshots: SnapshotCache,
}

impl<S: Surface, R: Rng> Tree<S, R> {
    pub fn new(surface: S, config: &TreeConfig, mut rng: R) -> Self {
        let width = surface.width() as Float;
        let height = surface.height() as Float;

        let seed_opts = config.seed;
        let seed = Seed::new(
            Point::new(seed_opts.x, height),
            seed_opts.color,
            seed_opts.scale,
        );

        let trunk_length = config
            .trunk_length
            .unwrap_or(height * DEFAULT_TRUNK_FRACTION);

        // The trunk forks straight away; its two halves only start growing once it's done.
        let mut root = Branch::new(
            Point::new(width / 2.0, height),
            -float::FRAC_PI_2,
            trunk_length,
            config.branch_color,
            seed_opts.scale,
            0,
            TRUNK_THICKNESS,
        );
        root.branch(SPLIT_SCALE, SPLIT_LENGTH_SCALE, &mut rng);

        debug!(
            "new tree: seed at x = {}, trunk length {} on a {}x{} surface",
            seed_opts.x, trunk_length, width, height
        );

        Tree {
            surface,
            rng,
            seed,
            root,
            blooms: Vec::new(),
            flowers: Vec::new(),
            snapshots: SnapshotCache::new(config.snapshot_capacity),
        }
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// The trunk, from which every other branch can be reached
    pub fn root(&self) -> &Branch {
        &self.root
    }

    /// Every bloom, in the order they appeared
    pub fn blooms(&self) -> &[Bloom] {
        &self.blooms
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    pub fn snapshots(&self) -> &SnapshotCache {
        &self.snapshots
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Redraws everything from scratch
    ///
    /// Branches go first, then blooms, then flowers on top. The seed is drawn last, and only while
    /// it's still growing.
    pub fn draw(&mut self) {
        let surface = &mut self.surface;
        surface.clear();

        self.root.draw(surface);
        for bloom in &self.blooms {
            bloom.draw(surface);
        }
        for flower in &self.flowers {
            flower.draw(surface);
        }

        if self.seed.is_active() {
            self.seed.draw(surface);
        }
    }

    /// Advances the whole tree by one step and redraws it
    pub fn grow(&mut self) {
        let was_growing = self.can_grow();
        let was_sprouted = !self.seed.is_active();

        self.seed.grow();
        if !self.seed.is_active() {
            if !was_sprouted {
                info!("seed finished growing; trunk is sprouting");
            }
            self.root.grow(&mut self.rng, &mut self.blooms);
        }

        for bloom in &mut self.blooms {
            bloom.grow();
        }

        if was_growing && !self.can_grow() {
            info!("tree finished growing with {} blooms", self.blooms.len());
        }

        self.draw();
    }

    /// Returns whether calling [`grow`](Self::grow) would still change anything
    pub fn can_grow(&self) -> bool {
        self.seed.is_active() || self.root.is_growing(&self.blooms)
    }

    /// Adds `num` flowers, each on a randomly chosen bloom, returning how many were added
    ///
    /// Nothing is added while there are no blooms. The same bloom can receive several flowers. The
    /// new flowers appear on the next [`draw`](Self::draw).
    pub fn flower(&mut self, num: usize) -> usize {
        if !self.can_flower() {
            debug!("no blooms to put {} flowers on", num);
            return 0;
        }

        for _ in 0..num {
            let idx = self.rng.gen_range(0, self.blooms.len());
            let flower = Flower::on(&self.blooms[idx], &mut self.rng);
            self.flowers.push(flower);
        }

        num
    }

    /// Returns whether there are any blooms for [`flower`](Self::flower) to use
    pub fn can_flower(&self) -> bool {
        !self.blooms.is_empty()
    }

    /// Stores the given region of the surface as it currently looks, under `name`
    ///
    /// The region is clipped to the surface; it's an error for nothing to be left after clipping.
    /// Taking a snapshot with a name that's already in use replaces the old one.
    pub fn snapshot(
        &mut self,
        name: impl Into<String>,
        x: PixelCount,
        y: PixelCount,
        width: PixelCount,
        height: PixelCount,
    ) -> eyre::Result<()> {
        let name = name.into();
        let raster = self.surface.capture(x, y, width, height).ok_or_else(|| {
            eyre!(
                "snapshot {:?}: region {}x{} at ({}, {}) is outside the {}x{} surface",
                name,
                width,
                height,
                x,
                y,
                self.surface.width(),
                self.surface.height(),
            )
        })?;

        debug!("snapshot {:?} taken, {}x{}", name, raster.width(), raster.height());
        self.snapshots.insert(name, raster);
        Ok(())
    }

    /// Clears the surface and draws the snapshot called `name` with its top-left corner at
    /// `(x, y)`
    ///
    /// Returns whether `x` is still within the width of the surface. Once it isn't, the snapshot
    /// has been moved entirely off the right-hand side.
    pub fn move_snapshot(&mut self, name: &str, x: Float, y: Float) -> eyre::Result<bool> {
        let raster = self
            .snapshots
            .get(name)
            .ok_or_else(|| eyre!("no snapshot named {:?}", name))?;

        self.surface.clear();
        self.surface
            .draw_raster(raster, x.round() as i64, y.round() as i64);

        Ok(x < self.surface.width() as Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::MAX_LEVEL;
    use crate::config::SeedOptions;
    use crate::img::{parse_color, rgb};
    use crate::surface::recorder::{Op, Recorder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> TreeConfig {
        TreeConfig::with_seed(SeedOptions {
            x: 300.0,
            color: parse_color("#000").unwrap(),
            scale: 1.0,
        })
    }

    fn new_tree(seed: u64) -> Tree<Recorder, StdRng> {
        Tree::new(
            Recorder::new(600, 600),
            &config(),
            StdRng::seed_from_u64(seed),
        )
    }

    fn grow_fully(tree: &mut Tree<Recorder, StdRng>) -> usize {
        let mut frames = 0;
        while tree.can_grow() {
            tree.grow();
            frames += 1;
            assert!(frames < 100_000, "tree never stopped growing");
        }
        frames
    }

    /// Makes a tree with exactly one bloom, by growing a tree fully and throwing away the rest
    fn with_single_bloom(mut tree: Tree<Recorder, StdRng>) -> Tree<Recorder, StdRng> {
        grow_fully(&mut tree);
        tree.blooms.truncate(1);
        tree.flowers.clear();
        tree
    }

    #[test]
    fn seed_and_trunk_placement() {
        let tree = new_tree(0);
        assert_eq!(tree.seed().point(), Point::new(300.0, 600.0));
        assert_eq!(tree.seed().target_radius(), 2.0);

        let root = tree.root();
        assert_eq!(root.start(), Point::new(300.0, 600.0));
        assert_eq!(root.level(), 0);
        assert_eq!(root.target_length(), 150.0);
        assert!(!root.is_active());
        assert_eq!(root.children().map(|c| c.len()), Some(2));
        assert!(tree.can_grow());
        assert!(!tree.can_flower());
    }

    #[test]
    fn trunk_waits_for_seed() {
        let mut tree = new_tree(1);
        while tree.seed().is_active() {
            assert_eq!(tree.root().length(), 0.0);
            tree.grow();
        }
        assert!(tree.root().length() > 0.0);
    }

    #[test]
    fn full_growth_scenario() {
        let mut tree = new_tree(2);
        grow_fully(&mut tree);

        assert!(!tree.seed().is_active());
        assert_eq!(tree.root().depth(), MAX_LEVEL);
        assert_eq!(tree.blooms().len(), 1 << MAX_LEVEL);

        let blooms = tree.blooms();
        tree.root().visit(&mut |b| {
            assert!(!b.is_active());
            if b.level() == MAX_LEVEL {
                let bloom = &blooms[b.bloom().expect("missing bloom").index()];
                assert!(!bloom.is_active());
                assert_eq!(bloom.radius(), bloom.target_radius());
            }
        });

        // Once done, growing is a no-op for the tree's state
        let root = tree.root().clone();
        tree.grow();
        assert_eq!(*tree.root(), root);
    }

    fn branches_finished(tree: &Tree<Recorder, StdRng>) -> bool {
        let mut finished = true;
        tree.root()
            .visit(&mut |b| finished &= b.is_grown() && !b.is_active());
        finished
    }

    #[test]
    fn can_grow_waits_for_last_bloom() {
        let mut tree = new_tree(3);
        while !branches_finished(&tree) {
            assert!(tree.can_grow());
            tree.grow();
        }

        // Every branch is done, but the blooms made on the last step have only just started
        assert!(tree.blooms().iter().any(Bloom::is_active));
        assert!(tree.can_grow());

        let mut frames = 0;
        while tree.blooms().iter().any(Bloom::is_active) {
            assert!(tree.can_grow());
            tree.grow();
            frames += 1;
        }

        assert!(frames > 0);
        assert!(!tree.can_grow());
    }

    #[test]
    fn draw_order() {
        let mut tree = new_tree(4);
        grow_fully(&mut tree);
        tree.flower(2);
        tree.draw();

        let frame = tree.surface().frame();
        let first_circle = frame
            .iter()
            .position(|op| matches!(op, Op::Circle { .. }))
            .unwrap();
        let last_line = frame
            .iter()
            .rposition(|op| matches!(op, Op::Line { .. }))
            .unwrap();
        assert!(last_line < first_circle, "branches should be drawn first");

        // Every branch with a length is drawn
        let mut branches = 0;
        tree.root().visit(&mut |_| branches += 1);
        assert_eq!(tree.surface().count_lines(), branches);

        // The seed is done growing, so only blooms and flower petals are drawn as circles
        let circles = frame
            .iter()
            .filter(|op| matches!(op, Op::Circle { .. }))
            .count();
        assert_eq!(circles, tree.blooms().len() + 4 * 2);
    }

    #[test]
    fn seed_drawn_only_while_active() {
        let mut tree = new_tree(5);
        tree.grow();
        let seed_circle = Op::Circle {
            center: Point::new(300.0, 600.0),
            radius: tree.seed().radius(),
            color: rgb(0x000000),
        };
        assert_eq!(tree.surface().frame(), &[seed_circle][..]);

        while tree.seed().is_active() {
            tree.grow();
        }
        assert!(!tree
            .surface()
            .frame()
            .iter()
            .any(|op| matches!(op, Op::Circle { color, .. } if *color == rgb(0x000000))));
    }

    #[test]
    fn flowers_on_single_bloom() {
        let mut tree = with_single_bloom(new_tree(6));
        let bloom = tree.blooms()[0];

        assert!(tree.can_flower());
        assert_eq!(tree.flower(5), 5);
        assert_eq!(tree.flowers().len(), 5);
        for flower in tree.flowers() {
            assert_eq!(flower.point(), bloom.point());
            assert_eq!(flower.color(), bloom.color());
            assert!((0.0..=2.0 * float::PI).contains(&flower.angle()));
        }
    }

    #[test]
    fn no_flowers_without_blooms() {
        let mut tree = new_tree(7);
        assert_eq!(tree.flower(3), 0);
        assert!(tree.flowers().is_empty());
    }

    #[test]
    fn same_seed_same_tree() {
        let mut a = new_tree(8);
        let mut b = new_tree(8);
        grow_fully(&mut a);
        grow_fully(&mut b);
        assert_eq!(a.root(), b.root());
        assert_eq!(a.blooms(), b.blooms());
    }

    #[test]
    fn snapshot_and_move() {
        let mut tree = new_tree(9);
        tree.snapshot("whole", 0, 0, 600, 600).unwrap();
        tree.snapshot("corner", 590, 590, 50, 50).unwrap();
        assert_eq!(tree.snapshots().peek("corner").unwrap().dimensions(), (10, 10));

        assert!(tree.move_snapshot("whole", 100.0, 0.0).unwrap());
        assert_eq!(
            tree.surface().ops[tree.surface().ops.len() - 2..],
            [
                Op::Clear,
                Op::Raster {
                    x: 100,
                    y: 0,
                    width: 600,
                    height: 600
                }
            ]
        );

        assert!(tree.move_snapshot("whole", 599.0, 0.0).unwrap());
        assert!(!tree.move_snapshot("whole", 600.0, 0.0).unwrap());
    }

    #[test]
    fn snapshot_errors() {
        let mut tree = new_tree(10);
        assert!(tree.snapshot("off", 600, 0, 10, 10).is_err());
        assert!(tree.move_snapshot("missing", 0.0, 0.0).is_err());
    }

    #[test]
    fn snapshots_are_bounded() {
        let mut cfg = config();
        cfg.snapshot_capacity = 2;
        let mut tree = Tree::new(Recorder::new(100, 100), &cfg, StdRng::seed_from_u64(11));

        for name in ["a", "b", "c"].iter() {
            tree.snapshot(*name, 0, 0, 10, 10).unwrap();
        }
        assert_eq!(tree.snapshots().len(), 2);
        assert!(tree.move_snapshot("a", 0.0, 0.0).is_err());
        assert!(tree.move_snapshot("c", 0.0, 0.0).is_ok());
    }
}
