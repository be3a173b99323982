//! Wrapper module for [`Branch`], the recursive part of the tree

use crate::bloom::{Bloom, BloomId};
use crate::img::Color;
use crate::surface::Surface;
use crate::{Float, Point};

use log::debug;
use rand::Rng;

/// The deepest level a branch can be at. Branches at this level end in blooms instead of splitting.
pub const MAX_LEVEL: usize = 4;

/// Per-step length increase, before multiplying by the branch's scale
const GROWTH_RATE: Float = 0.4;
/// Per-step thickness increase while a branch is lengthening
const THICKENING: Float = 0.005;

/// The `scale` passed to [`Branch::branch`] when a branch splits
pub const SPLIT_SCALE: Float = 0.7;
/// The `length_scale` passed to [`Branch::branch`] when a branch splits
pub const SPLIT_LENGTH_SCALE: Float = 0.5;
/// Children end up with this fraction of the `scale` they were split with
const CHILD_SCALE: Float = 0.9;

/// The minimum angle between a child and its parent, in radians
const SPLIT_ANGLE: Float = 0.3;
/// The maximum random amount added to [`SPLIT_ANGLE`]
const SPLIT_JITTER: Float = 0.2;

/// What a branch turns into once it has finished growing
#[derive(Clone, Debug, PartialEq)]
pub enum Offspring {
    /// The branch hasn't been subdivided yet. Subdivision is deferred until it has grown.
    Pending,
    /// Exactly two child branches, `[left, right]`, attached at this branch's end
    Split(Box<[Branch; 2]>),
    /// Growth stopped here, with a bloom at the tip
    Bloomed(BloomId),
}

/// A single growing line segment, along with everything that grows out of it
///
/// `length` starts at zero and increases by `scale * 0.4` per step until it reaches the target
/// length. It never decreases.
///
/// A branch is *active* while its offspring are [`Offspring::Pending`]; splitting it or ending it
/// in a bloom makes it inactive for good.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    start: Point,
    /// Direction of the branch, in radians. `-π/2` points straight up.
    angle: Float,
    length: Float,
    target_length: Float,
    color: Color,
    scale: Float,
    level: usize,
    thickness: Float,
    offspring: Offspring,
}

impl Branch {
    pub fn new(
        start: Point,
        angle: Float,
        target_length: Float,
        color: Color,
        scale: Float,
        level: usize,
        thickness: Float,
    ) -> Self {
        Branch {
            start,
            angle,
            length: 0.0,
            target_length,
            color,
            scale,
            level,
            thickness,
            offspring: Offspring::Pending,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// The current tip of the branch
    pub fn end(&self) -> Point {
        self.start.offset(self.length, self.angle)
    }

    pub fn angle(&self) -> Float {
        self.angle
    }

    pub fn length(&self) -> Float {
        self.length
    }

    pub fn target_length(&self) -> Float {
        self.target_length
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn scale(&self) -> Float {
        self.scale
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn thickness(&self) -> Float {
        self.thickness
    }

    pub fn offspring(&self) -> &Offspring {
        &self.offspring
    }

    pub fn children(&self) -> Option<&[Branch; 2]> {
        match &self.offspring {
            Offspring::Split(children) => Some(children),
            _ => None,
        }
    }

    pub fn bloom(&self) -> Option<BloomId> {
        match self.offspring {
            Offspring::Bloomed(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.offspring, Offspring::Pending)
    }

    /// Returns whether the branch has reached its full length
    pub fn is_grown(&self) -> bool {
        self.length >= self.target_length
    }

    /// Returns whether anything in the subtree rooted at this branch will still change when grown
    ///
    /// That's the case while the branch itself is short of its target, while it hasn't been
    /// subdivided, while any descendant is growing, or while the bloom at its tip is still
    /// swelling. `blooms` must be the list that the subtree's [`BloomId`]s refer to.
    pub fn is_growing(&self, blooms: &[Bloom]) -> bool {
        if !self.is_grown() {
            return true;
        }

        match &self.offspring {
            Offspring::Pending => true,
            Offspring::Split(children) => children.iter().any(|c| c.is_growing(blooms)),
            Offspring::Bloomed(id) => blooms.get(id.index()).map_or(false, Bloom::is_active),
        }
    }

    /// The number of levels of branches below this one
    pub fn depth(&self) -> usize {
        match &self.offspring {
            Offspring::Split(children) => 1 + children.iter().map(Branch::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Calls `f` on this branch and every branch below it, parents before children
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Branch)) {
        f(self);
        if let Offspring::Split(children) = &self.offspring {
            for child in children.iter() {
                child.visit(f);
            }
        }
    }

    /// Draws the branch and everything attached to it
    ///
    /// Nothing is drawn (not even the children) while the branch has no length.
    pub fn draw(&self, surface: &mut impl Surface) {
        if self.length <= 0.0 {
            return;
        }

        surface.stroke_line(
            self.start,
            self.end(),
            self.color,
            self.thickness * self.scale,
        );

        if let Offspring::Split(children) = &self.offspring {
            for child in children.iter() {
                child.draw(surface);
            }
        }
    }

    /// Advances growth of this branch by one step
    ///
    /// A branch first lengthens until it reaches its target. After that its children (if any)
    /// take over. Whenever the first child has reached its own full length without having been
    /// subdivided, both children are either split in two or, at [`MAX_LEVEL`], ended with a bloom
    /// that is appended to `blooms`.
    pub fn grow(&mut self, rng: &mut impl Rng, blooms: &mut Vec<Bloom>) {
        if self.length < self.target_length {
            self.length += self.scale * GROWTH_RATE;
            self.thickness += THICKENING;

            let end = self.end();
            if let Offspring::Split(children) = &mut self.offspring {
                for child in children.iter_mut() {
                    child.set_start(end);
                }
            }
        } else if let Offspring::Split(children) = &mut self.offspring {
            if children.iter().any(|c| c.is_growing(blooms.as_slice())) {
                for child in children.iter_mut() {
                    child.grow(rng, blooms);
                }
            }
        }

        if let Offspring::Split(children) = &mut self.offspring {
            let [first, second] = &mut **children;
            if first.is_active() && first.is_grown() {
                if first.level < MAX_LEVEL {
                    first.branch(SPLIT_SCALE, SPLIT_LENGTH_SCALE, rng);
                    second.branch(SPLIT_SCALE, SPLIT_LENGTH_SCALE, rng);
                } else {
                    first.bloom_at_tip(rng, blooms);
                    second.bloom_at_tip(rng, blooms);
                }
            }
        }
    }

    /// Splits the branch into two children, deactivating it
    ///
    /// The children start at this branch's end, angled `0.3` to `0.5` radians to either side. They
    /// grow to `length_scale` times this branch's target length, with a scale of `scale * 0.9` and
    /// `scale` times this branch's current thickness.
    ///
    /// Does nothing if the branch is no longer active.
    pub fn branch(&mut self, scale: Float, length_scale: Float, rng: &mut impl Rng) {
        if !self.is_active() {
            return;
        }

        let start = self.end();
        let target_length = self.target_length * length_scale;
        let thickness = self.thickness * scale;

        let left_angle = self.angle + SPLIT_ANGLE + rng.gen::<Float>() * SPLIT_JITTER;
        let right_angle = self.angle - SPLIT_ANGLE - rng.gen::<Float>() * SPLIT_JITTER;

        let make_child = |angle| {
            Branch::new(
                start,
                angle,
                target_length,
                self.color,
                scale * CHILD_SCALE,
                self.level + 1,
                thickness,
            )
        };
        let children = [make_child(left_angle), make_child(right_angle)];

        debug!(
            "level {} branch split at ({:.1}, {:.1})",
            self.level, start.x, start.y
        );
        self.offspring = Offspring::Split(Box::new(children));
    }

    /// Ends growth of this branch with a bloom at its tip
    fn bloom_at_tip(&mut self, rng: &mut impl Rng, blooms: &mut Vec<Bloom>) {
        let tip = self.end();
        let id = BloomId::new(blooms.len());
        blooms.push(Bloom::new(tip, self.color, rng));

        debug!("bloom {:?} at ({:.1}, {:.1})", id, tip.x, tip.y);
        self.offspring = Offspring::Bloomed(id);
    }

    /// Moves the start of the branch, dragging every descendant along with it
    fn set_start(&mut self, start: Point) {
        self.start = start;

        let end = self.end();
        if let Offspring::Split(children) = &mut self.offspring {
            for child in children.iter_mut() {
                child.set_start(end);
            }
        }
    }
}
