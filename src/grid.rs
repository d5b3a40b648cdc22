use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::WorldOffset;

/// Width of the simulation domain. Valid `x` coordinates are `0..WIDTH`.
pub const WIDTH: WorldOffset = 999_999;

/// Height of the simulation domain. Valid `y` coordinates are `0..HEIGHT`.
pub const HEIGHT: WorldOffset = 999_999;

/// Offsets of the Moore neighborhood, horizontal offset outer, vertical offset inner.
const OFFSETS: [(WorldOffset, WorldOffset); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A single cell of the grid. `y` grows downward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: WorldOffset,
    pub y: WorldOffset,
}

impl Coord {
    pub const fn new(x: WorldOffset, y: WorldOffset) -> Self {
        Self { x, y }
    }

    /// Whether this coordinate lies inside `0..WIDTH` x `0..HEIGHT`.
    pub const fn in_bounds(&self) -> bool {
        0 <= self.x && self.x < WIDTH && 0 <= self.y && self.y < HEIGHT
    }

    /// Translate by `(dx, dy)`. Returns `None` on integer overflow.
    pub const fn checked_offset(&self, dx: WorldOffset, dy: WorldOffset) -> Option<Self> {
        let Some(x) = self.x.checked_add(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add(dy) else {
            return None;
        };

        Some(Self { x, y })
    }

    pub fn neighbors(self) -> Neighbors {
        neighbors(self)
    }
}

impl From<(WorldOffset, WorldOffset)> for Coord {
    fn from((x, y): (WorldOffset, WorldOffset)) -> Self {
        Self { x, y }
    }
}

impl Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Enumerate the in-bounds cells at Chebyshev distance 1 from `c`.
///
/// There are 8 of them for interior cells, 5 along an edge and 3 in a corner. Neighbors outside
/// the domain are dropped rather than wrapped, so the domain behaves like a finite board.
pub fn neighbors(c: Coord) -> Neighbors {
    Neighbors { center: c, i: 0 }
}

/// Lazy iterator returned by [`neighbors`].
#[derive(Debug, Clone)]
pub struct Neighbors {
    center: Coord,

    /// Index of the next offset to try in `OFFSETS`
    i: usize,
}

impl Iterator for Neighbors {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        while let Some(&(dx, dy)) = OFFSETS.get(self.i) {
            self.i += 1;

            match self.center.checked_offset(dx, dy) {
                Some(c) if c.in_bounds() => return Some(c),
                _ => {}
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(OFFSETS.len().saturating_sub(self.i)))
    }
}

impl FusedIterator for Neighbors {}

/// Axis-Aligned Bounding Box over a set of cells. Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aabb {
    pub min: Coord,
    pub max: Coord,
}

impl Aabb {
    /// A box containing only `c`.
    pub const fn at(c: Coord) -> Self {
        Self { min: c, max: c }
    }

    /// Create an AABB from a list of `Coord`s. Returns `None` if there are none.
    pub fn from_coords<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let mut coords = coords.into_iter();
        let mut b = Self::at(*coords.next()?);

        for c in coords {
            b.add(c);
        }

        Some(b)
    }

    /// Grow the box so that it contains `c`.
    pub fn add(&mut self, c: &Coord) {
        self.min.x = self.min.x.min(c.x);
        self.min.y = self.min.y.min(c.y);
        self.max.x = self.max.x.max(c.x);
        self.max.y = self.max.y.max(c.y);
    }

    pub fn width(&self) -> WorldOffset {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> WorldOffset {
        self.max.y - self.min.y + 1
    }

    /// Center of the box, rounded toward `min`.
    pub fn center(&self) -> Coord {
        Coord {
            x: self.min.x + (self.max.x - self.min.x) / 2,
            y: self.min.y + (self.max.y - self.min.y) / 2,
        }
    }
}
