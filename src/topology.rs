//! Periodic Cartesian neighbor map over a `Py x Px` process grid.
//!
//! Neighbor arithmetic uses `rem_euclid` throughout (see the Open Question
//! in `SPEC_FULL.md` §9): `(coord + delta).rem_euclid(extent)` is correct
//! for negative deltas at coordinate 0, unlike a plain `%`.

/// The eight compass directions plus the four cardinal ones used by the
/// 1D row-strip layout. Each variant's opposite is used to pair a send
/// with the peer's matching receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::S,
        Direction::E,
        Direction::W,
        Direction::NE,
        Direction::NW,
        Direction::SE,
        Direction::SW,
    ];

    /// Unique tag per direction, stable across ranks, so a rank that is its
    /// own neighbor (P=1 on some axis) can still disambiguate messages.
    pub fn tag(self) -> i32 {
        match self {
            Direction::N => 0,
            Direction::S => 1,
            Direction::E => 2,
            Direction::W => 3,
            Direction::NE => 4,
            Direction::NW => 5,
            Direction::SE => 6,
            Direction::SW => 7,
        }
    }

    /// The direction whose send pairs with this direction's receive.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::N => Direction::S,
            Direction::S => Direction::N,
            Direction::E => Direction::W,
            Direction::W => Direction::E,
            Direction::NE => Direction::SW,
            Direction::SW => Direction::NE,
            Direction::NW => Direction::SE,
            Direction::SE => Direction::NW,
        }
    }

    fn delta(self) -> (i64, i64) {
        match self {
            Direction::N => (-1, 0),
            Direction::S => (1, 0),
            Direction::E => (0, 1),
            Direction::W => (0, -1),
            Direction::NE => (-1, 1),
            Direction::NW => (-1, -1),
            Direction::SE => (1, 1),
            Direction::SW => (1, -1),
        }
    }
}

/// Periodic neighbor lookup over a `Py x Px` process grid.
#[derive(Debug, Clone, Copy)]
pub struct Topology {
    py: usize,
    px: usize,
}

impl Topology {
    pub fn new(py: usize, px: usize) -> Self {
        Topology { py, px }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.py, self.px)
    }

    pub fn rank_of(&self, py: usize, px: usize) -> usize {
        py * self.px + px
    }

    pub fn coords_of(&self, rank: usize) -> (usize, usize) {
        (rank / self.px, rank % self.px)
    }

    /// Rank of the neighbor of `rank` in direction `dir`, wrapping toroidally.
    pub fn neighbor(&self, rank: usize, dir: Direction) -> usize {
        let (py, px) = self.coords_of(rank);
        let (dy, dx) = dir.delta();
        let ny = (py as i64 + dy).rem_euclid(self.py as i64) as usize;
        let nx = (px as i64 + dx).rem_euclid(self.px as i64) as usize;
        self.rank_of(ny, nx)
    }
}
