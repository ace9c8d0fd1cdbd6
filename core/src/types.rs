use smallvec::SmallVec;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Up to eight sibling coordinates, kept inline.
pub type Siblings = SmallVec<[Coord2; 8]>;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Boards are stored row-major, so `(x, y)` maps to `[y, x]`.
impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Compass offsets `(dx, dy)`, fixed so sibling order is stable.
const DIRECTIONS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

fn offset(coords: Coord2, (dx, dy): (i8, i8), (width, height): Coord2) -> Option<Coord2> {
    let x = coords.0.checked_add_signed(dx)?;
    let y = coords.1.checked_add_signed(dy)?;
    (x < width && y < height).then_some((x, y))
}

/// Valid neighbours of `coords` on a board of `size`, out-of-bounds positions dropped.
pub fn siblings(coords: Coord2, size: Coord2) -> Siblings {
    DIRECTIONS
        .iter()
        .filter_map(|&delta| offset(coords, delta, size))
        .collect()
}

/// Whether `a` lies in the 3×3 Chebyshev neighbourhood of `b` (including `b` itself).
pub const fn is_near(a: Coord2, b: Coord2) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}
