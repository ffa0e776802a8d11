use crate::problem::Rectangle;
use itertools::Itertools;
use quilt::core::{IntCst, LongCst};
use std::fmt::{Display, Formatter};

/// A square of the cover, given by its bottom-left corner and side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlacedSquare {
    pub x: IntCst,
    pub y: IntCst,
    pub size: IntCst,
}

impl PlacedSquare {
    fn overlaps(&self, other: &PlacedSquare) -> bool {
        self.x < other.x + other.size
            && other.x < self.x + self.size
            && self.y < other.y + other.size
            && other.y < self.y + self.size
    }

    fn area(&self) -> LongCst {
        self.size as LongCst * self.size as LongCst
    }
}

impl Display for PlacedSquare {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.size, self.size, self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TilingError {
    #[error("square {index} ({square}) is not inside the {rect} rectangle")]
    OutOfBounds {
        index: usize,
        square: PlacedSquare,
        rect: Rectangle,
    },
    #[error("squares {first} and {second} overlap")]
    Overlap { first: usize, second: usize },
    #[error("squares cover an area of {covered} instead of {expected}")]
    AreaMismatch { covered: LongCst, expected: LongCst },
}

/// The placement of each square of a cover, as read from a solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tiling {
    pub rect: Rectangle,
    pub squares: Vec<PlacedSquare>,
}

impl Tiling {
    /// Checks that the squares exactly cover the rectangle: each is inside, no two overlap and
    /// their total area is the one of the rectangle.
    pub fn validate(&self) -> Result<(), TilingError> {
        let rect = self.rect;
        for (index, &square) in self.squares.iter().enumerate() {
            let inside = square.size > 0
                && square.x >= 0
                && square.y >= 0
                && square.x + square.size <= rect.width
                && square.y + square.size <= rect.height;
            if !inside {
                return Err(TilingError::OutOfBounds { index, square, rect });
            }
        }
        if let Some((first, second)) = self
            .squares
            .iter()
            .enumerate()
            .tuple_combinations()
            .find(|((_, a), (_, b))| a.overlaps(b))
            .map(|((i, _), (j, _))| (i, j))
        {
            return Err(TilingError::Overlap { first, second });
        }
        let covered: LongCst = self.squares.iter().map(|s| s.area()).sum();
        if covered != rect.area() {
            return Err(TilingError::AreaMismatch {
                covered,
                expected: rect.area(),
            });
        }
        Ok(())
    }

    /// Draws each square on a grid of the rectangle, in order. Cells outside the rectangle are ignored.
    pub fn render(&self) -> Grid {
        let width = self.rect.width.max(0) as usize;
        let height = self.rect.height.max(0) as usize;
        let mut grid = Grid {
            width,
            height,
            cells: vec![None; width * height],
            overlaps: Vec::new(),
        };
        for (index, square) in self.squares.iter().enumerate() {
            for y in square.y.max(0)..(square.y + square.size).min(self.rect.height) {
                for x in square.x.max(0)..(square.x + square.size).min(self.rect.width) {
                    let cell = &mut grid.cells[y as usize * width + x as usize];
                    if let Some(previous) = cell.replace(index) {
                        grid.overlaps.push((previous, index));
                    }
                }
            }
        }
        grid
    }
}

/// Character drawn for the square of the given index: its digit in base 36, `#` beyond.
///
/// Squares below 16 are thus drawn with their hexadecimal digit.
pub fn glyph(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| std::char::from_digit(i, 36))
        .unwrap_or('#')
}

/// Cells of a rectangle, each covered by at most one square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<usize>>,
    /// Pairs `(a, b)` such that square `b` was drawn over a cell of square `a`, in drawing order.
    pub overlaps: Vec<(usize, usize)>,
}

impl Grid {
    /// Index of the last square drawn on the cell.
    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<usize>]> + '_ {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }
}

/// One line per row, starting from `y = 0`, with cells separated by a space.
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lines = self.rows().map(|row| {
            row.iter()
                .map(|cell| cell.map_or(' ', glyph))
                .join(" ")
        });
        write!(f, "{}", lines.format("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(x: IntCst, y: IntCst, size: IntCst) -> PlacedSquare {
        PlacedSquare { x, y, size }
    }

    #[test]
    fn glyphs() {
        assert_eq!(glyph(0), '0');
        assert_eq!(glyph(10), 'a');
        assert_eq!(glyph(15), 'f');
        assert_eq!(glyph(16), 'g');
        assert_eq!(glyph(35), 'z');
        assert_eq!(glyph(36), '#');
    }

    #[test]
    fn valid_tiling() {
        let tiling = Tiling {
            rect: Rectangle::new(3, 2),
            squares: vec![sq(0, 0, 2), sq(2, 0, 1), sq(2, 1, 1)],
        };
        assert_eq!(tiling.validate(), Ok(()));
        let grid = tiling.render();
        assert!(grid.overlaps.is_empty());
        assert_eq!(grid.get(2, 1), Some(2));
        assert_eq!(grid.to_string(), "0 0 1\n0 0 2");
    }

    #[test]
    fn invalid_tilings() {
        let rect = Rectangle::new(3, 2);
        let tiling = Tiling {
            rect,
            squares: vec![sq(0, 0, 2), sq(2, 0, 2)],
        };
        assert_eq!(
            tiling.validate(),
            Err(TilingError::OutOfBounds {
                index: 1,
                square: sq(2, 0, 2),
                rect
            })
        );

        let tiling = Tiling {
            rect,
            squares: vec![sq(0, 0, 2), sq(1, 1, 1), sq(2, 0, 1)],
        };
        assert_eq!(tiling.validate(), Err(TilingError::Overlap { first: 0, second: 1 }));
        let grid = tiling.render();
        assert_eq!(grid.overlaps, vec![(0, 1)]);
        assert_eq!(grid.to_string(), "0 0 2\n0 1  ");

        let tiling = Tiling {
            rect,
            squares: vec![sq(0, 0, 2), sq(2, 0, 1)],
        };
        assert_eq!(
            tiling.validate(),
            Err(TilingError::AreaMismatch { covered: 5, expected: 6 })
        );
    }
}
