use crate::problem::{Rectangle, RectangleError};
use crate::tiling::{PlacedSquare, Tiling};
use quilt::core::{IntCst, LongCst};
use quilt::model::lang::{linear, Cumulative, IVar, IntervalVar, NoOverlap2D};
use quilt::solver::Solution;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Labels of the variables of the model, indexed by square.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Var {
    Size(usize),
    StartX(usize),
    EndX(usize),
    StartY(usize),
    EndY(usize),
    IntervalX(usize),
    IntervalY(usize),
    Area(usize),
}

impl Display for Var {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Var::Size(i) => write!(f, "size_{i}"),
            Var::StartX(i) => write!(f, "sx_{i}"),
            Var::EndX(i) => write!(f, "ex_{i}"),
            Var::StartY(i) => write!(f, "sy_{i}"),
            Var::EndY(i) => write!(f, "ey_{i}"),
            Var::IntervalX(i) => write!(f, "ix_{i}"),
            Var::IntervalY(i) => write!(f, "iy_{i}"),
            Var::Area(i) => write!(f, "area_{i}"),
        }
    }
}

pub type Model = quilt::model::Model<Var>;
pub type Solver = quilt::solver::Solver<Var>;

/// Constraints that remove covers equivalent to another one, up to a permutation of the squares
/// or a reflection of the rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SymmetryBreaking {
    None,
    /// Squares are ordered by size and the first one lies in the lower-left quadrant.
    #[default]
    Size,
    /// Squares are ordered by the position of their bottom-left corner, row by row from the bottom.
    Placement,
}

impl FromStr for SymmetryBreaking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SymmetryBreaking::None),
            "size" => Ok(SymmetryBreaking::Size),
            "placement" => Ok(SymmetryBreaking::Placement),
            e => Err(format!("Unrecognized symmetry breaking: '{e}'")),
        }
    }
}

impl Display for SymmetryBreaking {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SymmetryBreaking::None => write!(f, "none"),
            SymmetryBreaking::Size => write!(f, "size"),
            SymmetryBreaking::Placement => write!(f, "placement"),
        }
    }
}

/// Optional constraints of the model. None of them changes the set of coverable square counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncodingOptions {
    pub symmetry_breaking: SymmetryBreaking,
    /// Add the cumulative relaxations of the no-overlap constraint on each axis.
    pub cumulative: bool,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        EncodingOptions {
            symmetry_breaking: SymmetryBreaking::default(),
            cumulative: true,
        }
    }
}

/// Variables of a single square.
#[derive(Copy, Clone, Debug)]
pub struct Square {
    pub size: IVar,
    pub x: IntervalVar,
    pub y: IntervalVar,
    pub area: IVar,
}

/// Variables of the model, to build a search strategy and read back solutions.
#[derive(Clone, Debug)]
pub struct Encoding {
    pub rect: Rectangle,
    pub squares: Vec<Square>,
    pub symmetry_breaking: SymmetryBreaking,
}

impl Encoding {
    pub fn x_intervals(&self) -> impl Iterator<Item = IntervalVar> + '_ {
        self.squares.iter().map(|s| s.x)
    }

    pub fn y_intervals(&self) -> impl Iterator<Item = IntervalVar> + '_ {
        self.squares.iter().map(|s| s.y)
    }

    /// Reads the placement of every square from a solution of the model.
    pub fn tiling(&self, solution: &Solution) -> Tiling {
        Tiling {
            rect: self.rect,
            squares: self
                .squares
                .iter()
                .map(|s| PlacedSquare {
                    x: solution.value(s.x.start),
                    y: solution.value(s.y.start),
                    size: solution.value(s.size),
                })
                .collect(),
        }
    }
}

/// Builds the model of a cover of `rect` by exactly `num_squares` squares.
///
/// Fails if the rectangle is empty or if its area is not a valid integer constant.
pub fn encode(rect: Rectangle, num_squares: usize, options: &EncodingOptions) -> Result<(Model, Encoding), RectangleError> {
    rect.validate()?;
    let Rectangle { width, height } = rect;
    // both fit an integer constant once the rectangle is valid
    let total_area = rect.area() as IntCst;
    let max_area = (height as LongCst * height as LongCst).min(rect.area()) as IntCst;
    let mut model = Model::new();

    let squares: Vec<Square> = (0..num_squares)
        .map(|i| {
            let size = model.new_ivar(1, height, Var::Size(i));
            let sx = model.new_ivar(0, width, Var::StartX(i));
            let ex = model.new_ivar(0, width, Var::EndX(i));
            let sy = model.new_ivar(0, height, Var::StartY(i));
            let ey = model.new_ivar(0, height, Var::EndY(i));
            let x = model.new_interval(sx, size, ex, Var::IntervalX(i));
            let y = model.new_interval(sy, size, ey, Var::IntervalY(i));
            let area = model.new_ivar(1, max_area, Var::Area(i));
            model.add_mul(area, size, size);
            Square { size, x, y, area }
        })
        .collect();

    model.enforce(NoOverlap2D::new(
        squares.iter().map(|s| s.x),
        squares.iter().map(|s| s.y),
    ));
    if options.cumulative {
        let sizes = || squares.iter().map(|s| s.size);
        model.enforce(Cumulative::new(squares.iter().map(|s| s.x), sizes(), height));
        model.enforce(Cumulative::new(squares.iter().map(|s| s.y), sizes(), width));
    }
    model.add_sum_eq(squares.iter().map(|s| s.area), total_area);

    match options.symmetry_breaking {
        SymmetryBreaking::None => {}
        SymmetryBreaking::Size => {
            model.enforce_all(squares.windows(2).map(|pair| linear::leq(pair[0].size, pair[1].size)));
            if let Some(first) = squares.first() {
                // a reflection of any cover puts its first square in the lower-left quadrant
                model.enforce(linear::lt(first.x.start, (width + 1) / 2));
                model.enforce(linear::lt(first.y.start, (height + 1) / 2));
            }
        }
        SymmetryBreaking::Placement => {
            let corner = |s: &Square| s.y.start * width + s.x.start;
            model.enforce_all(squares.windows(2).map(|pair| linear::lt(corner(&pair[0]), corner(&pair[1]))));
        }
    }

    let encoding = Encoding {
        rect,
        squares,
        symmetry_breaking: options.symmetry_breaking,
    };
    Ok((model, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quilt::model::Constraint;

    #[test]
    fn variables_and_constraints() {
        let (model, encoding) = encode(Rectangle::new(72, 37), 3, &EncodingOptions::default()).unwrap();
        assert_eq!(encoding.squares.len(), 3);
        // 6 variables per square
        assert_eq!(model.num_variables(), 18);

        let sq = encoding.squares[1];
        assert_eq!(model.fmt_var(sq.size), "size_1");
        assert_eq!(model.fmt_var(sq.x.end), "ex_1");
        assert_eq!(model.fmt_var(sq.area), "area_1");
        assert_eq!(model.state.bounds(sq.size), (1, 37));
        assert_eq!(model.state.bounds(sq.area), (1, 37 * 37));
        assert_eq!(model.state.bounds(sq.y.start), (0, 37));
        assert_eq!(model.shape.intervals[2], (sq.x, Var::IntervalX(1)));

        let count = |pred: fn(&Constraint) -> bool| model.constraints().iter().filter(|c| pred(c)).count();
        assert_eq!(count(|c| matches!(c, Constraint::NoOverlap2D(_))), 1);
        assert_eq!(count(|c| matches!(c, Constraint::Cumulative(_))), 2);
        assert_eq!(count(|c| matches!(c, Constraint::Mul(_))), 3);
        // 2 intervals per square, the total area, 2 size orderings and the 2 quadrant constraints
        assert_eq!(count(|c| matches!(c, Constraint::Linear(_))), 6 + 1 + 2 + 2);

        let first = encoding.squares[0];
        assert!(model
            .constraints()
            .contains(&Constraint::Linear(linear::lt(first.x.start, 36))));
        assert!(model
            .constraints()
            .contains(&Constraint::Linear(linear::lt(first.y.start, 19))));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn optional_constraints() {
        let options = EncodingOptions {
            symmetry_breaking: SymmetryBreaking::None,
            cumulative: false,
        };
        let (model, _) = encode(Rectangle::new(5, 3), 4, &options).unwrap();
        // intervals, products, no-overlap and total area
        assert_eq!(model.constraints().len(), 8 + 4 + 1 + 1);

        let (model, _) = encode(Rectangle::new(5, 3), 0, &EncodingOptions::default()).unwrap();
        assert_eq!(model.num_variables(), 0);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn squares_ordered_by_placement() {
        let options = EncodingOptions {
            symmetry_breaking: SymmetryBreaking::Placement,
            cumulative: true,
        };
        let (model, encoding) = encode(Rectangle::new(5, 3), 3, &options).unwrap();
        assert_eq!(encoding.symmetry_breaking, SymmetryBreaking::Placement);
        let (a, b) = (encoding.squares[0], encoding.squares[1]);
        let order = linear::lt(a.y.start * 5 + a.x.start, b.y.start * 5 + b.x.start);
        assert!(model.constraints().contains(&Constraint::Linear(order)));
        // 2 intervals per square, the total area and 2 placement orderings
        let num_linear = model.constraints().iter().filter(|c| matches!(c, Constraint::Linear(_))).count();
        assert_eq!(num_linear, 6 + 1 + 2);
        for s in [SymmetryBreaking::None, SymmetryBreaking::Size, SymmetryBreaking::Placement] {
            assert_eq!(s.to_string().parse(), Ok(s));
        }
    }

    #[test]
    fn rectangles_too_large_are_rejected() {
        let rect = Rectangle::new(50_000, 50_000);
        assert_eq!(
            encode(rect, 1, &EncodingOptions::default()).err(),
            Some(RectangleError::TooLarge(rect))
        );

        // the area of a square is bounded by the area of the rectangle
        let (model, encoding) = encode(Rectangle::new(2, 40_000), 2, &EncodingOptions::default()).unwrap();
        assert_eq!(model.state.bounds(encoding.squares[0].area), (1, 80_000));
    }
}
