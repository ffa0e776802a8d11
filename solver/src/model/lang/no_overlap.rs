use crate::core::{IntCst, VarRef};
use crate::model::lang::IntervalVar;
use std::fmt::{Display, Formatter};

/// Rectangles `x[i] × y[i]` must be pairwise disjoint.
///
/// A rectangle with a null width or height occupies no area and never conflicts with another one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoOverlap2D {
    pub x: Vec<IntervalVar>,
    pub y: Vec<IntervalVar>,
}

impl NoOverlap2D {
    pub fn new(x: impl IntoIterator<Item = IntervalVar>, y: impl IntoIterator<Item = IntervalVar>) -> Self {
        NoOverlap2D {
            x: x.into_iter().collect(),
            y: y.into_iter().collect(),
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = VarRef> + '_ {
        self.x.iter().chain(self.y.iter()).flat_map(|i| i.variables())
    }

    pub fn is_satisfied(&self, values: &[IntCst]) -> bool {
        let value = |v: VarRef| values[v.index()];
        // (x start, x end, y start, y end) of rectangles with a positive area
        let rects: Vec<_> = self
            .x
            .iter()
            .zip(self.y.iter())
            .filter(|(x, y)| value(x.size.var()) > 0 && value(y.size.var()) > 0)
            .map(|(x, y)| {
                (
                    value(x.start.var()),
                    value(x.end.var()),
                    value(y.start.var()),
                    value(y.end.var()),
                )
            })
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let x_overlap = a.0 < b.1 && b.0 < a.1;
                let y_overlap = a.2 < b.3 && b.2 < a.3;
                if x_overlap && y_overlap {
                    return false;
                }
            }
        }
        true
    }
}

impl Display for NoOverlap2D {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "no-overlap-2d(")?;
        for (i, (x, y)) in self.x.iter().zip(self.y.iter()).enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{:?}, {:?}] x [{:?}, {:?}]", x.start.var(), x.end.var(), y.start.var(), y.end.var())?;
        }
        write!(f, ")")
    }
}
