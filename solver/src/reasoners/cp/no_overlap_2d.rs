use crate::core::state::Domains;
use crate::core::{IntCst, VarRef};
use crate::model::lang::{IntervalVar, NoOverlap2D};
use crate::reasoners::cp::{Propagator, PropagatorId, Watches};
use crate::reasoners::Contradiction;
use hashbrown::HashSet;

#[derive(Copy, Clone, Debug)]
struct Extent {
    start: VarRef,
    size: VarRef,
    end: VarRef,
}

impl Extent {
    fn new(interval: &IntervalVar) -> Self {
        Extent {
            start: interval.start.var(),
            size: interval.size.var(),
            end: interval.end.var(),
        }
    }

    fn min_size(&self, d: &Domains) -> IntCst {
        d.lb(self.size)
    }

    fn earliest_end(&self, d: &Domains) -> IntCst {
        d.lb(self.end).max(d.lb(self.start) + d.lb(self.size))
    }

    fn latest_start(&self, d: &Domains) -> IntCst {
        d.ub(self.start).min(d.ub(self.end) - d.lb(self.size))
    }

    fn can_precede(&self, other: &Extent, d: &Domains) -> bool {
        self.earliest_end(d) <= other.latest_start(d)
    }

    /// Enforces `self.end <= other.start`.
    fn precede(&self, other: &Extent, d: &mut Domains) -> Result<(), Contradiction> {
        d.set_lb(other.start, self.earliest_end(d))?;
        d.set_ub(self.end, other.latest_start(d))?;
        Ok(())
    }
}

/// Pairwise propagation of a two-dimensional no-overlap constraint.
///
/// Two rectangles are disjoint iff one is left of, right of, below or above the other.
/// When none of the four relations is possible the constraint fails, and when exactly one
/// remains it is enforced on the bounds.
#[derive(Clone, Debug)]
pub struct NoOverlap2DProp {
    boxes: Vec<(Extent, Extent)>,
}

impl NoOverlap2DProp {
    pub fn new(constraint: &NoOverlap2D) -> Self {
        NoOverlap2DProp {
            boxes: constraint
                .x
                .iter()
                .zip(constraint.y.iter())
                .map(|(x, y)| (Extent::new(x), Extent::new(y)))
                .collect(),
        }
    }

    fn propagate_pair(a: &(Extent, Extent), b: &(Extent, Extent), d: &mut Domains) -> Result<(), Contradiction> {
        let (ax, ay) = a;
        let (bx, by) = b;
        if ax.min_size(d) == 0 || ay.min_size(d) == 0 || bx.min_size(d) == 0 || by.min_size(d) == 0 {
            // a box may be empty and then never conflicts
            return Ok(());
        }
        let options = [
            (ax, bx, ax.can_precede(bx, d)),
            (bx, ax, bx.can_precede(ax, d)),
            (ay, by, ay.can_precede(by, d)),
            (by, ay, by.can_precede(ay, d)),
        ];
        let mut possible = options.iter().filter(|(_, _, possible)| *possible);
        match (possible.next(), possible.next()) {
            (None, _) => Err(Contradiction::Failure("no-overlap-2d")),
            (Some((first, second, _)), None) => first.precede(second, d),
            _ => Ok(()),
        }
    }
}

impl Propagator for NoOverlap2DProp {
    fn setup(&self, id: PropagatorId, context: &mut Watches) {
        let mut vars = HashSet::with_capacity(self.boxes.len() * 6);
        for (x, y) in &self.boxes {
            for e in [x, y] {
                vars.insert(e.start);
                vars.insert(e.size);
                vars.insert(e.end);
            }
        }
        for var in vars {
            context.add_watch(var, id);
        }
    }

    fn propagate(&self, domains: &mut Domains) -> Result<(), Contradiction> {
        for (i, a) in self.boxes.iter().enumerate() {
            for b in &self.boxes[i + 1..] {
                Self::propagate_pair(a, b, domains)?;
            }
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Propagator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lang::IVar;

    fn interval(d: &mut Domains, start: (IntCst, IntCst), size: (IntCst, IntCst)) -> IntervalVar {
        let s = d.new_var(start.0, start.1);
        let l = d.new_var(size.0, size.1);
        let e = d.new_var(start.0 + size.0, start.1 + size.1);
        IntervalVar {
            start: IVar::new(s),
            size: IVar::new(l),
            end: IVar::new(e),
        }
    }

    #[test]
    fn single_remaining_relation_is_enforced() {
        let mut d = Domains::new();
        // a fixed 2x2 square at the origin
        let ax = interval(&mut d, (0, 0), (2, 2));
        let ay = interval(&mut d, (0, 0), (2, 2));
        // a 1x3 box that must be in rows [0, 3) of a 3 high container, hence on the right of `a`
        let bx = interval(&mut d, (0, 3), (1, 1));
        let by = interval(&mut d, (0, 0), (3, 3));
        let prop = NoOverlap2DProp::new(&NoOverlap2D::new([ax, bx], [ay, by]));
        prop.propagate(&mut d).unwrap();
        assert_eq!(d.bounds(bx.start), (2, 3));
    }

    #[test]
    fn overlapping_fixed_boxes_fail() {
        let mut d = Domains::new();
        let ax = interval(&mut d, (0, 0), (2, 2));
        let ay = interval(&mut d, (0, 0), (2, 2));
        let bx = interval(&mut d, (1, 1), (2, 2));
        let by = interval(&mut d, (1, 1), (2, 2));
        let prop = NoOverlap2DProp::new(&NoOverlap2D::new([ax, bx], [ay, by]));
        assert_eq!(prop.propagate(&mut d), Err(Contradiction::Failure("no-overlap-2d")));
    }

    #[test]
    fn empty_boxes_are_ignored() {
        let mut d = Domains::new();
        let ax = interval(&mut d, (0, 0), (2, 2));
        let ay = interval(&mut d, (0, 0), (2, 2));
        let bx = interval(&mut d, (1, 1), (0, 0));
        let by = interval(&mut d, (1, 1), (2, 2));
        let prop = NoOverlap2DProp::new(&NoOverlap2D::new([ax, bx], [ay, by]));
        assert!(prop.propagate(&mut d).is_ok());
    }
}
