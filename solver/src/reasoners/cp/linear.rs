use crate::core::state::Domains;
use crate::core::{clamp_to_int, LongCst, VarRef};
use crate::model::lang::{Linear, LinearTerm};
use crate::reasoners::cp::{Propagator, PropagatorId, Watches};
use crate::reasoners::Contradiction;
use num_integer::{div_ceil, div_floor};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug)]
struct SumElem {
    factor: LongCst,
    var: VarRef,
}

/// Bounds consistency for `lb <= sum(factor * var) <= ub`.
#[derive(Clone, Debug)]
pub struct LinearProp {
    elements: Vec<SumElem>,
    lb: LongCst,
    ub: LongCst,
}

impl LinearProp {
    pub fn new(constraint: &Linear) -> Self {
        LinearProp {
            elements: constraint
                .terms()
                .iter()
                .map(|&LinearTerm { factor, var }| SumElem {
                    factor: factor as LongCst,
                    var,
                })
                .collect(),
            lb: constraint.lb(),
            ub: constraint.ub(),
        }
    }

    fn get_lower_bound(elem: SumElem, domains: &Domains) -> LongCst {
        match elem.factor.cmp(&0) {
            Ordering::Less => domains.ub(elem.var) as LongCst,
            Ordering::Equal => 0,
            Ordering::Greater => domains.lb(elem.var) as LongCst,
        }
        .saturating_mul(elem.factor)
    }

    fn get_upper_bound(elem: SumElem, domains: &Domains) -> LongCst {
        match elem.factor.cmp(&0) {
            Ordering::Less => domains.lb(elem.var) as LongCst,
            Ordering::Equal => 0,
            Ordering::Greater => domains.ub(elem.var) as LongCst,
        }
        .saturating_mul(elem.factor)
    }

    /// Enforces `factor * var <= ub`.
    fn set_ub(elem: SumElem, ub: LongCst, domains: &mut Domains) -> Result<bool, Contradiction> {
        let changed = match elem.factor.cmp(&0) {
            // var >= ceil(ub / factor)
            Ordering::Less => domains.set_lb(elem.var, clamp_to_int(div_ceil(ub, elem.factor)))?,
            Ordering::Equal => false,
            // var <= floor(ub / factor)
            Ordering::Greater => domains.set_ub(elem.var, clamp_to_int(div_floor(ub, elem.factor)))?,
        };
        Ok(changed)
    }

    /// Enforces `factor * var >= lb`.
    fn set_lb(elem: SumElem, lb: LongCst, domains: &mut Domains) -> Result<bool, Contradiction> {
        let changed = match elem.factor.cmp(&0) {
            Ordering::Less => domains.set_ub(elem.var, clamp_to_int(div_floor(lb, elem.factor)))?,
            Ordering::Equal => false,
            Ordering::Greater => domains.set_lb(elem.var, clamp_to_int(div_ceil(lb, elem.factor)))?,
        };
        Ok(changed)
    }

    fn sum_bounds(&self, domains: &Domains) -> (LongCst, LongCst) {
        self.elements.iter().fold((0, 0), |(lb, ub): (LongCst, LongCst), &e| {
            (
                lb.saturating_add(Self::get_lower_bound(e, domains)),
                ub.saturating_add(Self::get_upper_bound(e, domains)),
            )
        })
    }
}

impl Propagator for LinearProp {
    fn setup(&self, id: PropagatorId, context: &mut Watches) {
        for e in &self.elements {
            context.add_watch(e.var, id);
        }
    }

    fn propagate(&self, domains: &mut Domains) -> Result<(), Contradiction> {
        loop {
            let (sum_lb, sum_ub) = self.sum_bounds(domains);
            if sum_lb > self.ub || sum_ub < self.lb {
                return Err(Contradiction::Failure("linear"));
            }
            let mut changed = false;
            for &e in &self.elements {
                let elem_lb = Self::get_lower_bound(e, domains);
                let elem_ub = Self::get_upper_bound(e, domains);
                if self.ub != Linear::NO_UB {
                    // the other elements take at least `sum_lb - elem_lb`
                    let max = self.ub.saturating_sub(sum_lb.saturating_sub(elem_lb));
                    if max < elem_ub {
                        changed |= Self::set_ub(e, max, domains)?;
                    }
                }
                if self.lb != Linear::NO_LB {
                    let min = self.lb.saturating_sub(sum_ub.saturating_sub(elem_ub));
                    if min > elem_lb {
                        changed |= Self::set_lb(e, min, domains)?;
                    }
                }
            }
            if !changed {
                return Ok(());
            }
        }
    }

    fn clone_box(&self) -> Box<dyn Propagator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IntCst;
    use crate::model::lang::linear::{eq, leq, LinearSum};
    use crate::model::lang::IVar;

    fn setup(bounds: &[(IntCst, IntCst)]) -> (Domains, Vec<IVar>) {
        let mut domains = Domains::new();
        let vars = bounds
            .iter()
            .map(|&(lb, ub)| IVar::new(domains.new_var(lb, ub)))
            .collect();
        (domains, vars)
    }

    #[test]
    fn sum_upper_bound() {
        let (mut d, v) = setup(&[(0, 10), (2, 10), (0, 10)]);
        // 2x + y - z <= 4
        let c = (LinearSum::zero() + v[0] * 2 + v[1] - v[2]).leq(4);
        LinearProp::new(&c).propagate(&mut d).unwrap();
        assert_eq!(d.bounds(v[0]), (0, 6));
        assert_eq!(d.bounds(v[1]), (2, 10));
        assert_eq!(d.bounds(v[2]), (0, 10));

        d.set_ub(v[2], 1).unwrap();
        LinearProp::new(&c).propagate(&mut d).unwrap();
        // 2x <= 4 + 1 - 2
        assert_eq!(d.bounds(v[0]), (0, 1));
        assert_eq!(d.bounds(v[1]), (2, 5));
    }

    #[test]
    fn equality() {
        let (mut d, v) = setup(&[(0, 3), (0, 3), (0, 100)]);
        // x + y == z
        let c = eq(v[0] + v[1], v[2]);
        LinearProp::new(&c).propagate(&mut d).unwrap();
        assert_eq!(d.bounds(v[2]), (0, 6));
        d.set_lb(v[2], 5).unwrap();
        LinearProp::new(&c).propagate(&mut d).unwrap();
        assert_eq!(d.bounds(v[0]), (2, 3));
        assert_eq!(d.bounds(v[1]), (2, 3));
    }

    #[test]
    fn inconsistency() {
        let (mut d, v) = setup(&[(5, 10), (0, 4)]);
        let c = leq(v[0], v[1]);
        assert!(LinearProp::new(&c).propagate(&mut d).is_err());

        // empty sum
        let (mut d, _) = setup(&[]);
        let c = LinearSum::zero().eq(3);
        assert_eq!(
            LinearProp::new(&c).propagate(&mut d),
            Err(Contradiction::Failure("linear"))
        );
    }
}
