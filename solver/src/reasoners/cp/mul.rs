use crate::core::state::Domains;
use crate::core::{clamp_to_int, LongCst, VarRef};
use crate::model::lang::Mul;
use crate::reasoners::cp::{Propagator, PropagatorId, Watches};
use crate::reasoners::Contradiction;
use num_integer::{div_ceil, div_floor, Roots};

/// A propagator for multiplication (`prod = fact1 * fact2`).
///
/// Bounds of the product are always propagated. Bounds of a factor are only propagated
/// when the other factor has a known sign. The square case (`fact1 == fact2`) uses integer roots.
#[derive(Clone, Debug)]
pub struct MulProp {
    prod: VarRef,
    fact1: VarRef,
    fact2: VarRef,
}

fn ceil_sqrt(n: LongCst) -> LongCst {
    let r = n.sqrt();
    if r * r < n {
        r + 1
    } else {
        r
    }
}

/// Bounds of `f` such that `f * d` may lie in `[p_lb, p_ub]`, for a strictly positive `d` in `[d_lb, d_ub]`.
fn quotient_bounds(p_lb: LongCst, p_ub: LongCst, d_lb: LongCst, d_ub: LongCst) -> (LongCst, LongCst) {
    debug_assert!(d_lb > 0 && d_lb <= d_ub);
    let lb = if p_lb >= 0 {
        div_ceil(p_lb, d_ub)
    } else {
        div_ceil(p_lb, d_lb)
    };
    let ub = if p_ub >= 0 {
        div_floor(p_ub, d_lb)
    } else {
        div_floor(p_ub, d_ub)
    };
    (lb, ub)
}

impl MulProp {
    pub fn new(constraint: &Mul) -> Self {
        MulProp {
            prod: constraint.prod.var(),
            fact1: constraint.fact1.var(),
            fact2: constraint.fact2.var(),
        }
    }

    fn bounds(domains: &Domains, var: VarRef) -> (LongCst, LongCst) {
        let (lb, ub) = domains.bounds(var);
        (lb as LongCst, ub as LongCst)
    }

    fn set_bounds(domains: &mut Domains, var: VarRef, lb: LongCst, ub: LongCst) -> Result<bool, Contradiction> {
        let lb_changed = domains.set_lb(var, clamp_to_int(lb))?;
        let ub_changed = domains.set_ub(var, clamp_to_int(ub))?;
        Ok(lb_changed || ub_changed)
    }

    /// Restricts `fact` from `prod = fact * other`. Returns true if a bound changed.
    fn propagate_factor(&self, domains: &mut Domains, fact: VarRef, other: VarRef) -> Result<bool, Contradiction> {
        let (p_lb, p_ub) = Self::bounds(domains, self.prod);
        let (o_lb, o_ub) = Self::bounds(domains, other);
        let (lb, ub) = if o_lb > 0 {
            quotient_bounds(p_lb, p_ub, o_lb, o_ub)
        } else if o_ub < 0 {
            // fact * other == (-prod) * (-other)
            let (lb, ub) = quotient_bounds(-p_ub, -p_lb, -o_ub, -o_lb);
            (-ub, -lb)
        } else {
            return Ok(false);
        };
        Self::set_bounds(domains, fact, lb, ub)
    }

    fn propagate_iteration(&self, domains: &mut Domains) -> Result<bool, Contradiction> {
        let (a_lb, a_ub) = Self::bounds(domains, self.fact1);
        let (b_lb, b_ub) = Self::bounds(domains, self.fact2);
        let corners = [a_lb * b_lb, a_lb * b_ub, a_ub * b_lb, a_ub * b_ub];
        let min = corners.iter().copied().min().unwrap_or(0);
        let max = corners.iter().copied().max().unwrap_or(0);
        let mut changed = Self::set_bounds(domains, self.prod, min, max)?;
        changed |= self.propagate_factor(domains, self.fact1, self.fact2)?;
        changed |= self.propagate_factor(domains, self.fact2, self.fact1)?;
        Ok(changed)
    }

    fn propagate_square_iteration(&self, domains: &mut Domains) -> Result<bool, Contradiction> {
        let x = self.fact1;
        let (x_lb, x_ub) = Self::bounds(domains, x);
        let (sq_lb, sq_ub) = if x_lb >= 0 {
            (x_lb * x_lb, x_ub * x_ub)
        } else if x_ub <= 0 {
            (x_ub * x_ub, x_lb * x_lb)
        } else {
            (0, (x_lb * x_lb).max(x_ub * x_ub))
        };
        let mut changed = Self::set_bounds(domains, self.prod, sq_lb, sq_ub)?;

        let (p_lb, p_ub) = Self::bounds(domains, self.prod);
        // p_ub >= 0 holds since the product was just restricted to the squares
        let root = p_ub.sqrt();
        changed |= Self::set_bounds(domains, x, -root, root)?;
        if p_lb > 0 {
            // |x| >= ceil(sqrt(p_lb))
            let min_abs = ceil_sqrt(p_lb);
            let (x_lb, x_ub) = Self::bounds(domains, x);
            if x_lb > -min_abs {
                changed |= domains.set_lb(x, clamp_to_int(min_abs))?;
            } else if x_ub < min_abs {
                changed |= domains.set_ub(x, clamp_to_int(-min_abs))?;
            }
        }
        Ok(changed)
    }
}

impl Propagator for MulProp {
    fn setup(&self, id: PropagatorId, context: &mut Watches) {
        context.add_watch(self.prod, id);
        context.add_watch(self.fact1, id);
        context.add_watch(self.fact2, id);
    }

    fn propagate(&self, domains: &mut Domains) -> Result<(), Contradiction> {
        if self.fact1 == self.fact2 {
            while self.propagate_square_iteration(domains)? {}
        } else {
            while self.propagate_iteration(domains)? {}
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Propagator> {
        Box::new(self.clone())
    }
}
