use crate::backtrack::{Backtrack, DecLvl, Trail};
use crate::core::{IntCst, Lit, LongCst, Relation, VarRef};
use std::fmt::{Display, Formatter};

/// Error returned when an update would leave a variable with an empty domain.
/// The literal is the one that could not be enforced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidUpdate(pub Lit);

impl Display for InvalidUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid update: {:?}", self.0)
    }
}

impl std::error::Error for InvalidUpdate {}

/// Bounds of a variable before a change, recorded to undo it.
#[derive(Copy, Clone, Debug)]
struct BoundChange {
    var: VarRef,
    previous_lb: IntCst,
    previous_ub: IntCst,
}

/// Interval domains `[lb, ub]` of all integer variables, with the ability to undo
/// changes back to a saved state.
///
/// Each variable whose bounds change is queued until the propagation engine collects it
/// with [`Domains::pop_update`].
#[derive(Clone, Debug, Default)]
pub struct Domains {
    lbs: Vec<IntCst>,
    ubs: Vec<IntCst>,
    trail: Trail<BoundChange>,
    updated: Vec<VarRef>,
}

impl Domains {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new variable with domain `[lb, ub]`.
    /// An empty domain (`lb > ub`) is accepted here and must be detected by the caller.
    pub fn new_var(&mut self, lb: IntCst, ub: IntCst) -> VarRef {
        let var = VarRef::from(self.lbs.len());
        self.lbs.push(lb);
        self.ubs.push(ub);
        var
    }

    pub fn num_variables(&self) -> usize {
        self.lbs.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = VarRef> {
        (0..self.lbs.len()).map(VarRef::from)
    }

    pub fn lb(&self, var: impl Into<VarRef>) -> IntCst {
        self.lbs[var.into().index()]
    }

    pub fn ub(&self, var: impl Into<VarRef>) -> IntCst {
        self.ubs[var.into().index()]
    }

    pub fn bounds(&self, var: impl Into<VarRef>) -> (IntCst, IntCst) {
        let var = var.into();
        (self.lb(var), self.ub(var))
    }

    pub fn is_bound(&self, var: impl Into<VarRef>) -> bool {
        let (lb, ub) = self.bounds(var);
        lb == ub
    }

    /// Value of the variable, if its domain is a singleton.
    pub fn value(&self, var: impl Into<VarRef>) -> Option<IntCst> {
        let (lb, ub) = self.bounds(var);
        if lb == ub {
            Some(lb)
        } else {
            None
        }
    }

    /// Number of values in the domain of the variable.
    pub fn size(&self, var: impl Into<VarRef>) -> LongCst {
        let (lb, ub) = self.bounds(var);
        (ub as LongCst - lb as LongCst + 1).max(0)
    }

    pub fn entails(&self, lit: Lit) -> bool {
        match lit.relation() {
            Relation::Leq => self.ub(lit.variable()) <= lit.value(),
            Relation::Geq => self.lb(lit.variable()) >= lit.value(),
        }
    }

    /// Returns true if the literal can never hold in the current state.
    pub fn violates(&self, lit: Lit) -> bool {
        self.entails(!lit)
    }

    /// Raises the lower bound of `var`.
    /// Returns `Ok(true)` if the domain changed and `Ok(false)` if the bound was already entailed.
    pub fn set_lb(&mut self, var: impl Into<VarRef>, lb: IntCst) -> Result<bool, InvalidUpdate> {
        let var = var.into();
        let (prev_lb, prev_ub) = self.bounds(var);
        if lb <= prev_lb {
            Ok(false)
        } else if lb > prev_ub {
            Err(InvalidUpdate(Lit::geq(var, lb)))
        } else {
            self.trail.push(BoundChange {
                var,
                previous_lb: prev_lb,
                previous_ub: prev_ub,
            });
            self.lbs[var.index()] = lb;
            self.updated.push(var);
            Ok(true)
        }
    }

    /// Lowers the upper bound of `var`.
    /// Returns `Ok(true)` if the domain changed and `Ok(false)` if the bound was already entailed.
    pub fn set_ub(&mut self, var: impl Into<VarRef>, ub: IntCst) -> Result<bool, InvalidUpdate> {
        let var = var.into();
        let (prev_lb, prev_ub) = self.bounds(var);
        if ub >= prev_ub {
            Ok(false)
        } else if ub < prev_lb {
            Err(InvalidUpdate(Lit::leq(var, ub)))
        } else {
            self.trail.push(BoundChange {
                var,
                previous_lb: prev_lb,
                previous_ub: prev_ub,
            });
            self.ubs[var.index()] = ub;
            self.updated.push(var);
            Ok(true)
        }
    }

    pub fn set(&mut self, lit: Lit) -> Result<bool, InvalidUpdate> {
        match lit.relation() {
            Relation::Leq => self.set_ub(lit.variable(), lit.value()),
            Relation::Geq => self.set_lb(lit.variable(), lit.value()),
        }
    }

    /// Restricts the domain of `var` to the single value `value`.
    pub fn fix(&mut self, var: impl Into<VarRef>, value: IntCst) -> Result<bool, InvalidUpdate> {
        let var = var.into();
        let lb_changed = self.set_lb(var, value)?;
        let ub_changed = self.set_ub(var, value)?;
        Ok(lb_changed || ub_changed)
    }

    /// Next variable whose domain changed and that was not yet collected.
    pub fn pop_update(&mut self) -> Option<VarRef> {
        self.updated.pop()
    }

    pub fn clear_updates(&mut self) {
        self.updated.clear()
    }

    /// Returns the value of every variable, or `None` if some variable is not bound.
    pub fn assignment(&self) -> Option<Vec<IntCst>> {
        self.variables().map(|v| self.value(v)).collect()
    }
}

impl Backtrack for Domains {
    fn save_state(&mut self) -> DecLvl {
        self.trail.save_state()
    }

    fn num_saved(&self) -> u32 {
        self.trail.num_saved()
    }

    fn restore_last(&mut self) {
        let lbs = &mut self.lbs;
        let ubs = &mut self.ubs;
        self.trail.restore_last_with(|change| {
            lbs[change.var.index()] = change.previous_lb;
            ubs[change.var.index()] = change.previous_ub;
        });
        // the restored state was a fixpoint of propagation
        self.updated.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_updates() {
        let mut doms = Domains::new();
        let x = doms.new_var(0, 10);
        assert_eq!(doms.set_lb(x, 3), Ok(true));
        assert_eq!(doms.set_lb(x, 2), Ok(false));
        assert_eq!(doms.set_ub(x, 5), Ok(true));
        assert_eq!(doms.bounds(x), (3, 5));
        assert_eq!(doms.set_ub(x, 2), Err(InvalidUpdate(x.leq(2))));
        // failed update leaves the domain untouched
        assert_eq!(doms.bounds(x), (3, 5));
        assert!(doms.entails(x.geq(3)));
        assert!(doms.violates(x.geq(6)));
        assert_eq!(doms.size(x), 3);
    }

    #[test]
    fn updates_are_queued() {
        let mut doms = Domains::new();
        let x = doms.new_var(0, 10);
        let y = doms.new_var(0, 10);
        doms.set(x.leq(4)).unwrap();
        doms.set(y.geq(4)).unwrap();
        doms.set(y.geq(1)).unwrap();
        assert_eq!(doms.pop_update(), Some(y));
        assert_eq!(doms.pop_update(), Some(x));
        assert_eq!(doms.pop_update(), None);
    }

    #[test]
    fn backtracking() {
        let mut doms = Domains::new();
        let x = doms.new_var(0, 10);
        let y = doms.new_var(-5, 5);
        doms.set_lb(x, 1).unwrap(); // at root, permanent

        let root = doms.current_decision_level();
        doms.save_state();
        doms.fix(x, 4).unwrap();
        doms.save_state();
        doms.set_ub(y, 0).unwrap();
        doms.set_ub(y, -2).unwrap();
        assert_eq!(doms.current_decision_level(), DecLvl::new(2));

        doms.restore_last();
        assert_eq!(doms.bounds(y), (-5, 5));
        assert_eq!(doms.value(x), Some(4));

        doms.restore(root);
        assert_eq!(doms.bounds(x), (1, 10));
        assert_eq!(doms.assignment(), None);
    }
}
