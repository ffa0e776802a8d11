use crate::core::state::Domains;
use crate::reasoners::cp::Watches;
use crate::reasoners::Contradiction;

/// Unique ID of a propagator (assigned by the CP reasoner)
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PropagatorId(u32);

impl From<usize> for PropagatorId {
    fn from(u: usize) -> Self {
        PropagatorId(u as u32)
    }
}

impl From<PropagatorId> for usize {
    fn from(id: PropagatorId) -> Self {
        id.0 as usize
    }
}

pub trait Propagator: Send {
    /// Registers the variables whose changes should trigger this propagator.
    fn setup(&self, id: PropagatorId, context: &mut Watches);

    /// Tightens the domains to be consistent with the constraint, or fails if it cannot be satisfied.
    fn propagate(&self, domains: &mut Domains) -> Result<(), Contradiction>;

    fn clone_box(&self) -> Box<dyn Propagator>;
}

/// A simple wrapper around a propagator for dynamic-dispatch
pub struct DynPropagator {
    pub(super) constraint: Box<dyn Propagator>,
}

impl Clone for DynPropagator {
    fn clone(&self) -> Self {
        DynPropagator {
            constraint: self.constraint.clone_box(),
        }
    }
}

impl<T: Propagator + 'static> From<T> for DynPropagator {
    fn from(propagator: T) -> Self {
        DynPropagator {
            constraint: Box::new(propagator),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::VarRef;
    use crate::reasoners::cp::Cp;

    /// An example propagator for `a <= b`
    #[derive(Clone)]
    struct LeqProp {
        a: VarRef,
        b: VarRef,
    }

    impl Propagator for LeqProp {
        fn setup(&self, id: PropagatorId, context: &mut Watches) {
            context.add_watch(self.a, id);
            context.add_watch(self.b, id);
        }

        fn propagate(&self, domains: &mut Domains) -> Result<(), Contradiction> {
            domains.set_lb(self.b, domains.lb(self.a))?;
            domains.set_ub(self.a, domains.ub(self.b))?;
            Ok(())
        }

        fn clone_box(&self) -> Box<dyn Propagator> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn chain_reaches_fixpoint() {
        let mut doms = Domains::new();
        let a = doms.new_var(0, 10);
        let b = doms.new_var(0, 10);
        let c = doms.new_var(0, 10);
        let mut cp = Cp::new();
        cp.add_propagator(LeqProp { a, b });
        cp.add_propagator(LeqProp { a: b, b: c });
        assert!(cp.propagate(&mut doms).is_ok());

        doms.set_lb(a, 4).unwrap();
        doms.set_ub(c, 6).unwrap();
        assert!(cp.propagate(&mut doms).is_ok());
        assert_eq!(doms.bounds(b), (4, 6));
        assert_eq!(doms.bounds(a), (4, 6));
        assert_eq!(doms.bounds(c), (4, 6));
    }

    #[test]
    fn chain_detects_inconsistency() {
        let mut doms = Domains::new();
        let a = doms.new_var(5, 10);
        let b = doms.new_var(0, 10);
        let c = doms.new_var(0, 3);
        let mut cp = Cp::new();
        cp.add_propagator(LeqProp { a, b });
        cp.add_propagator(LeqProp { a: b, b: c });
        assert!(cp.propagate(&mut doms).is_err());
    }
}
