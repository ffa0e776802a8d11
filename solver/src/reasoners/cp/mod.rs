//! Propagation engine for the constraints of a model.
//!
//! Each constraint is compiled into a [`Propagator`] that watches the variables it
//! depends on. Propagators are run from a FIFO queue until no domain changes anymore.

pub mod cumulative;
pub mod linear;
pub mod mul;
pub mod no_overlap_2d;

mod propagator;
pub use propagator::*;

use crate::core::state::Domains;
use crate::core::VarRef;
use crate::model::Constraint;
use crate::reasoners::Contradiction;
use std::collections::VecDeque;

#[derive(Clone, Default)]
pub struct Watches {
    propagations: Vec<Vec<PropagatorId>>,
}

impl Watches {
    /// Request a trigger of `propagator_id` on every bound change of `watched`.
    pub fn add_watch(&mut self, watched: impl Into<VarRef>, propagator_id: PropagatorId) {
        let index = watched.into().index();
        if self.propagations.len() <= index {
            self.propagations.resize_with(index + 1, Vec::new);
        }
        let watchers = &mut self.propagations[index];
        if !watchers.contains(&propagator_id) {
            watchers.push(propagator_id);
        }
    }

    fn get(&self, var: VarRef) -> &[PropagatorId] {
        self.propagations.get(var.index()).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[derive(Clone, Default, Debug)]
pub struct Stats {
    pub num_propagations: u64,
    pub num_failures: u64,
}

#[derive(Clone, Default)]
pub struct Cp {
    constraints: Vec<DynPropagator>,
    watches: Watches,
    queue: VecDeque<PropagatorId>,
    in_queue: Vec<bool>,
    pub stats: Stats,
}

impl Cp {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a propagator, scheduled for its first run on the next call to [`Cp::propagate`].
    pub fn add_propagator(&mut self, propagator: impl Into<DynPropagator>) -> PropagatorId {
        let propagator = propagator.into();
        let id = PropagatorId::from(self.constraints.len());
        propagator.constraint.setup(id, &mut self.watches);
        self.constraints.push(propagator);
        self.in_queue.push(true);
        self.queue.push_back(id);
        id
    }

    /// Compiles a model constraint into its propagator.
    pub fn add_constraint(&mut self, constraint: &Constraint) -> PropagatorId {
        match constraint {
            Constraint::Linear(c) => self.add_propagator(linear::LinearProp::new(c)),
            Constraint::Mul(c) => self.add_propagator(mul::MulProp::new(c)),
            Constraint::NoOverlap2D(c) => self.add_propagator(no_overlap_2d::NoOverlap2DProp::new(c)),
            Constraint::Cumulative(c) => self.add_propagator(cumulative::TimeTable::new(c)),
        }
    }

    /// Runs propagators until reaching a fixpoint.
    ///
    /// The propagators to run are those that were never run and those watching a variable
    /// whose domain changed since the last call. On a contradiction, the pending work is discarded.
    pub fn propagate(&mut self, domains: &mut Domains) -> Result<(), Contradiction> {
        loop {
            while let Some(var) = domains.pop_update() {
                for &watcher in self.watches.get(var) {
                    let i = usize::from(watcher);
                    if !self.in_queue[i] {
                        self.in_queue[i] = true;
                        self.queue.push_back(watcher);
                    }
                }
            }
            let Some(id) = self.queue.pop_front() else {
                return Ok(());
            };
            let i = usize::from(id);
            self.in_queue[i] = false;
            self.stats.num_propagations += 1;
            if let Err(contradiction) = self.constraints[i].constraint.propagate(domains) {
                self.stats.num_failures += 1;
                self.clear_queue();
                domains.clear_updates();
                return Err(contradiction);
            }
        }
    }

    fn clear_queue(&mut self) {
        for id in self.queue.drain(..) {
            self.in_queue[usize::from(id)] = false;
        }
    }
}
