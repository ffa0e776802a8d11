use crate::core::state::Domains;
use crate::core::{IntCst, LongCst, VarRef};
use crate::model::lang::Cumulative;
use crate::reasoners::cp::{Propagator, PropagatorId, Watches};
use crate::reasoners::Contradiction;
use itertools::Itertools;

#[derive(Copy, Clone, Debug)]
struct Task {
    start: VarRef,
    size: VarRef,
    end: VarRef,
    demand: VarRef,
}

impl Task {
    fn min_size(&self, d: &Domains) -> IntCst {
        d.lb(self.size)
    }

    fn min_demand(&self, d: &Domains) -> IntCst {
        d.lb(self.demand)
    }

    fn earliest_start(&self, d: &Domains) -> IntCst {
        d.lb(self.start)
    }

    fn latest_end(&self, d: &Domains) -> IntCst {
        d.ub(self.end)
    }

    /// Time window `[latest start, earliest end)` the task is known to cover, if not empty.
    fn compulsory_part(&self, d: &Domains) -> Option<(IntCst, IntCst)> {
        if self.min_size(d) <= 0 || self.min_demand(d) <= 0 {
            return None;
        }
        let latest_start = d.ub(self.start).min(d.ub(self.end) - self.min_size(d));
        let earliest_end = d.lb(self.end).max(d.lb(self.start) + self.min_size(d));
        if latest_start < earliest_end {
            Some((latest_start, earliest_end))
        } else {
            None
        }
    }
}

/// A segment `[start, end)` of the resource profile with a constant load.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Segment {
    start: IntCst,
    end: IntCst,
    load: LongCst,
}

/// Time-table propagation of a cumulative constraint.
///
/// The compulsory parts of the tasks are aggregated into a resource profile. The profile must not
/// exceed the capacity, and a task cannot be scheduled over a segment where its own demand would
/// overload the resource.
#[derive(Clone, Debug)]
pub struct TimeTable {
    tasks: Vec<Task>,
    capacity: IntCst,
}

impl TimeTable {
    pub fn new(constraint: &Cumulative) -> Self {
        TimeTable {
            tasks: constraint
                .intervals
                .iter()
                .zip(constraint.demands.iter())
                .map(|(i, d)| Task {
                    start: i.start.var(),
                    size: i.size.var(),
                    end: i.end.var(),
                    demand: d.var(),
                })
                .collect(),
            capacity: constraint.capacity,
        }
    }

    /// Builds the profile of compulsory parts, as sorted non-empty segments of positive load.
    fn profile(&self, d: &Domains) -> Vec<Segment> {
        let events = self
            .tasks
            .iter()
            .filter_map(|t| {
                t.compulsory_part(d)
                    .map(|(s, e)| (s, e, t.min_demand(d) as LongCst))
            })
            .flat_map(|(s, e, demand)| [(s, demand), (e, -demand)])
            .sorted_by_key(|&(time, _)| time)
            .collect_vec();

        let mut segments: Vec<Segment> = Vec::new();
        let mut load = 0;
        for (time, group) in &events.into_iter().chunk_by(|&(time, _)| time) {
            if let Some(last) = segments.last_mut().filter(|s| s.end == IntCst::MAX) {
                last.end = time;
            }
            load += group.map(|(_, delta)| delta).sum::<LongCst>();
            if load > 0 {
                segments.push(Segment {
                    start: time,
                    end: IntCst::MAX,
                    load,
                });
            }
        }
        // every segment is closed by the last event, where the load drops to zero
        segments.retain(|s| s.end != IntCst::MAX && s.start < s.end);
        segments
    }

    /// Load of the segment, minus the contribution of `task` if the segment is within its compulsory part.
    fn load_without(task: &Task, segment: &Segment, d: &Domains) -> LongCst {
        match task.compulsory_part(d) {
            Some((s, e)) if s <= segment.start && segment.end <= e => segment.load - task.min_demand(d) as LongCst,
            _ => segment.load,
        }
    }

    fn propagate_task(&self, task: &Task, profile: &[Segment], d: &mut Domains) -> Result<(), Contradiction> {
        let size = task.min_size(d);
        if size <= 0 {
            return Ok(());
        }
        d.set_ub(task.demand, self.capacity)?;
        let demand = task.min_demand(d) as LongCst;
        if demand <= 0 {
            return Ok(());
        }
        let capacity = self.capacity as LongCst;

        let mut est = task.earliest_start(d);
        for seg in profile {
            if Self::load_without(task, seg, d) + demand > capacity && est < seg.end && seg.start < est + size {
                est = seg.end;
            }
        }
        d.set_lb(task.start, est)?;

        let mut lct = task.latest_end(d);
        for seg in profile.iter().rev() {
            if Self::load_without(task, seg, d) + demand > capacity && seg.start < lct && lct - size < seg.end {
                lct = seg.start;
            }
        }
        d.set_ub(task.end, lct)?;
        Ok(())
    }
}

impl Propagator for TimeTable {
    fn setup(&self, id: PropagatorId, context: &mut Watches) {
        for t in &self.tasks {
            context.add_watch(t.start, id);
            context.add_watch(t.size, id);
            context.add_watch(t.end, id);
            context.add_watch(t.demand, id);
        }
    }

    fn propagate(&self, domains: &mut Domains) -> Result<(), Contradiction> {
        let profile = self.profile(domains);
        if profile.iter().any(|s| s.load > self.capacity as LongCst) {
            return Err(Contradiction::Failure("cumulative"));
        }
        for task in &self.tasks {
            self.propagate_task(task, &profile, domains)?;
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
    use crate::model::lang::{IVar, IntervalVar};

    /// Creates a task with the given start domain, a fixed size and a fixed demand.
    fn task(d: &mut Domains, start: (IntCst, IntCst), size: IntCst, demand: IntCst) -> (IntervalVar, IVar) {
        let s = IVar::new(d.new_var(start.0, start.1));
        let l = IVar::new(d.new_var(size, size));
        let e = IVar::new(d.new_var(start.0 + size, start.1 + size));
        let h = IVar::new(d.new_var(demand, demand));
        (IntervalVar { start: s, size: l, end: e }, h)
    }

    fn time_table(tasks: &[(IntervalVar, IVar)], capacity: IntCst) -> TimeTable {
        TimeTable::new(&Cumulative::new(
            tasks.iter().map(|t| t.0),
            tasks.iter().map(|t| t.1),
            capacity,
        ))
    }

    #[test]
    fn profile_segments() {
        let mut d = Domains::new();
        let tasks = [task(&mut d, (0, 0), 3, 2), task(&mut d, (2, 2), 3, 1), task(&mut d, (0, 10), 2, 1)];
        let profile = time_table(&tasks, 5).profile(&d);
        assert_eq!(
            profile,
            vec![
                Segment { start: 0, end: 2, load: 2 },
                Segment { start: 2, end: 3, load: 3 },
                Segment { start: 3, end: 5, load: 1 },
            ]
        );
    }

    #[test]
    fn tasks_are_pushed_after_full_segments() {
        let mut d = Domains::new();
        let a = task(&mut d, (0, 0), 3, 2);
        let b = task(&mut d, (0, 10), 2, 1);
        let prop = time_table(&[a, b], 2);
        prop.propagate(&mut d).unwrap();
        assert_eq!(d.bounds(b.0.start), (3, 10));
        assert_eq!(d.bounds(a.0.start), (0, 0));
    }

    #[test]
    fn tasks_are_pulled_before_full_segments() {
        let mut d = Domains::new();
        let a = task(&mut d, (8, 8), 4, 2);
        let b = task(&mut d, (0, 9), 3, 1);
        let prop = time_table(&[a, b], 2);
        prop.propagate(&mut d).unwrap();
        assert_eq!(d.bounds(b.0.end), (3, 8));
    }

    #[test]
    fn overload_fails() {
        let mut d = Domains::new();
        let a = task(&mut d, (0, 1), 3, 2);
        let b = task(&mut d, (1, 2), 3, 1);
        let prop = time_table(&[a, b], 2);
        assert_eq!(prop.propagate(&mut d), Err(Contradiction::Failure("cumulative")));
    }

    #[test]
    fn demand_is_bounded_by_capacity() {
        let mut d = Domains::new();
        let (interval, _) = task(&mut d, (0, 5), 2, 1);
        let demand = IVar::new(d.new_var(0, 10));
        let prop = TimeTable::new(&Cumulative::new([interval], [demand], 4));
        prop.propagate(&mut d).unwrap();
        assert_eq!(d.bounds(demand), (0, 4));
    }
}
