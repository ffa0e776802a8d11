use crate::core::{IntCst, LongCst, VarRef};
use crate::model::lang::{IVar, IntervalVar};
use std::fmt::{Display, Formatter};

/// At any point in time, the total demand of the intervals covering it must not exceed `capacity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cumulative {
    pub intervals: Vec<IntervalVar>,
    pub demands: Vec<IVar>,
    pub capacity: IntCst,
}

impl Cumulative {
    pub fn new(
        intervals: impl IntoIterator<Item = IntervalVar>,
        demands: impl IntoIterator<Item = IVar>,
        capacity: IntCst,
    ) -> Self {
        Cumulative {
            intervals: intervals.into_iter().collect(),
            demands: demands.into_iter().collect(),
            capacity,
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = VarRef> + '_ {
        self.intervals
            .iter()
            .flat_map(|i| i.variables())
            .chain(self.demands.iter().map(|d| d.var()))
    }

    pub fn is_satisfied(&self, values: &[IntCst]) -> bool {
        let value = |v: IVar| values[v.var().index()];
        let tasks: Vec<(IntCst, IntCst, LongCst)> = self
            .intervals
            .iter()
            .zip(self.demands.iter())
            .filter(|(i, _)| value(i.size) > 0)
            .map(|(i, d)| (value(i.start), value(i.end), value(*d) as LongCst))
            .collect();
        // the load can only increase at the start of a task
        tasks.iter().all(|&(t, _, _)| {
            let load: LongCst = tasks
                .iter()
                .filter(|&&(s, e, _)| s <= t && t < e)
                .map(|&(_, _, d)| d)
                .sum();
            load <= self.capacity as LongCst
        })
    }
}

impl Display for Cumulative {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cumulative(")?;
        for (i, (t, d)) in self.intervals.iter().zip(self.demands.iter()).enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{:?}, {:?}]:{:?}", t.start.var(), t.end.var(), d.var())?;
        }
        write!(f, ") <= {}", self.capacity)
    }
}
