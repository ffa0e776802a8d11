use crate::core::{IntCst, Lit, VarRef};

/// An integer variable.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct IVar(VarRef);

impl IVar {
    pub const fn new(var: VarRef) -> Self {
        IVar(var)
    }

    pub const fn var(self) -> VarRef {
        self.0
    }

    pub fn leq(self, i: IntCst) -> Lit {
        self.0.leq(i)
    }
    pub fn lt(self, i: IntCst) -> Lit {
        self.0.lt(i)
    }
    pub fn geq(self, i: IntCst) -> Lit {
        self.0.geq(i)
    }
    pub fn gt(self, i: IntCst) -> Lit {
        self.0.gt(i)
    }
}

impl From<IVar> for VarRef {
    fn from(v: IVar) -> Self {
        v.0
    }
}

/// An interval `[start, end)` of length `size`, where `start + size == end`.
///
/// The relation between the three variables is posted by
/// [`Model::new_interval`](crate::model::Model::new_interval).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct IntervalVar {
    pub start: IVar,
    pub size: IVar,
    pub end: IVar,
}

impl IntervalVar {
    pub fn variables(&self) -> [VarRef; 3] {
        [self.start.var(), self.size.var(), self.end.var()]
    }
}
