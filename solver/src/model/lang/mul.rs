use crate::core::{IntCst, LongCst, VarRef};
use crate::model::lang::IVar;
use std::fmt::{Display, Formatter};

/// The constraint `prod == fact1 * fact2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mul {
    pub prod: IVar,
    pub fact1: IVar,
    pub fact2: IVar,
}

impl Mul {
    pub fn new(prod: IVar, fact1: IVar, fact2: IVar) -> Self {
        Mul { prod, fact1, fact2 }
    }

    /// The constraint `prod == x * x`.
    pub fn square(prod: IVar, x: IVar) -> Self {
        Mul::new(prod, x, x)
    }

    pub fn variables(&self) -> [VarRef; 3] {
        [self.prod.var(), self.fact1.var(), self.fact2.var()]
    }

    pub fn is_satisfied(&self, values: &[IntCst]) -> bool {
        let value = |v: IVar| values[v.var().index()] as LongCst;
        value(self.prod) == value(self.fact1) * value(self.fact2)
    }
}

impl Display for Mul {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} == {:?} * {:?}",
            self.prod.var(),
            self.fact1.var(),
            self.fact2.var()
        )
    }
}
