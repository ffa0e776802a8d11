use crate::core::{IntCst, VarRef};
use std::fmt::{Debug, Display, Formatter};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Relation {
    Leq,
    Geq,
}

/// A bound literal: either `var <= value` or `var >= value`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Lit {
    var: VarRef,
    relation: Relation,
    value: IntCst,
}

impl Lit {
    pub const fn leq(var: VarRef, value: IntCst) -> Lit {
        Lit {
            var,
            relation: Relation::Leq,
            value,
        }
    }
    pub const fn lt(var: VarRef, value: IntCst) -> Lit {
        Lit::leq(var, value - 1)
    }
    pub const fn geq(var: VarRef, value: IntCst) -> Lit {
        Lit {
            var,
            relation: Relation::Geq,
            value,
        }
    }
    pub const fn gt(var: VarRef, value: IntCst) -> Lit {
        Lit::geq(var, value + 1)
    }

    pub const fn variable(self) -> VarRef {
        self.var
    }

    pub const fn relation(self) -> Relation {
        self.relation
    }

    pub const fn value(self) -> IntCst {
        self.value
    }
}

impl std::ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        match self.relation {
            Relation::Leq => Lit::gt(self.var, self.value),
            Relation::Geq => Lit::lt(self.var, self.value),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Leq => write!(f, "<="),
            Relation::Geq => write!(f, ">="),
        }
    }
}

impl Debug for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {} {}", self.var, self.relation, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation() {
        let v = VarRef::from_u32(3);
        assert_eq!(!v.leq(4), v.geq(5));
        assert_eq!(!v.geq(4), v.leq(3));
        assert_eq!(!!v.lt(0), v.lt(0));
        assert_eq!(format!("{:?}", v.gt(1)), "v3 >= 2");
    }
}
