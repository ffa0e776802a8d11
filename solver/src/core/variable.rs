use crate::core::{IntCst, Lit};
use std::fmt::Debug;

/// Reference to an integer variable, as a dense index into the domains.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarRef(u32);

impl Debug for VarRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl VarRef {
    pub const fn from_u32(id: u32) -> Self {
        VarRef(id)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn leq(self, i: IntCst) -> Lit {
        Lit::leq(self, i)
    }
    pub fn lt(self, i: IntCst) -> Lit {
        Lit::lt(self, i)
    }
    pub fn geq(self, i: IntCst) -> Lit {
        Lit::geq(self, i)
    }
    pub fn gt(self, i: IntCst) -> Lit {
        Lit::gt(self, i)
    }
}

impl From<usize> for VarRef {
    fn from(u: usize) -> Self {
        VarRef(u as u32)
    }
}

impl From<VarRef> for usize {
    fn from(v: VarRef) -> Self {
        v.index()
    }
}
