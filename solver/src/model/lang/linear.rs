use crate::core::{IntCst, LongCst, VarRef};
use crate::model::lang::IVar;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinearTerm {
    pub factor: IntCst,
    pub var: VarRef,
}

impl LinearTerm {
    pub fn new(factor: IntCst, var: impl Into<VarRef>) -> Self {
        LinearTerm {
            factor,
            var: var.into(),
        }
    }
}

impl Display for LinearTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.factor {
            1 => write!(f, "{:?}", self.var),
            -1 => write!(f, "-{:?}", self.var),
            factor => write!(f, "{factor}*{:?}", self.var),
        }
    }
}

/// A sum of weighted variables plus a constant.
///
/// ```
/// use quilt::model::Model;
/// use quilt::model::lang::LinearSum;
///
/// let mut model: Model<String> = Model::new();
/// let x = model.new_ivar(0, 10, "x");
/// let y = model.new_ivar(0, 10, "y");
/// let sum = LinearSum::zero() + x * 2 + y - 3;
/// model.enforce(sum.leq(12)); // 2x + y <= 15
/// ```
#[derive(Clone, Debug, Default)]
pub struct LinearSum {
    terms: Vec<LinearTerm>,
    constant: LongCst,
}

impl LinearSum {
    pub fn zero() -> Self {
        Default::default()
    }

    pub fn constant(value: IntCst) -> Self {
        LinearSum {
            terms: Vec::new(),
            constant: value as LongCst,
        }
    }

    /// Sum of all given elements.
    pub fn of<T: Into<LinearSum>>(elements: impl IntoIterator<Item = T>) -> Self {
        elements.into_iter().fold(LinearSum::zero(), |acc, e| acc + e)
    }

    pub fn terms(&self) -> &[LinearTerm] {
        &self.terms
    }

    /// Constraint `self <= ub`.
    pub fn leq(self, ub: IntCst) -> Linear {
        let ub = ub as LongCst - self.constant;
        Linear::new(self.terms, Linear::NO_LB, ub)
    }

    /// Constraint `self >= lb`.
    pub fn geq(self, lb: IntCst) -> Linear {
        let lb = lb as LongCst - self.constant;
        Linear::new(self.terms, lb, Linear::NO_UB)
    }

    /// Constraint `self == value`.
    pub fn eq(self, value: IntCst) -> Linear {
        let value = value as LongCst - self.constant;
        Linear::new(self.terms, value, value)
    }

    /// Constraint `lb <= self <= ub`.
    pub fn in_range(self, lb: IntCst, ub: IntCst) -> Linear {
        let lb = lb as LongCst - self.constant;
        let ub = ub as LongCst - self.constant;
        Linear::new(self.terms, lb, ub)
    }
}

impl From<LinearTerm> for LinearSum {
    fn from(term: LinearTerm) -> Self {
        LinearSum {
            terms: vec![term],
            constant: 0,
        }
    }
}

impl From<IVar> for LinearTerm {
    fn from(var: IVar) -> Self {
        LinearTerm::new(1, var)
    }
}

impl From<IVar> for LinearSum {
    fn from(var: IVar) -> Self {
        LinearTerm::from(var).into()
    }
}

impl From<IntCst> for LinearSum {
    fn from(value: IntCst) -> Self {
        LinearSum::constant(value)
    }
}

impl Mul<IntCst> for IVar {
    type Output = LinearTerm;

    fn mul(self, factor: IntCst) -> Self::Output {
        LinearTerm::new(factor, self)
    }
}

impl Neg for LinearSum {
    type Output = LinearSum;

    fn neg(self) -> Self::Output {
        LinearSum {
            terms: self
                .terms
                .into_iter()
                .map(|t| LinearTerm::new(-t.factor, t.var))
                .collect(),
            constant: -self.constant,
        }
    }
}

impl<T: Into<LinearSum>> AddAssign<T> for LinearSum {
    fn add_assign(&mut self, rhs: T) {
        let rhs = rhs.into();
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl<T: Into<LinearSum>> SubAssign<T> for LinearSum {
    fn sub_assign(&mut self, rhs: T) {
        *self += -rhs.into();
    }
}

impl<T: Into<LinearSum>> Add<T> for LinearSum {
    type Output = LinearSum;

    fn add(mut self, rhs: T) -> Self::Output {
        self += rhs;
        self
    }
}

impl<T: Into<LinearSum>> Sub<T> for LinearSum {
    type Output = LinearSum;

    fn sub(mut self, rhs: T) -> Self::Output {
        self -= rhs;
        self
    }
}

impl<T: Into<LinearSum>> Add<T> for IVar {
    type Output = LinearSum;

    fn add(self, rhs: T) -> Self::Output {
        LinearSum::from(self) + rhs
    }
}

impl<T: Into<LinearSum>> Sub<T> for IVar {
    type Output = LinearSum;

    fn sub(self, rhs: T) -> Self::Output {
        LinearSum::from(self) - rhs
    }
}

impl<T: Into<LinearSum>> Add<T> for LinearTerm {
    type Output = LinearSum;

    fn add(self, rhs: T) -> Self::Output {
        LinearSum::from(self) + rhs
    }
}

/// The linear constraint `lb <= sum(terms) <= ub`.
///
/// Terms are normalized on construction: a variable appears at most once and never with a null factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Linear {
    terms: Vec<LinearTerm>,
    lb: LongCst,
    ub: LongCst,
}

impl Linear {
    pub const NO_LB: LongCst = LongCst::MIN;
    pub const NO_UB: LongCst = LongCst::MAX;

    pub fn new(terms: Vec<LinearTerm>, lb: LongCst, ub: LongCst) -> Self {
        let terms = terms
            .into_iter()
            .sorted_by_key(|t| t.var)
            .coalesce(|a, b| {
                if a.var == b.var {
                    Ok(LinearTerm::new(a.factor + b.factor, a.var))
                } else {
                    Err((a, b))
                }
            })
            .filter(|t| t.factor != 0)
            .collect();
        Linear { terms, lb, ub }
    }

    pub fn terms(&self) -> &[LinearTerm] {
        &self.terms
    }

    pub fn lb(&self) -> LongCst {
        self.lb
    }

    pub fn ub(&self) -> LongCst {
        self.ub
    }

    pub fn variables(&self) -> impl Iterator<Item = VarRef> + '_ {
        self.terms.iter().map(|t| t.var)
    }

    pub fn is_satisfied(&self, values: &[IntCst]) -> bool {
        let sum: LongCst = self
            .terms
            .iter()
            .map(|t| t.factor as LongCst * values[t.var.index()] as LongCst)
            .sum();
        self.lb <= sum && sum <= self.ub
    }
}

impl Display for Linear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (i, t) in self.terms.iter().enumerate() {
            if i != 0 {
                write!(f, " + ")?;
            }
            write!(f, "{t}")?;
        }
        match (self.lb, self.ub) {
            (lb, ub) if lb == ub => write!(f, " == {lb}"),
            (Linear::NO_LB, ub) => write!(f, " <= {ub}"),
            (lb, Linear::NO_UB) => write!(f, " >= {lb}"),
            (lb, ub) => write!(f, " in [{lb}, {ub}]"),
        }
    }
}

/// `a <= b`
pub fn leq(a: impl Into<LinearSum>, b: impl Into<LinearSum>) -> Linear {
    (a.into() - b).leq(0)
}

/// `a < b`
pub fn lt(a: impl Into<LinearSum>, b: impl Into<LinearSum>) -> Linear {
    (a.into() - b).leq(-1)
}

/// `a >= b`
pub fn geq(a: impl Into<LinearSum>, b: impl Into<LinearSum>) -> Linear {
    (a.into() - b).geq(0)
}

/// `a > b`
pub fn gt(a: impl Into<LinearSum>, b: impl Into<LinearSum>) -> Linear {
    (a.into() - b).geq(1)
}

/// `a == b`
pub fn eq(a: impl Into<LinearSum>, b: impl Into<LinearSum>) -> Linear {
    (a.into() - b).eq(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(i: u32) -> IVar {
        IVar::new(VarRef::from_u32(i))
    }

    #[test]
    fn normalization() {
        let (x, y) = (var(0), var(1));
        let c = (x * 2 + y + x * 3 - y + 4).leq(10);
        assert_eq!(c.terms(), &[LinearTerm::new(5, x)]);
        assert_eq!(c.ub(), 6);
        assert_eq!(c.lb(), Linear::NO_LB);
        assert_eq!(c.to_string(), "5*v0 <= 6");
    }

    #[test]
    fn comparisons() {
        let (x, y) = (var(0), var(1));
        let c = lt(x, y);
        assert_eq!(c.to_string(), "v0 + -v1 <= -1");
        assert!(c.is_satisfied(&[1, 2]));
        assert!(!c.is_satisfied(&[2, 2]));

        let c = eq(x + 1, y);
        assert!(c.is_satisfied(&[3, 4]));
        assert!(!c.is_satisfied(&[4, 4]));

        let c = LinearSum::of([x, y]).in_range(2, 3);
        assert!(c.is_satisfied(&[1, 1]));
        assert!(!c.is_satisfied(&[2, 2]));
    }
}
