use crate::model::Model;
use crate::solver::search::{Decision, SearchControl};
use crate::solver::stats::Stats;

/// Branches on the unbound variable with the smallest domain (the first one on ties),
/// trying its minimum value first and then excluding it.
#[derive(Clone, Debug, Default)]
pub struct FirstFail;

impl<L> SearchControl<L> for FirstFail {
    fn next_decision(&mut self, _stats: &Stats, model: &Model<L>) -> Option<Decision> {
        let dom = &model.state;
        let selected = dom
            .variables()
            .filter(|&v| !dom.is_bound(v))
            .min_by_key(|&v| dom.size(v))?;
        Some(Decision::binary(selected.leq(dom.lb(selected))))
    }
}
