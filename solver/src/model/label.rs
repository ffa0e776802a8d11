use std::fmt::{Debug, Display};

/// Trait for the labels attached to the variables of a model.
/// They are only used for display and debugging.
pub trait Label: Clone + Debug + Display + Send + Sync + 'static {}

impl<T> Label for T where T: Clone + Debug + Display + Send + Sync + 'static {}
