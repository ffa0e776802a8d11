mod constraint;
mod label;
mod model_impl;

pub use constraint::Constraint;
pub use label::Label;
pub use model_impl::*;

pub mod lang;
