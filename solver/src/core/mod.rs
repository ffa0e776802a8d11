pub use cst::*;
pub use literals::*;
pub use variable::*;

mod cst;
mod literals;
pub mod state;
mod variable;
