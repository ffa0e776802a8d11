//! Covering a rectangle with the minimum number of non-overlapping squares.

pub mod cover;
pub mod encode;
pub mod problem;
pub mod search;
pub mod tiling;
