pub mod chart;
pub mod engine;
pub mod solver;

pub use chart::*;
pub use engine::*;
pub use solver::*;
