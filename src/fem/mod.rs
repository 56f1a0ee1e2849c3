//! Implements the finite element method: elements, skyline storage and solver, assembly, and analyzers

mod analyzer;
mod control_time;
mod dynamic_analyzer;
mod element_diffusion;
mod element_trait;
mod file_io;
mod global_system;
mod skyline;
mod skyline_solver;
mod solution_state;
mod static_analyzer;
pub use crate::fem::analyzer::*;
pub use crate::fem::control_time::*;
pub use crate::fem::dynamic_analyzer::*;
pub use crate::fem::element_diffusion::*;
pub use crate::fem::element_trait::*;
pub use crate::fem::file_io::*;
pub use crate::fem::global_system::*;
pub use crate::fem::skyline::*;
pub use crate::fem::skyline_solver::*;
pub use crate::fem::solution_state::*;
pub use crate::fem::static_analyzer::*;
