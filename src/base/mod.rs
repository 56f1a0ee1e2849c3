//! Implements the base structures: model (mesh), boundary conditions, parameters, and DOF numbers

mod config;
mod constants;
mod enums;
mod equations;
mod essential;
mod model;
mod natural;
mod parameters;
mod samples;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::equations::*;
pub use crate::base::essential::*;
pub use crate::base::model::*;
pub use crate::base::natural::*;
pub use crate::base::parameters::*;
pub use crate::base::samples::*;
