//! Makes available common structures needed to run a simulation
//!
//! You may write `use heatfem::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, Dof, Essential, InitialTemperature, Model, Natural, ParamDiffusion, Samples};
pub use crate::base::{CellKind, Element, Node, DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::fem::{ChildAnalyzer, DiffusionProvider, DynamicThermalAnalyzer, FileIo, LinearAnalyzer};
pub use crate::fem::{SolutionState, Stage, StaticThermalAnalyzer};
pub use crate::{Error, StrError};
