//! Heatfem -- transient heat diffusion with the finite element method
//!
//! The global conductance and capacity matrices are stored in skyline (profile) format and
//! factorized with an in-place LDLᵀ decomposition. The semi-discretized heat equation
//!
//! ```text
//! C·dT/dt + K·T = F
//! ```
//!
//! is integrated with a two-parameter (generalized trapezoidal) implicit scheme.
//!
//! # Example
//!
//! ```
//! use heatfem::prelude::*;
//!
//! fn main() -> Result<(), Error> {
//!     let model = Samples::grid_3x3_qua4();
//!     let provider = DiffusionProvider::new([(1, ParamDiffusion::sample())]);
//!     let config = Config::new();
//!     let mut child = LinearAnalyzer::new(&config);
//!     let mut analyzer = StaticThermalAnalyzer::new(&model, &provider, &config, &mut child)?;
//!     analyzer.solve()?;
//!     let tt = analyzer.temperatures();
//!     assert!((tt[1] - 200.0).abs() < 1e-10);
//!     Ok(())
//! }
//! ```

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

mod error;
pub use crate::error::*;

pub mod base;
pub mod fem;
pub mod prelude;
