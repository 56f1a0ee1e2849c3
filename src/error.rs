use crate::base::{Dof, NodeId};
use crate::StrError;
use thiserror::Error;

/// Defines the errors raised while assembling or solving the heat problem
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Invalid time step, integration parameters, or model data
    #[error("configuration error: {0}")]
    Configuration(&'static str),

    /// A pivot fell below the tolerance during the LDLᵀ factorization
    #[error("singular matrix: pivot {pivot:e} at equation {equation}")]
    SingularMatrix { equation: usize, pivot: f64 },

    /// The number of element DOFs disagrees with the size of an element matrix
    #[error("dimension mismatch in element {element}: {ndof} DOFs but matrix is {nrow}×{ncol}")]
    DimensionMismatch {
        element: usize,
        ndof: usize,
        nrow: usize,
        ncol: usize,
    },

    /// The same DOF is constrained twice with different values
    #[error("conflicting boundary conditions at node {node} ({dof:?}): {first} ≠ {second}")]
    BoundaryConditionConflict {
        node: NodeId,
        dof: Dof,
        first: f64,
        second: f64,
    },

    /// The time loop has been aborted at the given step
    #[error("time step {step} failed: {source}")]
    StepFailed { step: usize, source: Box<Error> },

    /// An operation has been called in the wrong stage of the analysis
    #[error("invalid stage: {0}")]
    InvalidStage(&'static str),

    /// Low-level failure reported as a static string (e.g., by russell_lab)
    #[error("{0}")]
    Internal(StrError),
}

impl From<StrError> for Error {
    fn from(err: StrError) -> Self {
        Error::Internal(err)
    }
}

impl Error {
    /// Returns the innermost error, skipping the step-failure wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::StepFailed { source, .. } => source.root(),
            _ => self,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
