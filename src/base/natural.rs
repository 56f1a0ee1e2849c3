use super::{Dof, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds a Neumann (point source) condition
///
/// The magnitude is constant during one analysis and enters the right-hand side directly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Load {
    /// Node holding the DOF
    pub node: NodeId,

    /// DOF kind
    pub dof: Dof,

    /// Magnitude (e.g., heat flow rate)
    pub value: f64,
}

/// Holds natural (Neumann) boundary conditions
///
/// Loads repeated at the same DOF are added together.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Natural {
    pub all: Vec<Load>,
}

impl Natural {
    /// Allocates a new instance
    pub fn new() -> Self {
        Natural { all: Vec::new() }
    }

    /// Sets natural boundary condition at nodes
    pub fn at(&mut self, nodes: &[NodeId], dof: Dof, value: f64) -> &mut Self {
        for node in nodes {
            self.all.push(Load {
                node: *node,
                dof,
                value,
            });
        }
        self
    }
}

impl fmt::Display for Natural {
    /// Prints a formatted summary of Boundary Conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Natural boundary conditions\n")?;
        write!(f, "===========================\n")?;
        for load in &self.all {
            write!(f, "{:?} : {:?} = {:?}\n", load.node, load.dof, load.value)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
