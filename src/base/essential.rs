use super::{Dof, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds a Dirichlet condition: the value of a DOF is prescribed
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Constraint {
    /// Node holding the DOF
    pub node: NodeId,

    /// DOF kind
    pub dof: Dof,

    /// Prescribed value
    pub value: f64,
}

/// Holds essential (Dirichlet) boundary conditions
///
/// All calls are recorded, including repeated ones; conflicting values for the same DOF are
/// detected when the DOF numbers are computed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Essential {
    pub all: Vec<Constraint>,
}

impl Essential {
    /// Allocates a new instance
    pub fn new() -> Self {
        Essential { all: Vec::new() }
    }

    /// Sets essential boundary condition at nodes
    pub fn at(&mut self, nodes: &[NodeId], dof: Dof, value: f64) -> &mut Self {
        for node in nodes {
            self.all.push(Constraint {
                node: *node,
                dof,
                value,
            });
        }
        self
    }
}

impl fmt::Display for Essential {
    /// Prints a formatted summary of Boundary Conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Essential boundary conditions\n")?;
        write!(f, "=============================\n")?;
        let mut sorted: Vec<_> = self.all.iter().collect();
        sorted.sort_by(|a, b| (a.node, a.dof).cmp(&(b.node, b.dof)));
        for c in sorted {
            write!(f, "{:?} : {:?} = {:?}\n", c.node, c.dof, c.value)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
