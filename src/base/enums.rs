use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines degrees-of-freedom (DOF) types
///
/// Note: The fixed numbering scheme assists in sorting the DOFs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Dof {
    /// Temperature
    T = 0,
}

/// Defines the geometry (cell) kinds handled by the bundled element provider
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum CellKind {
    /// Linear segment with 2 nodes
    Lin2,

    /// Linear triangle with 3 nodes
    Tri3,

    /// Bilinear quadrilateral with 4 nodes
    Qua4,
}

impl CellKind {
    /// Returns the number of nodes
    pub fn nnode(&self) -> usize {
        match self {
            CellKind::Lin2 => 2,
            CellKind::Tri3 => 3,
            CellKind::Qua4 => 4,
        }
    }

    /// Returns the geometry (reference) dimension
    pub fn ndim(&self) -> usize {
        match self {
            CellKind::Lin2 => 1,
            CellKind::Tri3 => 2,
            CellKind::Qua4 => 2,
        }
    }
}

/// Defines the initial temperature of the free DOFs
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum InitialTemperature {
    /// All free temperatures start at zero
    Zero,

    /// All free temperatures start at the same value
    Uniform(f64),

    /// Each node starts at its own value (length = number of nodes)
    Nodal(Vec<f64>),
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Lin2 => write!(f, "Lin2"),
            CellKind::Tri3 => write!(f, "Tri3"),
            CellKind::Qua4 => write!(f, "Qua4"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{CellKind, Dof};

    #[test]
    fn cell_kind_works() {
        assert_eq!(CellKind::Lin2.nnode(), 2);
        assert_eq!(CellKind::Tri3.nnode(), 3);
        assert_eq!(CellKind::Qua4.nnode(), 4);
        assert_eq!(CellKind::Lin2.ndim(), 1);
        assert_eq!(CellKind::Qua4.ndim(), 2);
        assert_eq!(format!("{}", CellKind::Qua4), "Qua4");
    }

    #[test]
    fn dof_derive_works() {
        let dof = Dof::T;
        let clone = dof.clone();
        assert_eq!(dof, clone);
        assert_eq!(format!("{:?}", dof), "T");
        let json = serde_json::to_string(&dof).unwrap();
        assert_eq!(json, "\"T\"");
    }
}
