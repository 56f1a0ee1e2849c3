use crate::base::{Attribute, CellKind, Dof};
use crate::{Error, StrError};
use russell_lab::Matrix;

/// Defines the element matrix provider (external collaborator of the assembler)
///
/// The provider knows the shape functions, the quadrature, and the material parameters.
pub trait ElementProvider: Sync {
    /// Creates the element handle for a cell
    ///
    /// # Input
    ///
    /// * `kind` -- the cell kind
    /// * `attribute` -- the attribute of the element (selects the material)
    /// * `coords` -- (nnode) the coordinates of the ordered nodes of the element
    fn create_element(
        &self,
        kind: CellKind,
        attribute: Attribute,
        coords: &[&[f64]],
    ) -> Result<Box<dyn ElementHandle>, Error>;
}

/// Defines the local (element) equations of the heat problem
pub trait ElementHandle: Send + Sync {
    /// Returns the DOFs at each node of the element (in the local order)
    ///
    /// The number of rows (and columns) of the local matrices equals the total number of DOFs.
    fn node_dofs(&self) -> &Vec<Vec<Dof>>;

    /// Calculates the elemental conductance (conductivity) matrix Kₑ
    fn conductivity_matrix(&self) -> Result<Matrix, StrError>;

    /// Calculates the elemental capacity matrix Cₑ
    fn capacity_matrix(&self) -> Result<Matrix, StrError>;
}
