use super::{ElementHandle, ElementProvider, SkylineMatrix, SkylineProfile};
use crate::base::{Config, Equations, Model};
use crate::Error;
use rayon::prelude::*;
use russell_lab::{Matrix, Vector};
use std::sync::Arc;

/// Holds the global (free-DOF) system of the heat problem
///
/// ```text
/// C·dT/dt + K·T = F
/// ```
///
/// The matrices correspond to the free-DOF block and share the same skyline profile. The prescribed
/// temperatures are eliminated into F (`Fᵢ -= Kᵢⱼ·Tⱼ`) and the Neumann loads are added to F. Since the
/// prescribed temperatures are time invariant, the capacity coupling with the prescribed DOFs vanishes.
pub struct GlobalSystem {
    /// Holds the DOF numbers
    pub equations: Equations,

    /// Holds the skyline profile shared by K and C
    pub profile: Arc<SkylineProfile>,

    /// Conductance matrix K (n_free × n_free)
    pub kk: SkylineMatrix,

    /// Capacity matrix C (n_free × n_free)
    pub cc: SkylineMatrix,

    /// Load vector F (n_free)
    pub ff: Vector,
}

impl GlobalSystem {
    /// Assembles the global system
    ///
    /// The assembly is performed in two passes:
    ///
    /// 1. The profile pass finds the first row of each column from the smallest free equation
    ///    number of the elements touching the column
    /// 2. The numeric pass computes the element matrices (in parallel if `config.parallel_assembly`)
    ///    and scatters them in element order
    pub fn new(model: &Model, provider: &dyn ElementProvider, config: &Config) -> Result<Self, Error> {
        // the fields of the model are public and may have changed after construction
        model.validate()?;

        // element handles
        let handles = model
            .elements
            .iter()
            .map(|element| provider.create_element(element.kind, element.attribute, &model.element_coords(element)))
            .collect::<Result<Vec<_>, _>>()?;

        // DOF numbers
        let element_dofs: Vec<_> = handles.iter().map(|h| h.node_dofs().clone()).collect();
        let equations = Equations::new(model, &element_dofs)?;
        let n_free = equations.n_free;

        // profile pass
        let mut first_row: Vec<_> = (0..n_free).collect();
        for l2g in &equations.local_to_global {
            let free = l2g.iter().filter(|eq| **eq < n_free);
            if let Some(min) = free.clone().min() {
                for j in free {
                    first_row[*j] = usize::min(first_row[*j], *min);
                }
            }
        }
        let profile = Arc::new(SkylineProfile::new(first_row)?);

        // numeric pass
        let mut system = GlobalSystem {
            kk: SkylineMatrix::new(profile.clone()),
            cc: SkylineMatrix::new(profile.clone()),
            ff: Vector::new(n_free),
            profile,
            equations,
        };
        let local_matrices = if config.parallel_assembly {
            handles.par_iter().map(|h| element_matrices(h.as_ref())).collect::<Vec<_>>()
        } else {
            handles.iter().map(|h| element_matrices(h.as_ref())).collect::<Vec<_>>()
        };
        for (e, res) in local_matrices.into_iter().enumerate() {
            let (kke, cce) = res?;
            system.scatter(e, &kke, &cce)?;
        }

        // Neumann loads
        for load in &model.natural.all {
            let eq = system.equations.eq(load.node, load.dof)?;
            if eq < n_free {
                system.ff[eq] += load.value;
            }
        }
        Ok(system)
    }

    /// Adds the element matrices to K and C and eliminates the prescribed DOFs into F
    fn scatter(&mut self, e: usize, kke: &Matrix, cce: &Matrix) -> Result<(), Error> {
        let l2g = &self.equations.local_to_global[e];
        let ndof = l2g.len();
        for mat in [kke, cce] {
            let (nrow, ncol) = mat.dims();
            if nrow != ndof || ncol != ndof {
                return Err(Error::DimensionMismatch {
                    element: e,
                    ndof,
                    nrow,
                    ncol,
                });
            }
        }
        let n_free = self.equations.n_free;
        for l in 0..ndof {
            let i = l2g[l];
            if i >= n_free {
                continue; // prescribed row
            }
            for m in 0..ndof {
                let j = l2g[m];
                if j < n_free {
                    if i <= j {
                        self.kk.add(i, j, kke.get(l, m))?;
                        self.cc.add(i, j, cce.get(l, m))?;
                    }
                } else {
                    let value = self.equations.prescribed_values[j - n_free];
                    if value != 0.0 {
                        self.ff[i] -= kke.get(l, m) * value;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the temperatures of all nodes given the free-DOF temperatures
    ///
    /// The prescribed values are used for the constrained DOFs. Nodes without DOFs get zero.
    pub fn nodal_values(&self, free: &Vector) -> Vec<f64> {
        self.equations
            .points
            .iter()
            .map(|dofs| match dofs.first() {
                Some((_, eq)) => match self.equations.prescribed_value(*eq) {
                    Some(value) => value,
                    None => free[*eq],
                },
                None => 0.0,
            })
            .collect()
    }
}

/// Computes the conductance and capacity matrices of an element
fn element_matrices(handle: &dyn ElementHandle) -> Result<(Matrix, Matrix), Error> {
    let kke = handle.conductivity_matrix().map_err(Error::Configuration)?;
    let cce = handle.capacity_matrix().map_err(Error::Configuration)?;
    Ok((kke, cce))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
