use super::{ElementHandle, ElementProvider};
use crate::base::{Attribute, CellKind, Dof, ParamDiffusion};
use crate::{Error, StrError};
use russell_lab::Matrix;
use std::collections::HashMap;

/// Natural coordinates of the Qua4 nodes
const QUA4_NODES: [[f64; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Implements the bundled element provider for linear heat diffusion
///
/// Lin2, Tri3, and Qua4 cells are supported. The Qua4 matrices are integrated with 2×2 Gauss points.
pub struct DiffusionProvider {
    /// Parameters of each element attribute
    pub params: HashMap<Attribute, ParamDiffusion>,
}

/// Implements the local equations of a heat diffusion element
pub struct ElementDiffusion {
    /// Cell kind
    pub kind: CellKind,

    /// Material parameters
    pub param: ParamDiffusion,

    /// Coordinates of the element nodes
    pub coords: Vec<Vec<f64>>,

    /// One temperature DOF per node
    pub node_dofs: Vec<Vec<Dof>>,
}

impl DiffusionProvider {
    /// Allocates a new instance
    pub fn new<const N: usize>(params: [(Attribute, ParamDiffusion); N]) -> Self {
        DiffusionProvider {
            params: HashMap::from(params),
        }
    }
}

impl ElementProvider for DiffusionProvider {
    fn create_element(
        &self,
        kind: CellKind,
        attribute: Attribute,
        coords: &[&[f64]],
    ) -> Result<Box<dyn ElementHandle>, Error> {
        let param = self
            .params
            .get(&attribute)
            .ok_or(Error::Configuration("cannot find element attribute in DiffusionProvider"))?;
        param.validate().map_err(Error::Configuration)?;
        Ok(Box::new(ElementDiffusion::new(kind, *param, coords)?))
    }
}

impl ElementDiffusion {
    /// Allocates a new instance
    pub fn new(kind: CellKind, param: ParamDiffusion, coords: &[&[f64]]) -> Result<Self, Error> {
        let nnode = kind.nnode();
        if coords.len() != nnode {
            return Err(Error::Configuration("number of coordinates is incompatible with the cell kind"));
        }
        if coords.iter().any(|x| x.len() < kind.ndim()) {
            return Err(Error::Configuration("space dimension is too small for the cell kind"));
        }
        Ok(ElementDiffusion {
            kind,
            param,
            coords: coords.iter().map(|x| x.to_vec()).collect(),
            node_dofs: vec![vec![Dof::T]; nnode],
        })
    }

    /// Returns the length of a Lin2 element
    fn length(&self) -> f64 {
        let (a, b) = (&self.coords[0], &self.coords[1]);
        a.iter().zip(b).map(|(xa, xb)| (xb - xa) * (xb - xa)).sum::<f64>().sqrt()
    }

    /// Returns the gradients of the Tri3 shape functions (constant) and the area
    fn tri3_gradients(&self) -> Result<([[f64; 2]; 3], f64), StrError> {
        let x = &self.coords;
        let two_area = (x[1][0] - x[0][0]) * (x[2][1] - x[0][1]) - (x[2][0] - x[0][0]) * (x[1][1] - x[0][1]);
        if two_area <= 0.0 {
            return Err("Tri3 element must have positive area (check the node ordering)");
        }
        let mut gg = [[0.0; 2]; 3];
        for i in 0..3 {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            gg[i][0] = (x[j][1] - x[k][1]) / two_area;
            gg[i][1] = (x[k][0] - x[j][0]) / two_area;
        }
        Ok((gg, two_area / 2.0))
    }

    /// Returns the Qua4 shape functions, their gradients, and det(J) times the weight at all Gauss points
    fn qua4_integ_points(&self) -> Result<Vec<([f64; 4], [[f64; 2]; 4], f64)>, StrError> {
        let a = 1.0 / f64::sqrt(3.0);
        let gauss = [[-a, -a], [a, -a], [a, a], [-a, a]];
        let x = &self.coords;
        let mut points = Vec::with_capacity(4);
        for [r, s] in gauss {
            let mut nn = [0.0; 4];
            let mut dn_dr = [[0.0; 2]; 4];
            for m in 0..4 {
                let [rm, sm] = QUA4_NODES[m];
                nn[m] = (1.0 + rm * r) * (1.0 + sm * s) / 4.0;
                dn_dr[m][0] = rm * (1.0 + sm * s) / 4.0;
                dn_dr[m][1] = sm * (1.0 + rm * r) / 4.0;
            }
            // Jacobian J = dx/dr
            let mut jac = [[0.0; 2]; 2];
            for m in 0..4 {
                for i in 0..2 {
                    for j in 0..2 {
                        jac[i][j] += x[m][i] * dn_dr[m][j];
                    }
                }
            }
            let det = jac[0][0] * jac[1][1] - jac[0][1] * jac[1][0];
            if det <= 0.0 {
                return Err("Qua4 element must have positive Jacobian determinant (check the node ordering)");
            }
            // G = dN/dx = dN/dr · J⁻¹
            let inv = [[jac[1][1] / det, -jac[0][1] / det], [-jac[1][0] / det, jac[0][0] / det]];
            let mut gg = [[0.0; 2]; 4];
            for m in 0..4 {
                for j in 0..2 {
                    gg[m][j] = dn_dr[m][0] * inv[0][j] + dn_dr[m][1] * inv[1][j];
                }
            }
            points.push((nn, gg, det)); // unit weights
        }
        Ok(points)
    }

    /// Replaces a matrix by its row-sum lumped (diagonal) version
    fn lump(cc: &mut Matrix) {
        let (n, _) = cc.dims();
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                sum += cc.get(i, j);
                cc.set(i, j, 0.0);
            }
            cc.set(i, i, sum);
        }
    }
}

impl ElementHandle for ElementDiffusion {
    fn node_dofs(&self) -> &Vec<Vec<Dof>> {
        &self.node_dofs
    }

    fn conductivity_matrix(&self) -> Result<Matrix, StrError> {
        let p = &self.param;
        let nnode = self.kind.nnode();
        let mut kk = Matrix::new(nnode, nnode);
        match self.kind {
            CellKind::Lin2 => {
                let ll = self.length();
                if ll <= 0.0 {
                    return Err("Lin2 element must have positive length");
                }
                let k = p.kx * p.thickness / ll;
                kk.set(0, 0, k);
                kk.set(0, 1, -k);
                kk.set(1, 0, -k);
                kk.set(1, 1, k);
            }
            CellKind::Tri3 => {
                let (gg, area) = self.tri3_gradients()?;
                for i in 0..3 {
                    for j in 0..3 {
                        let v = p.kx * gg[i][0] * gg[j][0] + p.ky * gg[i][1] * gg[j][1];
                        kk.set(i, j, v * area * p.thickness);
                    }
                }
            }
            CellKind::Qua4 => {
                for (_, gg, det) in self.qua4_integ_points()? {
                    for i in 0..4 {
                        for j in 0..4 {
                            let v = p.kx * gg[i][0] * gg[j][0] + p.ky * gg[i][1] * gg[j][1];
                            kk.set(i, j, kk.get(i, j) + v * det * p.thickness);
                        }
                    }
                }
            }
        }
        Ok(kk)
    }

    fn capacity_matrix(&self) -> Result<Matrix, StrError> {
        let p = &self.param;
        let rho_cp = p.rho * p.cp;
        let nnode = self.kind.nnode();
        let mut cc = Matrix::new(nnode, nnode);
        match self.kind {
            CellKind::Lin2 => {
                let ll = self.length();
                if ll <= 0.0 {
                    return Err("Lin2 element must have positive length");
                }
                let c = rho_cp * p.thickness * ll / 6.0;
                cc.set(0, 0, 2.0 * c);
                cc.set(0, 1, c);
                cc.set(1, 0, c);
                cc.set(1, 1, 2.0 * c);
            }
            CellKind::Tri3 => {
                let (_, area) = self.tri3_gradients()?;
                let c = rho_cp * p.thickness * area / 12.0;
                for i in 0..3 {
                    for j in 0..3 {
                        cc.set(i, j, if i == j { 2.0 * c } else { c });
                    }
                }
            }
            CellKind::Qua4 => {
                for (nn, _, det) in self.qua4_integ_points()? {
                    for i in 0..4 {
                        for j in 0..4 {
                            cc.set(i, j, cc.get(i, j) + rho_cp * nn[i] * nn[j] * det * p.thickness);
                        }
                    }
                }
            }
        }
        if p.lumped_capacity {
            ElementDiffusion::lump(&mut cc);
        }
        Ok(cc)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
