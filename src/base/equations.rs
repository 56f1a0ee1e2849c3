use super::{Dof, Model, NodeId};
use crate::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Holds equation numbers (DOF numbers)
///
/// Every DOF is classified exactly once as free or prescribed (constrained). The free DOFs are
/// numbered first, followed by the prescribed ones; thus, the global matrices of the linear
/// system correspond to the leading `n_free × n_free` block. The numbering is computed once
/// and never changes during the analysis.
///
/// # Examples
///
/// ```text
///  {8}      {4}      {5}     {#} indicates equation number
///   6--------7--------8      [#] indicates element id
///   |        |        |
///   |  [2]   |  [3]   |      nodes 0, 3, 6 are prescribed
///   |        |        |
///   3--------4--------5
///  {7}      {2}      {3}
///   |        |        |
///   |  [0]   |  [1]   |
///   |        |        |
///   0--------1--------2
///  {6}      {0}      {1}
/// ```
#[derive(Clone, Debug)]
pub struct Equations {
    /// Holds all DOFs and equation numbers of each node
    ///
    /// (npoint) Nodes not connected to any element have no DOFs.
    pub points: Vec<Vec<(Dof, usize)>>,

    /// Holds the local-to-global maps of all elements
    ///
    /// (nelement) The local numbering is node-major (all DOFs of the first node, then the second node, ...).
    pub local_to_global: Vec<Vec<usize>>,

    /// Number of free DOFs (equations of the linear system)
    pub n_free: usize,

    /// Number of prescribed DOFs
    pub n_prescribed: usize,

    /// Total number of DOFs
    pub n_equation: usize,

    /// Prescribed values (n_prescribed) indexed by `eq - n_free`
    pub prescribed_values: Vec<f64>,
}

impl Equations {
    /// Computes the DOF numbers
    ///
    /// # Input
    ///
    /// * `model` -- the mesh with essential boundary conditions
    /// * `element_dofs` -- (nelement) the DOFs at each node of each element, as enumerated by the element provider
    pub fn new(model: &Model, element_dofs: &[Vec<Vec<Dof>>]) -> Result<Self, Error> {
        if element_dofs.len() != model.elements.len() {
            return Err(Error::Configuration("element DOF enumeration must have length = number of elements"));
        }

        // find the (unique) DOFs at each node
        let npoint = model.nodes.len();
        let mut memo_point_dofs = vec![BTreeSet::new(); npoint];
        for element in &model.elements {
            let dofs = &element_dofs[element.id];
            if dofs.len() != element.nodes.len() {
                return Err(Error::Configuration(
                    "element DOF enumeration is incompatible with the number of element nodes",
                ));
            }
            for (m, node) in element.nodes.iter().enumerate() {
                for dof in &dofs[m] {
                    memo_point_dofs[*node].insert(*dof);
                }
            }
        }

        // collect the prescribed values, checking for conflicts
        let mut prescribed: BTreeMap<(NodeId, Dof), f64> = BTreeMap::new();
        for c in &model.essential.all {
            if c.node >= npoint || !memo_point_dofs[c.node].contains(&c.dof) {
                return Err(Error::Configuration(
                    "cannot find equation number corresponding to (NodeId,DOF) of essential condition",
                ));
            }
            match prescribed.get(&(c.node, c.dof)) {
                Some(first) => {
                    if *first != c.value {
                        return Err(Error::BoundaryConditionConflict {
                            node: c.node,
                            dof: c.dof,
                            first: *first,
                            second: c.value,
                        });
                    }
                }
                None => {
                    prescribed.insert((c.node, c.dof), c.value);
                }
            }
        }

        // number the free DOFs first and then the prescribed DOFs
        let mut points = vec![Vec::new(); npoint];
        let mut n_free = 0;
        for node in 0..npoint {
            for dof in &memo_point_dofs[node] {
                if !prescribed.contains_key(&(node, *dof)) {
                    points[node].push((*dof, n_free));
                    n_free += 1;
                }
            }
        }
        let mut n_equation = n_free;
        let mut prescribed_values = Vec::with_capacity(prescribed.len());
        for node in 0..npoint {
            for dof in &memo_point_dofs[node] {
                if let Some(value) = prescribed.get(&(node, *dof)) {
                    points[node].push((*dof, n_equation));
                    prescribed_values.push(*value);
                    n_equation += 1;
                }
            }
            points[node].sort();
        }

        // local-to-global maps
        let mut local_to_global = Vec::with_capacity(model.elements.len());
        for element in &model.elements {
            let mut l2g = Vec::new();
            for (m, node) in element.nodes.iter().enumerate() {
                for dof in &element_dofs[element.id][m] {
                    let (_, eq) = points[*node].iter().find(|(d, _)| d == dof).unwrap(); // already inserted
                    l2g.push(*eq);
                }
            }
            local_to_global.push(l2g);
        }

        Ok(Equations {
            points,
            local_to_global,
            n_free,
            n_prescribed: n_equation - n_free,
            n_equation,
            prescribed_values,
        })
    }

    /// Returns the (global) equation number of a (NodeId,DOF) pair
    pub fn eq(&self, node: NodeId, dof: Dof) -> Result<usize, Error> {
        if node >= self.points.len() {
            return Err(Error::Configuration("cannot find equation number because NodeId is out-of-bounds"));
        }
        self.points[node]
            .iter()
            .find(|(d, _)| *d == dof)
            .map(|(_, eq)| *eq)
            .ok_or(Error::Configuration(
                "cannot find equation number corresponding to (NodeId,DOF)",
            ))
    }

    /// Returns true if the equation corresponds to a free DOF
    pub fn is_free(&self, eq: usize) -> bool {
        eq < self.n_free
    }

    /// Returns the prescribed value of an equation or None if the DOF is free
    pub fn prescribed_value(&self, eq: usize) -> Option<f64> {
        if eq < self.n_free || eq >= self.n_equation {
            None
        } else {
            Some(self.prescribed_values[eq - self.n_free])
        }
    }
}

impl fmt::Display for Equations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Points: DOFs and global equation numbers\n")?;
        write!(f, "========================================\n")?;
        for (node, dofs) in self.points.iter().enumerate() {
            write!(f, "{:?}: {:?}\n", node, dofs)?;
        }
        write!(f, "\nElements: Local-to-Global\n")?;
        write!(f, "=========================\n")?;
        for (e, l2g) in self.local_to_global.iter().enumerate() {
            write!(f, "{:?}: {:?}\n", e, l2g)?;
        }
        write!(f, "\nInformation\n")?;
        write!(f, "===========\n")?;
        write!(f, "number of free DOFs = {}\n", self.n_free)?;
        write!(f, "number of prescribed DOFs = {}\n", self.n_prescribed)?;
        write!(f, "number of equations = {}\n", self.n_equation)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Equations;
    use crate::base::{Dof, Samples};
    use crate::Error;

    fn temperature_dofs(nelement: usize, nnode: usize) -> Vec<Vec<Vec<Dof>>> {
        vec![vec![vec![Dof::T]; nnode]; nelement]
    }

    #[test]
    fn new_works() {
        let model = Samples::grid_3x3_qua4();
        let eqs = Equations::new(&model, &temperature_dofs(4, 4)).unwrap();
        assert_eq!(eqs.n_free, 6);
        assert_eq!(eqs.n_prescribed, 3);
        assert_eq!(eqs.n_free + eqs.n_prescribed, eqs.n_equation);
        assert_eq!(eqs.n_equation, 9);
        assert_eq!(eqs.prescribed_values, &[100.0, 100.0, 100.0]);
        assert_eq!(
            format!("{}", eqs),
            "Points: DOFs and global equation numbers\n\
             ========================================\n\
             0: [(T, 6)]\n\
             1: [(T, 0)]\n\
             2: [(T, 1)]\n\
             3: [(T, 7)]\n\
             4: [(T, 2)]\n\
             5: [(T, 3)]\n\
             6: [(T, 8)]\n\
             7: [(T, 4)]\n\
             8: [(T, 5)]\n\
             \n\
             Elements: Local-to-Global\n\
             =========================\n\
             0: [6, 0, 2, 7]\n\
             1: [0, 1, 3, 2]\n\
             2: [7, 2, 4, 8]\n\
             3: [2, 3, 5, 4]\n\
             \n\
             Information\n\
             ===========\n\
             number of free DOFs = 6\n\
             number of prescribed DOFs = 3\n\
             number of equations = 9\n"
        );
        assert_eq!(eqs.eq(4, Dof::T), Ok(2));
        assert_eq!(eqs.is_free(5), true);
        assert_eq!(eqs.is_free(6), false);
        assert_eq!(eqs.prescribed_value(5), None);
        assert_eq!(eqs.prescribed_value(8), Some(100.0));
        assert_eq!(eqs.prescribed_value(9), None);
    }

    #[test]
    fn free_dofs_precede_prescribed_dofs() {
        let mut model = Samples::grid_3x3_qua4();
        model.essential.at(&[8, 4], Dof::T, 0.0);
        let eqs = Equations::new(&model, &temperature_dofs(4, 4)).unwrap();
        assert_eq!(eqs.n_free + eqs.n_prescribed, eqs.n_equation);
        for (node, dofs) in eqs.points.iter().enumerate() {
            let (_, eq) = dofs[0];
            let constrained = [0, 3, 4, 6, 8].contains(&node);
            assert_eq!(eqs.is_free(eq), !constrained);
        }
        assert_eq!(eqs.n_free, 4);
    }

    #[test]
    fn repeated_constraints_with_the_same_value_are_accepted() {
        let mut model = Samples::grid_3x3_qua4();
        model.essential.at(&[0, 3], Dof::T, 100.0);
        let eqs = Equations::new(&model, &temperature_dofs(4, 4)).unwrap();
        assert_eq!(eqs.n_prescribed, 3);
    }

    #[test]
    fn new_captures_errors() {
        let mut model = Samples::grid_3x3_qua4();
        model.essential.at(&[3], Dof::T, 50.0);
        assert_eq!(
            Equations::new(&model, &temperature_dofs(4, 4)).err(),
            Some(Error::BoundaryConditionConflict {
                node: 3,
                dof: Dof::T,
                first: 100.0,
                second: 50.0
            })
        );

        let mut model = Samples::grid_3x3_qua4();
        model.essential.at(&[9], Dof::T, 0.0);
        assert_eq!(
            Equations::new(&model, &temperature_dofs(4, 4)).err(),
            Some(Error::Configuration(
                "cannot find equation number corresponding to (NodeId,DOF) of essential condition"
            ))
        );

        let model = Samples::grid_3x3_qua4();
        assert_eq!(
            Equations::new(&model, &temperature_dofs(3, 4)).err(),
            Some(Error::Configuration(
                "element DOF enumeration must have length = number of elements"
            ))
        );
        assert_eq!(
            Equations::new(&model, &temperature_dofs(4, 3)).err(),
            Some(Error::Configuration(
                "element DOF enumeration is incompatible with the number of element nodes"
            ))
        );

        let eqs = Equations::new(&model, &temperature_dofs(4, 4)).unwrap();
        assert_eq!(
            eqs.eq(9, Dof::T).err(),
            Some(Error::Configuration(
                "cannot find equation number because NodeId is out-of-bounds"
            ))
        );
    }
}
