use super::{CellKind, Dof, Element, Model, Node};

/// Holds sample models
pub struct Samples {}

impl Samples {
    /// Returns a 3×3 grid of nodes with four Qua4 elements and boundary conditions
    ///
    /// ```text
    ///  100.0 6--------7--------8 ← q/2
    ///        |        |        |
    ///        |  [2]   |  [3]   |
    ///        |        |        |
    ///  100.0 3--------4--------5 ← q
    ///        |        |        |
    ///        |  [0]   |  [1]   |
    ///        |        |        |
    ///  100.0 0--------1--------2 ← q/2
    /// ```
    ///
    /// The nodes have unit spacing; node `i` is located at `x = i mod 3` and `y = i div 3`.
    /// The temperature is prescribed (100.0) at nodes 0, 3, 6 and the flux `q = 50`
    /// is applied as the loads q/2, q, q/2 at nodes 2, 5, 8. All elements have attribute 1
    /// and belong to subdomain 0.
    ///
    /// The steady-state temperature at the free nodes 1, 2, 4, 5, 7, 8 is `150, 200, 150, 200, 150, 200`.
    pub fn grid_3x3_qua4() -> Model {
        let nodes = (0..9)
            .map(|i| Node {
                id: i,
                coords: vec![(i % 3) as f64, (i / 3) as f64],
            })
            .collect();
        let connectivity = [[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]];
        let elements = connectivity
            .iter()
            .enumerate()
            .map(|(e, points)| Element {
                id: e,
                attribute: 1,
                kind: CellKind::Qua4,
                nodes: points.to_vec(),
                subdomain: 0,
            })
            .collect();
        let mut model = Model::new(2, nodes, elements).unwrap(); // all data is consistent
        let q = 50.0;
        model.essential.at(&[0, 3, 6], Dof::T, 100.0);
        model
            .natural
            .at(&[2], Dof::T, q / 2.0)
            .at(&[5], Dof::T, q)
            .at(&[8], Dof::T, q / 2.0);
        model
    }

    /// Returns a 1D bar of length `length` with `nelement` Lin2 elements and no boundary conditions
    ///
    /// ```text
    /// 0-----1-----2-- ... --n    (n = nelement)
    /// ```
    ///
    /// All elements have attribute 1 and belong to subdomain 0.
    pub fn strip_lin2(nelement: usize, length: f64) -> Model {
        let h = length / (nelement as f64);
        let nodes = (0..(nelement + 1))
            .map(|i| Node {
                id: i,
                coords: vec![(i as f64) * h],
            })
            .collect();
        let elements = (0..nelement)
            .map(|e| Element {
                id: e,
                attribute: 1,
                kind: CellKind::Lin2,
                nodes: vec![e, e + 1],
                subdomain: 0,
            })
            .collect();
        Model::new(1, nodes, elements).unwrap() // all data is consistent
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Samples;
    use crate::base::CellKind;

    #[test]
    fn samples_work() {
        let model = Samples::grid_3x3_qua4();
        assert_eq!(model.nodes.len(), 9);
        assert_eq!(model.elements.len(), 4);
        assert_eq!(model.subdomains.len(), 1);
        assert_eq!(model.subdomains[0].elements, &[0, 1, 2, 3]);
        assert_eq!(model.nodes[7].coords, &[1.0, 2.0]);
        assert_eq!(model.essential.all.len(), 3);
        assert_eq!(model.natural.all.len(), 3);

        let model = Samples::strip_lin2(4, 2.0);
        assert_eq!(model.ndim, 1);
        assert_eq!(model.nodes.len(), 5);
        assert_eq!(model.nodes[4].coords, &[2.0]);
        assert_eq!(model.elements[3].nodes, &[3, 4]);
        assert_eq!(model.elements[3].kind, CellKind::Lin2);
        assert_eq!(model.essential.all.len(), 0);
    }
}
