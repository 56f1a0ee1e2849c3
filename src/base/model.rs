use super::{CellKind, Essential, InitialTemperature, Natural};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the index of a node in the model arena
pub type NodeId = usize;

/// Defines the index of an element in the model arena
pub type ElementId = usize;

/// Defines the index of a subdomain in the model arena
pub type SubdomainId = usize;

/// Defines the attribute (material tag) of an element
pub type Attribute = usize;

/// Holds a node (point) of the mesh
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Node {
    /// Identification number which must equal the index in `Model::nodes`
    pub id: NodeId,

    /// Coordinates (ndim)
    pub coords: Vec<f64>,
}

/// Holds an element (cell) of the mesh
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Element {
    /// Identification number which must equal the index in `Model::elements`
    pub id: ElementId,

    /// Attribute used by the element provider to find the material parameters
    pub attribute: Attribute,

    /// Cell kind
    pub kind: CellKind,

    /// Ordered list of nodes (the local numbering follows the cell kind)
    pub nodes: Vec<NodeId>,

    /// Subdomain containing this element
    pub subdomain: SubdomainId,
}

/// Holds a set of elements sharing a local numbering partition
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Subdomain {
    /// Identification number which must equal the index in `Model::subdomains`
    pub id: SubdomainId,

    /// Elements of this subdomain (sorted)
    pub elements: Vec<ElementId>,
}

/// Holds the mesh and the boundary conditions (the model registry)
///
/// All entities are stored in dense arenas with ids assigned contiguously from zero.
/// Thus, `nodes[i].id == i`, `elements[e].id == e`, and `subdomains[s].id == s`.
pub struct Model {
    /// Space dimension
    pub ndim: usize,

    /// All nodes
    pub nodes: Vec<Node>,

    /// All elements
    pub elements: Vec<Element>,

    /// All subdomains (derived from `Element::subdomain`)
    pub subdomains: Vec<Subdomain>,

    /// Dirichlet conditions
    pub essential: Essential,

    /// Neumann (point source) conditions
    pub natural: Natural,

    /// Initial temperature of the free DOFs
    pub initial: InitialTemperature,
}

impl Model {
    /// Allocates a new instance and builds the subdomain partitioning
    ///
    /// The boundary conditions are empty and the initial temperature is zero.
    pub fn new(ndim: usize, nodes: Vec<Node>, elements: Vec<Element>) -> Result<Self, Error> {
        let mut subdomains: Vec<Subdomain> = Vec::new();
        for element in &elements {
            while subdomains.len() <= element.subdomain {
                let id = subdomains.len();
                subdomains.push(Subdomain {
                    id,
                    elements: Vec::new(),
                });
            }
            subdomains[element.subdomain].elements.push(element.id);
        }
        let model = Model {
            ndim,
            nodes,
            elements,
            subdomains,
            essential: Essential::new(),
            natural: Natural::new(),
            initial: InitialTemperature::Zero,
        };
        model.validate()?;
        Ok(model)
    }

    /// Checks the arena invariants
    pub fn validate(&self) -> Result<(), Error> {
        if self.ndim < 1 || self.ndim > 3 {
            return Err(Error::Configuration("ndim must be 1, 2, or 3"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id != i {
                return Err(Error::Configuration("node ids must be sequential from zero"));
            }
            if node.coords.len() != self.ndim {
                return Err(Error::Configuration("number of node coordinates must equal ndim"));
            }
        }
        let npoint = self.nodes.len();
        for (e, element) in self.elements.iter().enumerate() {
            if element.id != e {
                return Err(Error::Configuration("element ids must be sequential from zero"));
            }
            if element.nodes.len() != element.kind.nnode() {
                return Err(Error::Configuration("number of element nodes is incompatible with the cell kind"));
            }
            if element.kind.ndim() > self.ndim {
                return Err(Error::Configuration("cell kind requires a larger space dimension"));
            }
            if element.nodes.iter().any(|n| *n >= npoint) {
                return Err(Error::Configuration("element references a node that does not exist"));
            }
            if element.subdomain >= self.subdomains.len() {
                return Err(Error::Configuration("element references a subdomain that does not exist"));
            }
            if !self.subdomains[element.subdomain].elements.contains(&e) {
                return Err(Error::Configuration("element is missing from its subdomain"));
            }
        }
        let mut owner = vec![false; self.elements.len()];
        for (s, subdomain) in self.subdomains.iter().enumerate() {
            if subdomain.id != s {
                return Err(Error::Configuration("subdomain ids must be sequential from zero"));
            }
            for e in &subdomain.elements {
                if *e >= self.elements.len() || self.elements[*e].subdomain != s {
                    return Err(Error::Configuration("subdomain lists an element of another subdomain"));
                }
                if owner[*e] {
                    return Err(Error::Configuration("element is listed twice in the subdomains"));
                }
                owner[*e] = true;
            }
        }
        if let InitialTemperature::Nodal(values) = &self.initial {
            if values.len() != npoint {
                return Err(Error::Configuration("nodal initial temperatures must have length = number of nodes"));
            }
        }
        Ok(())
    }

    /// Returns the coordinates of the nodes of an element
    pub fn element_coords(&self, element: &Element) -> Vec<&[f64]> {
        element
            .nodes
            .iter()
            .map(|n| self.nodes[*n].coords.as_slice())
            .collect()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nodes\n")?;
        write!(f, "=====\n")?;
        for node in &self.nodes {
            write!(f, "{}: {:?}\n", node.id, node.coords)?;
        }
        write!(f, "\nElements\n")?;
        write!(f, "========\n")?;
        for element in &self.elements {
            write!(
                f,
                "{}: {} {:?} (attribute = {}, subdomain = {})\n",
                element.id, element.kind, element.nodes, element.attribute, element.subdomain
            )?;
        }
        write!(f, "\nSubdomains\n")?;
        write!(f, "==========\n")?;
        for subdomain in &self.subdomains {
            write!(f, "{}: {:?}\n", subdomain.id, subdomain.elements)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
