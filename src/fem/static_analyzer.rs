use super::{ChildAnalyzer, ElementProvider, GlobalSystem, SolutionState};
use crate::base::{Config, Model};
use crate::Error;
use russell_lab::Vector;

/// Implements the steady-state (static) heat analysis `K·T = F`
pub struct StaticThermalAnalyzer<'a> {
    /// Holds the child analyzer that solves the linear system
    child: &'a mut dyn ChildAnalyzer,

    /// Holds the global system
    system: GlobalSystem,

    /// Holds the solution
    state: SolutionState,

    /// Indicates that the solution is available
    solved: bool,
}

impl<'a> StaticThermalAnalyzer<'a> {
    /// Allocates a new instance and assembles the global system
    pub fn new(
        model: &Model,
        provider: &dyn ElementProvider,
        config: &Config,
        child: &'a mut dyn ChildAnalyzer,
    ) -> Result<Self, Error> {
        config.validate_static()?;
        let system = GlobalSystem::new(model, provider, config)?;
        let state = SolutionState::new(system.equations.n_free, 0.0);
        Ok(StaticThermalAnalyzer {
            child,
            system,
            state,
            solved: false,
        })
    }

    /// Solves the linear system
    pub fn solve(&mut self) -> Result<(), Error> {
        if self.system.equations.n_free == 0 {
            return Err(Error::Configuration("there are no free DOFs"));
        }
        self.solved = false;
        self.child.initialize(&self.system.kk)?;
        self.child
            .solve_system(&self.system.kk, &self.system.ff, &mut self.state.temperature)?;
        self.solved = true;
        Ok(())
    }

    /// Returns true if the solution is available
    pub fn solved(&self) -> bool {
        self.solved
    }

    /// Returns the temperatures of the free DOFs
    pub fn temperatures(&self) -> &Vector {
        &self.state.temperature
    }

    /// Returns the temperatures of all nodes (including the prescribed values)
    pub fn nodal_temperatures(&self) -> Vec<f64> {
        self.system.nodal_values(&self.state.temperature)
    }

    /// Returns the solution state
    pub fn state(&self) -> &SolutionState {
        &self.state
    }

    /// Returns access to the global system
    pub fn system(&self) -> &GlobalSystem {
        &self.system
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
