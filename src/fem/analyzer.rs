use super::{SkylineMatrix, SkylineSolver};
use crate::base::Config;
use crate::Error;
use russell_lab::{format_nanoseconds, Stopwatch, Vector};

/// Defines the capability of solving one (effective) linear system
///
/// Parent analyzers own the iteration (time stepping); a child analyzer only produces the solution
/// of the current system. Errors from the linear solver must be propagated unchanged.
pub trait ChildAnalyzer {
    /// Prepares the solution of systems with the given matrix (e.g., factorizes it)
    fn initialize(&mut self, kk: &SkylineMatrix) -> Result<(), Error>;

    /// Solves `K·x = rhs`
    ///
    /// The matrix may differ from the one given to `initialize`; in this case, the child must
    /// recompute whatever it has cached.
    fn solve_system(&mut self, kk: &SkylineMatrix, rhs: &Vector, x: &mut Vector) -> Result<(), Error>;
}

/// Implements the child analyzer of linear problems using the skyline LDLᵀ solver
///
/// The factorization is cached and computed again only when the matrix values change.
pub struct LinearAnalyzer {
    /// Holds the linear solver
    solver: SkylineSolver,

    /// Prints information about the factorization
    verbose: bool,

    /// Counts the number of factorizations
    n_factorization: usize,
}

impl LinearAnalyzer {
    /// Allocates a new instance
    pub fn new(config: &Config) -> Self {
        LinearAnalyzer {
            solver: SkylineSolver::new(config.pivot_tol),
            verbose: config.verbose_lin_sys,
            n_factorization: 0,
        }
    }

    /// Returns the number of factorizations performed so far
    pub fn n_factorization(&self) -> usize {
        self.n_factorization
    }

    /// Returns true if the cached factorization corresponds to the matrix
    fn is_current(&self, kk: &SkylineMatrix) -> bool {
        self.solver.is_factorized() && self.solver.stamp() == Some(kk.stamp())
    }

    /// Rebuilds and factorizes the matrix
    fn factorize(&mut self, kk: &SkylineMatrix) -> Result<(), Error> {
        let mut stopwatch = Stopwatch::new();
        self.solver.rebuild(kk);
        self.solver.factorize()?;
        let elapsed = stopwatch.stop();
        self.n_factorization += 1;
        if self.verbose {
            let (neq, nnz) = self.solver.size();
            println!(
                "LDLᵀ factorization: neq = {}, nnz = {}, max height = {}, elapsed = {}",
                neq,
                nnz,
                kk.profile().max_height(),
                format_nanoseconds(elapsed)
            );
        }
        Ok(())
    }
}

impl ChildAnalyzer for LinearAnalyzer {
    fn initialize(&mut self, kk: &SkylineMatrix) -> Result<(), Error> {
        if !self.is_current(kk) {
            self.factorize(kk)?;
        }
        Ok(())
    }

    fn solve_system(&mut self, kk: &SkylineMatrix, rhs: &Vector, x: &mut Vector) -> Result<(), Error> {
        if !self.is_current(kk) {
            self.factorize(kk)?;
        }
        self.solver.solve(x, rhs)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
