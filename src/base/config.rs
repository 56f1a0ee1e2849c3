use super::DEFAULT_PIVOT_TOL;
use crate::{Error, StrError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds configuration parameters for the static and dynamic (transient) analyses
///
/// # Time integration
///
/// The transient analysis uses the first-order generalized-α (generalized trapezoidal) method:
///
/// ```text
/// C·[(1-αm) Vₙ + αm Vₙ₊₁] + K·[(1-αf) Tₙ + αf Tₙ₊₁] = F
/// Tₙ₊₁ = Tₙ + Δt [(1-γ) Vₙ + γ Vₙ₊₁]    with    γ = ½ + αm - αf
/// ```
///
/// The method is unconditionally stable if `½ ≤ αf ≤ αm`. The symmetric choice `αm = αf = ½`
/// reproduces the Crank-Nicolson method for the temperatures.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Time step Δt
    pub dt: f64,

    /// Total number of time steps
    pub n_steps: usize,

    /// Weight αm of the rates (capacity term)
    pub alpha_m: f64,

    /// Weight αf of the temperatures (conductance term)
    pub alpha_f: f64,

    /// Relative tolerance for the pivots of the LDLᵀ factorization
    pub pivot_tol: f64,

    /// Keeps the temperatures of all time steps
    pub keep_history: bool,

    /// Writes the state every `n_out` steps (zero means only the initial and final states)
    pub n_out: usize,

    /// Computes the element matrices in parallel
    pub parallel_assembly: bool,

    /// Prints one line per time step
    pub verbose_timesteps: bool,

    /// Prints information about the linear system and its factorization
    pub verbose_lin_sys: bool,
}

impl Config {
    /// Allocates a new instance with default values
    ///
    /// # Default values
    ///
    /// * `dt = 1.0`, `n_steps = 1`
    /// * `alpha_m = alpha_f = 0.5` (Crank-Nicolson)
    /// * `pivot_tol = 1e-12`
    pub fn new() -> Self {
        Config {
            dt: 1.0,
            n_steps: 1,
            alpha_m: 0.5,
            alpha_f: 0.5,
            pivot_tol: DEFAULT_PIVOT_TOL,
            keep_history: false,
            n_out: 0,
            parallel_assembly: true,
            verbose_timesteps: false,
            verbose_lin_sys: false,
        }
    }

    /// Sets the time step
    pub fn set_dt(&mut self, dt: f64) -> &mut Self {
        self.dt = dt;
        self
    }

    /// Sets the total number of time steps
    pub fn set_n_steps(&mut self, n_steps: usize) -> &mut Self {
        self.n_steps = n_steps;
        self
    }

    /// Sets the two parameters of the generalized-α method
    pub fn set_alphas(&mut self, alpha_m: f64, alpha_f: f64) -> &mut Self {
        self.alpha_m = alpha_m;
        self.alpha_f = alpha_f;
        self
    }

    /// Calculates αm and αf from the spectral radius at infinite frequency
    ///
    /// ```text
    /// αm = (3 - ρ∞) / (2 (1 + ρ∞))
    /// αf = 1 / (1 + ρ∞)
    /// ```
    ///
    /// `ρ∞ = 1` yields Crank-Nicolson and `ρ∞ = 0` annihilates the highest frequencies in one step.
    pub fn set_rho_inf(&mut self, rho_inf: f64) -> Result<&mut Self, StrError> {
        if rho_inf < 0.0 || rho_inf > 1.0 {
            return Err("ρ∞ must satisfy 0 ≤ ρ∞ ≤ 1");
        }
        self.alpha_m = (3.0 - rho_inf) / (2.0 * (1.0 + rho_inf));
        self.alpha_f = 1.0 / (1.0 + rho_inf);
        Ok(self)
    }

    /// Sets the relative tolerance for the pivots
    pub fn set_pivot_tol(&mut self, tol: f64) -> &mut Self {
        self.pivot_tol = tol;
        self
    }

    /// Keeps (or not) the temperatures of all time steps
    pub fn set_keep_history(&mut self, flag: bool) -> &mut Self {
        self.keep_history = flag;
        self
    }

    /// Sets the output interval (in number of steps)
    pub fn set_n_out(&mut self, n_out: usize) -> &mut Self {
        self.n_out = n_out;
        self
    }

    /// Enables or disables the parallel computation of element matrices
    pub fn set_parallel_assembly(&mut self, flag: bool) -> &mut Self {
        self.parallel_assembly = flag;
        self
    }

    /// Enables or disables the messages of the time loop
    pub fn set_verbose_timesteps(&mut self, flag: bool) -> &mut Self {
        self.verbose_timesteps = flag;
        self
    }

    /// Enables or disables the messages of the linear solver
    pub fn set_verbose_lin_sys(&mut self, flag: bool) -> &mut Self {
        self.verbose_lin_sys = flag;
        self
    }

    /// Returns the γ parameter of the generalized-α method
    pub fn gamma(&self) -> f64 {
        0.5 + self.alpha_m - self.alpha_f
    }

    /// Checks the parameters needed by the static analysis
    pub fn validate_static(&self) -> Result<(), Error> {
        if !(self.pivot_tol > 0.0) || !self.pivot_tol.is_finite() {
            return Err(Error::Configuration("pivot tolerance must be > 0.0"));
        }
        Ok(())
    }

    /// Checks all parameters needed by the transient analysis
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_static()?;
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(Error::Configuration("Δt must be > 0.0"));
        }
        if self.n_steps < 1 {
            return Err(Error::Configuration("the number of time steps must be ≥ 1"));
        }
        if !self.alpha_m.is_finite() || !self.alpha_f.is_finite() {
            return Err(Error::Configuration("αm and αf must be finite"));
        }
        if self.alpha_f < 0.5 || self.alpha_m < self.alpha_f {
            return Err(Error::Configuration("generalized-α method requires ½ ≤ αf ≤ αm"));
        }
        if self.alpha_m > 1.5 {
            return Err(Error::Configuration("generalized-α method requires αm ≤ 3/2"));
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n")?;
        write!(f, "==================\n")?;
        write!(f, "dt = {:?}\n", self.dt)?;
        write!(f, "n_steps = {:?}\n", self.n_steps)?;
        write!(f, "alpha_m = {:?}\n", self.alpha_m)?;
        write!(f, "alpha_f = {:?}\n", self.alpha_f)?;
        write!(f, "gamma = {:?}\n", self.gamma())?;
        write!(f, "pivot_tol = {:?}\n", self.pivot_tol)?;
        write!(f, "keep_history = {:?}\n", self.keep_history)?;
        write!(f, "n_out = {:?}\n", self.n_out)?;
        write!(f, "parallel_assembly = {:?}\n", self.parallel_assembly)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
