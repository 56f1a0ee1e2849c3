use super::{ChildAnalyzer, ControlTime, ElementProvider, FileIo, GlobalSystem, SkylineMatrix, SolutionState};
use crate::base::{Config, InitialTemperature, Model};
use crate::Error;
use russell_lab::{format_nanoseconds, vec_add, vec_copy, Stopwatch, Vector};

/// Defines the stages of the transient analysis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// The global system has been assembled; initialize must be called
    Uninitialized,

    /// The effective matrix has been factorized and the initial state has been set
    Initialized,

    /// The time loop is running or has been aborted by a failure
    Stepping,

    /// All time steps have been computed
    Completed,
}

/// Implements the transient heat analysis `C·dT/dt + K·T = F`
///
/// The time integration employs the first-order generalized-α method (see [ControlTime]). Because
/// Δt and the coefficients are constant, the effective matrix is computed and factorized only once,
/// during [DynamicThermalAnalyzer::initialize]. The child analyzer is then called once per time step.
///
/// A failure at step `k` (zero-based) aborts the time loop with [Error::StepFailed]; the analyzer
/// stays in the [Stage::Stepping] stage and `step_count() == k`.
pub struct DynamicThermalAnalyzer<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Holds the child analyzer that solves the effective system
    child: &'a mut dyn ChildAnalyzer,

    /// Holds the global system
    system: GlobalSystem,

    /// Holds the initial temperatures of the free DOFs
    initial: Vector,

    /// Holds the time integration coefficients
    control: Option<ControlTime>,

    /// Holds the effective matrix
    kk_eff: Option<SkylineMatrix>,

    /// Holds the current state
    state: SolutionState,

    /// Holds the states of all time steps (if config.keep_history)
    history: Vec<SolutionState>,

    /// Holds the current stage
    stage: Stage,

    /// Holds the output files generator
    file_io: FileIo,

    /// Effective right-hand side
    rhs: Vector,

    /// Auxiliary vector
    aux: Vector,

    /// Temperatures at the new time
    tt_new: Vector,
}

impl<'a> DynamicThermalAnalyzer<'a> {
    /// Allocates a new instance and assembles the global system
    pub fn new(
        model: &Model,
        provider: &dyn ElementProvider,
        config: &'a Config,
        child: &'a mut dyn ChildAnalyzer,
    ) -> Result<Self, Error> {
        let system = GlobalSystem::new(model, provider, config)?;
        let n_free = system.equations.n_free;
        let mut initial = Vector::new(n_free);
        match &model.initial {
            InitialTemperature::Zero => (),
            InitialTemperature::Uniform(value) => initial.fill(*value),
            InitialTemperature::Nodal(values) => {
                if values.len() != model.nodes.len() {
                    return Err(Error::Configuration(
                        "nodal initial temperatures must have length = number of nodes",
                    ));
                }
                for (node, dofs) in system.equations.points.iter().enumerate() {
                    for (_, eq) in dofs {
                        if *eq < n_free {
                            initial[*eq] = values[node];
                        }
                    }
                }
            }
        }
        Ok(DynamicThermalAnalyzer {
            config,
            child,
            system,
            initial,
            control: None,
            kk_eff: None,
            state: SolutionState::new(n_free, config.dt),
            history: Vec::new(),
            stage: Stage::Uninitialized,
            file_io: FileIo::new(),
            rhs: Vector::new(n_free),
            aux: Vector::new(n_free),
            tt_new: Vector::new(n_free),
        })
    }

    /// Sets the output files generator (must be called before initialize)
    pub fn set_file_io(&mut self, file_io: FileIo) {
        self.file_io = file_io;
    }

    /// Validates the parameters, computes and factorizes the effective matrix, and sets the initial state
    ///
    /// ```text
    /// Keff = (α/Δt)·C + β·K    with    α = αm/γ    and    β = αf
    /// ```
    ///
    /// May be called again to restart the analysis.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.stage = Stage::Uninitialized;
        let control = ControlTime::new(self.config)?;
        let n_free = self.system.equations.n_free;
        if n_free == 0 {
            return Err(Error::Configuration("there are no free DOFs"));
        }

        // effective matrix
        let (alpha, beta) = control.keff_coefficients();
        let mut kk_eff = SkylineMatrix::new(self.system.profile.clone());
        kk_eff.linear_combination(alpha, &self.system.cc, beta, &self.system.kk)?;
        self.child.initialize(&kk_eff)?;

        // initial state
        self.state = SolutionState::new(n_free, control.dt);
        vec_copy(&mut self.state.temperature, &self.initial)?;
        self.history.clear();
        if self.config.keep_history {
            self.history.push(self.state.clone());
        }
        self.file_io.prescribed_values = self.system.equations.prescribed_values.clone();
        self.file_io.write_state(&self.state)?;

        self.control = Some(control);
        self.kk_eff = Some(kk_eff);
        self.stage = Stage::Initialized;
        Ok(())
    }

    /// Runs the time loop
    pub fn solve(&mut self) -> Result<(), Error> {
        match self.stage {
            Stage::Initialized => (),
            Stage::Uninitialized => return Err(Error::InvalidStage("initialize must be called before solve")),
            Stage::Stepping => return Err(Error::InvalidStage("initialize must be called again after a failure")),
            Stage::Completed => return Err(Error::InvalidStage("the analysis has already been completed")),
        }
        let mut stopwatch = Stopwatch::new();
        self.print_header();
        self.stage = Stage::Stepping;
        for k in 0..self.config.n_steps {
            let max_change = self.advance().map_err(|e| Error::StepFailed {
                step: k,
                source: Box::new(e),
            })?;
            if self.config.verbose_timesteps {
                println!(
                    "{:>8} {:>13.6e} {:>13.6e} {:>13.6e}",
                    self.state.step, self.state.t, self.state.dt, max_change
                );
            }
        }
        if self.file_io.last_step() != Some(self.state.step) {
            self.file_io.write_state(&self.state)?;
        }
        self.file_io.write_self()?;
        self.stage = Stage::Completed;
        if self.config.verbose_timesteps {
            println!("{}", "─".repeat(79));
            println!("elapsed time = {}", format_nanoseconds(stopwatch.stop()));
        }
        Ok(())
    }

    /// Computes one time step and returns the max-norm of the temperature change
    fn advance(&mut self) -> Result<f64, Error> {
        let (control, kk_eff) = match (&self.control, &self.kk_eff) {
            (Some(c), Some(k)) => (c, k),
            _ => return Err(Error::InvalidStage("the effective matrix is not available")),
        };

        // effective right-hand side: F + C·(a₁ Tₙ + a₂ Vₙ) - (1-αf) K·Tₙ
        let n_free = self.rhs.dim();
        vec_add(
            &mut self.aux,
            control.a1,
            &self.state.temperature,
            control.a2,
            &self.state.rate,
        )?;
        self.system.cc.mat_vec_mul(&mut self.rhs, 1.0, &self.aux)?;
        self.system
            .kk
            .mat_vec_mul(&mut self.aux, 1.0 - control.alpha_f, &self.state.temperature)?;
        for i in 0..n_free {
            self.rhs[i] += self.system.ff[i] - self.aux[i];
        }

        // solve Keff·Tₙ₊₁ = rhs
        self.child.solve_system(kk_eff, &self.rhs, &mut self.tt_new)?;

        // update the state
        control.update_rates(&mut self.state.rate, &self.tt_new, &self.state.temperature);
        let mut max_change = 0.0;
        for i in 0..n_free {
            max_change = f64::max(max_change, f64::abs(self.tt_new[i] - self.state.temperature[i]));
        }
        vec_copy(&mut self.state.temperature, &self.tt_new)?;
        self.state.step += 1;
        self.state.t = (self.state.step as f64) * control.dt;

        // output
        if self.config.keep_history {
            self.history.push(self.state.clone());
        }
        if self.config.n_out > 0 && self.state.step % self.config.n_out == 0 {
            self.file_io.write_state(&self.state)?;
        }
        Ok(max_change)
    }

    /// Prints the header of the time loop table
    fn print_header(&self) {
        if self.config.verbose_timesteps {
            println!("\nHEATFEM === TIME STEPPING ===================================================");
            println!("number of free DOFs = {}", self.system.equations.n_free);
            println!("{}", "─".repeat(79));
            println!("{:>8} {:>13} {:>13} {:>13}", "step", "t", "Δt", "max|ΔT|");
            println!("{}", "─".repeat(79));
        }
    }

    /// Returns the current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the number of completed time steps
    pub fn step_count(&self) -> usize {
        self.state.step
    }

    /// Returns the current time
    pub fn time(&self) -> f64 {
        self.state.t
    }

    /// Returns the temperatures of the free DOFs at the last completed step
    pub fn temperatures(&self) -> &Vector {
        &self.state.temperature
    }

    /// Returns the rates of the free DOFs at the last completed step
    pub fn rates(&self) -> &Vector {
        &self.state.rate
    }

    /// Returns the states of all completed steps, including the initial state (if config.keep_history)
    pub fn history(&self) -> &[SolutionState] {
        &self.history
    }

    /// Returns the current state
    pub fn state(&self) -> &SolutionState {
        &self.state
    }

    /// Returns the temperatures of all nodes (including the prescribed values)
    pub fn nodal_temperatures(&self) -> Vec<f64> {
        self.system.nodal_values(&self.state.temperature)
    }

    /// Returns access to the global system
    pub fn system(&self) -> &GlobalSystem {
        &self.system
    }

    /// Returns the effective matrix (available after initialize)
    pub fn kk_eff(&self) -> Option<&SkylineMatrix> {
        self.kk_eff.as_ref()
    }

    /// Returns access to the output files generator
    pub fn file_io(&self) -> &FileIo {
        &self.file_io
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{DynamicThermalAnalyzer, Stage};
    use crate::base::{Config, Dof, InitialTemperature, Model, ParamDiffusion, Samples, DEFAULT_TEST_DIR};
    use crate::fem::{ChildAnalyzer, DiffusionProvider, FileIo, LinearAnalyzer, SkylineMatrix};
    use crate::Error;
    use russell_lab::{approx_eq, array_approx_eq, vec_approx_eq, Vector};

    /// Fails at the n-th call to solve_system
    struct FailingChild {
        actual: LinearAnalyzer,
        fail_at: usize,
        count: usize,
    }

    impl ChildAnalyzer for FailingChild {
        fn initialize(&mut self, kk: &SkylineMatrix) -> Result<(), Error> {
            self.actual.initialize(kk)
        }
        fn solve_system(&mut self, kk: &SkylineMatrix, rhs: &Vector, x: &mut Vector) -> Result<(), Error> {
            let count = self.count;
            self.count += 1;
            if count == self.fail_at {
                return Err(Error::SingularMatrix {
                    equation: 0,
                    pivot: 0.0,
                });
            }
            self.actual.solve_system(kk, rhs, x)
        }
    }

    /// Returns a bar with one free DOF: 0.5·dT/dt + T = 0
    fn one_free_dof(initial: f64) -> (Model, DiffusionProvider) {
        let mut model = Samples::strip_lin2(1, 1.0);
        model.essential.at(&[0], Dof::T, 0.0);
        model.initial = InitialTemperature::Uniform(initial);
        let mut param = ParamDiffusion::sample();
        param.lumped_capacity = true;
        (model, DiffusionProvider::new([(1, param)]))
    }

    #[test]
    fn initialize_and_solve_capture_errors() {
        let (model, provider) = one_free_dof(1.0);
        let mut config = Config::new();
        config.set_dt(0.0);
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        assert_eq!(
            analyzer.solve().err(),
            Some(Error::InvalidStage("initialize must be called before solve"))
        );
        assert_eq!(
            analyzer.initialize().err(),
            Some(Error::Configuration("Δt must be > 0.0"))
        );
        assert_eq!(analyzer.stage(), Stage::Uninitialized);

        let mut config = Config::new();
        config.set_alphas(0.5, 0.4);
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        assert_eq!(
            analyzer.initialize().err(),
            Some(Error::Configuration("generalized-α method requires ½ ≤ αf ≤ αm"))
        );

        let mut model = Samples::strip_lin2(1, 1.0);
        model.essential.at(&[0, 1], Dof::T, 0.0);
        let config = Config::new();
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        assert_eq!(
            analyzer.initialize().err(),
            Some(Error::Configuration("there are no free DOFs"))
        );

        let mut model = Samples::strip_lin2(1, 1.0);
        model.initial = InitialTemperature::Nodal(vec![1.0]);
        let mut child = LinearAnalyzer::new(&config);
        assert_eq!(
            DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).err(),
            Some(Error::Configuration(
                "nodal initial temperatures must have length = number of nodes"
            ))
        );
    }

    #[test]
    fn crank_nicolson_matches_the_recurrence() {
        // λ = K/C = 2 and r = (1 - λΔt/2) / (1 + λΔt/2)
        let (model, provider) = one_free_dof(1.0);
        let mut config = Config::new();
        config.set_dt(0.1).set_n_steps(10).set_keep_history(true);
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        analyzer.initialize().unwrap();
        assert_eq!(analyzer.stage(), Stage::Initialized);
        analyzer.solve().unwrap();
        assert_eq!(analyzer.stage(), Stage::Completed);
        assert_eq!(analyzer.step_count(), 10);
        approx_eq(analyzer.time(), 1.0, 1e-15);
        let r: f64 = 0.9 / 1.1;
        approx_eq(analyzer.temperatures()[0], r.powi(10), 1e-14);
        assert_eq!(analyzer.history().len(), 11);
        for (n, state) in analyzer.history().iter().enumerate() {
            assert_eq!(state.step, n);
            approx_eq(state.temperature[0], r.powi(n as i32), 1e-14);
        }
        array_approx_eq(&analyzer.nodal_temperatures(), &[0.0, r.powi(10)], 1e-14);
        assert_eq!(
            analyzer.solve().err(),
            Some(Error::InvalidStage("the analysis has already been completed"))
        );

        // restart
        analyzer.initialize().unwrap();
        assert_eq!(analyzer.step_count(), 0);
        approx_eq(analyzer.temperatures()[0], 1.0, 1e-15);
        analyzer.solve().unwrap();
        approx_eq(analyzer.temperatures()[0], r.powi(10), 1e-14);
    }

    #[test]
    fn damped_scheme_decays_to_steady_state() {
        let (model, provider) = one_free_dof(10.0);
        let mut config = Config::new();
        config.set_dt(0.5).set_n_steps(100).set_rho_inf(0.5).unwrap();
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        analyzer.initialize().unwrap();
        analyzer.solve().unwrap();
        approx_eq(analyzer.temperatures()[0], 0.0, 1e-10);
        approx_eq(analyzer.rates()[0], 0.0, 1e-10);
        assert_eq!(analyzer.history().len(), 0);
    }

    #[test]
    fn effective_matrix_is_correct() {
        let (model, provider) = one_free_dof(0.0);
        let mut config = Config::new();
        config.set_dt(0.25);
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        assert!(analyzer.kk_eff().is_none());
        analyzer.initialize().unwrap();
        // (αm/(γ Δt))·C + αf·K = 4·0.5 + 0.5·1.0
        let kk_eff = analyzer.kk_eff().unwrap();
        approx_eq(kk_eff.get(0, 0), 2.5, 1e-15);
    }

    #[test]
    fn step_failure_is_reported() {
        let model = Samples::grid_3x3_qua4();
        let provider = DiffusionProvider::new([(1, ParamDiffusion::sample())]);
        let mut config = Config::new();
        config.set_n_steps(5);
        let mut child = FailingChild {
            actual: LinearAnalyzer::new(&config),
            fail_at: 2,
            count: 0,
        };
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        analyzer.initialize().unwrap();
        let err = analyzer.solve().err().unwrap();
        assert_eq!(
            err,
            Error::StepFailed {
                step: 2,
                source: Box::new(Error::SingularMatrix {
                    equation: 0,
                    pivot: 0.0
                })
            }
        );
        assert_eq!(err.root(), &Error::SingularMatrix { equation: 0, pivot: 0.0 });
        assert_eq!(analyzer.stage(), Stage::Stepping);
        assert_eq!(analyzer.step_count(), 2);
        assert_eq!(
            analyzer.solve().err(),
            Some(Error::InvalidStage("initialize must be called again after a failure"))
        );
    }

    #[test]
    fn nodal_initial_temperatures_work() {
        let mut model = Samples::grid_3x3_qua4();
        model.initial = InitialTemperature::Nodal((0..9).map(|i| i as f64).collect());
        let provider = DiffusionProvider::new([(1, ParamDiffusion::sample())]);
        let config = Config::new();
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        analyzer.initialize().unwrap();
        vec_approx_eq(analyzer.temperatures(), &[1.0, 2.0, 4.0, 5.0, 7.0, 8.0], 1e-15);
        array_approx_eq(
            &analyzer.nodal_temperatures(),
            &[100.0, 1.0, 2.0, 100.0, 4.0, 5.0, 100.0, 7.0, 8.0],
            1e-15,
        );
    }

    #[test]
    fn output_files_are_written() {
        let (model, provider) = one_free_dof(1.0);
        let mut config = Config::new();
        config.set_dt(0.1).set_n_steps(5).set_n_out(2);
        let mut child = LinearAnalyzer::new(&config);
        let mut analyzer = DynamicThermalAnalyzer::new(&model, &provider, &config, &mut child).unwrap();
        analyzer.set_file_io(FileIo::new_enabled("test_dynamic_analyzer", Some(DEFAULT_TEST_DIR)).unwrap());
        analyzer.initialize().unwrap();
        analyzer.solve().unwrap();
        assert_eq!(analyzer.file_io().steps, &[0, 2, 4, 5]);
        assert_eq!(analyzer.file_io().prescribed_values, &[0.0]);
        let summary = FileIo::read_json(&analyzer.file_io().path_summary()).unwrap();
        assert_eq!(summary.indices, &[0, 1, 2, 3]);
    }
}
