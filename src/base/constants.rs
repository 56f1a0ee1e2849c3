/// Defines the directory where the simulation result files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/heatfem/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/heatfem/test";

/// Defines the default (relative) tolerance for the pivots of the LDLᵀ factorization
pub const DEFAULT_PIVOT_TOL: f64 = 1e-12;
