use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the state of the solution at one time step
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SolutionState {
    /// Number of completed time steps
    pub step: usize,

    /// Time
    pub t: f64,

    /// Time step
    pub dt: f64,

    /// Temperatures of the free DOFs
    ///
    /// (n_free)
    pub temperature: Vector,

    /// Time derivative of the temperatures of the free DOFs
    ///
    /// (n_free) Always zero in static analyses.
    pub rate: Vector,
}

impl SolutionState {
    /// Allocates a new instance with zero values
    pub fn new(n_free: usize, dt: f64) -> Self {
        SolutionState {
            step: 0,
            t: 0.0,
            dt,
            temperature: Vector::new(n_free),
            rate: Vector::new(n_free),
        }
    }

    /// Reads a JSON file containing the state
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SolutionState;
    use crate::base::DEFAULT_TEST_DIR;
    use russell_lab::Vector;

    #[test]
    fn derive_methods_work() {
        let state = SolutionState::new(2, 0.5);
        let clone = state.clone();
        let str_ori = format!("{:?}", state).to_string();
        assert_eq!(format!("{:?}", clone), str_ori);
        let json = serde_json::to_string(&state).unwrap();
        let from_json: SolutionState = serde_json::from_str(&json).unwrap();
        assert_eq!(format!("{:?}", from_json), str_ori);
    }

    #[test]
    fn read_write_json_work() {
        let mut state = SolutionState::new(3, 0.25);
        state.step = 4;
        state.t = 1.0;
        state.temperature = Vector::from(&[1.0, 2.0, 3.0]);
        let path = format!("{}/test_solution_state.json", DEFAULT_TEST_DIR);
        state.write_json(&path).unwrap();
        let read = SolutionState::read_json(&path).unwrap();
        assert_eq!(read.step, 4);
        assert_eq!(read.t, 1.0);
        assert_eq!(read.dt, 0.25);
        assert_eq!(read.temperature.as_data(), &[1.0, 2.0, 3.0]);
        assert_eq!(read.rate.as_data(), &[0.0, 0.0, 0.0]);
        assert_eq!(
            SolutionState::read_json("/tmp/heatfem/__not_found__.json").err(),
            Some("cannot open file")
        );
    }
}
