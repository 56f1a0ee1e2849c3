use super::SolutionState;
use crate::base::DEFAULT_OUT_DIR;
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Records the solution states of a transient analysis in JSON files
///
/// Each state goes to `{dir}/{stem}-{index}.json` (index padded with zeros to 20 digits) and the
/// list of written states goes to `{dir}/{stem}-summary.json`. The summary also keeps the values
/// of the prescribed DOFs, so the full nodal temperatures can be recovered from the state files.
///
/// Nothing is written by the instance returned by [FileIo::new].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileIo {
    /// Output directory and filename stem (None when the output is disabled)
    target: Option<(String, String)>,

    /// Index of each state file
    pub indices: Vec<usize>,

    /// Time step of each state file
    pub steps: Vec<usize>,

    /// Time of each state file
    pub times: Vec<f64>,

    /// Temperatures of the prescribed DOFs (in the order of their equation numbers)
    pub prescribed_values: Vec<f64>,
}

impl FileIo {
    /// Returns an instance that does not write anything
    pub fn new() -> Self {
        FileIo::default()
    }

    /// Returns an instance that writes the states to `output_directory`
    ///
    /// The directory is created if needed; None selects [DEFAULT_OUT_DIR].
    pub fn new_enabled(filename_stem: &str, output_directory: Option<&str>) -> Result<Self, StrError> {
        let dir = output_directory.unwrap_or(DEFAULT_OUT_DIR);
        fs::create_dir_all(dir).map_err(|_| "cannot create output directory")?;
        Ok(FileIo {
            target: Some((dir.to_string(), filename_stem.to_string())),
            ..FileIo::default()
        })
    }

    /// Returns true if the states are written
    pub fn enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Returns the path of the summary file (empty if disabled)
    pub fn path_summary(&self) -> String {
        self.path_with_suffix("summary")
    }

    /// Returns the path of the state file with the given index (empty if disabled)
    pub fn path_state(&self, index: usize) -> String {
        self.path_with_suffix(&format!("{:0>20}", index))
    }

    fn path_with_suffix(&self, suffix: &str) -> String {
        match &self.target {
            Some((dir, stem)) => format!("{}/{}-{}.json", dir, stem, suffix),
            None => String::new(),
        }
    }

    /// Reads a summary file
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let file = File::open(Path::new(full_path)).map_err(|_| "cannot open file")?;
        serde_json::from_reader(BufReader::new(file)).map_err(|_| "cannot parse JSON file")
    }

    /// Writes this summary to a file (the parent directory is created if needed)
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = PathBuf::from(full_path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|_| "cannot create directory")?;
        }
        let file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|_| "cannot write file")
    }

    /// Appends a state file and records its step and time (no-op if disabled)
    pub(crate) fn write_state(&mut self, state: &SolutionState) -> Result<(), StrError> {
        if !self.enabled() {
            return Ok(());
        }
        let index = self.indices.len();
        state.write_json(&self.path_state(index))?;
        self.indices.push(index);
        self.steps.push(state.step);
        self.times.push(state.t);
        Ok(())
    }

    /// Writes the summary file (no-op if disabled)
    pub(crate) fn write_self(&self) -> Result<(), StrError> {
        if self.enabled() {
            self.write_json(&self.path_summary())?;
        }
        Ok(())
    }

    /// Returns the step of the last state written (None if nothing was written)
    pub(crate) fn last_step(&self) -> Option<usize> {
        self.steps.last().copied()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FileIo;
    use crate::base::DEFAULT_TEST_DIR;
    use crate::fem::SolutionState;

    #[test]
    fn disabled_file_io_writes_nothing() {
        let mut file_io = FileIo::new();
        assert!(!file_io.enabled());
        assert_eq!(file_io.path_summary(), "");
        assert_eq!(file_io.path_state(0), "");
        let state = SolutionState::new(1, 1.0);
        file_io.write_state(&state).unwrap();
        file_io.write_self().unwrap();
        assert_eq!(file_io.indices.len(), 0);
        assert_eq!(file_io.last_step(), None);
    }

    #[test]
    fn enabled_file_io_works() {
        let mut file_io = FileIo::new_enabled("test_file_io", Some(DEFAULT_TEST_DIR)).unwrap();
        assert_eq!(
            file_io.path_summary(),
            format!("{}/test_file_io-summary.json", DEFAULT_TEST_DIR)
        );
        assert_eq!(
            file_io.path_state(3),
            format!("{}/test_file_io-00000000000000000003.json", DEFAULT_TEST_DIR)
        );
        let mut state = SolutionState::new(1, 0.5);
        file_io.write_state(&state).unwrap();
        state.step = 2;
        state.t = 1.0;
        file_io.write_state(&state).unwrap();
        file_io.write_self().unwrap();
        assert_eq!(file_io.indices, &[0, 1]);
        assert_eq!(file_io.steps, &[0, 2]);
        assert_eq!(file_io.last_step(), Some(2));

        let summary = FileIo::read_json(&file_io.path_summary()).unwrap();
        assert_eq!(summary.times, &[0.0, 1.0]);
        let last = SolutionState::read_json(&file_io.path_state(1)).unwrap();
        assert_eq!(last.step, 2);
    }
}
