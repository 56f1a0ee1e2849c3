use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds parameters for (linear) heat diffusion elements
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamDiffusion {
    /// Density ρ
    pub rho: f64,

    /// Specific heat cp
    pub cp: f64,

    /// Conductivity along x
    pub kx: f64,

    /// Conductivity along y (ignored in 1D)
    pub ky: f64,

    /// Out-of-plane thickness in 2D or cross-sectional area in 1D
    pub thickness: f64,

    /// Use a row-sum lumped capacity matrix instead of the consistent one
    pub lumped_capacity: bool,
}

impl ParamDiffusion {
    /// Returns a sample with unit density, specific heat, and isotropic conductivity
    pub fn sample() -> Self {
        ParamDiffusion {
            rho: 1.0,
            cp: 1.0,
            kx: 1.0,
            ky: 1.0,
            thickness: 1.0,
            lumped_capacity: false,
        }
    }

    /// Checks the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        if self.rho < 0.0 {
            return Err("density must be ≥ 0.0");
        }
        if self.cp < 0.0 {
            return Err("specific heat must be ≥ 0.0");
        }
        if self.kx <= 0.0 || self.ky <= 0.0 {
            return Err("conductivity must be > 0.0");
        }
        if self.thickness <= 0.0 {
            return Err("thickness must be > 0.0");
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ParamDiffusion;

    #[test]
    fn validate_works() {
        let p = ParamDiffusion::sample();
        assert_eq!(p.validate(), Ok(()));
        let mut q = p;
        q.rho = -1.0;
        assert_eq!(q.validate().err(), Some("density must be ≥ 0.0"));
        let mut q = p;
        q.cp = -1.0;
        assert_eq!(q.validate().err(), Some("specific heat must be ≥ 0.0"));
        let mut q = p;
        q.ky = 0.0;
        assert_eq!(q.validate().err(), Some("conductivity must be > 0.0"));
        let mut q = p;
        q.thickness = 0.0;
        assert_eq!(q.validate().err(), Some("thickness must be > 0.0"));
    }
}
