use crate::base::Config;
use crate::Error;
use russell_lab::Vector;

/// Computes the coefficients of the first-order generalized-α method
///
/// The effective system at each time step is:
///
/// ```text
/// Keff·Tₙ₊₁ = F + C·(a₁ Tₙ + a₂ Vₙ) - (1-αf) K·Tₙ
///
/// Keff = a₁ C + αf K
/// a₁ = αm / (γ Δt)
/// a₂ = αm (1-γ) / γ - (1-αm)
/// ```
///
/// and the rates are updated with:
///
/// ```text
/// Vₙ₊₁ = (Tₙ₊₁ - Tₙ) / (γ Δt) - (1-γ)/γ Vₙ
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ControlTime {
    /// Time step
    pub dt: f64,

    /// Weight of the rates
    pub alpha_m: f64,

    /// Weight of the temperatures
    pub alpha_f: f64,

    /// γ = ½ + αm - αf
    pub gamma: f64,

    /// Coefficient a₁ multiplying C in Keff and Tₙ in the right-hand side
    pub a1: f64,

    /// Coefficient a₂ multiplying Vₙ in the right-hand side
    pub a2: f64,
}

impl ControlTime {
    /// Allocates a new instance
    pub fn new(config: &Config) -> Result<Self, Error> {
        config.validate()?;
        let dt = config.dt;
        let (alpha_m, alpha_f) = (config.alpha_m, config.alpha_f);
        let gamma = config.gamma();
        Ok(ControlTime {
            dt,
            alpha_m,
            alpha_f,
            gamma,
            a1: alpha_m / (gamma * dt),
            a2: alpha_m * (1.0 - gamma) / gamma - (1.0 - alpha_m),
        })
    }

    /// Returns the coefficients (α/Δt, β) of `Keff = (α/Δt)·C + β·K`
    pub fn keff_coefficients(&self) -> (f64, f64) {
        (self.a1, self.alpha_f)
    }

    /// Computes the rates at the new time
    ///
    /// On input `vv` holds Vₙ; on output it holds Vₙ₊₁.
    pub fn update_rates(&self, vv: &mut Vector, tt_new: &Vector, tt_old: &Vector) {
        let c = (1.0 - self.gamma) / self.gamma;
        for i in 0..vv.dim() {
            vv[i] = (tt_new[i] - tt_old[i]) / (self.gamma * self.dt) - c * vv[i];
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ControlTime;
    use crate::base::Config;
    use crate::Error;
    use russell_lab::{approx_eq, vec_approx_eq, Vector};

    #[test]
    fn new_captures_errors() {
        let mut config = Config::new();
        config.set_dt(-1.0);
        assert_eq!(
            ControlTime::new(&config).err(),
            Some(Error::Configuration("Δt must be > 0.0"))
        );
        config.set_dt(1.0).set_alphas(0.4, 0.6);
        assert_eq!(
            ControlTime::new(&config).err(),
            Some(Error::Configuration("generalized-α method requires ½ ≤ αf ≤ αm"))
        );
    }

    #[test]
    fn crank_nicolson_coefficients_are_correct() {
        let mut config = Config::new();
        config.set_dt(0.1);
        let control = ControlTime::new(&config).unwrap();
        approx_eq(control.gamma, 0.5, 1e-15);
        let (alpha, beta) = control.keff_coefficients();
        approx_eq(alpha, 10.0, 1e-14);
        approx_eq(beta, 0.5, 1e-15);
        approx_eq(control.a2, 0.0, 1e-15);
    }

    #[test]
    fn backward_euler_like_coefficients_are_correct() {
        // ρ∞ = 0: αm = 3/2, αf = 1, γ = 1
        let mut config = Config::new();
        config.set_dt(0.5).set_rho_inf(0.0).unwrap();
        let control = ControlTime::new(&config).unwrap();
        approx_eq(control.gamma, 1.0, 1e-15);
        approx_eq(control.a1, 3.0, 1e-15);
        approx_eq(control.a2, 0.5, 1e-15);
        let mut vv = Vector::from(&[1.0, 2.0]);
        let tt_old = Vector::from(&[0.0, 1.0]);
        let tt_new = Vector::from(&[1.0, 3.0]);
        control.update_rates(&mut vv, &tt_new, &tt_old);
        vec_approx_eq(&vv, &[2.0, 4.0], 1e-15);
    }
}
