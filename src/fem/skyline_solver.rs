use super::SkylineMatrix;
use crate::Error;
use russell_lab::Vector;

/// Implements the LDLᵀ factorization and solution of symmetric systems in skyline format
///
/// The factorization respects the profile of the matrix (no fill-in outside the skyline). The
/// solver works on its own copy of the matrix; therefore, [SkylineSolver::rebuild] must be called
/// whenever the values of the matrix change.
///
/// After factorization, the strict upper part of each column holds the entries of Lᵀ and the
/// diagonal holds D.
pub struct SkylineSolver {
    /// Relative tolerance for the pivots: `|dⱼ| ≤ pivot_tol·|aⱼⱼ|` means singular
    pivot_tol: f64,

    /// Holds the matrix (before factorization) or the factors L and D (after factorization)
    factors: Option<SkylineMatrix>,

    /// Holds the diagonal of the original matrix (for the pivot test)
    diagonal: Vec<f64>,

    /// Indicates that the factors are available
    factorized: bool,

    /// Indicates that a factorization failed and left the values partially reduced
    dirty: bool,

    /// Holds the stamp of the matrix given to rebuild
    stamp: Option<u64>,
}

impl SkylineSolver {
    /// Allocates a new (empty) instance
    pub fn new(pivot_tol: f64) -> Self {
        SkylineSolver {
            pivot_tol,
            factors: None,
            diagonal: Vec::new(),
            factorized: false,
            dirty: false,
            stamp: None,
        }
    }

    /// Copies the matrix values and invalidates any previous factorization
    pub fn rebuild(&mut self, a: &SkylineMatrix) {
        let profile = a.profile();
        self.diagonal = (0..a.dim()).map(|j| a.values()[profile.diag_ptr(j)]).collect();
        self.factors = Some(a.clone());
        self.factorized = false;
        self.dirty = false;
        self.stamp = Some(a.stamp());
    }

    /// Performs the in-place LDLᵀ factorization (active column method)
    ///
    /// ```text
    /// gᵢⱼ = aᵢⱼ - Σ lₖᵢ gₖⱼ     k = max(fᵢ, fⱼ) … i-1
    /// lᵢⱼ = gᵢⱼ / dᵢ
    /// dⱼ  = aⱼⱼ - Σ lᵢⱼ gᵢⱼ     i = fⱼ … j-1
    /// ```
    ///
    /// where `fⱼ` is the first stored row of column j.
    ///
    /// Does nothing if the factors are already available. After a failure, [SkylineSolver::rebuild]
    /// must be called before trying again.
    pub fn factorize(&mut self) -> Result<(), Error> {
        let a = match self.factors.as_mut() {
            Some(a) => a,
            None => return Err(Error::InvalidStage("cannot factorize because the matrix has not been given")),
        };
        if self.factorized {
            return Ok(());
        }
        if self.dirty {
            return Err(Error::InvalidStage("rebuild must be called after a failed factorization"));
        }
        self.dirty = true;
        let profile = a.profile().clone();
        let values = a.values_mut();
        for j in 0..profile.dim() {
            let fj = profile.first_row(j);
            let dj_ptr = profile.diag_ptr(j);
            let top_j = dj_ptr - (j - fj);

            // reduce the column: gᵢⱼ
            for i in (fj + 1)..j {
                let fi = profile.first_row(i);
                let top_i = profile.diag_ptr(i) - (i - fi);
                let k0 = usize::max(fi, fj);
                let mut sum = 0.0;
                for k in k0..i {
                    sum += values[top_i + (k - fi)] * values[top_j + (k - fj)];
                }
                values[top_j + (i - fj)] -= sum;
            }

            // compute lᵢⱼ and the pivot dⱼ
            let mut dj = values[dj_ptr];
            for i in fj..j {
                let p = top_j + (i - fj);
                let g = values[p];
                let l = g / values[profile.diag_ptr(i)];
                dj -= l * g;
                values[p] = l;
            }
            if !dj.is_finite() || f64::abs(dj) <= self.pivot_tol * f64::abs(self.diagonal[j]) {
                return Err(Error::SingularMatrix { equation: j, pivot: dj });
            }
            values[dj_ptr] = dj;
        }
        self.dirty = false;
        self.factorized = true;
        Ok(())
    }

    /// Solves the linear system using the cached factorization
    ///
    /// May be called repeatedly with different right-hand sides.
    ///
    /// # Input
    ///
    /// * `x` -- (n) the solution vector (output)
    /// * `rhs` -- (n) the right-hand side vector
    pub fn solve(&self, x: &mut Vector, rhs: &Vector) -> Result<(), Error> {
        let a = match (&self.factors, self.factorized) {
            (Some(a), true) => a,
            _ => return Err(Error::InvalidStage("cannot solve because the matrix has not been factorized")),
        };
        let n = a.dim();
        if x.dim() != n || rhs.dim() != n {
            return Err(Error::Internal("vectors are incompatible with the factorized matrix"));
        }
        let profile = a.profile();
        let values = a.values();
        for i in 0..n {
            x[i] = rhs[i];
        }

        // forward substitution: L·y = b
        for j in 0..n {
            let fj = profile.first_row(j);
            let top_j = profile.diag_ptr(j) - (j - fj);
            let mut sum = 0.0;
            for i in fj..j {
                sum += values[top_j + (i - fj)] * x[i];
            }
            x[j] -= sum;
        }

        // diagonal scaling: D·z = y
        for j in 0..n {
            x[j] /= values[profile.diag_ptr(j)];
        }

        // backward substitution: Lᵀ·x = z
        for j in (0..n).rev() {
            let fj = profile.first_row(j);
            let top_j = profile.diag_ptr(j) - (j - fj);
            let xj = x[j];
            for i in fj..j {
                x[i] -= values[top_j + (i - fj)] * xj;
            }
        }
        Ok(())
    }

    /// Returns true if the factorization is available
    pub fn is_factorized(&self) -> bool {
        self.factorized
    }

    /// Returns the stamp of the matrix given to rebuild (None if rebuild was never called)
    pub fn stamp(&self) -> Option<u64> {
        self.stamp
    }

    /// Returns the dimension and number of stored entries of the matrix
    pub fn size(&self) -> (usize, usize) {
        match &self.factors {
            Some(a) => (a.dim(), a.profile().nnz()),
            None => (0, 0),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
