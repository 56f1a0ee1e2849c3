use crate::StrError;
use russell_lab::{Matrix, Vector};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Holds the counter used to stamp the values of skyline matrices
static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Returns a new (unique) stamp
fn next_stamp() -> u64 {
    NEXT_STAMP.fetch_add(1, Ordering::Relaxed)
}

/// Holds the profile (skyline) of a symmetric matrix
///
/// Each column `j` stores the entries from its first nonzero row `first_row[j]` down to the
/// diagonal. The columns are stored contiguously, top to bottom; thus, the diagonal of column
/// `j` is at position `diag_ptr[j]` and the entry `(i,j)` with `first_row[j] ≤ i ≤ j` is at
/// position `diag_ptr[j] - (j - i)`.
///
/// ```text
/// ┌                ┐    first_row = [0, 0, 1, 0]
/// │ a  b  .  d     │    diag_ptr  = [0, 2, 4, 8]
/// │    c  e  f     │    values    = [a, b, c, e, g, d, f, h, k]
/// │       g  h     │                         ↑              ↑
/// │ sym.     k     │                 (2,2) diagonal   (3,3) diagonal
/// └                ┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SkylineProfile {
    /// Row of the first stored entry of each column (≤ column index)
    first_row: Vec<usize>,

    /// Position of each diagonal entry in the values array
    diag_ptr: Vec<usize>,
}

impl SkylineProfile {
    /// Allocates a new instance given the first stored row of each column
    pub fn new(first_row: Vec<usize>) -> Result<Self, StrError> {
        let mut diag_ptr = Vec::with_capacity(first_row.len());
        let mut count = 0;
        for (j, first) in first_row.iter().enumerate() {
            if *first > j {
                return Err("the first row of a column must not be below the diagonal");
            }
            count += j - first;
            diag_ptr.push(count);
            count += 1;
        }
        Ok(SkylineProfile { first_row, diag_ptr })
    }

    /// Returns the dimension (number of rows = number of columns)
    pub fn dim(&self) -> usize {
        self.first_row.len()
    }

    /// Returns the number of stored entries (upper triangle including the diagonal)
    pub fn nnz(&self) -> usize {
        match self.diag_ptr.last() {
            Some(last) => last + 1,
            None => 0,
        }
    }

    /// Returns the first stored row of column j
    pub fn first_row(&self, j: usize) -> usize {
        self.first_row[j]
    }

    /// Returns the position of the diagonal of column j
    pub fn diag_ptr(&self, j: usize) -> usize {
        self.diag_ptr[j]
    }

    /// Returns the height of column j (number of stored entries above the diagonal)
    pub fn height(&self, j: usize) -> usize {
        j - self.first_row[j]
    }

    /// Returns the largest column height
    pub fn max_height(&self) -> usize {
        (0..self.dim()).map(|j| self.height(j)).max().unwrap_or(0)
    }

    /// Returns the position of entry (i,j) in the values array or None if outside the profile
    ///
    /// The indices are swapped if i > j (symmetry).
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> Option<usize> {
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        if j >= self.dim() || i < self.first_row[j] {
            None
        } else {
            Some(self.diag_ptr[j] - (j - i))
        }
    }
}

impl fmt::Display for SkylineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "first_row = {:?}\n", self.first_row)?;
        write!(f, "diag_ptr = {:?}\n", self.diag_ptr)?;
        write!(f, "dim = {}, nnz = {}, max_height = {}\n", self.dim(), self.nnz(), self.max_height())?;
        Ok(())
    }
}

/// Holds a symmetric matrix in skyline (profile) format
///
/// Several matrices (e.g., conductance, capacity, and effective matrices) may share the same profile.
/// Any change of values updates the `stamp`, allowing solvers to detect outdated factorizations.
#[derive(Clone, Debug)]
pub struct SkylineMatrix {
    /// Profile (shared)
    profile: Arc<SkylineProfile>,

    /// Stored entries (nnz)
    values: Vec<f64>,

    /// Identifies the current values
    stamp: u64,
}

impl SkylineMatrix {
    /// Allocates a new instance with all stored entries equal to zero
    pub fn new(profile: Arc<SkylineProfile>) -> Self {
        let nnz = profile.nnz();
        SkylineMatrix {
            profile,
            values: vec![0.0; nnz],
            stamp: next_stamp(),
        }
    }

    /// Allocates a new instance from the upper triangle of a dense matrix
    ///
    /// The profile is defined by the first nonzero entry of each column (the diagonal is always stored).
    /// The lower triangle is ignored.
    pub fn from_dense(a: &Matrix) -> Result<Self, StrError> {
        let (nrow, ncol) = a.dims();
        if nrow != ncol {
            return Err("the dense matrix must be square");
        }
        let first_row = (0..ncol)
            .map(|j| (0..j).find(|i| a.get(*i, j) != 0.0).unwrap_or(j))
            .collect();
        let mut res = SkylineMatrix::new(Arc::new(SkylineProfile::new(first_row)?));
        for j in 0..ncol {
            for i in res.profile.first_row(j)..(j + 1) {
                let p = res.profile.diag_ptr(j) - (j - i);
                res.values[p] = a.get(i, j);
            }
        }
        Ok(res)
    }

    /// Returns the dimension
    pub fn dim(&self) -> usize {
        self.profile.dim()
    }

    /// Returns access to the (shared) profile
    pub fn profile(&self) -> &Arc<SkylineProfile> {
        &self.profile
    }

    /// Returns the stored entries
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the stamp identifying the current values
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Returns the (i,j) entry (zero if outside the profile)
    pub fn get(&self, i: usize, j: usize) -> f64 {
        match self.profile.index(i, j) {
            Some(p) => self.values[p],
            None => 0.0,
        }
    }

    /// Adds a value to the (i,j) entry (and, implicitly, to the (j,i) entry)
    pub fn add(&mut self, i: usize, j: usize, value: f64) -> Result<(), StrError> {
        let p = self.profile.index(i, j).ok_or("cannot add entry outside the skyline profile")?;
        self.values[p] += value;
        self.stamp = next_stamp();
        Ok(())
    }

    /// Sets all stored entries to the same value
    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
        self.stamp = next_stamp();
    }

    /// Computes the linear combination `self = α·A + β·B`
    ///
    /// A and B must share the profile of this matrix.
    pub fn linear_combination(
        &mut self,
        alpha: f64,
        a: &SkylineMatrix,
        beta: f64,
        b: &SkylineMatrix,
    ) -> Result<(), StrError> {
        let same = |other: &Arc<SkylineProfile>| Arc::ptr_eq(other, &self.profile) || **other == *self.profile;
        if !same(&a.profile) || !same(&b.profile) {
            return Err("matrices must have the same skyline profile");
        }
        for p in 0..self.values.len() {
            self.values[p] = alpha * a.values[p] + beta * b.values[p];
        }
        self.stamp = next_stamp();
        Ok(())
    }

    /// Performs the matrix-vector multiplication `v = α·A·u`
    pub fn mat_vec_mul(&self, v: &mut Vector, alpha: f64, u: &Vector) -> Result<(), StrError> {
        let n = self.dim();
        if v.dim() != n || u.dim() != n {
            return Err("vectors are incompatible with the matrix");
        }
        v.fill(0.0);
        for j in 0..n {
            let first = self.profile.first_row(j);
            let diag = self.profile.diag_ptr(j);
            for i in first..j {
                let aij = self.values[diag - (j - i)];
                v[i] += aij * u[j];
                v[j] += aij * u[i];
            }
            v[j] += self.values[diag] * u[j];
        }
        if alpha != 1.0 {
            for i in 0..n {
                v[i] *= alpha;
            }
        }
        Ok(())
    }

    /// Returns the dense (full) representation
    pub fn to_dense(&self) -> Matrix {
        let n = self.dim();
        let mut a = Matrix::new(n, n);
        for j in 0..n {
            for i in self.profile.first_row(j)..(j + 1) {
                let value = self.values[self.profile.diag_ptr(j) - (j - i)];
                a.set(i, j, value);
                a.set(j, i, value);
            }
        }
        a
    }

    /// Returns mutable access to the stored entries and updates the stamp
    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        self.stamp = next_stamp();
        &mut self.values
    }
}

impl fmt::Display for SkylineMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dense())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{SkylineMatrix, SkylineProfile};
    use russell_lab::{mat_approx_eq, vec_approx_eq, Matrix, Vector};
    use std::sync::Arc;

    #[rustfmt::skip]
    fn sample_dense() -> Matrix {
        Matrix::from(&[
            [ 2.0, -1.0,  0.0,  3.0],
            [-1.0,  4.0,  5.0,  6.0],
            [ 0.0,  5.0,  7.0,  8.0],
            [ 3.0,  6.0,  8.0,  9.0],
        ])
    }

    #[test]
    fn profile_works() {
        let profile = SkylineProfile::new(vec![0, 0, 1, 0]).unwrap();
        assert_eq!(profile.dim(), 4);
        assert_eq!(profile.nnz(), 9);
        assert_eq!(profile.diag_ptr(2), 4);
        assert_eq!(profile.diag_ptr(3), 8);
        assert_eq!(profile.height(3), 3);
        assert_eq!(profile.max_height(), 3);
        assert_eq!(profile.index(0, 2), None);
        assert_eq!(profile.index(1, 2), Some(3));
        assert_eq!(profile.index(2, 1), Some(3));
        assert_eq!(profile.index(0, 3), Some(5));
        assert_eq!(profile.index(4, 4), None);
        assert_eq!(
            format!("{}", profile),
            "first_row = [0, 0, 1, 0]\n\
             diag_ptr = [0, 2, 4, 8]\n\
             dim = 4, nnz = 9, max_height = 3\n"
        );
        assert_eq!(
            SkylineProfile::new(vec![0, 2]).err(),
            Some("the first row of a column must not be below the diagonal")
        );
        let empty = SkylineProfile::new(Vec::new()).unwrap();
        assert_eq!(empty.nnz(), 0);
        assert_eq!(empty.max_height(), 0);
    }

    #[test]
    fn from_dense_and_to_dense_work() {
        let dense = sample_dense();
        let a = SkylineMatrix::from_dense(&dense).unwrap();
        assert_eq!(**a.profile(), SkylineProfile::new(vec![0, 0, 1, 0]).unwrap());
        assert_eq!(a.values(), &[2.0, -1.0, 4.0, 5.0, 7.0, 3.0, 6.0, 8.0, 9.0]);
        assert_eq!(a.get(2, 1), 5.0);
        assert_eq!(a.get(0, 2), 0.0);
        mat_approx_eq(&a.to_dense(), &dense, 1e-15);
        assert_eq!(
            SkylineMatrix::from_dense(&Matrix::new(2, 3)).err(),
            Some("the dense matrix must be square")
        );
    }

    #[test]
    fn add_and_fill_update_the_stamp() {
        let profile = Arc::new(SkylineProfile::new(vec![0, 0, 1]).unwrap());
        let mut a = SkylineMatrix::new(profile.clone());
        let s0 = a.stamp();
        a.add(0, 1, 2.0).unwrap();
        a.add(1, 0, 3.0).unwrap();
        let s1 = a.stamp();
        assert!(s1 != s0);
        assert_eq!(a.get(0, 1), 5.0);
        assert_eq!(a.get(1, 0), 5.0);
        assert_eq!(
            a.add(0, 2, 1.0).err(),
            Some("cannot add entry outside the skyline profile")
        );
        a.fill(1.0);
        assert!(a.stamp() != s1);
        assert_eq!(a.values(), &[1.0, 1.0, 1.0, 1.0, 1.0]);
        let b = SkylineMatrix::new(profile);
        assert!(b.stamp() != a.stamp());
    }

    #[test]
    fn mat_vec_mul_works() {
        let dense = sample_dense();
        let a = SkylineMatrix::from_dense(&dense).unwrap();
        let u = Vector::from(&[1.0, 2.0, 3.0, 4.0]);
        let mut v = Vector::new(4);
        a.mat_vec_mul(&mut v, 2.0, &u).unwrap();
        // dense: [2-2+0+12, -1+8+15+24, 0+10+21+32, 3+12+24+36] = [12, 46, 63, 75]
        vec_approx_eq(&v, &[24.0, 92.0, 126.0, 150.0], 1e-15);
        let mut w = Vector::new(3);
        assert_eq!(
            a.mat_vec_mul(&mut w, 1.0, &u).err(),
            Some("vectors are incompatible with the matrix")
        );
    }

    #[test]
    fn linear_combination_works() {
        let a = SkylineMatrix::from_dense(&sample_dense()).unwrap();
        let mut b = SkylineMatrix::new(a.profile().clone());
        b.fill(1.0);
        let mut c = SkylineMatrix::new(a.profile().clone());
        c.linear_combination(2.0, &a, -1.0, &b).unwrap();
        assert_eq!(c.values(), &[3.0, -3.0, 7.0, 9.0, 13.0, 5.0, 11.0, 15.0, 17.0]);

        let other = SkylineMatrix::from_dense(&Matrix::from(&[[1.0, 0.0], [0.0, 1.0]])).unwrap();
        assert_eq!(
            c.linear_combination(1.0, &a, 1.0, &other).err(),
            Some("matrices must have the same skyline profile")
        );
    }
}
