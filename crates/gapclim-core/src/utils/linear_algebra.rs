//! Linear algebra utilities.

use nalgebra::{Matrix2, Vector2};

/// Eigenvalues in `[-EIGENVALUE_TOLERANCE * |trace|, 0)` are rounding noise of a
/// singular matrix and are treated as zero.
pub const EIGENVALUE_TOLERANCE: f64 = 1e-9;

/// Build the symmetric matrix `[[a, c], [c, b]]`.
pub fn symmetric_matrix(a: f64, b: f64, c: f64) -> Matrix2<f64> {
    Matrix2::new(a, c, c, b)
}

/// Closed-form eigendecomposition of a symmetric 2x2 matrix.
///
/// The matrix
/// ```text
/// | a  c |
/// | c  b |
/// ```
/// is diagonalised with a single Givens rotation through the angle of its
/// principal axes, $\theta = \operatorname{atan2}(2c, a - b) / 2$.
///
/// With $s = \sin\theta$ and $k = \cos\theta$ the eigenvalues are
///
/// $$\lambda_0 = s^2 b + k^2 a + 2 s k c, \qquad \lambda_1 = s^2 a + k^2 b - 2 s k c$$
///
/// and the eigenvectors are the columns of the rotation matrix
/// `[[k, -s], [s, k]]`.
///
/// When `a == b` and `c == 0` the rotation angle is degenerate. `f64::atan2`
/// returns `+0.0` for `atan2(+0.0, +0.0)`, so the decomposition is the
/// identity rotation with eigenvalues `(a, b)`.
///
/// # Example
/// ```
/// use gapclim_core::utils::linear_algebra::SymmetricEigen2;
///
/// let eigen = SymmetricEigen2::new(4.0, 1.0, 0.0);
/// assert!((eigen.eigenvalues[0] - 4.0).abs() < 1e-12);
/// assert!((eigen.eigenvalues[1] - 1.0).abs() < 1e-12);
///
/// // Denormalised eigenvectors are scaled by the square roots of the eigenvalues
/// let r = eigen.denormalized_eigenvectors();
/// assert!((r[(0, 0)] - 2.0).abs() < 1e-12);
/// assert!((r[(1, 1)] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricEigen2 {
    /// Rotation angle of the principal axes (radians)
    pub theta: f64,
    pub eigenvalues: Vector2<f64>,
    /// Column matrix of orthonormal eigenvectors
    pub eigenvectors: Matrix2<f64>,
}

impl SymmetricEigen2 {
    /// Decompose `[[a, c], [c, b]]`.
    ///
    /// # Arguments
    /// * `a` - First variance (upper-left element)
    /// * `b` - Second variance (lower-right element)
    /// * `c` - Covariance (off-diagonal element)
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        let theta = (2.0 * c).atan2(a - b) / 2.0;
        let (sin, cos) = theta.sin_cos();

        let eigenvalues = Vector2::new(
            sin * sin * b + cos * cos * a + 2.0 * sin * cos * c,
            sin * sin * a + cos * cos * b - 2.0 * sin * cos * c,
        );
        let eigenvectors = Matrix2::new(cos, -sin, sin, cos);

        Self {
            theta,
            eigenvalues,
            eigenvectors,
        }
    }

    /// Decompose a symmetric matrix, reading only its upper triangle.
    pub fn from_matrix(matrix: &Matrix2<f64>) -> Self {
        Self::new(matrix[(0, 0)], matrix[(1, 1)], matrix[(0, 1)])
    }

    /// Eigenvectors multiplied by the square root of their eigenvalues.
    ///
    /// Column `j` is `sqrt(λj) * v_j`, so `R * Rᵀ` reproduces the original
    /// matrix and `R * z` maps independent standard normals `z` onto
    /// correlated variates with that covariance.
    ///
    /// A singular matrix (perfect correlation) can decompose to an eigenvalue a
    /// few ulps below zero; those within [`EIGENVALUE_TOLERANCE`] of the trace
    /// are taken as 0. Clearly negative eigenvalues (a matrix that is not
    /// positive semi-definite) produce NaN columns.
    pub fn denormalized_eigenvectors(&self) -> Matrix2<f64> {
        let floor = -EIGENVALUE_TOLERANCE * self.trace().abs();
        let mut denormalized = self.eigenvectors;
        for (j, &lambda) in self.eigenvalues.iter().enumerate() {
            let lambda = if lambda < 0.0 && lambda >= floor {
                0.0
            } else {
                lambda
            };
            denormalized.column_mut(j).scale_mut(lambda.sqrt());
        }
        denormalized
    }

    /// Sum of the eigenvalues.
    pub fn trace(&self) -> f64 {
        self.eigenvalues[0] + self.eigenvalues[1]
    }

    /// Product of the eigenvalues.
    pub fn determinant(&self) -> f64 {
        self.eigenvalues[0] * self.eigenvalues[1]
    }
}
