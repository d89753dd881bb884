use nalgebra::{DMatrix, DVector};

/// Singular values at or below this are treated as zero by [`pseudo_inverse`].
pub const SINGULAR_VALUE_TOLERANCE: f64 = 1e-6;

const SVD_MAX_ITERATIONS: usize = 1000;

/// Moore-Penrose pseudo-inverse via SVD.
///
/// Rank deficiency is absorbed by dropping small singular values, so this never
/// fails; a decomposition that does not converge yields the zero matrix.
pub fn pseudo_inverse(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = matrix.shape();
    let Some(svd) = matrix.clone().try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS) else {
        return DMatrix::zeros(cols, rows);
    };
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return DMatrix::zeros(cols, rows);
    };

    let sigma_inv = DVector::from_iterator(
        svd.singular_values.len(),
        svd.singular_values
            .iter()
            .map(|&s| if s > SINGULAR_VALUE_TOLERANCE { 1.0 / s } else { 0.0 }),
    );
    v_t.transpose() * DMatrix::from_diagonal(&sigma_inv) * u.transpose()
}
