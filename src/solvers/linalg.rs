//! A small dense linear solver for policy iteration's evaluation step.
//!
//! Solves `A x = b` by Gaussian elimination with partial pivoting. No
//! external linear-algebra crate is pulled in for this: the state counts
//! this crate targets (§4.3's documented small-`N` scalability limit) make
//! a plain dense solve adequate, and it keeps the dependency footprint
//! exactly as wide as the teacher repo's, which carries no
//! `nalgebra`/`ndarray-linalg` dependency either.

/// Solves the square system `a * x = b` in place, overwriting `a` and `b`
/// with their row-reduced forms. Returns `None` if a pivot column is
/// numerically singular.
pub fn solve_in_place(a: &mut [Vec<f64>], b: &mut [f64]) -> Option<Vec<f64>> {
    let n = b.len();
    debug_assert!(a.len() == n && a.iter().all(|row| row.len() == n));

    for col in 0..n {
        // Partial pivot: swap in the row with the largest magnitude entry
        // in this column to keep the elimination numerically stable.
        let pivot_row = (col..n).max_by(|&r1, &r2| {
            a[r1][col]
                .abs()
                .partial_cmp(&a[r2][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

        if a[pivot_row][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = a[col][col];
        for row in (col + 1)..n {
            let factor = a[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        if a[row][row].abs() < 1e-12 {
            return None;
        }
        x[row] = sum / a[row][row];
    }
    Some(x)
}
