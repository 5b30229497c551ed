//! Seven-point finite-difference operators with periodic neighbour lookup.
//!
//! These are raw stencils: neighbours across a face wrap around to the
//! opposite face. Dirichlet values are imposed afterwards by
//! [`crate::boundary::apply_zero_dirichlet`].

use crate::wavefield::Field3D;
use ndarray::{Array3, Zip};

/// Index of the neighbour `offset` cells away from `i` on a periodic axis of
/// length `n` (so -1 from 0 is n-1 and +1 from n-1 is 0).
#[inline]
pub fn wrap_index(i: usize, offset: isize, n: usize) -> usize {
    (i as isize + offset).rem_euclid(n as isize) as usize
}

#[inline]
fn laplacian_at(field: &Field3D, (i, j, k): (usize, usize, usize), inv_dx2: f64) -> f64 {
    let (nx, ny, nz) = field.dim();
    let sum = field[[wrap_index(i, -1, nx), j, k]]
        + field[[wrap_index(i, 1, nx), j, k]]
        + field[[i, wrap_index(j, -1, ny), k]]
        + field[[i, wrap_index(j, 1, ny), k]]
        + field[[i, j, wrap_index(k, -1, nz)]]
        + field[[i, j, wrap_index(k, 1, nz)]];
    (sum - 6.0 * field[[i, j, k]]) * inv_dx2
}

/// Discrete Laplacian, evaluated in parallel over grid points.
pub fn laplacian(field: &Field3D, dx: f64) -> Field3D {
    let inv_dx2 = 1.0 / (dx * dx);
    let mut out = Array3::<f64>::zeros(field.dim());
    Zip::indexed(&mut out).par_for_each(|idx, o| {
        *o = laplacian_at(field, idx, inv_dx2);
    });
    out
}

/// Single-threaded [`laplacian`]; produces bit-identical output.
pub fn laplacian_serial(field: &Field3D, dx: f64) -> Field3D {
    let inv_dx2 = 1.0 / (dx * dx);
    let mut out = Array3::<f64>::zeros(field.dim());
    Zip::indexed(&mut out).for_each(|idx, o| {
        *o = laplacian_at(field, idx, inv_dx2);
    });
    out
}

/// Laplacian of the Laplacian.
pub fn biharmonic(field: &Field3D, dx: f64) -> Field3D {
    laplacian(&laplacian(field, dx), dx)
}

pub fn biharmonic_serial(field: &Field3D, dx: f64) -> Field3D {
    laplacian_serial(&laplacian_serial(field, dx), dx)
}
