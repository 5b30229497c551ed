use crate::boundary::apply_zero_dirichlet;
use crate::grid::Grid;
use ndarray::Array3;
use std::f64::consts::PI;

/// Dense scalar field over the (i, j, k) index cube.
pub type Field3D = Array3<f64>;

pub fn zeros(n: usize) -> Field3D {
    Array3::zeros((n, n, n))
}

/// sin(πx)·sin(πy)·sin(πz) sampled on the grid, with the faces projected
/// to exactly zero.
pub fn standing_wave(grid: &Grid) -> Field3D {
    // sin(π) is ~1e-16 in floating point, not zero
    let mut field = Array3::from_shape_fn(grid.dim(), |(i, j, k)| {
        (PI * grid.x[i]).sin() * (PI * grid.y[j]).sin() * (PI * grid.z[k]).sin()
    });
    apply_zero_dirichlet(&mut field);
    field
}

pub fn max_abs(field: &Field3D) -> f64 {
    field.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()))
}

/// First non-finite value, if any, with its index.
pub fn find_non_finite(field: &Field3D) -> Option<((usize, usize, usize), f64)> {
    field
        .indexed_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(idx, &v)| (idx, v))
}
