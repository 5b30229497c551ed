use crate::wavefield::Field3D;
use ndarray::{s, Axis};

/// Zero Dirichlet condition: every value on the six faces of the cube is
/// set to exactly 0. Overrides whatever the periodic stencil left there.
pub fn apply_zero_dirichlet(field: &mut Field3D) {
    for axis in 0..3 {
        let last = field.len_of(Axis(axis)) - 1;
        field.index_axis_mut(Axis(axis), 0).fill(0.0);
        field.index_axis_mut(Axis(axis), last).fill(0.0);
    }
}

/// Largest |u| over the six faces.
pub fn boundary_max_abs(field: &Field3D) -> f64 {
    let (nx, ny, nz) = field.dim();
    let faces = [
        field.slice(s![0, .., ..]),
        field.slice(s![nx - 1, .., ..]),
        field.slice(s![.., 0, ..]),
        field.slice(s![.., ny - 1, ..]),
        field.slice(s![.., .., 0]),
        field.slice(s![.., .., nz - 1]),
    ];
    faces
        .iter()
        .flat_map(|face| face.iter())
        .fold(0.0_f64, |acc, &v| acc.max(v.abs()))
}
