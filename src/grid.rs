use crate::error::{Result, SimulationError};
use crate::frames::SliceAxis;
use ndarray::Array1;

/// Uniform cubic grid over [0, L]³.
#[derive(Debug, Clone)]
pub struct Grid {
    pub n: usize,       // Number of points per axis
    pub length: f64,    // Side length of the cube
    pub dx: f64,        // Grid spacing, L / (N - 1)
    pub x: Array1<f64>, // Coordinates along x
    pub y: Array1<f64>, // Coordinates along y
    pub z: Array1<f64>, // Coordinates along z
}

impl Grid {
    pub fn build(length: f64, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(SimulationError::InvalidConfig(format!(
                "Grid needs at least 2 points per axis, got {}",
                n
            )));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "Domain length must be positive, got {}",
                length
            )));
        }

        let dx = length / (n - 1) as f64;
        // Pin the last point to L so it does not drift by rounding
        let axis = Array1::from_shape_fn(n, |i| {
            if i == n - 1 {
                length
            } else {
                dx * i as f64
            }
        });

        Ok(Grid {
            n,
            length,
            dx,
            x: axis.clone(),
            y: axis.clone(),
            z: axis,
        })
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        (self.n, self.n, self.n)
    }

    pub fn coord(&self, i: usize) -> f64 {
        // Convert grid index to physical coordinate (same on every axis)
        self.x[i]
    }

    pub fn axis(&self, axis: SliceAxis) -> &Array1<f64> {
        match axis {
            SliceAxis::X => &self.x,
            SliceAxis::Y => &self.y,
            SliceAxis::Z => &self.z,
        }
    }

    pub fn mid_index(&self) -> usize {
        self.n / 2
    }

    pub fn width(&self) -> f64 {
        (self.n - 1) as f64 * self.dx
    }
}
