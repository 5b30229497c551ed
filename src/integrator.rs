use crate::boundary::apply_zero_dirichlet;
use crate::error::{Result, SimulationError};
use crate::stencil::{laplacian, laplacian_serial};
use crate::wavefield::{find_non_finite, max_abs, Field3D};
use ndarray::Zip;

/// Explicit three-level marcher:
/// `next = 2·current - previous + dt²·Δcurrent - alpha·dt⁴·Δ²current`,
/// followed by zero Dirichlet faces.
pub struct TimeIntegrator {
    current: Field3D,
    previous: Field3D,
    alpha: f64,     // Coefficient on the biharmonic term
    parallel: bool, // Evaluate stencils with rayon
    steps_taken: usize,
}

impl TimeIntegrator {
    /// Start from rest: `previous` is a copy of `initial`.
    pub fn new(initial: Field3D) -> Self {
        let previous = initial.clone();
        Self {
            current: initial,
            previous,
            alpha: 1.0,
            parallel: true,
            steps_taken: 0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn current(&self) -> &Field3D {
        &self.current
    }

    pub fn previous(&self) -> &Field3D {
        &self.previous
    }

    pub fn into_current(self) -> Field3D {
        self.current
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn step(&mut self, dx: f64, dt: f64) {
        // 1. Laplacian, then biharmonic as the Laplacian of that result
        let (lap, bih) = if self.parallel {
            let lap = laplacian(&self.current, dx);
            let bih = laplacian(&lap, dx);
            (lap, bih)
        } else {
            let lap = laplacian_serial(&self.current, dx);
            let bih = laplacian_serial(&lap, dx);
            (lap, bih)
        };

        // 2. Write next into the previous buffer, which is no longer needed
        let dt2 = dt * dt;
        let bih_coeff = self.alpha * dt2 * dt2;
        Zip::from(&mut self.previous)
            .and(&self.current)
            .and(&lap)
            .and(&bih)
            .for_each(|p, &c, &l, &b| {
                *p = 2.0 * c - *p + dt2 * l - bih_coeff * b;
            });

        // 3. Boundary conditions on the candidate state
        apply_zero_dirichlet(&mut self.previous);

        // 4. Advance: previous <- current, current <- next
        std::mem::swap(&mut self.current, &mut self.previous);
        self.steps_taken += 1;
    }

    /// Fails with `NumericalInstability` if `current` holds a NaN/inf or a
    /// value above `threshold`.
    pub fn check_finite(&self, time: f64, threshold: Option<f64>) -> Result<()> {
        if let Some(((i, j, k), v)) = find_non_finite(&self.current) {
            return Err(SimulationError::NumericalInstability {
                step: self.steps_taken,
                time,
                reason: format!("non-finite value {} at ({}, {}, {})", v, i, j, k),
            });
        }
        if let Some(limit) = threshold {
            let peak = max_abs(&self.current);
            if peak > limit {
                return Err(SimulationError::NumericalInstability {
                    step: self.steps_taken,
                    time,
                    reason: format!("max |u| = {:e} exceeds threshold {:e}", peak, limit),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::boundary_max_abs;
    use crate::grid::Grid;
    use crate::stability::max_stable_dt;
    use crate::stencil::biharmonic;
    use crate::wavefield::standing_wave;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn standing(n: usize) -> (Grid, Field3D) {
        let grid = Grid::build(1.0, n).unwrap();
        let field = standing_wave(&grid);
        (grid, field)
    }

    #[test]
    fn test_starts_at_rest() {
        let (_, u0) = standing(6);
        let integrator = TimeIntegrator::new(u0.clone());
        assert_eq!(integrator.current(), &u0);
        assert_eq!(integrator.previous(), &u0);
        assert_eq!(integrator.steps_taken(), 0);
    }

    #[test]
    fn test_zero_dt_leaves_state_unchanged() {
        let (grid, u0) = standing(7);
        let mut integrator = TimeIntegrator::new(u0.clone());
        integrator.step(grid.dx, 0.0);
        assert_eq!(integrator.current(), &u0);
        integrator.step(grid.dx, 0.0);
        assert_eq!(integrator.steps_taken(), 2);
        assert_eq!(integrator.into_current(), u0);
    }

    #[test]
    fn test_faces_stay_zero_after_step() {
        let (grid, u0) = standing(8);
        let mut integrator = TimeIntegrator::new(u0);
        integrator.step(grid.dx, 1e-3);
        assert_eq!(boundary_max_abs(integrator.current()), 0.0);
        integrator.step(grid.dx, 1e-3);
        assert_eq!(boundary_max_abs(integrator.current()), 0.0);
    }

    #[test]
    fn test_first_step_matches_closed_form() {
        let (grid, u0) = standing(6);
        let dt = 2e-3;
        let mut integrator = TimeIntegrator::new(u0.clone());
        integrator.step(grid.dx, dt);

        // previous == current, so next = u0 + dt²Δu0 - dt⁴Δ²u0 off the faces
        let lap = laplacian(&u0, grid.dx);
        let bih = biharmonic(&u0, grid.dx);
        let next = integrator.current();
        for ((i, j, k), &v) in next.indexed_iter() {
            let interior = (1..grid.n - 1).contains(&i)
                && (1..grid.n - 1).contains(&j)
                && (1..grid.n - 1).contains(&k);
            if interior {
                let expected = u0[[i, j, k]] + dt.powi(2) * lap[[i, j, k]]
                    - dt.powi(4) * bih[[i, j, k]];
                assert_relative_eq!(v, expected, epsilon = 1e-12);
            } else {
                assert_eq!(v, 0.0);
            }
        }
        assert_eq!(integrator.previous(), &u0);
    }

    #[test]
    fn test_second_step_uses_previous() {
        let (grid, u0) = standing(6);
        let dt = 2e-3;
        let mut integrator = TimeIntegrator::new(u0.clone());
        integrator.step(grid.dx, dt);
        let u1 = integrator.current().clone();
        integrator.step(grid.dx, dt);

        let lap = laplacian(&u1, grid.dx);
        let bih = biharmonic(&u1, grid.dx);
        let (i, j, k) = (2, 3, 2);
        let expected = 2.0 * u1[[i, j, k]] - u0[[i, j, k]] + dt * dt * lap[[i, j, k]]
            - dt.powi(4) * bih[[i, j, k]];
        assert_relative_eq!(integrator.current()[[i, j, k]], expected, epsilon = 1e-12);
        assert_eq!(integrator.previous(), &u1);
    }

    #[test]
    fn test_alpha_scales_biharmonic_term() {
        let (grid, u0) = standing(6);
        let dt = 2e-2;
        let mut plain = TimeIntegrator::new(u0.clone()).with_alpha(0.0);
        let mut damped = TimeIntegrator::new(u0.clone()).with_alpha(2.0);
        plain.step(grid.dx, dt);
        damped.step(grid.dx, dt);

        let bih = biharmonic(&u0, grid.dx);
        let (i, j, k) = (2, 2, 3);
        let diff = plain.current()[[i, j, k]] - damped.current()[[i, j, k]];
        assert_relative_eq!(diff, 2.0 * dt.powi(4) * bih[[i, j, k]], max_relative = 1e-9);
    }

    #[test]
    fn test_serial_matches_parallel() {
        let (grid, u0) = standing(9);
        let mut par = TimeIntegrator::new(u0.clone());
        let mut ser = TimeIntegrator::new(u0).with_parallel(false);
        for _ in 0..5 {
            par.step(grid.dx, 1e-3);
            ser.step(grid.dx, 1e-3);
        }
        assert_eq!(par.current(), ser.current());
    }

    #[test]
    fn test_centre_oscillates_like_standing_mode() {
        // On N = 5 the centre's stencil never reaches the face-contaminated
        // Laplacian values, so it sees the pure eigenmode
        let (grid, u0) = standing(5);
        let dt = 1e-2;
        let mut integrator = TimeIntegrator::new(u0);
        integrator.step(grid.dx, dt);
        let s = (PI * grid.dx / 2.0).sin();
        let lambda = -12.0 * s * s / (grid.dx * grid.dx);
        let expected = 1.0 + dt * dt * lambda - dt.powi(4) * lambda * lambda;
        assert_relative_eq!(integrator.current()[[2, 2, 2]], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_bounded_below_stability_limit() {
        let (grid, u0) = standing(9);
        // At rest the peak barely overshoots the initial amplitude
        let bound = 1.2 * max_abs(&u0);
        let dt = 0.5 * max_stable_dt(grid.dx, 1.0);
        let mut integrator = TimeIntegrator::new(u0);
        for step in 0..500 {
            integrator.step(grid.dx, dt);
            let peak = max_abs(integrator.current());
            assert!(peak <= bound, "step {}: max |u| = {} > {}", step, peak, bound);
        }
        assert!(integrator.check_finite(0.0, Some(bound)).is_ok());
    }

    #[test]
    fn test_grows_above_stability_limit() {
        let (grid, u0) = standing(9);
        let dt = 4.0 * max_stable_dt(grid.dx, 1.0);
        let mut integrator = TimeIntegrator::new(u0);
        let mut blew_up = false;
        for _ in 0..200 {
            integrator.step(grid.dx, dt);
            if integrator.check_finite(0.0, Some(1e6)).is_err() {
                blew_up = true;
                break;
            }
        }
        assert!(blew_up, "aggressive dt should diverge");
    }

    #[test]
    fn test_check_finite_reports_nan() {
        let (grid, mut u0) = standing(5);
        u0[[2, 2, 2]] = f64::NAN;
        let mut integrator = TimeIntegrator::new(u0);
        integrator.step(grid.dx, 1e-3);
        match integrator.check_finite(1e-3, None) {
            Err(SimulationError::NumericalInstability { step, .. }) => assert_eq!(step, 1),
            other => panic!("expected instability, got {:?}", other),
        }
    }
}
