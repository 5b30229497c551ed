//! Von Neumann stability of the explicit recurrence.
//!
//! For a Laplacian eigenmode with eigenvalue -λ the recurrence
//! `next = 2u - prev + dt²Δu - alpha·dt⁴Δ²u` has amplification roots with
//! `g + 1/g = 2 - s`, `s = dt²λ + alpha·dt⁴λ²`. Both roots stay on the unit
//! circle while `0 <= s < 4`. The worst mode has λ equal to the spectral
//! radius of the seven-point stencil, `12 / dx²`.

/// Upper bound on `s` for bounded solutions.
pub const STABILITY_LIMIT: f64 = 4.0;

pub fn spectral_radius(dx: f64) -> f64 {
    12.0 / (dx * dx)
}

/// `s` evaluated at the spectral radius.
pub fn stability_number(dx: f64, dt: f64, alpha: f64) -> f64 {
    let mu = dt * dt * spectral_radius(dx);
    mu + alpha * mu * mu
}

pub fn is_stable(dx: f64, dt: f64, alpha: f64) -> bool {
    stability_number(dx, dt, alpha) < STABILITY_LIMIT
}

/// Time step at which `s` reaches the limit. Anything strictly below it is
/// stable.
pub fn max_stable_dt(dx: f64, alpha: f64) -> f64 {
    // Largest mu = dt²·12/dx² with mu + alpha·mu² <= 4
    let mu = if alpha > 0.0 {
        (-1.0 + (1.0 + 4.0 * STABILITY_LIMIT * alpha).sqrt()) / (2.0 * alpha)
    } else {
        STABILITY_LIMIT
    };
    dx * (mu / 12.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_limit_sits_on_boundary() {
        for &alpha in &[0.0, 0.5, 1.0, 3.0] {
            for &dx in &[1.0, 0.25, 1.0 / 49.0] {
                let dt = max_stable_dt(dx, alpha);
                assert_relative_eq!(
                    stability_number(dx, dt, alpha),
                    STABILITY_LIMIT,
                    max_relative = 1e-12
                );
                assert!(is_stable(dx, 0.99 * dt, alpha));
                assert!(!is_stable(dx, 1.01 * dt, alpha));
            }
        }
    }

    #[test]
    fn test_pure_wave_limit() {
        // alpha = 0 reduces to the leapfrog CFL bound dt <= dx / sqrt(3)
        assert_relative_eq!(
            max_stable_dt(0.3, 0.0),
            0.3 / 3.0_f64.sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_biharmonic_term_tightens_limit() {
        let dx = 0.1;
        assert!(max_stable_dt(dx, 1.0) < max_stable_dt(dx, 0.0));
        assert!(max_stable_dt(dx, 2.0) < max_stable_dt(dx, 1.0));
    }

    #[test]
    fn test_default_run_is_stable() {
        // L = 1, N = 50, dt = 1e-4
        assert!(is_stable(1.0 / 49.0, 1e-4, 1.0));
    }
}
