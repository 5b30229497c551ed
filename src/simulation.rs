//! Run driver: builds the grid and initial field, marches the integrator and
//! collects the mid-plane frames.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::frames::{FrameSampler, FrameSequence};
use crate::grid::Grid;
use crate::integrator::TimeIntegrator;
use crate::stability;
use crate::wavefield::{self, Field3D};
use log::{debug, info, warn};
use std::time::Instant;

/// Everything handed to the renderer once the run is complete.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub grid: Grid,
    pub frames: FrameSequence,
}

pub struct Simulation {
    pub grid: Grid,
    pub config: SimulationConfig,
    integrator: TimeIntegrator,
    sampler: FrameSampler,
}

impl Simulation {
    /// Validate the configuration and set up the standing-wave initial state.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::build(config.length, config.resolution)?;

        if !stability::is_stable(grid.dx, config.dt, config.alpha) {
            warn!(
                "dt={:e} is above the stability limit {:e} for dx={:e}; the solution will grow without bound",
                config.dt,
                stability::max_stable_dt(grid.dx, config.alpha),
                grid.dx
            );
        }

        let integrator = TimeIntegrator::new(wavefield::standing_wave(&grid))
            .with_alpha(config.alpha)
            .with_parallel(config.parallel);
        let sampler = FrameSampler::mid_plane(config.slice_axis, grid.n);

        Ok(Self {
            grid,
            config,
            integrator,
            sampler,
        })
    }

    pub fn current_time(&self) -> f64 {
        self.integrator.steps_taken() as f64 * self.config.dt
    }

    pub fn current(&self) -> &Field3D {
        self.integrator.current()
    }

    pub fn run(mut self) -> Result<SimulationOutput> {
        let steps = self.config.steps();
        let dt = self.config.dt;
        let dx = self.grid.dx;

        info!("Starting simulation...");
        info!(
            "Grid: {}x{}x{} (dx={:.4e})",
            self.grid.n, self.grid.n, self.grid.n, dx
        );
        info!(
            "Time step: {:e} s, steps: {}, stable dt limit: {:e}",
            dt,
            steps,
            stability::max_stable_dt(dx, self.config.alpha)
        );

        let coordinate = self.grid.axis(self.sampler.axis)[self.sampler.index];
        let mut frames = FrameSequence::with_capacity(
            self.sampler.axis,
            self.sampler.index,
            coordinate,
            dt,
            steps,
        );

        if steps == 0 {
            warn!(
                "final_time={} with dt={:e} gives no steps; returning an empty frame sequence",
                self.config.final_time, dt
            );
            return Ok(SimulationOutput {
                grid: self.grid,
                frames,
            });
        }

        let started = Instant::now();
        for _ in 0..steps {
            self.integrator.step(dx, dt);

            if self.config.check_finite {
                self.integrator
                    .check_finite(self.current_time(), self.config.instability_threshold)?;
            }

            // Frames are taken after the update
            frames.push(self.sampler.capture(self.integrator.current()));

            let done = self.integrator.steps_taken();
            if done % self.config.report_period == 0 {
                info!(
                    "Step {}/{} (t={:.4}s, max |u|={:.4e})",
                    done,
                    steps,
                    self.current_time(),
                    wavefield::max_abs(self.integrator.current())
                );
            } else {
                debug!("Step {}/{}", done, steps);
            }
        }

        let elapsed = started.elapsed().as_secs_f64();
        let cells = (self.grid.n * self.grid.n * self.grid.n * steps) as f64;
        info!(
            "Simulation complete! {} steps in {:.2}s ({:.2} Mcells/s)",
            steps,
            elapsed,
            cells / elapsed.max(1e-9) / 1e6
        );

        Ok(SimulationOutput {
            grid: self.grid,
            frames,
        })
    }
}

/// Build and run a simulation in one call.
pub fn run(config: SimulationConfig) -> Result<SimulationOutput> {
    Simulation::new(config)?.run()
}
