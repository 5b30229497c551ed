//! Explicit finite-difference solver for a scalar field on a cube,
//! marching `u_tt ≈ Δu - alpha·dt²·Δ²u` with zero Dirichlet faces.
//!
//! The run is driven by [`simulation::run`], which returns the mid-plane
//! slice of every step together with the grid coordinates.

pub mod boundary;
pub mod config;
pub mod error;
pub mod frames;
pub mod grid;
pub mod integrator;
pub mod simulation;
pub mod stability;
pub mod stencil;
pub mod wavefield;

pub use config::{Config, SimulationConfig, VisualizationConfig};
pub use error::{Result, SimulationError};
pub use frames::{FrameSampler, FrameSequence, SliceAxis};
pub use grid::Grid;
pub use integrator::TimeIntegrator;
pub use simulation::{run, Simulation, SimulationOutput};
pub use wavefield::Field3D;
