use crate::error::{Result, SimulationError};
use crate::frames::SliceAxis;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_length")]
    pub length: f64, // Cube side L
    #[serde(default = "default_resolution")]
    pub resolution: usize, // Points per axis N
    #[serde(default = "default_final_time")]
    pub final_time: f64, // T
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64, // Coefficient on the dt⁴ biharmonic term
    #[serde(default)]
    pub slice_axis: SliceAxis,
    #[serde(default = "default_true")]
    pub check_finite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instability_threshold: Option<f64>, // Optional cap on max |u|
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_report_period")]
    pub report_period: usize, // Steps between progress logs
}

fn default_length() -> f64 {
    1.0
}

fn default_resolution() -> usize {
    50
}

fn default_final_time() -> f64 {
    0.1
}

fn default_dt() -> f64 {
    1e-4
}

fn default_alpha() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_report_period() -> usize {
    100
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            resolution: default_resolution(),
            final_time: default_final_time(),
            dt: default_dt(),
            alpha: default_alpha(),
            slice_axis: SliceAxis::default(),
            check_finite: true,
            instability_threshold: None,
            parallel: true,
            report_period: default_report_period(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 3 {
            return Err(invalid(format!(
                "resolution must be at least 3 so the grid has an interior point, got {}",
                self.resolution
            )));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(invalid(format!("length must be positive, got {}", self.length)));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if !self.final_time.is_finite() || self.final_time < 0.0 {
            return Err(invalid(format!(
                "final_time must be non-negative, got {}",
                self.final_time
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(invalid(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        if let Some(limit) = self.instability_threshold {
            if !(limit > 0.0) {
                return Err(invalid(format!(
                    "instability_threshold must be positive, got {}",
                    limit
                )));
            }
        }
        if self.report_period == 0 {
            return Err(invalid("report_period must be positive".to_string()));
        }
        Ok(())
    }

    /// Grid spacing L / (N - 1)
    pub fn dx(&self) -> f64 {
        self.length / (self.resolution - 1) as f64
    }

    /// Number of time steps, floor(T / dt).
    pub fn steps(&self) -> usize {
        let ratio = self.final_time / self.dt;
        if !ratio.is_finite() || ratio <= 0.0 {
            return 0;
        }
        ratio.floor() as usize
    }

    /// Rejects configurations with nothing to simulate.
    pub fn ensure_steps(&self) -> Result<usize> {
        match self.steps() {
            0 => Err(invalid(format!(
                "final_time {} with dt {} gives zero steps",
                self.final_time, self.dt
            ))),
            n => Ok(n),
        }
    }
}

/// Output settings for the PNG frame writer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_frame_interval")]
    pub frame_interval: usize, // Render every n-th frame
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_frame_interval() -> usize {
    10
}

fn default_image_width() -> u32 {
    800
}

fn default_image_height() -> u32 {
    700
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            frame_interval: default_frame_interval(),
            image_width: default_image_width(),
            image_height: default_image_height(),
        }
    }
}

impl VisualizationConfig {
    fn validate(&self) -> Result<()> {
        if self.frame_interval == 0 {
            return Err(invalid("frame_interval must be positive".to_string()));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(invalid(format!(
                "Image dimensions must be positive (width={}, height={})",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.visualization.validate()?;

        let sim = &self.simulation;
        if sim.steps() > 0 && sim.steps() < self.visualization.frame_interval {
            warn!(
                "frame_interval {} exceeds the {} steps of the run; only frame 0 will be rendered",
                self.visualization.frame_interval,
                sim.steps()
            );
        }
        Ok(())
    }

    /// One-line configuration summary for the startup log
    pub fn summary(&self) -> String {
        let sim = &self.simulation;
        format!(
            "grid {}³ over L={} (dx={:.4e}), dt={:e}, T={}, steps={}, alpha={}, slice {}={}, output '{}' every {} frame(s)",
            sim.resolution,
            sim.length,
            sim.dx(),
            sim.dt,
            sim.final_time,
            sim.steps(),
            sim.alpha,
            sim.slice_axis,
            sim.resolution / 2,
            self.visualization.output_dir,
            self.visualization.frame_interval
        )
    }
}

fn invalid(message: String) -> SimulationError {
    SimulationError::InvalidConfig(message)
}
