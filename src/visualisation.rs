use anyhow::{Context, Result};
use biharmonic_wave::{FrameSequence, Grid};
use log::{debug, info};
use ndarray::Array2;
use plotters::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub struct SliceVisualiser {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    // Shared by the render threads
    gradient: Box<dyn colorgrad::Gradient + Send + Sync>,
}

impl SliceVisualiser {
    pub fn new(output_dir: &str, width: u32, height: u32) -> Result<Self> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory '{}'", output_dir))?;

        let gradient = Box::new(colorgrad::preset::rd_yl_bu());

        Ok(Self {
            output_dir: PathBuf::from(output_dir),
            width,
            height,
            gradient,
        })
    }

    /// Write every `interval`-th frame as a PNG, all on one colour scale.
    pub fn render_sequence(
        &self,
        grid: &Grid,
        frames: &FrameSequence,
        interval: usize,
    ) -> Result<Vec<PathBuf>> {
        let max_abs = frames.max_abs();
        let indices: Vec<usize> = (0..frames.len()).step_by(interval.max(1)).collect();
        // Frames are independent images, render them in parallel
        let written = indices
            .par_iter()
            .map(|&i| self.plot_frame(grid, frames, &frames.frames()[i], i, max_abs))
            .collect::<Result<Vec<PathBuf>>>()?;
        info!(
            "Saved {} frame(s) to {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }

    fn plot_frame(
        &self,
        grid: &Grid,
        frames: &FrameSequence,
        data: &Array2<f64>,
        index: usize,
        max_abs: f64,
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("u_{:06}.png", index + 1));
        draw_heatmap(
            &path,
            (self.width, self.height),
            grid,
            frames,
            data,
            index,
            max_abs,
            self.gradient.as_ref(),
        )
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Failed to render {}", path.display()))?;
        debug!("Saved frame: {}", path.display());
        Ok(path)
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_heatmap(
    path: &Path,
    size: (u32, u32),
    grid: &Grid,
    frames: &FrameSequence,
    data: &Array2<f64>,
    index: usize,
    max_abs: f64,
    gradient: &dyn colorgrad::Gradient,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let (h_label, v_label) = frames.axis().plane_labels();
    let title = format!(
        "u({}, {}, {}={:.2}) at t={:.4}",
        h_label,
        v_label,
        frames.axis(),
        frames.coordinate(),
        frames.time(index)
    );

    // Each sample covers the cell centred on its grid point
    let half = grid.dx / 2.0;
    let range = -half..grid.length + half;
    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 26))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(range.clone(), range)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(h_label)
        .y_desc(v_label)
        .draw()?;

    let (na, nb) = data.dim();
    chart.draw_series((0..na).flat_map(|a| (0..nb).map(move |b| (a, b))).map(|(a, b)| {
        let (x, y) = (grid.coord(a), grid.coord(b));
        let color = value_to_color(gradient, data[[a, b]], max_abs);
        Rectangle::new([(x - half, y - half), (x + half, y + half)], color.filled())
    }))?;

    root.present()?;
    Ok(())
}

fn value_to_color(gradient: &dyn colorgrad::Gradient, value: f64, max_abs: f64) -> RGBColor {
    // Symmetric range around zero
    let normalized = if max_abs > 0.0 {
        (value + max_abs) / (2.0 * max_abs)
    } else {
        0.5
    };
    let normalized = normalized.clamp(0.0, 1.0);
    let color_rgba = gradient.at(normalized as f32).to_rgba8();
    RGBColor(color_rgba[0], color_rgba[1], color_rgba[2])
}
