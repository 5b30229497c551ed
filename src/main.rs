mod visualisation;

use anyhow::{Context, Result};
use biharmonic_wave::{simulation, Config};
use log::info;
use visualisation::SliceVisualiser;

/// `biharmonic-wave [CONFIG.toml] [--no-render]`
struct Args {
    config_path: Option<String>,
    render: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        config_path: None,
        render: true,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-render" => args.render = false,
            _ => args.config_path = Some(arg),
        }
    }
    args
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = match &args.config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from '{}'", path))?,
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };
    config.simulation.ensure_steps()?;
    info!("Configuration: {}", config.summary());

    let output = simulation::run(config.simulation.clone()).context("Simulation failed")?;

    if args.render {
        let vis = &config.visualization;
        let visualiser = SliceVisualiser::new(&vis.output_dir, vis.image_width, vis.image_height)?;
        visualiser.render_sequence(&output.grid, &output.frames, vis.frame_interval)?;
        info!(
            "ffmpeg -framerate 20 -pattern_type glob -i '{}/u_*.png' -c:v libx264 -pix_fmt yuv420p wave.mp4",
            vis.output_dir
        );
    } else {
        info!(
            "Rendering skipped; {} frame(s) of {}x{} computed",
            output.frames.len(),
            output.grid.n,
            output.grid.n
        );
    }

    Ok(())
}
