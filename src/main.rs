use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use log::info;

use rust_orrery::file::{read_file, ScenarioConfig};
use rust_orrery::gui::Simulation;

#[derive(Debug, Parser)]
#[command(about = "Watch a toy solar system go around")]
struct Args {
    /// Scenario file to load; the built-in solar system if omitted
    scenario: Option<PathBuf>,
    /// Seconds of trail to keep behind each body
    #[arg(long)]
    trail_seconds: Option<f64>,
    /// Initial simulation speed
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => read_file(path)?,
        None => {
            info!("No scenario given, using the built-in solar system");
            ScenarioConfig::solar_system()
        }
    };
    if let Some(seconds) = args.trail_seconds {
        scenario.trail_seconds = seconds;
    }

    let orrery = scenario.build().context("Invalid scenario")?;

    let mut window = Window::new("Orrery");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    let state = Simulation::new(orrery, args.speed, &mut window);
    window.render_loop(state);
    Ok(())
}
