use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use plotters::prelude::*;

use rust_orrery::file::{read_file, ScenarioConfig};
use rust_orrery::model::{BodyID, Orrery};

/// Runs a scenario without a window and plots how far each body wanders from
/// its starting orbital radius.
#[derive(Debug, Parser)]
struct Args {
    /// Scenario file to load; the built-in solar system if omitted
    scenario: Option<PathBuf>,
    /// Simulated seconds to run for
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,
    /// Frame length, in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
    #[arg(long, default_value = "plots/drift.png")]
    output: PathBuf,
}

struct Series {
    name: String,
    points: Vec<(f64, f64)>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.dt > 0.0, "dt must be positive, got {}", args.dt);

    let scenario = match &args.scenario {
        Some(path) => read_file(path)?,
        None => ScenarioConfig::solar_system(),
    };
    let mut orrery = scenario.build().context("Invalid scenario")?;

    let series = record_drift(&mut orrery, args.seconds, args.dt);
    for s in series.iter() {
        let worst = s.points.iter().map(|(_, y)| y.abs()).fold(0.0, f64::max);
        info!("{}: worst radial drift {:.4}%", s.name, 100.0 * worst);
    }

    if let Some(dir) = args.output.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create {}", dir.display()))?;
    }
    draw_plot(&args.output, &series, args.seconds)
        .map_err(|e| anyhow::anyhow!("Could not draw plot: {}", e))?;
    info!("Wrote {}", args.output.display());
    Ok(())
}

fn distance_to_attractor(orrery: &Orrery, id: BodyID) -> Option<f64> {
    let attractor = orrery.attractor_of(id)?;
    Some((orrery.get_body(id).position() - attractor.current_position()).norm())
}

// Drift is relative: (r - r0) / r0
fn record_drift(orrery: &mut Orrery, seconds: f64, dt: f64) -> Vec<Series> {
    let initial: &Orrery = orrery;
    let tracked: Vec<(BodyID, String, f64)> = initial
        .bodies()
        .filter_map(|b| {
            let r0 = distance_to_attractor(initial, b.id)?;
            (r0 > 0.0).then(|| (b.id, b.name().to_owned(), r0))
        })
        .collect();

    let mut series: Vec<Series> = tracked
        .iter()
        .map(|(_, name, _)| Series {
            name: name.clone(),
            points: vec![(0.0, 0.0)],
        })
        .collect();

    let n_steps = (seconds / dt).ceil() as usize;
    for _ in 0..n_steps {
        orrery.step(dt, 1.0);
        let t = orrery.simulated_time();
        for ((id, _, r0), s) in tracked.iter().zip(series.iter_mut()) {
            if let Some(r) = distance_to_attractor(orrery, *id) {
                s.points.push((t, (r - r0) / r0));
            }
        }
    }
    series
}

fn draw_plot(
    path: &std::path::Path,
    series: &[Series],
    seconds: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| y.abs()))
        .fold(1e-6, f64::max);

    let root = BitMapBackend::new(path, (960, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Radial drift", ("sans-serif", 24))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..seconds, -y_max..y_max)?;

    chart.configure_mesh().draw()?;

    for (idx, s) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), &color))?
            .label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
