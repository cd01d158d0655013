use image_warp::{load_image, save_image, HeadlessHost, Outcome, RenderSession, ScenarioConfig, WarpScenario};
use image_warp::{bench_pacer, bench_warp};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up as given and then under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Render without opening a window
    #[arg(long)]
    headless: bool,

    /// Override the source image from the scenario
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the output image from the scenario
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run the warp and pacer benchmarks and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.is_file() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    ScenarioConfig::from_yaml_file(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_warp();
        bench_pacer();
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(input) = args.input {
        scenario_cfg.image.input = input;
    }
    if let Some(output) = args.output {
        scenario_cfg.image.output = output;
    }

    let scenario = WarpScenario::build_scenario(scenario_cfg).context("invalid scenario")?;
    info!(
        "render_size = {}x{}, {} targets, {:?} sampling",
        scenario.render_size.0,
        scenario.render_size.1,
        scenario.targets.len(),
        scenario.parameters.interpolation
    );

    let source = load_image(&scenario.input)
        .with_context(|| format!("failed to load source image {}", scenario.input.display()))?;
    let mut session = RenderSession::from_scenario(source, &scenario);

    #[cfg(feature = "viewer")]
    if !args.headless {
        image_warp::run_viewer(session, scenario.output, scenario.window_size);
        return Ok(());
    }

    let mut host = HeadlessHost::with_signal_handlers().context("failed to install quit signal handlers")?;
    match session.run(&mut host)? {
        Outcome::Completed => {
            let raster = session.into_raster();
            save_image(&raster, &scenario.output)
                .with_context(|| format!("failed to save {}", scenario.output.display()))?;
        }
        Outcome::Terminated => info!("terminated before completion; nothing saved"),
    }

    Ok(())
}
