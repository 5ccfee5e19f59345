use solsim::{Engine, Scenario, ScenarioConfig, SimulationClock};

use anyhow::Result;
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,
}

// load here to keep main clean
fn load_scenario_from_yaml() -> Result<ScenarioConfig> {
    let args = Args::parse();
    let file_name = args.file_name;

    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(&file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();

    let scenario_cfg = load_scenario_from_yaml()?;
    let sim_cfg = scenario_cfg.simulation.clone();

    let clock = SimulationClock::new(sim_cfg.slider_index, sim_cfg.zoom_factor);
    let scenario = Scenario::build_scenario(scenario_cfg);
    let mut engine = Engine::new(scenario, clock);

    log::info!(
        "running {} frames at slider {} / zoom {}",
        sim_cfg.frames,
        sim_cfg.slider_index,
        sim_cfg.zoom_factor
    );

    for frame in 0..sim_cfg.frames {
        engine.begin_frame();
        let events = engine.settle();
        log::debug!("frame {frame}: {} transforms applied", events.len());
    }

    let days = engine.clock.elapsed() / (3600.0 * 24.0);
    log::info!("simulated {days:.1} days");
    for body in &engine.system.bodies {
        log::info!(
            "{:>8}  pos [{:+.3e}, {:+.3e}] m  vel [{:+.3e}, {:+.3e}] m/s",
            body.name,
            body.sim_pos.x,
            body.sim_pos.y,
            body.velocity.x,
            body.velocity.y
        );
    }
    for satellite in &engine.system.satellites {
        log::info!(
            "{:>8}  rel [{:+.3e}, {:+.3e}] m  abs [{:+.3e}, {:+.3e}] m",
            satellite.name,
            satellite.rel_pos.x,
            satellite.rel_pos.y,
            satellite.sim_pos.x,
            satellite.sim_pos.y
        );
    }

    Ok(())
}
