use dpsim::{ScenarioConfig, Scenario, AngleChannel};
use dpsim::{write_trajectory_csv, write_flip_grid, TRAJECTORY_FILE};
use dpsim::{flip_time_or_sentinel, bench_rk4, bench_grid};
use dpsim::configuration::config::{PendulumConfig, InitialConfig, ParametersConfig, GridConfig};

use clap::{Args, Parser, Subcommand};
use anyhow::{anyhow, Context, Result};

use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dpsim", about = "Double pendulum RK4 simulation and flip-time analysis")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Write the full trajectory of one run as CSV
    Csv(CsvArgs),

    /// Print the first flip time of one arm
    #[command(alias = "flip_single")]
    FlipSingle(FlipSingleArgs),

    /// Sweep a grid of initial angles and write both flip-time tables
    #[command(alias = "flip_grid")]
    FlipGrid(FlipGridArgs),

    /// Time the integrator and the grid sweep
    Bench,
}

/// Scenario file and output location shared by every mode
#[derive(Args, Debug)]
struct CommonArgs {
    /// YAML scenario; replaces the positional values
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Directory the CSV tables are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PendulumArgs {
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    l1: Option<f64>,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    l2: Option<f64>,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    m1: Option<f64>,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    m2: Option<f64>,
}

#[derive(Args, Debug)]
struct AnglesArgs {
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    phi1_0: Option<f64>,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    phi2_0: Option<f64>,
}

#[derive(Args, Debug)]
struct VelocitiesArgs {
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    omega1_0: Option<f64>,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    omega2_0: Option<f64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Simulated time horizon
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    t_end: Option<f64>,
    /// Fixed step size
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    h: Option<f64>,
}

#[derive(Args, Debug)]
struct CsvArgs {
    #[command(flatten)]
    pendulum: PendulumArgs,
    #[command(flatten)]
    angles: AnglesArgs,
    #[command(flatten)]
    velocities: VelocitiesArgs,
    #[command(flatten)]
    run: RunArgs,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct FlipSingleArgs {
    #[command(flatten)]
    pendulum: PendulumArgs,
    #[command(flatten)]
    angles: AnglesArgs,
    #[command(flatten)]
    velocities: VelocitiesArgs,
    #[command(flatten)]
    run: RunArgs,
    /// 1 traces phi1, 0 traces phi2 (phi1 when reading a scenario file)
    #[arg(required_unless_present = "file", value_parser = clap::value_parser!(u8).range(0..=1))]
    use_phi1: Option<u8>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct FlipGridArgs {
    #[command(flatten)]
    pendulum: PendulumArgs,
    #[command(flatten)]
    velocities: VelocitiesArgs,
    #[command(flatten)]
    run: RunArgs,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    min_phi: Option<f64>,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    max_phi: Option<f64>,
    #[arg(required_unless_present = "file", allow_negative_numbers = true)]
    resolution: Option<usize>,
    #[command(flatten)]
    common: CommonArgs,
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| anyhow!("missing argument <{}>", name))
}

impl PendulumArgs {
    fn to_config(&self) -> Result<PendulumConfig> {
        Ok(PendulumConfig {
            l1: required(self.l1, "l1")?,
            l2: required(self.l2, "l2")?,
            m1: required(self.m1, "m1")?,
            m2: required(self.m2, "m2")?,
        })
    }
}

impl RunArgs {
    fn to_config(&self) -> Result<ParametersConfig> {
        Ok(ParametersConfig {
            t_end: required(self.t_end, "t_end")?,
            h0: required(self.h, "h")?,
        })
    }
}

fn initial_config(angles: Option<&AnglesArgs>, velocities: &VelocitiesArgs) -> Result<InitialConfig> {
    let (phi1, phi2) = match angles {
        Some(a) => (required(a.phi1_0, "phi1_0")?, required(a.phi2_0, "phi2_0")?),
        None => (0.0, 0.0),
    };
    Ok(InitialConfig {
        phi1,
        phi2,
        omega1: required(velocities.omega1_0, "omega1_0")?,
        omega2: required(velocities.omega2_0, "omega2_0")?,
    })
}

// scenario files are looked up as given first, then in the crate's scenarios/ folder
fn load_scenario_from_yaml(file: &Path) -> Result<ScenarioConfig> {
    let path = if file.exists() {
        file.to_path_buf()
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file)
    };
    ScenarioConfig::from_yaml_file(&path).with_context(|| format!("loading scenario {}", path.display()))
}

/// Pick the scenario source, apply the output override and validate
fn build(common: &CommonArgs, from_args: impl FnOnce() -> Result<ScenarioConfig>) -> Result<Scenario> {
    let mut cfg = match &common.file {
        Some(file) => load_scenario_from_yaml(file)?,
        None => from_args()?,
    };
    if let Some(dir) = &common.output_dir {
        cfg.output_dir = Some(dir.clone());
    }
    Scenario::build_scenario(cfg).context("invalid scenario")
}

fn log_scenario(scenario: &Scenario) {
    let s = &scenario.system;
    let i = &scenario.initial;
    log::info!(
        "l1 = {}, l2 = {}, m1 = {}, m2 = {}, phi = ({}, {}), omega = ({}, {}), T = {}, h = {}",
        s.l1, s.l2, s.m1, s.m2, i.phi1, i.phi2, i.omega1, i.omega2,
        scenario.parameters.t_end, scenario.parameters.h0
    );
}

fn run_csv(args: CsvArgs) -> Result<()> {
    let scenario = build(&args.common, || {
        Ok(ScenarioConfig {
            pendulum: args.pendulum.to_config()?,
            initial: initial_config(Some(&args.angles), &args.velocities)?,
            parameters: args.run.to_config()?,
            grid: None,
            output_dir: None,
        })
    })?;
    log::info!("csv: simulating full trajectory");
    log_scenario(&scenario);

    let points = scenario.trajectory();
    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        log::warn!("trajectory became non-finite at t = {}", bad.time);
    }

    let path = scenario.output_dir.join(TRAJECTORY_FILE);
    write_trajectory_csv(&path, &points).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved {} ({} rows)", path.display(), points.len());
    Ok(())
}

fn run_flip_single(args: FlipSingleArgs) -> Result<()> {
    let scenario = build(&args.common, || {
        Ok(ScenarioConfig {
            pendulum: args.pendulum.to_config()?,
            initial: initial_config(Some(&args.angles), &args.velocities)?,
            parameters: args.run.to_config()?,
            grid: None,
            output_dir: None,
        })
    })?;
    let channel = AngleChannel::from_use_phi1(args.use_phi1.unwrap_or(1) == 1);
    log::info!("flip-single: tracing {}", channel.name());
    log_scenario(&scenario);

    let flip = scenario.flip_time(channel);
    match flip {
        Some(t) => log::info!("{} flips at t = {}", channel.name(), t),
        None => log::info!("{} does not flip within T = {}", channel.name(), scenario.parameters.t_end),
    }
    println!("First flip time ({}): {}", channel.name(), flip_time_or_sentinel(flip));
    Ok(())
}

fn run_flip_grid(args: FlipGridArgs) -> Result<()> {
    let scenario = build(&args.common, || {
        Ok(ScenarioConfig {
            pendulum: args.pendulum.to_config()?,
            initial: initial_config(None, &args.velocities)?,
            parameters: args.run.to_config()?,
            grid: Some(GridConfig {
                min_phi: required(args.min_phi, "min_phi")?,
                max_phi: required(args.max_phi, "max_phi")?,
                resolution: required(args.resolution, "resolution")?,
            }),
            output_dir: None,
        })
    })?;
    log::info!("flip-grid: sweeping initial angles on {} threads", rayon::current_num_threads());
    log_scenario(&scenario);

    let grid = scenario.flip_grid()?;
    let cells = grid.spec.resolution * grid.spec.resolution;
    log::info!(
        "flipped cells: phi1 {}/{}, phi2 {}/{}",
        grid.flipped_cells(AngleChannel::Phi1), cells,
        grid.flipped_cells(AngleChannel::Phi2), cells
    );

    write_flip_grid(
        &scenario.output_dir,
        &grid,
        &scenario.system,
        scenario.initial.omega1,
        scenario.initial.omega2,
        &scenario.parameters,
    )
    .context("writing flip grid tables")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().mode {
        Mode::Csv(args) => run_csv(args),
        Mode::FlipSingle(args) => run_flip_single(args),
        Mode::FlipGrid(args) => run_flip_grid(args),
        Mode::Bench => {
            bench_rk4();
            bench_grid();
            Ok(())
        }
    }
}
