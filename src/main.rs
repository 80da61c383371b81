#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use torus_life::render::render_frame;
use torus_life::{EngineConfig, Grid, ReferenceLife, SimulationEngine, SnapshotPolicy, WorldConfig};

const DEFAULT_FRAME_DELAY_MS: u64 = 200;
const USAGE: &str = "usage: torus-life -c <config-file> [-t <num_threads>] [-v] [-p] \
                     [--delay-ms N] [--shared-snapshot] [--check]";

struct MainArgs {
    config_path: PathBuf,
    engine: EngineConfig,
    render_each_generation: bool,
    report_partitions: bool,
    frame_delay: Duration,
    check: bool,
}

fn next_arg<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("{flag} requires a value\n{USAGE}"))
}

fn parse_args() -> Result<MainArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;
    let mut engine = EngineConfig::default();
    let mut render_each_generation = false;
    let mut report_partitions = false;
    let mut frame_delay = Duration::from_millis(DEFAULT_FRAME_DELAY_MS);
    let mut check = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(next_arg(&args, i, "--config")?));
            }
            "-t" | "--threads" => {
                i += 1;
                let value = next_arg(&args, i, "--threads")?;
                let n: usize = value
                    .parse()
                    .ok()
                    .filter(|&n| n > 0)
                    .with_context(|| {
                        format!("thread count must be a positive integer (got {value:?})")
                    })?;
                engine = engine.worker_count(n);
            }
            "-v" | "--verbose" => render_each_generation = true,
            "-p" | "--partitions" => report_partitions = true,
            "--delay-ms" => {
                i += 1;
                let value = next_arg(&args, i, "--delay-ms")?;
                let ms: u64 = value
                    .parse()
                    .with_context(|| format!("--delay-ms requires milliseconds (got {value:?})"))?;
                frame_delay = Duration::from_millis(ms);
            }
            "--shared-snapshot" => engine = engine.snapshot_policy(SnapshotPolicy::Shared),
            "--check" => check = true,
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
        i += 1;
    }

    let Some(config_path) = config_path else {
        bail!("missing required --config\n{USAGE}");
    };
    Ok(MainArgs {
        config_path,
        engine,
        render_each_generation,
        report_partitions,
        frame_delay,
        check,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_checked(world: &WorldConfig, transitions: u64, actual: &Grid) -> Result<()> {
    let start = Instant::now();
    let mut reference = ReferenceLife::new(world.to_grid())?;
    reference.step_n(transitions);
    let reference_ms = start.elapsed().as_secs_f64() * 1000.0;

    let status = if reference.grid() == actual {
        "MATCH"
    } else {
        "MISMATCH"
    };
    println!(
        "Reference check: barrier pop = {}, reference pop = {} [{status}] ({reference_ms:.3} ms)",
        actual.population(),
        reference.population()
    );
    if status == "MISMATCH" {
        bail!("barrier engine diverged from the reference stepper");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args()?;

    let world = WorldConfig::load(&args.config_path)
        .with_context(|| format!("failed to load world from {}", args.config_path.display()))?;

    let start = Instant::now();
    let engine = SimulationEngine::new(world.to_grid(), world.iterations, &args.engine)?;
    let iterations = engine.iterations();

    let report = if args.render_each_generation {
        let delay = args.frame_delay;
        engine.run_observed(move |generation, grid: &Grid| {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Err(err) = render_frame(generation, grid, &mut out) {
                tracing::warn!(%err, "failed to render frame");
            }
            thread::sleep(delay);
        })?
    } else {
        engine.run()?
    };
    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.report_partitions {
        for part in &report.partitions {
            writeln!(out, "{part}")?;
        }
    }
    writeln!(
        out,
        "Total time for {} iterations of {}x{} world is {}.{:06}",
        iterations,
        world.width,
        world.height,
        elapsed.as_secs(),
        elapsed.subsec_micros()
    )?;
    out.flush()?;
    drop(out);

    if args.check {
        run_checked(&world, report.transitions, &report.grid)?;
    }
    Ok(())
}
