use clap::Parser;
use log::{error, info, LevelFilter};
use shocktube::context::SimulationContext;
use shocktube::error::Error;
use shocktube::hydro::euler2d::Primitive;
use shocktube::output::{ColorScale, Format, SnapshotWriter};
use shocktube::setup::{self, ShockTube};
use shocktube::solvers::euler2d_hllc::Solver;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum ScaleMode {
    Auto,
    Fixed,
    Both,
}

impl std::str::FromStr for ScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ScaleMode::Auto),
            "fixed" => Ok(ScaleMode::Fixed),
            "both" => Ok(ScaleMode::Both),
            _ => Err(format!("unknown color scale '{}' (expected auto, fixed or both)", s)),
        }
    }
}

fn parse_primitive(s: &str) -> Result<Primitive, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("'{}': {}", v, e)))
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != 4 {
        return Err(format!("expected density,vx,vy,pressure; got '{}'", s));
    }
    Ok(Primitive::from_slice(&values))
}

#[derive(Debug, Parser)]
#[clap(version = "0.1", author = "J. Zrake <jzrake@clemson.edu>")]
#[clap(about = "Integrate a 2D shock tube with a first-order HLLC scheme")]
struct Opts {
    #[clap(long, default_value = "200")]
    nx: i64,

    #[clap(long, default_value = "200")]
    ny: i64,

    #[clap(long, default_value = "1.0")]
    lx: f64,

    #[clap(long, default_value = "1.0")]
    ly: f64,

    #[clap(short = 'g', long, default_value = "1.4")]
    gamma: f64,

    #[clap(short = 'c', long, default_value = "0.8")]
    cfl: f64,

    #[clap(short = 'e', long, default_value = "0.2")]
    end_time: f64,

    #[clap(short = 'i', long, default_value = "0.01")]
    output_interval: f64,

    #[clap(long, default_value = "0.5")]
    split: f64,

    #[clap(long, default_value = "1.0,0.0,0.0,1.0", parse(try_from_str = parse_primitive))]
    left: Primitive,

    #[clap(long, default_value = "0.125,0.0,0.0,0.1", parse(try_from_str = parse_primitive))]
    right: Primitive,

    #[clap(short = 'o', long, default_value = "results")]
    outdir: PathBuf,

    #[clap(short = 'f', long, default_value = "cbor")]
    format: Format,

    #[clap(long, default_value = "auto")]
    color_scale: ScaleMode,

    #[clap(short = 't', long, default_value = "0")]
    num_threads: usize,

    #[clap(short = 'l', long, default_value = "info")]
    log_level: LevelFilter,
}

fn run(opts: Opts) -> Result<(), Error> {
    if opts.num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.num_threads)
            .build_global()
        {
            error!("could not configure the thread pool: {}", e);
        }
    }

    let tube = ShockTube {
        left: opts.left,
        right: opts.right,
        split: opts.split,
    };
    let data = setup::setup_grid(opts.nx, opts.ny, opts.lx, opts.ly, &tube, opts.gamma)?;
    let context = SimulationContext {
        mesh: data.mesh,
        gamma_law_index: opts.gamma,
        cfl_number: opts.cfl,
        end_time: opts.end_time,
        output_interval: opts.output_interval,
    };
    info!("{:?}", context);
    info!("{:?}", tube);

    let mut sinks = match opts.color_scale {
        ScaleMode::Auto => vec![SnapshotWriter::new(&opts.outdir, opts.format, ColorScale::AutoScale)?],
        ScaleMode::Fixed => vec![SnapshotWriter::new(
            &opts.outdir,
            opts.format,
            ColorScale::FixedScale(data.ranges),
        )?],
        ScaleMode::Both => vec![
            SnapshotWriter::new(opts.outdir.join("auto"), opts.format, ColorScale::AutoScale)?,
            SnapshotWriter::new(
                opts.outdir.join("fixed"),
                opts.format,
                ColorScale::FixedScale(data.ranges),
            )?,
        ],
    };

    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))?;

    let start = std::time::Instant::now();
    let mut solver = Solver::new(context, data.conserved)?;
    let report = solver.run(&mut sinks, &stop);

    for sink in &mut sinks {
        sink.finish()?;
    }
    let report = report?;
    let seconds = start.elapsed().as_secs_f64();

    info!(
        "{} after {} iterations at t={:.4} ({} outputs, {:.2}s, {:.3e} zone-updates/s)",
        if report.interrupted { "stopped" } else { "finished" },
        report.iterations,
        report.time,
        report.outputs,
        seconds,
        report.iterations as f64 * solver.context().mesh.total_zones() as f64 / seconds
    );
    Ok(())
}

fn main() {
    let opts = Opts::parse();

    SimpleLogger::new().with_level(opts.log_level).init().unwrap();

    if let Err(e) = run(opts) {
        error!("{}", e);
        std::process::exit(1);
    }
}
