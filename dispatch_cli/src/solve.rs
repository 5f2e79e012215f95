use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::bail;
use clap::Args;
use dispatch_matrix::travel_duration_client::{TravelDurationClient, TravelDurationSource};
use dispatch_optimizer::{
    jobs::{job::JobStatus, job_manager::JobManager},
    json::types::SolveRequest,
    planner::RoutePlanner,
    solver::solver_params::{SolverParams, Threads},
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::{config, parsers};

#[derive(Args)]
pub struct SolveArgs {
    /// JSON solve request
    #[arg(short = 'i', long)]
    input: PathBuf,

    #[command(flatten)]
    options: SolveOptions,
}

#[derive(Args)]
pub struct SolveOptions {
    /// Search budget (e.g., "5s", "1m", "PT30S")
    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "5s")]
    time_limit: jiff::SignedDuration,

    /// Trips each driver may run
    #[arg(long, default_value_t = 1)]
    trips: usize,

    /// Threads evaluating insertions
    #[arg(long, default_value_t = 4)]
    threads: u8,

    /// Skip OSRM and estimate durations from great-circle distances
    #[arg(long)]
    crow_flies: bool,

    /// Run as a background job and report the job result
    #[arg(long = "async")]
    run_async: bool,

    /// Where to write the JSON answer, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    let file = File::open(&args.input)?;
    let request: SolveRequest = serde_json::from_reader(BufReader::new(file))?;

    info!(
        "Loaded {} requests for {} drivers from {:?}",
        request.requests.len(),
        request.drivers.len(),
        args.input
    );

    solve_request(request, &args.options)
}

pub fn solve_request(request: SolveRequest, options: &SolveOptions) -> anyhow::Result<()> {
    let client = TravelDurationClient::new(config::travel_duration_provider(options.crow_flies))?;
    let params = SolverParams {
        max_trips_per_driver: options.trips.max(1),
        insertion_threads: Threads::Multi(usize::from(options.threads.max(1))),
        ..SolverParams::default()
    }
    .with_time_limit(options.time_limit);

    let manager = JobManager::new(RoutePlanner::new(client, params));

    if options.run_async {
        let accepted = manager.submit(request);
        info!("Job {} accepted", accepted.job_id);

        let status = wait_with_progress(&manager, &accepted.job_id, options.time_limit)?;
        let result = manager.result(&accepted.job_id)?;
        write_output(&result, options.output.as_ref())?;

        if status == JobStatus::Failed {
            bail!(
                "job {} failed: {}",
                accepted.job_id,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    } else {
        let response = manager.solve_blocking(&request)?;
        info!(
            "{} trips, {} unserved requests",
            response.routes.len(),
            response.unserved.len()
        );
        write_output(&response, options.output.as_ref())?;
    }

    Ok(())
}

fn wait_with_progress<S>(
    manager: &JobManager<S>,
    job_id: &str,
    time_limit: jiff::SignedDuration,
) -> anyhow::Result<JobStatus>
where
    S: TravelDurationSource + 'static,
{
    let bar = ProgressBar::new(time_limit.as_secs().max(1) as u64);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] ({elapsed}/{len}s) {msg}")?);

    let status = loop {
        let status = manager.wait(job_id, Duration::from_secs(1))?;
        bar.set_message(format!("{status:?}"));
        if status.is_terminal() {
            break status;
        }
        bar.inc(1);
    };

    bar.finish_and_clear();
    info!("Job {job_id} finished as {status:?}");

    Ok(status)
}

fn write_output<T: Serialize>(value: &T, output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            info!("Wrote {:?}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
