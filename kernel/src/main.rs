/*!
 * CPU Scheduling Simulator - Main Entry Point
 *
 * Loads a workload configuration, runs it to completion on simulated
 * cores and prints the run report as JSON.
 */

use cpu_sim_kernel::simulation::log_view;
use cpu_sim_kernel::{init_tracing, ChannelObserver, Simulation, SimulationConfig, Stoppable};
use miette::IntoDiagnostic;
use tracing::{info, warn};

/// Views buffered for display before new ones are dropped
const DISPLAY_BUFFER: usize = 1024;

fn load_config() -> miette::Result<SimulationConfig> {
    let path = std::env::args().nth(1).or_else(|| std::env::var("SIM_CONFIG").ok());
    match path {
        Some(path) => {
            info!(%path, "Loading configuration");
            Ok(SimulationConfig::from_path(&path)?)
        }
        None => {
            info!("No configuration given, running demo workload");
            Ok(SimulationConfig::demo())
        }
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();

    info!("CPU scheduling simulator starting...");
    let config = load_config()?;

    let (observer, views) = ChannelObserver::bounded(DISPLAY_BUFFER);
    let display = tokio::spawn(async move {
        while let Ok(view) = views.recv_async().await {
            log_view(&view);
        }
    });

    let mut simulation = Simulation::builder(config).with_observer(observer).build()?;
    let handle = simulation.handle();

    let mut run = tokio::task::spawn_blocking(move || simulation.run());
    let result = tokio::select! {
        result = &mut run => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, stopping simulation");
            handle.stop();
            run.await
        }
    };
    let report = result.into_diagnostic()??;

    if let Err(e) = display.await {
        warn!(error = %e, "Display task failed");
    }

    info!(
        ticks = report.ticks,
        completed = report.completed,
        order = ?report.terminated_order,
        "Simulation finished"
    );
    println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
    Ok(())
}
