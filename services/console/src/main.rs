mod args;
mod error;
mod plan;
mod render;

use args::{CliArgs, Layout};
use clap::Parser;
use plan::Plan;
use simulation::config::SimConfig;
use simulation::engine::SimulationEngine;
use simulation::export;
use simulation::scenarios;
use std::future::Future;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing; frames go to stdout, diagnostics to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = build_config(&args)?;

    if let Some(name) = &args.scenario {
        let result = scenarios::run_named(name, config)
            .ok_or_else(|| anyhow::anyhow!("unknown scenario {} (known: {})", name, scenarios::SCENARIO_NAMES.join(", ")))??;
        println!("{}", render::frame(&result.final_snapshot, args.log_lines));
        println!(
            "Scenario {}: {} after {} ticks. {}",
            result.name,
            if result.passed { "PASSED" } else { "FAILED" },
            result.ticks_run,
            result.details
        );
        return Ok(());
    }

    let plan = Plan::resolve(&args.plan)?;
    let mut engine = SimulationEngine::new(config)?;
    tracing::info!(
        session_id = %engine.session_id(),
        plan = %plan.name,
        "Starting simulation loop"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };
    run_loop(&mut engine, &plan, args.ticks, args.log_lines, shutdown).await;

    print!("{}", render::summary(engine.metrics()));
    if let Some(path) = &args.export_path {
        let export = export::build_export(engine.config(), engine.metrics(), &engine.snapshot());
        export::write_to_file(&export, path)?;
        tracing::info!(path = %path, "Export written");
    }

    Ok(())
}

fn build_config(args: &CliArgs) -> Result<SimConfig, anyhow::Error> {
    let mut config = match (&args.config_path, args.layout) {
        (Some(path), _) => SimConfig::load(path)?,
        (None, Layout::MultiDefense) => SimConfig::multi_defense(),
        (None, Layout::SingleServer) => SimConfig::single_server(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

/// Tick the engine at the configured cadence until the tick budget is
/// spent or `shutdown` resolves. Returns the last tick run.
async fn run_loop<F>(
    engine: &mut SimulationEngine,
    plan: &Plan,
    max_ticks: Option<u64>,
    log_lines: usize,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    let period = Duration::from_millis(engine.config().tick_interval_ms);
    let login_window = Duration::from_millis(engine.config().login_processing_ms);
    let mut interval = tokio::time::interval(period);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Interrupted, stopping simulation loop");
                break;
            }
            _ = interval.tick() => {}
        }

        let next_tick = engine.state().tick + 1;
        if plan.apply(next_tick, engine) {
            println!("User: Logging in... server is processing.");
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Interrupted during login, stopping simulation loop");
                    break;
                }
                _ = tokio::time::sleep(login_window) => {}
            }
        }
        let snapshot = engine.step();
        print!("{}", render::frame(&snapshot, log_lines));

        if max_ticks.is_some_and(|limit| snapshot.tick >= limit) {
            break;
        }
    }
    engine.state().tick
}
