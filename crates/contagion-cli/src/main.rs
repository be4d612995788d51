//! Contagion command line
//!
//! Loads a GML graph and runs either a threshold cascade or an epidemic
//! over it, optionally rendering every step and plotting the final series.

mod cli;
mod plot;
mod render;

use clap::Parser;
use contagion_core::NodeId;
use contagion_diffusion::{
    CascadeConfig, CascadeEngine, EpidemicConfig, EpidemicEngine, NullSink,
};
use contagion_graph::{read_gml, Graph};
use eyre::{Result, WrapErr};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Simulation};
use plot::bar_chart;
use render::TerminalSink;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "contagion_cli=info,contagion_diffusion=info,contagion_graph=info".into()
        }),
        1 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let initiators = cli.initiators()?;
    let simulation = cli.simulation()?;

    let graph = read_gml(&cli.file_path).wrap_err("Enter a valid .gml file path")?;

    match simulation {
        Simulation::Cascade(config) => run_cascade(&cli, &graph, config, &initiators),
        Simulation::Covid(config) => run_covid(&cli, &graph, config, &initiators),
    }
}

fn run_cascade(
    cli: &Cli,
    graph: &Graph,
    config: CascadeConfig,
    initiators: &[NodeId],
) -> Result<()> {
    let engine = CascadeEngine::new(graph, config)?;
    let outcome = if cli.interactive {
        engine.run(initiators, &mut TerminalSink::stdout(true))?
    } else {
        engine.run(initiators, &mut NullSink)?
    };

    report_skipped(&outcome.skipped);
    println!(
        "Cascade simulation completed in {} rounds since no new nodes were activated.",
        outcome.rounds_executed()
    );
    println!(
        "{} of {} nodes active ({} activated by the cascade).",
        outcome.active_count(),
        graph.node_count(),
        outcome.total_activated()
    );

    if cli.plot {
        println!();
        print!(
            "{}",
            bar_chart(
                "Cascading Activations Over Time (Excluding Initiators)",
                "Round",
                &outcome.cumulative_activations(),
                1,
            )
        );
    }

    Ok(())
}

fn run_covid(
    cli: &Cli,
    graph: &Graph,
    config: EpidemicConfig,
    initiators: &[NodeId],
) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => {
            info!("Using random seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let engine = EpidemicEngine::new(graph, config)?;
    let outcome = if cli.interactive {
        engine.run(initiators, &mut rng, &mut TerminalSink::stdout(true))?
    } else {
        engine.run(initiators, &mut rng, &mut NullSink)?
    };

    report_skipped(&outcome.skipped);
    println!(
        "COVID simulation completed over {} days.",
        engine.config().days
    );
    match outcome.peak_day() {
        Some(peak) if !peak.new_infections.is_empty() => println!(
            "{} new infections in total, peaking on day {} with {}.",
            outcome.total_infections(),
            peak.day,
            peak.new_infections.len()
        ),
        _ => println!("No new infections."),
    }

    if cli.plot {
        println!();
        print!(
            "{}",
            bar_chart(
                "Number of New Infections Per Day",
                "Day",
                &outcome.new_infections_per_day(),
                1,
            )
        );
    }

    Ok(())
}

fn report_skipped(skipped: &[NodeId]) {
    if !skipped.is_empty() {
        let list: Vec<&str> = skipped.iter().map(NodeId::as_str).collect();
        println!("Ignored nodes missing from the graph: {}", list.join(", "));
    }
}
