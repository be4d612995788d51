//! Command line arguments and their validation

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use contagion_core::{ensure_unit_interval, ContagionError, ContagionResult, NodeId};
use contagion_diffusion::{
    parse_initiators, CascadeConfig, EpidemicConfig, ShelterSpec, DEFAULT_DAYS,
};

/// Simulate threshold cascades and epidemics over a GML graph
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the graph file (GML format)
    pub file_path: PathBuf,

    /// Action to simulate
    #[clap(long, value_enum)]
    pub action: Action,

    /// Comma-separated list of initiator nodes
    #[clap(long)]
    pub initiator: String,

    /// Threshold for cascade effect
    #[clap(long)]
    pub threshold: Option<f64>,

    /// Probability of infection for COVID simulation
    #[clap(long = "probability_of_infection", alias = "probability-of-infection")]
    pub probability_of_infection: Option<f64>,

    /// Number of time steps for the simulation
    #[clap(long)]
    pub lifespan: Option<u32>,

    /// Proportion of nodes to shelter, or a bracketed node list (ex. [1,2,5])
    #[clap(long, allow_hyphen_values = true)]
    pub shelter: Option<String>,

    /// Proportion of vaccinated nodes
    #[clap(long)]
    pub vaccination: Option<f64>,

    /// Show the graph at each step
    #[clap(long)]
    pub interactive: bool,

    /// Plot final results
    #[clap(long)]
    pub plot: bool,

    /// Seed for vaccination, shelter and infection randomness
    #[clap(long)]
    pub seed: Option<u64>,

    /// Enable verbose logging (can be specified multiple times)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Cascade,
    Covid,
}

/// A fully validated simulation request
#[derive(Debug, Clone, PartialEq)]
pub enum Simulation {
    Cascade(CascadeConfig),
    Covid(EpidemicConfig),
}

impl Cli {
    pub fn initiators(&self) -> ContagionResult<Vec<NodeId>> {
        parse_initiators(&self.initiator)
    }

    /// Validate every supplied option, then build the requested simulation
    pub fn simulation(&self) -> ContagionResult<Simulation> {
        let shelter = match &self.shelter {
            Some(spec) => ShelterSpec::parse(spec)?,
            None => ShelterSpec::Proportion(0.0),
        };
        if let Some(threshold) = self.threshold {
            ensure_unit_interval("threshold", threshold)?;
        }
        if let Some(vaccination) = self.vaccination {
            ensure_unit_interval("vaccination", vaccination)?;
        }

        match self.action {
            Action::Cascade => {
                let threshold = self
                    .threshold
                    .ok_or(ContagionError::MissingRequiredParameter("threshold", "cascade"))?;
                let config = CascadeConfig::new(threshold);
                config.validate()?;
                Ok(Simulation::Cascade(config))
            }
            Action::Covid => {
                let config = EpidemicConfig::default()
                    .with_infection_probability(self.probability_of_infection.unwrap_or(0.0))
                    .with_days(self.lifespan.unwrap_or(DEFAULT_DAYS))
                    .with_shelter(shelter)
                    .with_vaccination(self.vaccination.unwrap_or(0.0));
                config.validate()?;
                Ok(Simulation::Covid(config))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("contagion").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cascade_requires_threshold() {
        let cli = parse(&["g.gml", "--action", "cascade", "--initiator", "0"]);
        assert!(matches!(
            cli.simulation(),
            Err(ContagionError::MissingRequiredParameter("threshold", "cascade"))
        ));

        let cli = parse(&[
            "g.gml", "--action", "cascade", "--initiator", "0", "--threshold", "0.5",
        ]);
        assert_eq!(cli.simulation().unwrap(), Simulation::Cascade(CascadeConfig::new(0.5)));
    }

    #[test]
    fn test_covid_options() {
        let cli = parse(&[
            "g.gml",
            "--action",
            "covid",
            "--initiator",
            "1,2",
            "--probability_of_infection",
            "0.4",
            "--lifespan",
            "20",
            "--shelter",
            "[3,4]",
            "--vaccination",
            "0.1",
            "--seed",
            "7",
            "--plot",
        ]);

        let Simulation::Covid(config) = cli.simulation().unwrap() else {
            panic!("expected covid simulation");
        };
        assert_eq!(config.infection_probability, 0.4);
        assert_eq!(config.days, 20);
        assert_eq!(
            config.shelter,
            ShelterSpec::Nodes(vec![NodeId::from("3"), NodeId::from("4")])
        );
        assert_eq!(config.vaccination, 0.1);
        assert_eq!(cli.seed, Some(7));
        assert!(cli.plot && !cli.interactive);
        assert_eq!(cli.initiators().unwrap(), vec![NodeId::from("1"), NodeId::from("2")]);
    }

    #[test]
    fn test_covid_defaults() {
        let cli = parse(&["g.gml", "--action", "covid", "--initiator", "0"]);
        let Simulation::Covid(config) = cli.simulation().unwrap() else {
            panic!("expected covid simulation");
        };
        assert_eq!(config, EpidemicConfig::default());
    }

    #[test]
    fn test_invalid_parameters() {
        let cli = parse(&[
            "g.gml", "--action", "covid", "--initiator", "0", "--vaccination", "1.5",
        ]);
        assert!(matches!(
            cli.simulation(),
            Err(ContagionError::InvalidParameter { name: "vaccination", .. })
        ));

        let cli = parse(&[
            "g.gml", "--action", "covid", "--initiator", "0", "--shelter", "0.1,0.2",
        ]);
        assert!(cli.simulation().is_err());

        let cli = parse(&["g.gml", "--action", "covid", "--initiator", "a,b"]);
        assert!(cli.initiators().is_err());

        // threshold is checked even when another action is selected
        let cli = parse(&["g.gml", "--action", "covid", "--initiator", "0", "--threshold", "2"]);
        assert!(cli.simulation().is_err());
    }

    #[test]
    fn test_unknown_action_rejected() {
        let args = ["contagion", "g.gml", "--action", "flu", "--initiator", "0"];
        let result = Cli::try_parse_from(args);
        assert!(result.is_err());
    }
}
