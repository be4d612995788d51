//! Simulation configuration and parameter parsing

use contagion_core::{ensure_unit_interval, ContagionError, ContagionResult, NodeId};

use crate::ShelterSpec;

/// Days a node stays infectious before recovering
pub const INFECTION_LIFESPAN: u32 = 3;

/// Days a node stays recovered before becoming susceptible again
pub const RECOVERY_LIFESPAN: u32 = 3;

/// Multiplicative reduction of infection probability for vaccinated nodes
pub const VACCINE_EFFECT: f64 = 0.70;

/// Simulated days when none are requested
pub const DEFAULT_DAYS: u32 = 5;

/// Cascade configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeConfig {
    /// Fraction of active neighbours at which a node activates (0.0 - 1.0)
    pub threshold: f64,
}

impl CascadeConfig {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Reject thresholds outside [0, 1]
    pub fn validate(&self) -> ContagionResult<()> {
        ensure_unit_interval("threshold", self.threshold)?;
        Ok(())
    }
}

/// Epidemic configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EpidemicConfig {
    /// Per-contact, per-day infection probability (0.0 - 1.0)
    pub infection_probability: f64,
    /// Number of simulated days
    pub days: u32,
    /// Which nodes are sheltered
    pub shelter: ShelterSpec,
    /// Proportion of nodes vaccinated (0.0 - 1.0)
    pub vaccination: f64,
    /// Days infectious before recovering
    pub infection_lifespan: u32,
    /// Days recovered before becoming susceptible again
    pub recovery_lifespan: u32,
    /// Reduction of infection probability for vaccinated nodes (0.0 - 1.0)
    pub vaccine_effect: f64,
}

impl Default for EpidemicConfig {
    fn default() -> Self {
        Self {
            infection_probability: 0.0,
            days: DEFAULT_DAYS,
            shelter: ShelterSpec::Proportion(0.0),
            vaccination: 0.0,
            infection_lifespan: INFECTION_LIFESPAN,
            recovery_lifespan: RECOVERY_LIFESPAN,
            vaccine_effect: VACCINE_EFFECT,
        }
    }
}

impl EpidemicConfig {
    pub fn with_infection_probability(mut self, p: f64) -> Self {
        self.infection_probability = p;
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn with_shelter(mut self, shelter: ShelterSpec) -> Self {
        self.shelter = shelter;
        self
    }

    pub fn with_vaccination(mut self, proportion: f64) -> Self {
        self.vaccination = proportion;
        self
    }

    /// Reject probabilities and proportions outside [0, 1]
    pub fn validate(&self) -> ContagionResult<()> {
        ensure_unit_interval("probability_of_infection", self.infection_probability)?;
        ensure_unit_interval("vaccination", self.vaccination)?;
        ensure_unit_interval("vaccine_effect", self.vaccine_effect)?;
        if let ShelterSpec::Proportion(p) = self.shelter {
            ensure_unit_interval("shelter", p)?;
        }
        Ok(())
    }

    /// Probability that one infected contact infects this neighbour today
    pub fn contact_probability(&self, vaccinated: bool) -> f64 {
        if vaccinated {
            self.infection_probability * (1.0 - self.vaccine_effect)
        } else {
            self.infection_probability
        }
    }
}

/// Parse an integer node token into its canonical identifier
pub(crate) fn parse_node_token(name: &'static str, token: &str) -> ContagionResult<NodeId> {
    token.trim().parse::<i64>().map(NodeId::from).map_err(|_| {
        ContagionError::invalid(
            name,
            format!(
                "all values inside initiators or shelter must be integers, got {:?}",
                token.trim()
            ),
        )
    })
}

/// Parse a comma-separated initiator list such as `0,4,7`
pub fn parse_initiators(list: &str) -> ContagionResult<Vec<NodeId>> {
    list.split(',')
        .map(|token| parse_node_token("initiator", token))
        .collect()
}
