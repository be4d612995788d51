//! Contagion Diffusion - Discrete-time spread over a static graph
//!
//! Two engines share one discipline: every round (cascade) or day
//! (epidemic) reads a snapshot taken at its start and commits all of its
//! decisions in a single batch, so nothing changed during a step can
//! influence another decision in the same step.
//!
//! - [`CascadeEngine`]: deterministic threshold diffusion run to fixpoint
//! - [`EpidemicEngine`]: stochastic susceptible/infected/recovered spread
//!   with shelter and vaccination, run for a fixed number of days
//!
//! Both emit [`Snapshot`]s to a [`SnapshotSink`]; rendering never feeds back
//! into the simulation.

pub mod cascade;
pub mod config;
pub mod epidemic;
pub mod shelter;
pub mod snapshot;
pub mod timers;

pub use cascade::*;
pub use config::*;
pub use epidemic::*;
pub use shelter::*;
pub use snapshot::*;
pub use timers::*;
