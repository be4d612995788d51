//! Contagion Graph - The static network both engines diffuse over
//!
//! A [`Graph`] is loaded once and never mutated during a run. Engines do not
//! walk it directly; they take an [`Adjacency`] view that fixes the node
//! enumeration and the edge semantics they need:
//!
//! - [`Graph::undirected`] collapses direction (threshold cascade)
//! - [`Graph::directed`] keeps arcs as written (epidemic spread)

pub mod gml;
pub mod topology;

pub use gml::*;
pub use topology::*;
