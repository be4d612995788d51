//! Contagion Core - Fundamental types shared by the graph and diffusion crates
//!
//! This crate defines:
//! - Node identifiers (`NodeId`), canonicalised to string labels
//! - Per-node state enums with stable integer codes
//! - The node state store both engines mutate
//! - The error taxonomy and result alias

pub mod id;
pub mod state;
pub mod error;

pub use id::*;
pub use state::*;
pub use error::*;
