//! # Intrigue Rules
//!
//! The data model of the intrigue system: typed variables, actors and their
//! policies, running schemes, and the state that owns them all.
//! This crate holds state only and does not evaluate dialogue conditions.

pub mod entities;
pub mod error;
pub mod policy;
pub mod variables;
pub mod world_state;

pub use entities::*;
pub use error::*;
pub use policy::*;
pub use variables::*;
pub use world_state::*;
