//! Domain model for sustainable-energy projects and their reference data.
//!
//! # Responsibility
//! - Define the canonical project record and lookup row shapes.
//! - Keep validation next to the data it protects.
//!
//! # Invariants
//! - Source types and regions are read-only from the core's perspective.

pub mod lookup;
pub mod project;
